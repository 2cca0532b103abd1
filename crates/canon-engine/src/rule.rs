//! The rule capability contract.
//!
//! A rule is a pure check over a declaration: given the same declaration it
//! must return the same findings. No side effects, no I/O. Rules never
//! decide pass/fail on their own — they report findings, and the engine
//! computes the verdict.

use crate::error::RuleError;
use canon_model::{Declaration, Finding};

/// A consistency rule checked against every declaration.
///
/// Implementations must be deterministic. A rule that cannot complete
/// returns `Err`; the engine converts that into a synthetic fatal finding
/// under [`exception_rule_id`] rather than propagating it, so one broken
/// rule cannot crash validation of everything else.
pub trait CanonRule: Send + Sync {
    /// Stable rule id, cited by every finding this rule produces.
    fn id(&self) -> &str;

    /// Short human-readable title.
    fn title(&self) -> &str;

    /// Canon article citations backing this rule.
    fn articles(&self) -> &[&str];

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError>;
}

/// Stable ids of the built-in rules.
pub mod rule_id {
    pub const UNIQUE_IDS: &str = "unique-ids";
    pub const REFERENCE_INTEGRITY: &str = "reference-integrity";
    pub const ORIENTATION_REQUIRED: &str = "orientation-required";
    pub const CURVATURE_REQUIRED: &str = "curvature-required";
    pub const CONSTRAINT_TOLERANCE: &str = "constraint-tolerance";
    pub const TRACE_CLOSURE: &str = "trace-closure";
}

/// The synthetic rule id used when a rule fails to evaluate.
pub fn exception_rule_id(id: &str) -> String {
    format!("{id}-EXCEPTION")
}
