//! # Canon Declaration Model
//!
//! Immutable value types describing what a caller *declares*: geometric
//! forms, relations between them, motion-revealed traces, invariant
//! constraints, and canon test requests, bundled into a root [`Declaration`].
//!
//! Everything here is a plain value record: structural equality, no
//! identity-based mutation, no live cross-references. Entities refer to each
//! other by string id (weak references) and are resolved through the owning
//! [`Declaration`]'s lookup methods. This keeps the tree cycle-free, cheaply
//! clonable, and stable to hash for signatures.
//!
//! ## Architecture
//!
//! ```text
//! Declaration            ← root container, sole owner of all entities
//!     │
//! Form                   ← declared geometric entity (kind + params)
//!     │
//! Relation               ← declared relationship between two forms
//!     │
//! Trace                  ← motion-revealed form with closure status
//!     │
//! InvariantConstraint    ← equality/ratio assertion over form properties
//!     │
//! CanonTestRequest       ← requested canon test over a set of forms
//! ```
//!
//! Validation results live here too: a [`Finding`] is one reported issue
//! from a rule, and a [`Verdict`] aggregates findings into an overall
//! pass/fail. The engine computes verdicts; this crate only defines them.

pub mod constraint;
pub mod declaration;
pub mod finding;
pub mod form;
pub mod relation;
pub mod request;
pub mod trace;

pub use constraint::{ConstraintExpr, InvariantConstraint, Operand};
pub use declaration::Declaration;
pub use finding::{Finding, Severity, Verdict};
pub use form::Form;
pub use relation::Relation;
pub use request::CanonTestRequest;
pub use trace::{ClosureStatus, Trace};

/// Parameter maps are ordered so that iteration and serialization are
/// deterministic for a given declaration.
pub type Params = std::collections::BTreeMap<String, serde_json::Value>;
