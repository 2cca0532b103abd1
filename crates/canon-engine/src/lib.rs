//! # Canon Engine
//!
//! The sole execution gateway of the Canon DSL: a declaration goes in, a
//! verdict comes out, and artifacts are produced if and only if the verdict
//! permits.
//!
//! ## Architecture
//!
//! ```text
//! Declaration            ← immutable input (canon-model)
//!     │
//! CanonRule[]            ← pure checks, failure-isolated per rule
//!     │
//! Verdict                ← findings + computed ok, cached by signature
//!     │
//! CanonEngine.realize    ← double-gated: verdict + explicit bypass flags
//!     │
//! RealizerRegistry       ← kind → realizer dispatch, last-registration-wins
//!     │
//! RealizeResult          ← artifacts + provenance + per-form errors
//! ```
//!
//! The engine performs no geometric computation and no I/O: realizers are
//! registered by external domain modules, and solvers (canon-solve) sit
//! entirely upstream of this crate — they help build declarations and are
//! never consulted during realization.

pub mod engine;
pub mod error;
pub mod realizer;
pub mod rule;
pub mod rules;
pub mod signature;

pub use engine::{
    CANON_VERSION, CachedVerdict, CanonEngine, DECLARATION_PROVENANCE_KEY, EngineConfig,
    RealizeOptions, RealizeResult,
};
pub use error::{CanonError, RealizeError, RuleError};
pub use realizer::{DEFAULT_EPSILON, RealizeContext, Realization, Realizer, RealizerRegistry};
pub use rule::{CanonRule, exception_rule_id, rule_id};
pub use rules::{CURVED_KINDS, ORIENTATION_SENSITIVE_KINDS, builtin_rules};
pub use signature::{SIGNATURE_HEX_LEN, declaration_signature};
