//! Error types for the Canon gateway.
//!
//! Domain findings are never errors — they travel inside a `Verdict`. The
//! types here cover the three remaining failure classes: gateway refusals
//! (control-flow-significant, raised to the caller), rule execution
//! failures (converted to synthetic findings, never propagated), and
//! per-form realization failures (recorded as strings, never propagated).

use canon_model::Verdict;

/// Gateway failures raised by [`crate::CanonEngine::realize`].
#[derive(Debug, thiserror::Error)]
pub enum CanonError {
    /// Validation did not pass; carries the full verdict so the caller can
    /// show every finding with its rule id and canon citations.
    #[error(
        "declaration '{}' failed validation with {} finding(s)",
        .0.declaration_title,
        .0.findings.len()
    )]
    ValidationFailed(Box<Verdict>),

    /// `skip_validation` was requested on an engine constructed with
    /// `allow_bypass = false`. A single call site can never disable
    /// validation on its own.
    #[error("validation bypass requested but this engine was constructed with allow_bypass = false")]
    BypassNotAuthorized,
}

impl CanonError {
    /// The verdict carried by a validation failure, if that is what this is.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Self::ValidationFailed(verdict) => Some(verdict),
            Self::BypassNotAuthorized => None,
        }
    }
}

/// A rule failed to evaluate.
///
/// This is not a domain violation: the engine converts it into a synthetic
/// fatal finding under `"<rule.id>-EXCEPTION"` so a buggy rule cannot
/// silently swallow validation.
#[derive(Debug, thiserror::Error)]
#[error("rule execution failed: {message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A realizer failed on a single form.
///
/// Caught per form and recorded in `RealizeResult::errors`; one broken form
/// must not prevent realization of the others.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RealizeError {
    pub message: String,
}

impl RealizeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
