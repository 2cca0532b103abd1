//! Findings and verdicts — the result vocabulary of validation.
//!
//! Rules produce [`Finding`]s; the engine aggregates them into a
//! [`Verdict`]. Findings are domain data, never errors: a failed check is a
//! reported fact about the declaration, and only the engine's gateway turns
//! a non-ok verdict into a refusal to realize.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Severity of a finding.
///
/// Ordered ascending so that [`Severity::Fatal`] is the maximum:
/// `Info < Warn < Error < Fatal`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Whether a finding at this severity blocks realization.
    ///
    /// `Fatal` always blocks. `Error` blocks only in strict mode — the
    /// transitional compatibility knob that treats errors as fatal.
    pub fn blocks(self, strict: bool) -> bool {
        match self {
            Self::Fatal => true,
            Self::Error => strict,
            Self::Warn | Self::Info => false,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// One reported issue from a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,

    /// Stable id of the rule that produced this finding.
    pub rule_id: String,

    pub message: String,

    /// Canon article citations backing the rule.
    #[serde(default)]
    pub articles: Vec<String>,

    /// Ids of the offending forms/traces.
    #[serde(default)]
    pub subject_ids: Vec<String>,

    #[serde(default)]
    pub suggested_fix: Option<String>,

    /// Structured machine-readable detail.
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

impl Finding {
    pub fn new(
        severity: Severity,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            rule_id: rule_id.into(),
            message: message.into(),
            articles: Vec::new(),
            subject_ids: Vec::new(),
            suggested_fix: None,
            context: BTreeMap::new(),
        }
    }

    pub fn with_articles(mut self, articles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.articles = articles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subjects(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.subject_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// The aggregated result of validating one declaration.
///
/// `ok` is computed from the findings and the strictness mode, never
/// asserted by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub ok: bool,
    pub findings: Vec<Finding>,
    pub declaration_title: String,
    pub canon_version: String,
}

impl Verdict {
    /// Aggregate findings into a verdict, computing `ok` under the given
    /// strictness mode.
    pub fn from_findings(
        findings: Vec<Finding>,
        declaration_title: impl Into<String>,
        canon_version: impl Into<String>,
        strict: bool,
    ) -> Self {
        let ok = !findings.iter().any(|f| f.severity.blocks(strict));
        Self {
            ok,
            findings,
            declaration_title: declaration_title.into(),
            canon_version: canon_version.into(),
        }
    }

    /// The highest severity among the findings, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    /// Findings at or above the given severity, in report order.
    pub fn findings_at_least(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity >= severity).collect()
    }

    /// The findings that made (or would make) this verdict non-ok.
    pub fn blocking_findings(&self, strict: bool) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity.blocks(strict)).collect()
    }
}
