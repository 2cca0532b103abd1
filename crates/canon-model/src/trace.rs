//! Motion-revealed forms.
//!
//! A trace is a form revealed by motion — the path swept by a point on a
//! rolling circle, the envelope of a rotating chord. Traces carry claimed
//! invariants (names of properties the motion is asserted to preserve) and a
//! closure status describing whether the revealed curve closes on itself.

use crate::Params;
use serde::{Deserialize, Serialize};

/// Whether a motion-revealed curve closes.
///
/// A trace left at [`ClosureStatus::Indeterminate`] while claiming
/// invariants is a rule violation: claimed invariants are only meaningful
/// against a committed closure behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureStatus {
    /// The trace returns to its starting configuration.
    Closed,
    /// The trace approaches but never reaches a limiting configuration.
    Asymptotic,
    /// The trace diverges.
    Open,
    /// Not yet committed.
    #[default]
    Indeterminate,
}

impl std::fmt::Display for ClosureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Asymptotic => write!(f, "asymptotic"),
            Self::Open => write!(f, "open"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

impl std::str::FromStr for ClosureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closed" => Ok(Self::Closed),
            "asymptotic" => Ok(Self::Asymptotic),
            "open" => Ok(Self::Open),
            "indeterminate" => Ok(Self::Indeterminate),
            _ => Err(format!("unknown closure status: {s}")),
        }
    }
}

/// A declared motion-revealed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub id: String,
    pub kind: String,

    /// The form whose motion reveals this trace, if declared.
    #[serde(default)]
    pub source_form: Option<String>,

    /// Reference frame the motion is observed in.
    #[serde(default)]
    pub frame: Option<String>,

    #[serde(default)]
    pub params: Params,

    /// Ordered list of invariant names the motion is claimed to preserve.
    #[serde(default)]
    pub invariants_claimed: Vec<String>,

    /// Classification of the region the motion leaves untouched.
    #[serde(default)]
    pub void_type: Option<String>,

    #[serde(default)]
    pub closure_status: ClosureStatus,

    #[serde(default)]
    pub notes: String,
}

impl Trace {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            source_form: None,
            frame: None,
            params: Params::new(),
            invariants_claimed: Vec::new(),
            void_type: None,
            closure_status: ClosureStatus::default(),
            notes: String::new(),
        }
    }

    pub fn with_source_form(mut self, id: impl Into<String>) -> Self {
        self.source_form = Some(id.into());
        self
    }

    pub fn with_closure_status(mut self, status: ClosureStatus) -> Self {
        self.closure_status = status;
        self
    }

    pub fn claiming_invariant(mut self, name: impl Into<String>) -> Self {
        self.invariants_claimed.push(name.into());
        self
    }

    /// Whether any invariants are claimed for this trace.
    pub fn claims_invariants(&self) -> bool {
        !self.invariants_claimed.is_empty()
    }
}
