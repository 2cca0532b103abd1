//! Declared relationships between forms.

use crate::Params;
use serde::{Deserialize, Serialize};

/// A declared relationship between two forms.
///
/// `a` and `b` are weak references: form ids, not owned values. A relation
/// whose endpoints do not resolve within the owning declaration is a
/// structural rule violation, not a construction error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relationship kind, e.g. "inscribed_in", "tangent_to", "generates".
    pub kind: String,

    pub a: String,
    pub b: String,

    #[serde(default)]
    pub params: Params,

    #[serde(default)]
    pub notes: String,
}

impl Relation {
    pub fn new(kind: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            a: a.into(),
            b: b.into(),
            params: Params::new(),
            notes: String::new(),
        }
    }

    /// The two endpoint ids, in declaration order.
    pub fn endpoints(&self) -> [&str; 2] {
        [&self.a, &self.b]
    }
}
