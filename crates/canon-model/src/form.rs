//! Declared geometric forms.
//!
//! A [`Form`] is the basic unit of a declaration: a type tag (`kind`), a
//! parameter map, and optional classification fields. The model does not
//! prescribe the set of kinds — kinds are an open vocabulary bound to
//! realizers at runtime — but rules may require classification fields for
//! specific kinds (orientation for spirals, curvature class for circles).

use crate::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declared geometric entity.
///
/// `id` must be unique within the owning declaration; uniqueness is enforced
/// by the structural rules, not by this type. `params` carries the
/// kind-specific numeric and symbolic parameters a realizer will consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub kind: String,

    #[serde(default)]
    pub params: Params,

    /// Non-binding documentation tags. Never inspected by rules.
    #[serde(default)]
    pub meaning: Vec<String>,

    /// Winding/handedness for orientation-sensitive kinds.
    #[serde(default)]
    pub orientation: Option<String>,

    #[serde(default)]
    pub symmetry_class: Option<String>,

    #[serde(default)]
    pub curvature_class: Option<String>,

    /// Dimensional power: 1 (linear), 2 (planar), 3 (solid).
    #[serde(default)]
    pub dimensional_class: Option<u8>,

    /// Absent means the form is unbounded — a limit form.
    #[serde(default)]
    pub iteration_depth: Option<u32>,

    #[serde(default)]
    pub truncated: bool,

    #[serde(default)]
    pub notes: String,
}

impl Form {
    /// Create a form with the given id and kind; all other fields default.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            params: Params::new(),
            meaning: Vec::new(),
            orientation: None,
            symmetry_class: None,
            curvature_class: None,
            dimensional_class: None,
            iteration_depth: None,
            truncated: false,
            notes: String::new(),
        }
    }

    /// Set a single parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }

    pub fn with_symmetry_class(mut self, class: impl Into<String>) -> Self {
        self.symmetry_class = Some(class.into());
        self
    }

    pub fn with_curvature_class(mut self, class: impl Into<String>) -> Self {
        self.curvature_class = Some(class.into());
        self
    }

    pub fn with_dimensional_class(mut self, power: u8) -> Self {
        self.dimensional_class = Some(power);
        self
    }

    pub fn with_iteration_depth(mut self, depth: u32) -> Self {
        self.iteration_depth = Some(depth);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    /// Whether this form has a bounded iteration depth.
    ///
    /// Unbounded forms are limit forms — realized only up to a
    /// realizer-chosen cutoff.
    pub fn is_bounded(&self) -> bool {
        self.iteration_depth.is_some()
    }
}
