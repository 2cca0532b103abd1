//! Invariant constraints.
//!
//! An [`InvariantConstraint`] asserts a numeric relationship over form
//! properties: exact equality, approximate equality within a tolerance, or
//! a ratio assertion. Constraints are declarative — the model does not
//! evaluate them; realizers and canon tests do. The rules only check that
//! numeric assertions carry (or inherit) a tolerance and that referenced
//! forms exist.

use serde::{Deserialize, Serialize};

/// One side of a constraint expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// A measurable property of a declared form, e.g. `circle-1.area`.
    Property { form: String, property: String },
    /// A literal numeric value.
    Literal(f64),
}

impl Operand {
    pub fn property(form: impl Into<String>, property: impl Into<String>) -> Self {
        Self::Property {
            form: form.into(),
            property: property.into(),
        }
    }

    /// The form id this operand references, if any.
    pub fn form_id(&self) -> Option<&str> {
        match self {
            Self::Property { form, .. } => Some(form),
            Self::Literal(_) => None,
        }
    }
}

/// A small structured assertion over operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintExpr {
    /// `lhs == rhs`, exactly.
    Equal { lhs: Operand, rhs: Operand },

    /// `|lhs - rhs| <= tolerance`. A `None` tolerance inherits the
    /// declaration epsilon.
    ApproxEqual {
        lhs: Operand,
        rhs: Operand,
        tolerance: Option<f64>,
    },

    /// `lhs / rhs ≈ ratio` within `tolerance`.
    Ratio {
        lhs: Operand,
        rhs: Operand,
        ratio: f64,
        tolerance: Option<f64>,
    },
}

impl ConstraintExpr {
    /// Whether this expression asserts a numeric comparison that needs a
    /// tolerance to be meaningful.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::ApproxEqual { .. } | Self::Ratio { .. })
    }

    /// The tolerance carried by this expression itself.
    pub fn tolerance(&self) -> Option<f64> {
        match self {
            Self::Equal { .. } => None,
            Self::ApproxEqual { tolerance, .. } | Self::Ratio { tolerance, .. } => *tolerance,
        }
    }

    /// Form ids referenced by the operands, in expression order.
    pub fn referenced_forms(&self) -> Vec<&str> {
        let (lhs, rhs) = match self {
            Self::Equal { lhs, rhs }
            | Self::ApproxEqual { lhs, rhs, .. }
            | Self::Ratio { lhs, rhs, .. } => (lhs, rhs),
        };
        [lhs, rhs].into_iter().filter_map(Operand::form_id).collect()
    }
}

/// A named invariant constraint scoped to a set of forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantConstraint {
    pub name: String,
    pub expr: ConstraintExpr,

    /// Form-id weak references this constraint is scoped to.
    #[serde(default)]
    pub scope: Vec<String>,

    #[serde(default)]
    pub notes: String,
}

impl InvariantConstraint {
    pub fn new(name: impl Into<String>, expr: ConstraintExpr) -> Self {
        Self {
            name: name.into(),
            expr,
            scope: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn with_scope(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scope = ids.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_classification() {
        let eq = ConstraintExpr::Equal {
            lhs: Operand::property("c1", "radius"),
            rhs: Operand::Literal(1.0),
        };
        assert!(!eq.is_numeric());

        let approx = ConstraintExpr::ApproxEqual {
            lhs: Operand::property("c1", "circumference"),
            rhs: Operand::Literal(6.283),
            tolerance: Some(1e-3),
        };
        assert!(approx.is_numeric());
        assert_eq!(approx.tolerance(), Some(1e-3));
    }

    #[test]
    fn ratio_without_own_tolerance() {
        let golden = ConstraintExpr::Ratio {
            lhs: Operand::property("rect", "long_side"),
            rhs: Operand::property("rect", "short_side"),
            ratio: 1.618_033_988_749_895,
            tolerance: None,
        };
        assert!(golden.is_numeric());
        assert_eq!(golden.tolerance(), None);
    }

    #[test]
    fn referenced_forms_skip_literals() {
        let expr = ConstraintExpr::ApproxEqual {
            lhs: Operand::property("a", "area"),
            rhs: Operand::Literal(3.0),
            tolerance: Some(0.1),
        };
        assert_eq!(expr.referenced_forms(), vec!["a"]);

        let expr = ConstraintExpr::Equal {
            lhs: Operand::property("a", "area"),
            rhs: Operand::property("b", "area"),
        };
        assert_eq!(expr.referenced_forms(), vec!["a", "b"]);
    }
}
