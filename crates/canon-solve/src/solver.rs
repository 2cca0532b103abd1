//! The solver capability contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a solution was obtained.
///
/// Carried with every solution so the invoking layer can show the user
/// which formula and assumptions produced the canonical parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveProvenance {
    /// Type name of the solver.
    pub solver: String,

    /// The user-edited property the solution was inverted from.
    pub source_key: String,

    pub source_value: f64,

    /// Human-readable inversion formula, e.g. `r = sqrt(A / pi)`.
    pub formula: String,

    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// A single candidate value for the canonical parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// The parameter this value is for, e.g. `radius`.
    pub canonical_key: String,

    pub canonical_parameter: f64,

    pub provenance: SolveProvenance,
}

/// Outcome of one inversion attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SolveResult {
    /// Exactly one solution.
    Solved { solution: Solution },

    /// Multiple valid solutions; the caller must choose.
    Ambiguous { solutions: Vec<Solution> },

    /// The input lies outside the solver's valid range.
    InvalidDomain {
        key: String,
        value: f64,
        reason: String,
    },

    /// The input does not pin down the canonical parameter.
    Underdetermined { reason: String },

    /// The input over-constrains the canonical parameter.
    Overdetermined { reason: String },
}

impl SolveResult {
    pub fn solved(solution: Solution) -> Self {
        Self::Solved { solution }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }

    /// The unique solution, if this outcome has one.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Solved { solution } => Some(solution),
            _ => None,
        }
    }
}

/// A pluggable component that inverts user-editable properties back to one
/// canonical parameter.
///
/// Implementations must be pure functions of `(key, value)`: no I/O, no
/// state. The registry may hold several solvers for one form kind, each
/// owning a different set of editable keys.
pub trait Solver: Send + Sync {
    /// Type name recorded in provenance.
    fn name(&self) -> &str;

    /// The parameter this solver ultimately produces, e.g. `radius`.
    fn canonical_key(&self) -> &str;

    /// The user-editable properties this solver can invert from.
    fn supported_keys(&self) -> BTreeSet<String>;

    fn solve_from(&self, key: &str, value: f64) -> SolveResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_solution() -> Solution {
        Solution {
            canonical_key: "radius".to_string(),
            canonical_parameter: 1.0,
            provenance: SolveProvenance {
                solver: "TestSolver".to_string(),
                source_key: "diameter".to_string(),
                source_value: 2.0,
                formula: "r = d / 2".to_string(),
                assumptions: vec![],
            },
        }
    }

    #[test]
    fn solved_outcome_exposes_its_solution() {
        let result = SolveResult::solved(unit_solution());
        assert!(result.is_solved());
        assert_eq!(result.solution().unwrap().canonical_parameter, 1.0);
    }

    #[test]
    fn non_solved_outcomes_have_no_unique_solution() {
        let ambiguous = SolveResult::Ambiguous {
            solutions: vec![unit_solution(), unit_solution()],
        };
        assert!(!ambiguous.is_solved());
        assert!(ambiguous.solution().is_none());

        let invalid = SolveResult::InvalidDomain {
            key: "area".to_string(),
            value: -1.0,
            reason: "area must be positive".to_string(),
        };
        assert!(invalid.solution().is_none());
    }
}
