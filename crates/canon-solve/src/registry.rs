//! Kind-keyed solver lookup.

use crate::solver::Solver;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Registry of solvers, keyed by form kind.
///
/// A kind may carry several solvers, each owning a different set of
/// editable keys; lookup returns the first registered solver that supports
/// the requested key, so registration order is a priority order.
#[derive(Default)]
pub struct SolverRegistry {
    by_kind: BTreeMap<String, Vec<Arc<dyn Solver>>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: impl Into<String>, solver: Arc<dyn Solver>) {
        self.by_kind.entry(kind.into()).or_default().push(solver);
    }

    /// The first registered solver for `kind` that can invert from `key`.
    pub fn solver_for(&self, kind: &str, key: &str) -> Option<&Arc<dyn Solver>> {
        self.by_kind
            .get(kind)?
            .iter()
            .find(|solver| solver.supported_keys().contains(key))
    }

    /// All solvers registered for a kind, in registration order.
    pub fn solvers_for_kind(&self, kind: &str) -> &[Arc<dyn Solver>] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Union of the editable keys any solver supports for this kind.
    pub fn supported_keys(&self, kind: &str) -> BTreeSet<String> {
        self.solvers_for_kind(kind)
            .iter()
            .flat_map(|solver| solver.supported_keys())
            .collect()
    }

    pub fn registered_kinds(&self) -> BTreeSet<&str> {
        self.by_kind.keys().map(String::as_str).collect()
    }
}
