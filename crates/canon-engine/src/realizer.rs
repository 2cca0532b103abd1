//! The realizer capability contract and registry.
//!
//! A realizer turns a validated form into a concrete artifact — a mesh, a
//! metric set, a drawing. The engine performs no geometric computation
//! itself; it only dispatches, by form kind, to whatever realizers the
//! domain modules registered at startup. The engine ships with none.

use crate::error::RealizeError;
use canon_model::{Declaration, Form};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Numeric tolerance used when the declaration does not set one.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// What a realizer produces for one form.
#[derive(Debug, Clone, Default)]
pub struct Realization {
    /// The concrete artifact, opaque to the engine.
    pub artifact: Value,

    /// Computed measurements, merged into the form's provenance entry.
    pub metrics: BTreeMap<String, Value>,

    /// Realizer-supplied provenance, merged with the engine's own metadata.
    pub provenance: BTreeMap<String, Value>,
}

impl Realization {
    pub fn new(artifact: Value) -> Self {
        Self {
            artifact,
            metrics: BTreeMap::new(),
            provenance: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }

    pub fn with_provenance(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.provenance.insert(key.into(), value.into());
        self
    }
}

/// Everything a realizer may consult while realizing one form.
///
/// The full declaration is exposed for forms that reference siblings; the
/// epsilon is the declaration-level default with a fixed fallback.
pub struct RealizeContext<'a> {
    pub declaration: &'a Declaration,
    pub epsilon: f64,
    pub config: &'a BTreeMap<String, Value>,
}

impl<'a> RealizeContext<'a> {
    pub fn new(declaration: &'a Declaration, config: &'a BTreeMap<String, Value>) -> Self {
        Self {
            declaration,
            epsilon: declaration.epsilon.unwrap_or(DEFAULT_EPSILON),
            config,
        }
    }
}

/// A pluggable component that turns a form into an artifact.
pub trait Realizer: Send + Sync {
    /// Type name recorded in provenance.
    fn name(&self) -> &str;

    /// The form kinds this realizer can handle.
    fn supported_kinds(&self) -> BTreeSet<String>;

    fn realize_form(
        &self,
        form: &Form,
        ctx: &RealizeContext<'_>,
    ) -> Result<Realization, RealizeError>;
}

/// Kind-keyed realizer lookup.
///
/// Later registrations for the same kind overwrite earlier ones — last
/// registration wins, silently. Absence of a kind is reported by the engine
/// as a recorded error at realization time, not here: the set of kinds is
/// open by design.
#[derive(Default)]
pub struct RealizerRegistry {
    by_kind: BTreeMap<String, Arc<dyn Realizer>>,
}

impl RealizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a realizer under every kind it supports.
    pub fn register(&mut self, realizer: Arc<dyn Realizer>) {
        for kind in realizer.supported_kinds() {
            self.by_kind.insert(kind, Arc::clone(&realizer));
        }
    }

    /// Register a realizer under a single kind, regardless of what it
    /// advertises. Useful for tests and for narrowing a broad realizer.
    pub fn register_for_kind(&mut self, kind: impl Into<String>, realizer: Arc<dyn Realizer>) {
        self.by_kind.insert(kind.into(), realizer);
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn Realizer>> {
        self.by_kind.get(kind)
    }

    pub fn registered_kinds(&self) -> BTreeSet<&str> {
        self.by_kind.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }
}
