//! The root declaration container.

use crate::{CanonTestRequest, Form, InvariantConstraint, Relation, Trace};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// The root, immutable container of everything submitted for validation and
/// realization.
///
/// A declaration is constructed once, handed to the engine, and never
/// mutated; revalidation always operates on a (possibly new) declaration
/// value. Ownership is strictly by value — entities live and die with their
/// declaration, and cross-references are form-id strings resolved through
/// [`Declaration::form`] / [`Declaration::trace`].
///
/// Id uniqueness across forms and traces is a rule obligation, not a type
/// invariant: a declaration with duplicate ids can be constructed, and
/// validation reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub title: String,

    #[serde(default)]
    pub forms: Vec<Form>,

    #[serde(default)]
    pub relations: Vec<Relation>,

    #[serde(default)]
    pub traces: Vec<Trace>,

    #[serde(default)]
    pub constraints: Vec<InvariantConstraint>,

    #[serde(default)]
    pub tests: Vec<CanonTestRequest>,

    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,

    /// Default numeric tolerance inherited by constraints that carry none.
    #[serde(default)]
    pub epsilon: Option<f64>,
}

impl Declaration {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            forms: Vec::new(),
            relations: Vec::new(),
            traces: Vec::new(),
            constraints: Vec::new(),
            tests: Vec::new(),
            metadata: BTreeMap::new(),
            epsilon: None,
        }
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_constraint(mut self, constraint: InvariantConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_test(mut self, test: CanonTestRequest) -> Self {
        self.tests.push(test);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Look up a form by id. First match wins when ids are duplicated;
    /// the structural rules report the duplication.
    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.id == id)
    }

    /// Look up a trace by id.
    pub fn trace(&self, id: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.id == id)
    }

    /// All declared ids: forms and traces.
    pub fn declared_ids(&self) -> BTreeSet<&str> {
        self.forms
            .iter()
            .map(|f| f.id.as_str())
            .chain(self.traces.iter().map(|t| t.id.as_str()))
            .collect()
    }

    /// Whether a form with this id is declared.
    pub fn declares_form(&self, id: &str) -> bool {
        self.form(id).is_some()
    }
}
