//! Canon test requests.

use crate::Params;
use serde::{Deserialize, Serialize};

/// A request to run a named canon test over a set of forms.
///
/// The test identifier names a procedure known to the invoking layer, not to
/// the engine. Requests travel with the declaration so that a verdict and
/// its test obligations share one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonTestRequest {
    pub test: String,

    /// Form-id references the test applies to.
    #[serde(default)]
    pub scope: Vec<String>,

    #[serde(default)]
    pub params: Params,

    #[serde(default)]
    pub notes: String,
}

impl CanonTestRequest {
    pub fn new(test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            scope: Vec::new(),
            params: Params::new(),
            notes: String::new(),
        }
    }

    pub fn with_scope(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scope = ids.into_iter().map(Into::into).collect();
        self
    }
}
