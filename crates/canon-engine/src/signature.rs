//! Deterministic declaration signatures.
//!
//! Two independent implementations given the same declaration MUST produce
//! identical signatures.
//!
//! Algorithm:
//! 1. Build a canonical JSON value from the semantically relevant fields
//!    (title, forms, relations, traces, epsilon — not notes, meaning tags,
//!    or metadata)
//! 2. Serialize with lexicographically sorted object keys and no whitespace
//! 3. signature = first 16 hex characters of SHA256(bytes)
//!
//! Sequences keep declaration order; only object key order is canonical.
//! The signature keys the engine's verdict cache and is stamped into every
//! provenance entry, so structurally identical declarations — same fields,
//! different object identity — are interchangeable for caching and
//! reproducibility lookups.

use canon_model::{Declaration, Form, Relation, Trace};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

/// Length of the hex fingerprint.
pub const SIGNATURE_HEX_LEN: usize = 16;

/// Compute the canonical signature of a declaration.
pub fn declaration_signature(decl: &Declaration) -> String {
    let canonical = canonical_value(decl);
    // serde_json's Map is BTreeMap-backed (preserve_order is not enabled),
    // so object keys serialize in sorted order with no extra work.
    let bytes = serde_json::to_vec(&canonical).expect("canonical value serializes");
    let hash = Sha256::digest(&bytes);
    let hex = format!("{hash:x}");
    hex[..SIGNATURE_HEX_LEN].to_string()
}

/// The canonical JSON value the signature is computed over.
///
/// Every field is always present; absent options serialize as `null` so the
/// byte stream is identical regardless of how the declaration was built.
fn canonical_value(decl: &Declaration) -> Value {
    let mut root = Map::new();
    root.insert("title".to_string(), json!(decl.title));
    root.insert("epsilon".to_string(), json!(decl.epsilon));
    root.insert(
        "forms".to_string(),
        Value::Array(decl.forms.iter().map(canonical_form).collect()),
    );
    root.insert(
        "relations".to_string(),
        Value::Array(decl.relations.iter().map(canonical_relation).collect()),
    );
    root.insert(
        "traces".to_string(),
        Value::Array(decl.traces.iter().map(canonical_trace).collect()),
    );
    Value::Object(root)
}

fn canonical_form(form: &Form) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), json!(form.id));
    map.insert("kind".to_string(), json!(form.kind));
    map.insert("params".to_string(), json!(form.params));
    map.insert("orientation".to_string(), json!(form.orientation));
    map.insert("symmetry_class".to_string(), json!(form.symmetry_class));
    map.insert("curvature_class".to_string(), json!(form.curvature_class));
    map.insert("iteration_depth".to_string(), json!(form.iteration_depth));
    map.insert("truncated".to_string(), json!(form.truncated));
    Value::Object(map)
}

fn canonical_relation(relation: &Relation) -> Value {
    let mut map = Map::new();
    map.insert("kind".to_string(), json!(relation.kind));
    map.insert("a".to_string(), json!(relation.a));
    map.insert("b".to_string(), json!(relation.b));
    map.insert("params".to_string(), json!(relation.params));
    Value::Object(map)
}

fn canonical_trace(trace: &Trace) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), json!(trace.id));
    map.insert("kind".to_string(), json!(trace.kind));
    map.insert(
        "closure_status".to_string(),
        json!(trace.closure_status.to_string()),
    );
    map.insert("void_type".to_string(), json!(trace.void_type));
    map.insert("params".to_string(), json!(trace.params));
    Value::Object(map)
}
