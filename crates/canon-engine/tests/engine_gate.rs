//! Integration tests: the full declaration → validate → realize flow.
//!
//! Stub realizers stand in for domain modules; the declarations exercise the
//! built-in rules end to end, including the canonical repair loop — validate,
//! read the findings, fix the declaration, revalidate.

use canon_engine::{
    CanonEngine, CanonError, EngineConfig, RealizeContext, RealizeError, RealizeOptions,
    Realization, Realizer, declaration_signature, rule_id,
};
use canon_model::{ClosureStatus, Declaration, Form, Relation, Severity, Trace};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Realizes every curved kind into a polyline stub.
struct CurveRealizer;

impl Realizer for CurveRealizer {
    fn name(&self) -> &str {
        "CurveRealizer"
    }

    fn supported_kinds(&self) -> BTreeSet<String> {
        ["Circle", "Spiral"].into_iter().map(String::from).collect()
    }

    fn realize_form(
        &self,
        form: &Form,
        ctx: &RealizeContext<'_>,
    ) -> Result<Realization, RealizeError> {
        Ok(Realization::new(json!({
            "polyline": [form.id.as_str()],
            "segments": 64,
        }))
        .with_metric("epsilon_used", ctx.epsilon)
        .with_provenance("method", "uniform subdivision"))
    }
}

fn engine_with_curves() -> CanonEngine {
    let mut engine = CanonEngine::new(EngineConfig::default());
    engine.register_realizer(Arc::new(CurveRealizer));
    engine
}

fn two_circles_and_a_spiral() -> Declaration {
    Declaration::new("Vortex Study")
        .with_form(Form::new("c1", "Circle").with_curvature_class("constant"))
        .with_form(Form::new("c2", "Circle").with_curvature_class("constant"))
        .with_form(Form::new("sp", "Spiral").with_curvature_class("varying"))
        .with_relation(Relation::new("concentric_with", "c1", "c2"))
}

#[test]
fn missing_orientation_is_reported_then_repaired() {
    let mut engine = engine_with_curves();

    let broken = two_circles_and_a_spiral();
    let verdict = engine.validate(&broken);
    assert!(!verdict.ok);

    let blocking = verdict.blocking_findings(true);
    assert_eq!(blocking.len(), 1);
    assert_eq!(blocking[0].severity, Severity::Error);
    assert_eq!(blocking[0].rule_id, rule_id::ORIENTATION_REQUIRED);
    assert_eq!(blocking[0].subject_ids, vec!["sp"]);
    assert!(!blocking[0].articles.is_empty());

    // Apply the suggested fix and revalidate: a new declaration value, a
    // clean verdict.
    let mut repaired = broken.clone();
    repaired.forms[2].orientation = Some("counterclockwise".to_string());
    assert!(engine.validate(&repaired).ok);
}

#[test]
fn realize_never_yields_artifacts_for_invalid_declarations() {
    let mut engine = engine_with_curves();
    let broken = two_circles_and_a_spiral();

    let expected_verdict = engine.validate(&broken);
    let err = engine.realize(&broken, RealizeOptions::default()).unwrap_err();

    match err {
        CanonError::ValidationFailed(verdict) => assert_eq!(*verdict, expected_verdict),
        other => panic!("expected a validation failure, got {other:?}"),
    }
}

#[test]
fn valid_declaration_realizes_every_form() {
    let mut engine = engine_with_curves();

    let mut decl = two_circles_and_a_spiral();
    decl.forms[2].orientation = Some("clockwise".to_string());

    let result = engine.realize(&decl, RealizeOptions::default()).unwrap();
    assert!(result.ok());
    assert_eq!(result.artifacts.len(), 3);
    assert_eq!(result.declaration_title, "Vortex Study");

    // Every provenance entry names its realizer and carries the signature.
    let signature = declaration_signature(&decl);
    for id in ["c1", "c2", "sp"] {
        let prov = result.provenance[id].as_object().unwrap();
        assert_eq!(prov["realizer"], json!("CurveRealizer"));
        assert_eq!(prov["declaration_signature"], json!(signature));
        assert_eq!(prov["validation_bypassed"], json!(false));
    }
}

#[test]
fn one_missing_realizer_does_not_block_the_rest() {
    let mut engine = engine_with_curves();

    let decl = Declaration::new("Mixed Kinds")
        .with_form(Form::new("c1", "Circle").with_curvature_class("constant"))
        .with_form(Form::new("poly", "Heptagon"))
        .with_form(Form::new("c2", "Circle").with_curvature_class("constant"));

    let result = engine.realize(&decl, RealizeOptions::default()).unwrap();
    assert!(!result.ok());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Heptagon"));
    assert_eq!(result.artifacts.len(), 2);
    assert!(result.artifacts.contains_key("c1"));
    assert!(result.artifacts.contains_key("c2"));
}

#[test]
fn later_registration_overrides_for_subsequent_calls() {
    struct FlatRealizer;

    impl Realizer for FlatRealizer {
        fn name(&self) -> &str {
            "FlatRealizer"
        }
        fn supported_kinds(&self) -> BTreeSet<String> {
            ["Circle".to_string()].into()
        }
        fn realize_form(
            &self,
            _form: &Form,
            _ctx: &RealizeContext<'_>,
        ) -> Result<Realization, RealizeError> {
            Ok(Realization::new(json!({ "flat": true })))
        }
    }

    let mut engine = engine_with_curves();
    engine.register_realizer(Arc::new(FlatRealizer));

    let decl = Declaration::new("One Circle")
        .with_form(Form::new("c", "Circle").with_curvature_class("constant"));
    let result = engine.realize(&decl, RealizeOptions::default()).unwrap();

    let prov = result.provenance["c"].as_object().unwrap();
    assert_eq!(prov["realizer"], json!("FlatRealizer"));
    assert_eq!(result.artifacts["c"], json!({ "flat": true }));
}

#[test]
fn validate_twice_same_verdict_same_signature() {
    let mut engine = engine_with_curves();
    let decl = two_circles_and_a_spiral();

    let first = engine.validate(&decl);
    let second = engine.validate(&decl);
    assert_eq!(first.findings, second.findings);

    // Structural twins share a signature even across separate constructions.
    assert_eq!(
        declaration_signature(&two_circles_and_a_spiral()),
        declaration_signature(&decl)
    );
}

#[test]
fn trace_flow_through_the_gate() {
    let mut engine = engine_with_curves();

    let decl = Declaration::new("Rolling Circle")
        .with_form(Form::new("wheel", "Circle").with_curvature_class("constant"))
        .with_trace(
            Trace::new("path", "Cycloid")
                .with_source_form("wheel")
                .claiming_invariant("arc_length"),
        );

    // Indeterminate closure with a claimed invariant blocks the gate.
    let verdict = engine.validate(&decl);
    assert!(!verdict.ok);
    assert!(
        verdict
            .findings
            .iter()
            .any(|f| f.rule_id == rule_id::TRACE_CLOSURE)
    );

    let mut committed = decl.clone();
    committed.traces[0].closure_status = ClosureStatus::Closed;
    let result = engine.realize(&committed, RealizeOptions::default()).unwrap();

    // Traces are not forms: only the wheel is realized.
    assert!(result.ok());
    assert_eq!(result.artifacts.len(), 1);
    assert!(result.artifacts.contains_key("wheel"));
}
