//! Built-in consistency rules.
//!
//! Three families: structural checks (ids, references), classification
//! completeness (orientation, curvature, tolerance), and declaration-level
//! checks (trace closure). Registration order is the order of
//! [`builtin_rules`]; the engine reports findings in that order.

use crate::error::RuleError;
use crate::rule::{CanonRule, rule_id};
use canon_model::{Declaration, Finding, Severity};
use std::collections::BTreeMap;

/// Form kinds whose meaning depends on winding direction.
pub const ORIENTATION_SENSITIVE_KINDS: &[&str] = &["Spiral", "Helix", "Vortex", "GoldenSpiral"];

/// Form kinds that must declare a curvature class.
pub const CURVED_KINDS: &[&str] = &[
    "Circle",
    "Ellipse",
    "Arc",
    "Spiral",
    "Helix",
    "Torus",
    "VesicaPiscis",
];

/// Form and trace ids must be unique within a declaration.
///
/// Duplicate ids corrupt every downstream lookup, so this is the one
/// built-in that reports at fatal severity.
pub struct UniqueIdsRule;

impl CanonRule for UniqueIdsRule {
    fn id(&self) -> &str {
        rule_id::UNIQUE_IDS
    }

    fn title(&self) -> &str {
        "Declared ids are unique"
    }

    fn articles(&self) -> &[&str] {
        &["Canon I.2"]
    }

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for form in &decl.forms {
            *counts.entry(form.id.as_str()).or_default() += 1;
        }
        for trace in &decl.traces {
            *counts.entry(trace.id.as_str()).or_default() += 1;
        }

        let findings = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, n)| {
                Finding::new(
                    Severity::Fatal,
                    self.id(),
                    format!("id '{id}' is declared {n} times"),
                )
                .with_articles(self.articles().iter().copied())
                .with_subjects([id])
                .with_context("occurrences", n)
            })
            .collect();
        Ok(findings)
    }
}

/// Every weak reference must resolve to a declared form.
///
/// Covers relation endpoints, trace source forms, constraint scopes, and
/// test request scopes.
pub struct ReferenceIntegrityRule;

impl ReferenceIntegrityRule {
    fn unresolved(&self, decl: &Declaration, id: &str, role: String) -> Option<Finding> {
        if decl.declares_form(id) {
            return None;
        }
        Some(
            Finding::new(
                Severity::Error,
                rule_id::REFERENCE_INTEGRITY,
                format!("{role} references undeclared form '{id}'"),
            )
            .with_articles(self.articles().iter().copied())
            .with_subjects([id]),
        )
    }
}

impl CanonRule for ReferenceIntegrityRule {
    fn id(&self) -> &str {
        rule_id::REFERENCE_INTEGRITY
    }

    fn title(&self) -> &str {
        "References resolve to declared forms"
    }

    fn articles(&self) -> &[&str] {
        &["Canon I.4", "Canon II.1"]
    }

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for (index, relation) in decl.relations.iter().enumerate() {
            for endpoint in relation.endpoints() {
                findings.extend(self.unresolved(
                    decl,
                    endpoint,
                    format!("relation #{index} ('{}')", relation.kind),
                ));
            }
        }

        for trace in &decl.traces {
            if let Some(source) = &trace.source_form {
                findings.extend(self.unresolved(decl, source, format!("trace '{}'", trace.id)));
            }
        }

        for constraint in &decl.constraints {
            for id in &constraint.scope {
                findings.extend(self.unresolved(
                    decl,
                    id,
                    format!("constraint '{}' scope", constraint.name),
                ));
            }
        }

        for request in &decl.tests {
            for id in &request.scope {
                findings.extend(self.unresolved(
                    decl,
                    id,
                    format!("test request '{}' scope", request.test),
                ));
            }
        }

        Ok(findings)
    }
}

/// Orientation-sensitive kinds must declare an orientation.
pub struct OrientationRequiredRule;

impl CanonRule for OrientationRequiredRule {
    fn id(&self) -> &str {
        rule_id::ORIENTATION_REQUIRED
    }

    fn title(&self) -> &str {
        "Orientation-sensitive forms declare an orientation"
    }

    fn articles(&self) -> &[&str] {
        &["Canon III.5"]
    }

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError> {
        let findings = decl
            .forms
            .iter()
            .filter(|form| {
                ORIENTATION_SENSITIVE_KINDS.contains(&form.kind.as_str())
                    && form.orientation.is_none()
            })
            .map(|form| {
                Finding::new(
                    Severity::Error,
                    self.id(),
                    format!(
                        "form '{}' of orientation-sensitive kind '{}' has no orientation",
                        form.id, form.kind
                    ),
                )
                .with_articles(self.articles().iter().copied())
                .with_subjects([form.id.as_str()])
                .with_context("kind", form.kind.as_str())
                .with_fix("declare an orientation, e.g. \"clockwise\" or \"counterclockwise\"")
            })
            .collect();
        Ok(findings)
    }
}

/// Curved kinds must declare a curvature class.
pub struct CurvatureRequiredRule;

impl CanonRule for CurvatureRequiredRule {
    fn id(&self) -> &str {
        rule_id::CURVATURE_REQUIRED
    }

    fn title(&self) -> &str {
        "Curved forms declare a curvature class"
    }

    fn articles(&self) -> &[&str] {
        &["Canon III.7"]
    }

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError> {
        let findings = decl
            .forms
            .iter()
            .filter(|form| {
                CURVED_KINDS.contains(&form.kind.as_str()) && form.curvature_class.is_none()
            })
            .map(|form| {
                Finding::new(
                    Severity::Error,
                    self.id(),
                    format!(
                        "form '{}' of curved kind '{}' has no curvature class",
                        form.id, form.kind
                    ),
                )
                .with_articles(self.articles().iter().copied())
                .with_subjects([form.id.as_str()])
                .with_context("kind", form.kind.as_str())
                .with_fix("declare a curvature class, e.g. \"constant\" or \"varying\"")
            })
            .collect();
        Ok(findings)
    }
}

/// Numeric constraints must carry a tolerance or inherit the declaration
/// epsilon.
pub struct ConstraintToleranceRule;

impl CanonRule for ConstraintToleranceRule {
    fn id(&self) -> &str {
        rule_id::CONSTRAINT_TOLERANCE
    }

    fn title(&self) -> &str {
        "Numeric constraints carry a tolerance"
    }

    fn articles(&self) -> &[&str] {
        &["Canon IV.2"]
    }

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError> {
        if decl.epsilon.is_some() {
            return Ok(Vec::new());
        }

        let findings = decl
            .constraints
            .iter()
            .filter(|c| c.expr.is_numeric() && c.expr.tolerance().is_none())
            .map(|constraint| {
                Finding::new(
                    Severity::Error,
                    self.id(),
                    format!(
                        "numeric constraint '{}' has no tolerance and the declaration has no epsilon",
                        constraint.name
                    ),
                )
                .with_articles(self.articles().iter().copied())
                .with_subjects(constraint.scope.iter().map(String::as_str))
                .with_fix("set a tolerance on the expression or declare a declaration-level epsilon")
            })
            .collect();
        Ok(findings)
    }
}

/// A trace claiming invariants must commit to a closure status.
pub struct TraceClosureRule;

impl CanonRule for TraceClosureRule {
    fn id(&self) -> &str {
        rule_id::TRACE_CLOSURE
    }

    fn title(&self) -> &str {
        "Traces with claimed invariants commit a closure status"
    }

    fn articles(&self) -> &[&str] {
        &["Canon V.1"]
    }

    fn check(&self, decl: &Declaration) -> Result<Vec<Finding>, RuleError> {
        use canon_model::ClosureStatus;

        let findings = decl
            .traces
            .iter()
            .filter(|t| t.claims_invariants() && t.closure_status == ClosureStatus::Indeterminate)
            .map(|trace| {
                Finding::new(
                    Severity::Error,
                    self.id(),
                    format!(
                        "trace '{}' claims {} invariant(s) but its closure status is indeterminate",
                        trace.id,
                        trace.invariants_claimed.len()
                    ),
                )
                .with_articles(self.articles().iter().copied())
                .with_subjects([trace.id.as_str()])
                .with_context(
                    "invariants_claimed",
                    serde_json::json!(trace.invariants_claimed),
                )
                .with_fix("commit closure_status to closed, asymptotic, or open")
            })
            .collect();
        Ok(findings)
    }
}

/// The built-in rule set, in registration (and therefore report) order.
pub fn builtin_rules() -> Vec<Box<dyn CanonRule>> {
    vec![
        Box::new(UniqueIdsRule),
        Box::new(ReferenceIntegrityRule),
        Box::new(OrientationRequiredRule),
        Box::new(CurvatureRequiredRule),
        Box::new(ConstraintToleranceRule),
        Box::new(TraceClosureRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_model::{
        ClosureStatus, ConstraintExpr, Declaration, Form, InvariantConstraint, Operand, Relation,
        Trace,
    };

    fn check(rule: &dyn CanonRule, decl: &Declaration) -> Vec<Finding> {
        rule.check(decl).expect("built-in rules never fail")
    }

    #[test]
    fn unique_ids_accepts_distinct() {
        let decl = Declaration::new("ok")
            .with_form(Form::new("a", "Square"))
            .with_form(Form::new("b", "Square"));
        assert!(check(&UniqueIdsRule, &decl).is_empty());
    }

    #[test]
    fn unique_ids_reports_duplicates_once() {
        let decl = Declaration::new("dup")
            .with_form(Form::new("a", "Square"))
            .with_form(Form::new("a", "Circle"))
            .with_trace(Trace::new("a", "Cycloid"));

        let findings = check(&UniqueIdsRule, &decl);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Fatal);
        assert_eq!(findings[0].subject_ids, vec!["a"]);
        assert_eq!(findings[0].context["occurrences"], serde_json::json!(3));
    }

    #[test]
    fn reference_integrity_accepts_resolved() {
        let decl = Declaration::new("ok")
            .with_form(Form::new("a", "Square"))
            .with_form(Form::new("b", "Circle"))
            .with_relation(Relation::new("inscribed_in", "a", "b"))
            .with_trace(Trace::new("t", "Cycloid").with_source_form("b"));
        assert!(check(&ReferenceIntegrityRule, &decl).is_empty());
    }

    #[test]
    fn reference_integrity_reports_each_dangling_reference() {
        let decl = Declaration::new("dangling")
            .with_form(Form::new("a", "Square"))
            .with_relation(Relation::new("inscribed_in", "a", "ghost"))
            .with_trace(Trace::new("t", "Cycloid").with_source_form("phantom"))
            .with_constraint(
                InvariantConstraint::new(
                    "areas",
                    ConstraintExpr::Equal {
                        lhs: Operand::property("a", "area"),
                        rhs: Operand::Literal(1.0),
                    },
                )
                .with_scope(["a", "wraith"]),
            );

        let findings = check(&ReferenceIntegrityRule, &decl);
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.severity == Severity::Error));
        let subjects: Vec<_> = findings.iter().flat_map(|f| &f.subject_ids).collect();
        assert_eq!(subjects, vec!["ghost", "phantom", "wraith"]);
    }

    #[test]
    fn orientation_required_for_sensitive_kinds_only() {
        let decl = Declaration::new("spirals")
            .with_form(Form::new("s1", "Spiral"))
            .with_form(Form::new("s2", "Spiral").with_orientation("clockwise"))
            .with_form(Form::new("c1", "Circle"));

        let findings = check(&OrientationRequiredRule, &decl);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].subject_ids, vec!["s1"]);
        assert!(findings[0].suggested_fix.is_some());
    }

    #[test]
    fn curvature_required_for_curved_kinds() {
        let decl = Declaration::new("curved")
            .with_form(Form::new("c1", "Circle"))
            .with_form(Form::new("c2", "Circle").with_curvature_class("constant"))
            .with_form(Form::new("sq", "Square"));

        let findings = check(&CurvatureRequiredRule, &decl);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_ids, vec!["c1"]);
    }

    #[test]
    fn tolerance_inherited_from_epsilon() {
        let golden = InvariantConstraint::new(
            "golden-ratio",
            ConstraintExpr::Ratio {
                lhs: Operand::property("rect", "long_side"),
                rhs: Operand::property("rect", "short_side"),
                ratio: 1.618,
                tolerance: None,
            },
        );

        let without_epsilon = Declaration::new("no-eps").with_constraint(golden.clone());
        let findings = check(&ConstraintToleranceRule, &without_epsilon);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);

        let with_epsilon = Declaration::new("eps")
            .with_constraint(golden)
            .with_epsilon(1e-6);
        assert!(check(&ConstraintToleranceRule, &with_epsilon).is_empty());
    }

    #[test]
    fn exact_equality_needs_no_tolerance() {
        let decl = Declaration::new("exact").with_constraint(InvariantConstraint::new(
            "same-area",
            ConstraintExpr::Equal {
                lhs: Operand::property("a", "area"),
                rhs: Operand::property("b", "area"),
            },
        ));
        assert!(check(&ConstraintToleranceRule, &decl).is_empty());
    }

    #[test]
    fn trace_closure_must_be_committed_when_invariants_claimed() {
        let decl = Declaration::new("traces")
            .with_trace(Trace::new("t1", "Cycloid").claiming_invariant("arc_length"))
            .with_trace(
                Trace::new("t2", "Cycloid")
                    .claiming_invariant("arc_length")
                    .with_closure_status(ClosureStatus::Closed),
            )
            .with_trace(Trace::new("t3", "Cycloid"));

        let findings = check(&TraceClosureRule, &decl);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject_ids, vec!["t1"]);
    }

    #[test]
    fn builtin_rules_order_is_stable() {
        let ids: Vec<_> = builtin_rules().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                rule_id::UNIQUE_IDS,
                rule_id::REFERENCE_INTEGRITY,
                rule_id::ORIENTATION_REQUIRED,
                rule_id::CURVATURE_REQUIRED,
                rule_id::CONSTRAINT_TOLERANCE,
                rule_id::TRACE_CLOSURE,
            ]
        );
    }
}
