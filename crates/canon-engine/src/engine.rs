//! The Canon execution gateway.
//!
//! The engine is the only path from a declaration to artifacts. It runs
//! every registered rule to produce a verdict, and — gated on that verdict —
//! drives the realizer registry form by form. Validation cannot be skipped
//! from a single call site: bypass must be authorized at construction *and*
//! requested per call, and bypassed output is visibly marked in provenance.
//!
//! The engine is synchronous and single-threaded by design: `validate` and
//! `realize` are plain request/response calls invoked from a UI event loop,
//! with no suspension points and no internal I/O. Forms are realized in
//! declaration order and findings are reported in rule-registration order,
//! so output is deterministic for a given declaration and rule/realizer set.

use crate::error::{CanonError, RuleError};
use crate::realizer::{RealizeContext, Realizer, RealizerRegistry};
use crate::rule::{CanonRule, exception_rule_id};
use crate::rules::builtin_rules;
use crate::signature::declaration_signature;
use canon_model::{Declaration, Finding, Severity, Verdict};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Version of the canon the built-in rules implement.
pub const CANON_VERSION: &str = "0.2.0";

/// Construction-time engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Stamped into every verdict and provenance entry.
    pub canon_version: String,

    /// In strict mode any fatal or error finding blocks realization; in
    /// non-strict mode only fatal findings do.
    pub strict: bool,

    /// Whether `skip_validation` may ever be honored. Off by default.
    pub allow_bypass: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canon_version: CANON_VERSION.to_string(),
            strict: true,
            allow_bypass: false,
        }
    }
}

/// Per-call realization options.
#[derive(Debug, Clone, Default)]
pub struct RealizeOptions {
    /// Request realization without validation. Honored only when the engine
    /// was constructed with `allow_bypass = true`; refused otherwise.
    pub skip_validation: bool,

    /// Open configuration passed through to realizers.
    pub config: BTreeMap<String, Value>,
}

impl RealizeOptions {
    /// Options requesting a validation bypass.
    pub fn skipping_validation() -> Self {
        Self {
            skip_validation: true,
            ..Self::default()
        }
    }
}

/// A cached validation outcome, keyed by declaration signature.
#[derive(Debug, Clone, Serialize)]
pub struct CachedVerdict {
    pub verdict: Verdict,
    pub validated_at: DateTime<Utc>,
}

/// What realization produced, per form, with full provenance.
#[derive(Debug, Clone, Serialize)]
pub struct RealizeResult {
    /// form id → artifact.
    pub artifacts: BTreeMap<String, Value>,

    /// form id → provenance metadata, plus a reserved `_declaration` entry.
    pub provenance: BTreeMap<String, Value>,

    /// Non-fatal per-form failures: missing realizers, realizer errors.
    pub errors: Vec<String>,

    pub declaration_title: String,
}

impl RealizeResult {
    /// Whether every form realized.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reserved provenance key for declaration-level metadata.
pub const DECLARATION_PROVENANCE_KEY: &str = "_declaration";

/// The sole execution gateway from declarations to artifacts.
pub struct CanonEngine {
    rules: Vec<Box<dyn CanonRule>>,
    registry: RealizerRegistry,
    config: EngineConfig,
    verdict_cache: BTreeMap<String, CachedVerdict>,
}

impl CanonEngine {
    /// An engine with the built-in rule set.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rules(config, builtin_rules())
    }

    /// An engine with a custom ordered rule set.
    pub fn with_rules(config: EngineConfig, rules: Vec<Box<dyn CanonRule>>) -> Self {
        Self {
            rules,
            registry: RealizerRegistry::new(),
            config,
            verdict_cache: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a realizer under every kind it supports. Registration
    /// typically happens once at process start, before any `realize` call.
    pub fn register_realizer(&mut self, realizer: Arc<dyn Realizer>) {
        self.registry.register(realizer);
    }

    pub fn realizer_registry(&self) -> &RealizerRegistry {
        &self.registry
    }

    pub fn realizer_registry_mut(&mut self) -> &mut RealizerRegistry {
        &mut self.registry
    }

    /// The cached verdict for a declaration signature, if one exists.
    ///
    /// The cache is a reproducibility surface, not a correctness mechanism:
    /// revalidation is always permitted and reproduces the same verdict for
    /// the same signature.
    pub fn cached_verdict(&self, signature: &str) -> Option<&CachedVerdict> {
        self.verdict_cache.get(signature)
    }

    /// Run every rule against the declaration and compute a verdict.
    ///
    /// Rules run in registration order with per-rule failure isolation: a
    /// rule that errors (or panics) contributes a synthetic fatal finding
    /// under `"<rule.id>-EXCEPTION"` instead of aborting validation.
    pub fn validate(&mut self, decl: &Declaration) -> Verdict {
        let signature = declaration_signature(decl);

        let mut findings = Vec::new();
        for rule in &self.rules {
            findings.extend(run_isolated(rule.as_ref(), decl));
        }

        let verdict = Verdict::from_findings(
            findings,
            &decl.title,
            &self.config.canon_version,
            self.config.strict,
        );
        tracing::debug!(
            declaration = %decl.title,
            signature = %signature,
            ok = verdict.ok,
            findings = verdict.findings.len(),
            "validated declaration"
        );
        self.verdict_cache.insert(
            signature,
            CachedVerdict {
                verdict: verdict.clone(),
                validated_at: Utc::now(),
            },
        );
        verdict
    }

    /// Validate (unless bypass is authorized and requested) and drive the
    /// realizer registry over every form, in declaration order.
    ///
    /// Fails with [`CanonError::ValidationFailed`] when validation does not
    /// pass — no artifacts are produced — and with
    /// [`CanonError::BypassNotAuthorized`] when `skip_validation` is
    /// requested on an engine that does not allow it. Per-form failures
    /// (missing realizer, realizer error) are recorded in the result and do
    /// not abort the remaining forms.
    pub fn realize(
        &mut self,
        decl: &Declaration,
        opts: RealizeOptions,
    ) -> Result<RealizeResult, CanonError> {
        let signature = declaration_signature(decl);

        let bypassed = if opts.skip_validation {
            if !self.config.allow_bypass {
                return Err(CanonError::BypassNotAuthorized);
            }
            tracing::warn!(
                declaration = %decl.title,
                signature = %signature,
                "realizing without validation; provenance will be marked validation_bypassed"
            );
            true
        } else {
            let verdict = self.validate(decl);
            if !verdict.ok {
                return Err(CanonError::ValidationFailed(Box::new(verdict)));
            }
            false
        };

        let validated_at = self
            .verdict_cache
            .get(&signature)
            .map(|cached| cached.validated_at)
            .unwrap_or_else(Utc::now)
            .to_rfc3339();

        let mut result = RealizeResult {
            artifacts: BTreeMap::new(),
            provenance: BTreeMap::new(),
            errors: Vec::new(),
            declaration_title: decl.title.clone(),
        };

        let mut decl_meta = Map::new();
        decl_meta.insert("title".to_string(), Value::String(decl.title.clone()));
        decl_meta.insert(
            "declaration_signature".to_string(),
            Value::String(signature.clone()),
        );
        decl_meta.insert(
            "canon_version".to_string(),
            Value::String(self.config.canon_version.clone()),
        );
        decl_meta.insert(
            "validated_at".to_string(),
            Value::String(validated_at.clone()),
        );
        decl_meta.insert("validation_bypassed".to_string(), Value::Bool(bypassed));
        decl_meta.insert("form_count".to_string(), decl.forms.len().into());
        result
            .provenance
            .insert(DECLARATION_PROVENANCE_KEY.to_string(), Value::Object(decl_meta));

        let ctx = RealizeContext::new(decl, &opts.config);
        for form in &decl.forms {
            let Some(realizer) = self.registry.get(&form.kind) else {
                result.errors.push(format!(
                    "no realizer registered for form '{}' (kind '{}')",
                    form.id, form.kind
                ));
                continue;
            };

            match realizer.realize_form(form, &ctx) {
                Ok(realization) => {
                    let mut prov = realization.provenance;
                    if !realization.metrics.is_empty() {
                        prov.insert(
                            "metrics".to_string(),
                            Value::Object(realization.metrics.into_iter().collect()),
                        );
                    }
                    prov.insert("form_kind".to_string(), Value::String(form.kind.clone()));
                    prov.insert(
                        "realizer".to_string(),
                        Value::String(realizer.name().to_string()),
                    );
                    prov.insert(
                        "declaration_signature".to_string(),
                        Value::String(signature.clone()),
                    );
                    prov.insert(
                        "validated_at".to_string(),
                        Value::String(validated_at.clone()),
                    );
                    prov.insert("validation_bypassed".to_string(), Value::Bool(bypassed));

                    result
                        .provenance
                        .insert(form.id.clone(), Value::Object(prov.into_iter().collect()));
                    result.artifacts.insert(form.id.clone(), realization.artifact);
                }
                Err(err) => {
                    result.errors.push(format!(
                        "realizer '{}' failed on form '{}': {err}",
                        realizer.name(),
                        form.id
                    ));
                }
            }
        }

        tracing::debug!(
            declaration = %decl.title,
            realized = result.artifacts.len(),
            errors = result.errors.len(),
            bypassed,
            "realized declaration"
        );
        Ok(result)
    }
}

/// Run one rule with failure isolation.
fn run_isolated(rule: &dyn CanonRule, decl: &Declaration) -> Vec<Finding> {
    let outcome = catch_unwind(AssertUnwindSafe(|| rule.check(decl)));
    match outcome {
        Ok(Ok(findings)) => findings,
        Ok(Err(err)) => vec![exception_finding(rule, &err.to_string())],
        Err(panic) => {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "rule panicked".to_string()
            };
            vec![exception_finding(rule, &detail)]
        }
    }
}

fn exception_finding(rule: &dyn CanonRule, detail: &str) -> Finding {
    Finding::new(
        Severity::Fatal,
        exception_rule_id(rule.id()),
        format!("rule '{}' failed to evaluate: {detail}", rule.id()),
    )
    .with_articles(rule.articles().iter().copied())
    .with_context("rule_title", rule.title())
}
