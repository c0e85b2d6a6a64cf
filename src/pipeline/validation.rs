//! Validation engine for annotator compositions.
//!
//! The engine runs all registered [`ValidationRule`]s against the registered
//! [`AnnotatorDescriptor`]s and collects every diagnostic into a
//! [`ValidationReport`]. It never short-circuits on the first error, so a
//! badly assembled system reports all of its problems at once.
//!
//! # Quick start
//!
//! ```rust
//! use rapid_summarizer::pipeline::traits::AnnotatorDescriptor;
//! use rapid_summarizer::pipeline::validation::ValidationEngine;
//!
//! let a = AnnotatorDescriptor::new("a").with_returns(["x"]);
//! let b = AnnotatorDescriptor::new("b").with_returns(["x"]);
//!
//! let report = ValidationEngine::with_defaults().validate(&[a, b]);
//! assert!(report.has_errors());
//! ```

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::CompositionError;
use super::traits::AnnotatorDescriptor;
use crate::errors::{Result, SummarizerError};
use crate::types::{DOC_ID, DOC_TEXT};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: CompositionError,
}

impl ValidationDiagnostic {
    pub fn error(err: CompositionError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: CompositionError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &CompositionError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &CompositionError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Convert into a `Composition` error carrying every error diagnostic,
    /// or `Ok(())` when there are none.
    pub fn into_result(self) -> Result<()> {
        let errors: Vec<CompositionError> = self
            .diagnostics
            .into_iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.error)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SummarizerError::Composition(errors))
        }
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule over a set of annotator contracts.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"unique_names"`).
    fn name(&self) -> &str;

    /// Inspect the contracts and return any findings.
    fn validate(&self, descriptors: &[AnnotatorDescriptor]) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s and collects all diagnostics.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(UniqueNamesRule));
        engine.add_rule(Box::new(DisjointContractRule));
        engine.add_rule(Box::new(SingleProducerRule));
        engine.add_rule(Box::new(ExternalInputsRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules and return the collected report.
    pub fn validate(&self, descriptors: &[AnnotatorDescriptor]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(descriptors));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. annotator names are unique ──────────────────────────────────────────

struct UniqueNamesRule;

impl ValidationRule for UniqueNamesRule {
    fn name(&self) -> &str {
        "unique_names"
    }

    fn validate(&self, descriptors: &[AnnotatorDescriptor]) -> Vec<ValidationDiagnostic> {
        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        let mut out = Vec::new();
        for desc in descriptors {
            let count = seen.entry(desc.name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                out.push(ValidationDiagnostic::error(
                    CompositionError::new(
                        ErrorCode::DuplicateAnnotator,
                        desc.name.as_str(),
                        "annotator name is registered more than once",
                    )
                    .with_hint("Give each annotator in a system a distinct name"),
                ));
            }
        }
        out
    }
}

// ─── 2. requires and returns are disjoint ───────────────────────────────────

struct DisjointContractRule;

impl ValidationRule for DisjointContractRule {
    fn name(&self) -> &str {
        "disjoint_contract"
    }

    fn validate(&self, descriptors: &[AnnotatorDescriptor]) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        for desc in descriptors {
            let pairs = [
                ("field", &desc.requires, &desc.returns),
                ("matrix", &desc.ndarray_requires, &desc.ndarray_returns),
            ];
            for (kind, requires, returns) in pairs {
                for name in requires.iter().filter(|r| returns.contains(*r)) {
                    out.push(ValidationDiagnostic::error(
                        CompositionError::new(
                            ErrorCode::SelfDependency,
                            desc.name.as_str(),
                            format!("{kind} \"{name}\" is both required and returned"),
                        )
                        .with_hint("Split the annotator or produce a new field name"),
                    ));
                }
            }
        }
        out
    }
}

// ─── 3. each output has a single producer ───────────────────────────────────

struct SingleProducerRule;

impl ValidationRule for SingleProducerRule {
    fn name(&self) -> &str {
        "single_producer"
    }

    fn validate(&self, descriptors: &[AnnotatorDescriptor]) -> Vec<ValidationDiagnostic> {
        let mut fields: FxHashMap<&str, &str> = FxHashMap::default();
        let mut matrices: FxHashMap<&str, &str> = FxHashMap::default();
        let mut out = Vec::new();

        for desc in descriptors {
            let outputs = [
                ("field", &desc.returns, &mut fields),
                ("matrix", &desc.ndarray_returns, &mut matrices),
            ];
            for (kind, returns, producers) in outputs {
                for name in returns {
                    match producers.get(name.as_str()) {
                        Some(&first) => out.push(ValidationDiagnostic::error(
                            CompositionError::new(
                                ErrorCode::DuplicateProducer,
                                desc.name.as_str(),
                                format!("{kind} \"{name}\" is also returned by \"{first}\""),
                            )
                            .with_hint("Keep exactly one annotator producing each output"),
                        )),
                        None => {
                            producers.insert(name.as_str(), desc.name.as_str());
                        }
                    }
                }
            }
        }
        out
    }
}

// ─── 4. inputs nobody produces must come from the caller ────────────────────

struct ExternalInputsRule;

impl ValidationRule for ExternalInputsRule {
    fn name(&self) -> &str {
        "external_inputs"
    }

    fn validate(&self, descriptors: &[AnnotatorDescriptor]) -> Vec<ValidationDiagnostic> {
        let produced_field =
            |name: &str| descriptors.iter().any(|d| d.returns.iter().any(|r| r == name));
        let produced_matrix = |name: &str| {
            descriptors
                .iter()
                .any(|d| d.ndarray_returns.iter().any(|r| r == name))
        };

        let mut out = Vec::new();
        for desc in descriptors {
            for name in &desc.requires {
                if name == DOC_TEXT || name == DOC_ID || produced_field(name) {
                    continue;
                }
                out.push(ValidationDiagnostic::warning(
                    CompositionError::new(
                        ErrorCode::ExternalInput,
                        desc.name.as_str(),
                        format!("field \"{name}\" is not produced by any annotator"),
                    )
                    .with_hint("Supply it in the input frame"),
                ));
            }
            for name in &desc.ndarray_requires {
                if produced_matrix(name) {
                    continue;
                }
                out.push(ValidationDiagnostic::warning(
                    CompositionError::new(
                        ErrorCode::ExternalInput,
                        desc.name.as_str(),
                        format!("matrix \"{name}\" is not produced by any annotator"),
                    )
                    .with_hint("Supply it in the input matrix store"),
                ));
            }
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
