//! Error types for rapid_summarizer
//!
//! Every failure surfaced by the pipeline is fatal and non-retryable. Each
//! variant maps to a stable [`ErrorCode`] for programmatic matching.

use thiserror::Error;

use crate::pipeline::error_code::ErrorCode;
use crate::pipeline::errors::CompositionError;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SummarizerError>;

/// Main error type for rapid_summarizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummarizerError {
    /// Caller input has an unrecognized shape
    #[error("Bad input: {message}")]
    BadInput { message: String },

    /// The annotator composition has no valid execution order
    #[error("Cyclic dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// The allocated stores disagree with an annotator's declared contract
    #[error("Schema mismatch: annotator \"{annotator}\" declares \"{name}\" but the store has no slot for it")]
    SchemaMismatch { annotator: String, name: String },

    /// An annotator returned without filling every declared output
    #[error("Contract violation: annotator \"{annotator}\" left {} unfilled", .missing.join(", "))]
    ContractViolation {
        annotator: String,
        missing: Vec<String>,
    },

    /// Composition validation found one or more errors
    #[error("Invalid composition: {}", describe(.0))]
    Composition(Vec<CompositionError>),

    /// An annotator's build or process step failed
    #[error("Annotator \"{annotator}\" failed: {message}")]
    Annotator { annotator: String, message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

fn describe(errors: &[CompositionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SummarizerError {
    /// Create a bad input error
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    /// Create a cyclic dependency error from the node labels along the cycle
    pub fn cyclic_dependency(cycle: Vec<String>) -> Self {
        Self::CyclicDependency { cycle }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(annotator: impl Into<String>, name: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            annotator: annotator.into(),
            name: name.into(),
        }
    }

    /// Create a contract violation error
    pub fn contract_violation(annotator: impl Into<String>, missing: Vec<String>) -> Self {
        Self::ContractViolation {
            annotator: annotator.into(),
            missing,
        }
    }

    /// Create an annotator failure
    pub fn annotator(annotator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Annotator {
            annotator: annotator.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BadInput { .. } => ErrorCode::BadInput,
            Self::CyclicDependency { .. } => ErrorCode::CyclicDependency,
            Self::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            Self::ContractViolation { .. } => ErrorCode::ContractViolation,
            Self::Composition(_) => ErrorCode::CompositionFailed,
            Self::Annotator { .. } => ErrorCode::AnnotatorFailed,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::Serialization { .. } => ErrorCode::Serialization,
        }
    }

    /// Composition diagnostics carried by this error, if any
    pub fn composition_errors(&self) -> &[CompositionError] {
        match self {
            Self::Composition(errors) => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for SummarizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SummarizerError::bad_input("expected a list of strings");
        assert!(err.to_string().contains("Bad input"));
        assert!(err.to_string().contains("expected a list of strings"));

        let err = SummarizerError::cyclic_dependency(vec![
            "annotator:a".into(),
            "field:x".into(),
            "annotator:b".into(),
            "field:y".into(),
            "annotator:a".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Cyclic dependency: annotator:a -> field:x -> annotator:b -> field:y -> annotator:a"
        );
    }

    #[test]
    fn test_contract_violation_lists_missing_outputs() {
        let err = SummarizerError::contract_violation("lazy", vec!["x".into(), "y".into()]);
        assert_eq!(
            err.to_string(),
            "Contract violation: annotator \"lazy\" left x, y unfilled"
        );
        assert_eq!(err.code(), ErrorCode::ContractViolation);
    }

    #[test]
    fn test_composition_errors_accessor() {
        let diag = CompositionError::new(ErrorCode::DuplicateProducer, "b", "x returned twice");
        let err = SummarizerError::Composition(vec![diag.clone()]);
        assert_eq!(err.composition_errors(), &[diag]);
        assert_eq!(err.code(), ErrorCode::CompositionFailed);
        assert!(SummarizerError::bad_input("x").composition_errors().is_empty());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: SummarizerError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::Serialization);
    }
}
