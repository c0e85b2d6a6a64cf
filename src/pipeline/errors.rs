//! Structured composition diagnostics.
//!
//! A [`CompositionError`] describes one problem with the set of annotators a
//! system was assembled from: a duplicated name, an annotator that consumes
//! its own output, two annotators producing the same field. They are found
//! before the dependency graph is built and carry a stable [`ErrorCode`], the
//! offending annotator, a message and an optional hint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error_code::ErrorCode;

/// A single problem found while validating an annotator composition.
///
/// # Display format
///
/// ```text
/// [duplicate_producer] tfidf_alt: matrix "tfidf" is also returned by "tfidf"
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}] {annotator}: {message}")]
pub struct CompositionError {
    /// Stable error code for programmatic matching.
    pub code: ErrorCode,

    /// Name of the annotator the problem is attached to.
    pub annotator: String,

    /// Human-readable description of the problem.
    pub message: String,

    /// Optional suggestion for how to fix the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CompositionError {
    /// Create a new composition error.
    pub fn new(
        code: ErrorCode,
        annotator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            annotator: annotator.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a hint suggesting how to fix the problem.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_error_display() {
        let err = CompositionError::new(
            ErrorCode::SelfDependency,
            "echo",
            "field \"x\" is both required and returned",
        );
        assert_eq!(
            err.to_string(),
            "[self_dependency] echo: field \"x\" is both required and returned"
        );
    }

    #[test]
    fn test_composition_error_json_format() {
        let err = CompositionError::new(ErrorCode::DuplicateAnnotator, "lede", "registered twice")
            .with_hint("Rename one of the annotators");

        let value: serde_json::Value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "duplicate_annotator");
        assert_eq!(value["annotator"], "lede");
        assert_eq!(value["hint"], "Rename one of the annotators");
    }

    #[test]
    fn test_hint_absent_from_json_when_unset() {
        let err = CompositionError::new(ErrorCode::DuplicateProducer, "b", "x returned twice");
        let value: serde_json::Value = serde_json::to_value(&err).unwrap();
        assert!(value.get("hint").is_none());
    }

    #[test]
    fn test_composition_error_serde_roundtrip() {
        let err = CompositionError::new(ErrorCode::ExternalInput, "sentences", "needs doc text");
        let json = serde_json::to_string(&err).unwrap();
        let back: CompositionError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
