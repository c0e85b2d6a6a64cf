//! Stable error codes shared by every pipeline error type.
//!
//! Codes serialize as `snake_case` strings and are safe to match on
//! programmatically; the human-readable messages that accompany them are not.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable classification of a pipeline failure or diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Caller input has an unrecognized shape.
    BadInput,
    /// The dependency graph has no valid execution order.
    CyclicDependency,
    /// The allocated stores disagree with an annotator's declared contract.
    SchemaMismatch,
    /// An annotator returned without filling a declared output.
    ContractViolation,
    /// Two annotators registered under the same name.
    DuplicateAnnotator,
    /// An annotator requires a field it also returns.
    SelfDependency,
    /// A field or matrix key is returned by more than one annotator.
    DuplicateProducer,
    /// A required field or matrix key is produced by no annotator.
    ExternalInput,
    /// Composition validation found one or more errors.
    CompositionFailed,
    /// An annotator's `build` or `process` step failed.
    AnnotatorFailed,
    /// A configuration value is out of range.
    InvalidConfig,
    /// JSON (de)serialization failed.
    Serialization,
}

impl ErrorCode {
    /// The serialized form of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadInput => "bad_input",
            Self::CyclicDependency => "cyclic_dependency",
            Self::SchemaMismatch => "schema_mismatch",
            Self::ContractViolation => "contract_violation",
            Self::DuplicateAnnotator => "duplicate_annotator",
            Self::SelfDependency => "self_dependency",
            Self::DuplicateProducer => "duplicate_producer",
            Self::ExternalInput => "external_input",
            Self::CompositionFailed => "composition_failed",
            Self::AnnotatorFailed => "annotator_failed",
            Self::InvalidConfig => "invalid_config",
            Self::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
