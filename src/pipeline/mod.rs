//! Annotator contracts, composition, and execution.
//!
//! ## Submodules
//!
//! - [`traits`] — the [`Annotator`] contract and its descriptor snapshot
//! - [`store`] — the tabular [`Frame`] and keyed [`MatrixStore`]
//! - [`graph`] — dependency graph and topological ordering
//! - [`validation`] — composition checks run before any build step
//! - [`runner`] — pipeline build, store allocation, memoized execution
//! - [`observer`] — build and stage hooks

pub mod error_code;
pub mod errors;
pub mod graph;
pub mod observer;
pub mod runner;
pub mod store;
pub mod traits;
pub mod validation;

pub use error_code::ErrorCode;
pub use errors::CompositionError;
pub use graph::{DependencyGraph, Node};
pub use observer::{
    NoopObserver, PipelineObserver, StageClock, StageOutcome, StageReport, StageTimingObserver,
};
pub use runner::{Pipeline, Stage};
pub use store::{Column, Frame, Input, MatrixStore};
pub use traits::{Annotator, AnnotatorDescriptor};
pub use validation::{
    Severity, ValidationDiagnostic, ValidationEngine, ValidationReport, ValidationRule,
};
