//! # rapid_summarizer
//!
//! Declarative extractive summarization.
//!
//! A summarizer is a set of annotators, each declaring the frame fields and
//! matrix keys it requires and returns. The library orders them from those
//! declarations alone, builds each once, and runs only the stages whose
//! outputs are still unknown, so callers can pre-supply any intermediate
//! result.
//!
//! ## Features
//!
//! - **Contract-driven**: execution order comes from a dependency graph over
//!   declared inputs and outputs; cycles and conflicting producers are
//!   rejected before anything runs
//! - **Memoized**: pre-supplied fields and matrices skip their producers
//! - **Built-in systems**: Lede, Centroid, LexRank, TextRank and MMR
//! - **Unicode-aware**: UAX #29 sentence and word segmentation
//!
//! ```no_run
//! use rapid_summarizer::{SummarizerConfig, System};
//!
//! let mut system = System::lexrank(SummarizerConfig::default().with_summary_sentences(2))?;
//! let summary = system.summarize(["First document. It has two sentences.", "Second one."])?;
//! println!("{summary}");
//! # Ok::<(), rapid_summarizer::SummarizerError>(())
//! ```

pub mod annotators;
pub mod errors;
pub mod nlp;
pub mod pipeline;
pub mod rank;
pub mod summary;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use errors::{Result, SummarizerError};
pub use types::{Bag, SummarizerConfig, Value};

// Re-export main functionality
pub use annotators::{
    BinaryBow, Centroid, Lede, LexRank, Mmr, RawBow, SentenceTokenizer, TextRank, TfIdf,
    TfIdfCosineSimilarity, WordTokenizer,
};
pub use nlp::{StopwordFilter, Tokenizer};
pub use pipeline::error_code::ErrorCode;
pub use pipeline::errors::CompositionError;
pub use pipeline::validation::{ValidationEngine, ValidationReport};
pub use pipeline::{
    Annotator, AnnotatorDescriptor, DependencyGraph, Frame, Input, MatrixStore, Node,
    NoopObserver, Pipeline, PipelineObserver, StageReport, StageTimingObserver,
};
pub use rank::{PageRank, PageRankResult};
pub use summary::{FeatureRanker, Summary, SummaryBuilder, SummarySentence};
pub use system::{System, SystemBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
