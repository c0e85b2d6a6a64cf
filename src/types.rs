//! Core types for rapid_summarizer
//!
//! This module defines the cell values stored in the tabular store, the
//! well-known field and matrix names used by the built-in annotators, and
//! the summarizer configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SummarizerError};

// ============================================================================
// Field and matrix names
// ============================================================================

/// Row index assigned to each input item, in input order.
pub const DOC_ID: &str = "doc id";
/// Raw text of each input item.
pub const DOC_TEXT: &str = "doc text";
/// Sentences of each item.
pub const SENT_TEXT: &str = "sent text";
/// Lowercased words of each sentence.
pub const WORDS: &str = "words";
/// Term counts per sentence.
pub const RAW_BOW: &str = "raw bow";
/// Term presence per sentence.
pub const BINARY_BOW: &str = "binary bow";

/// Sentence × vocabulary tf-idf weights.
pub const TFIDF_MATRIX: &str = "tfidf";
/// Sentence × sentence cosine similarity of tf-idf rows.
pub const TFIDF_COSINE_MATRIX: &str = "tfidf cosine";

/// Lede (position) feature.
pub const F_LEDE: &str = "f:lede";
/// Centroid similarity feature.
pub const F_CENTROID: &str = "f:centroid";
/// LexRank centrality feature.
pub const F_LEXRANK: &str = "f:lexrank";
/// TextRank centrality feature.
pub const F_TEXTRANK: &str = "f:textrank";
/// Maximal marginal relevance feature.
pub const F_MMR: &str = "f:mmr";

// ============================================================================
// Cell values
// ============================================================================

/// Bag of words: term → weight, ordered for reproducible iteration.
pub type Bag = BTreeMap<String, f64>;

/// A single known cell of the tabular store.
///
/// Unknown cells are represented by `None` in the store; a `Value` always
/// carries data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A single integer (e.g. an identifier).
    Integer(i64),
    /// A single floating point number.
    Number(f64),
    /// A single string.
    Text(String),
    /// One string per sentence.
    Texts(Vec<String>),
    /// One word list per sentence.
    Tokens(Vec<Vec<String>>),
    /// One score per sentence.
    Scores(Vec<f64>),
    /// One bag of words per sentence.
    Bags(Vec<Bag>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Texts(_) => "texts",
            Value::Tokens(_) => "tokens",
            Value::Scores(_) => "scores",
            Value::Bags(_) => "bags",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Value::Texts(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[Vec<String>]> {
        match self {
            Value::Tokens(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_scores(&self) -> Option<&[f64]> {
        match self {
            Value::Scores(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bags(&self) -> Option<&[Bag]> {
        match self {
            Value::Bags(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<f64>> for Value {
    fn from(scores: Vec<f64>) -> Self {
        Value::Scores(scores)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration shared by a system and every annotator it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Damping factor for PageRank-based features (typically 0.85)
    pub damping: f64,
    /// Maximum power iterations for PageRank-based features
    pub max_iterations: usize,
    /// Convergence threshold (stop when L1 delta < threshold)
    pub convergence_threshold: f64,
    /// Minimum cosine similarity for a LexRank edge (0 = continuous LexRank)
    pub lexrank_threshold: f64,
    /// Relevance/redundancy trade-off for MMR (1.0 = relevance only)
    pub mmr_lambda: f64,
    /// Maximum sentences in a summary (0 = unlimited)
    pub summary_sentences: usize,
    /// Optional word budget for a summary
    pub summary_words: Option<usize>,
    /// Language code for the built-in stopword list
    pub language: String,
    /// Additional stopwords (extend the built-in list)
    pub stopwords: Vec<String>,
    /// Drop stopwords during word tokenization
    pub remove_stopwords: bool,
    /// Emit build/process trace lines at INFO instead of DEBUG
    pub verbose: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            convergence_threshold: 1e-6,
            lexrank_threshold: 0.1,
            mmr_lambda: 0.7,
            summary_sentences: 5,
            summary_words: None,
            language: "en".to_string(),
            stopwords: Vec::new(),
            remove_stopwords: true,
            verbose: false,
        }
    }
}

impl SummarizerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; omitted fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(SummarizerError::invalid_config(format!(
                "damping must be between 0 and 1, got {}",
                self.damping
            )));
        }

        if self.max_iterations == 0 {
            return Err(SummarizerError::invalid_config("max_iterations must be > 0"));
        }

        if self.convergence_threshold <= 0.0 {
            return Err(SummarizerError::invalid_config(
                "convergence_threshold must be > 0",
            ));
        }

        if !(0.0..1.0).contains(&self.lexrank_threshold) {
            return Err(SummarizerError::invalid_config(format!(
                "lexrank_threshold must be in [0, 1), got {}",
                self.lexrank_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.mmr_lambda) {
            return Err(SummarizerError::invalid_config(format!(
                "mmr_lambda must be between 0 and 1, got {}",
                self.mmr_lambda
            )));
        }

        if self.summary_words == Some(0) {
            return Err(SummarizerError::invalid_config(
                "summary_words must be > 0 when set",
            ));
        }

        Ok(())
    }

    /// Builder method: set damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Builder method: set max iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set LexRank edge threshold
    pub fn with_lexrank_threshold(mut self, threshold: f64) -> Self {
        self.lexrank_threshold = threshold;
        self
    }

    /// Builder method: set MMR lambda
    pub fn with_mmr_lambda(mut self, lambda: f64) -> Self {
        self.mmr_lambda = lambda;
        self
    }

    /// Builder method: set the sentence budget
    pub fn with_summary_sentences(mut self, n: usize) -> Self {
        self.summary_sentences = n;
        self
    }

    /// Builder method: set the word budget
    pub fn with_summary_words(mut self, n: usize) -> Self {
        self.summary_words = Some(n);
        self
    }

    /// Builder method: set language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder method: add extra stopwords
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(words.into_iter().map(Into::into));
        self
    }

    /// Builder method: keep or drop stopwords
    pub fn with_remove_stopwords(mut self, remove: bool) -> Self {
        self.remove_stopwords = remove;
        self
    }

    /// Builder method: enable verbose build/process lines
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
