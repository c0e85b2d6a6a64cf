//! Stopword filtering
//!
//! A built-in English list plus caller-supplied extras. Lookups are on the
//! lowercased word.

use rustc_hash::FxHashSet;

use crate::errors::{Result, SummarizerError};

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Set of words dropped before bag-of-words construction.
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    words: FxHashSet<String>,
}

impl StopwordFilter {
    /// An empty filter that keeps every word.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in list for `language` (`"en"` or `"english"`).
    pub fn for_language(language: &str) -> Result<Self> {
        match language.to_lowercase().as_str() {
            "en" | "english" => Ok(Self {
                words: ENGLISH.iter().map(|w| w.to_string()).collect(),
            }),
            other => Err(SummarizerError::invalid_config(format!(
                "no stopword list for language \"{other}\""
            ))),
        }
    }

    /// Add extra words.
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
