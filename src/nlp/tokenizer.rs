//! Unicode-aware tokenization
//!
//! UAX #29 sentence and word segmentation, so CJK, accented text and emoji
//! are split the same way as ASCII prose.

use unicode_segmentation::UnicodeSegmentation;

/// A Unicode-aware tokenizer following UAX #29
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Minimum token length (in chars) to keep
    min_token_length: usize,
    /// Lowercase every word
    lowercase: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a new tokenizer with default settings
    pub fn new() -> Self {
        Self {
            min_token_length: 1,
            lowercase: true,
        }
    }

    /// Set minimum token length
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_token_length = min_length;
        self
    }

    /// Keep the original casing of words
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Split text into non-empty sentences with normalized whitespace
    ///
    /// Blank lines separate paragraphs and always end a sentence; single
    /// line breaks inside a paragraph are treated as spaces.
    pub fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        for paragraph in Self::paragraphs(text) {
            sentences.extend(
                self.sentence_boundaries(&paragraph)
                    .into_iter()
                    .map(|(start, end)| paragraph[start..end].trim().to_string()),
            );
        }
        sentences
    }

    /// Join the lines of each paragraph, collapsing runs of whitespace
    fn paragraphs(text: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.extend(line.split_whitespace());
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        paragraphs
    }

    /// Split one sentence into words, dropping pure punctuation
    pub fn words(&self, sentence: &str) -> Vec<String> {
        sentence
            .unicode_words()
            .filter(|w| w.chars().count() >= self.min_token_length)
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .map(|w| {
                if self.lowercase {
                    w.to_lowercase()
                } else {
                    w.to_string()
                }
            })
            .collect()
    }

    /// Find sentence boundaries in text
    fn sentence_boundaries(&self, text: &str) -> Vec<(usize, usize)> {
        let mut boundaries = Vec::new();
        let mut start = 0;

        for (idx, _) in text.split_sentence_bound_indices() {
            if idx > start && !text[start..idx].trim().is_empty() {
                boundaries.push((start, idx));
            }
            start = idx;
        }

        // Last segment
        if start < text.len() && !text[start..].trim().is_empty() {
            boundaries.push((start, text.len()));
        }

        boundaries
    }
}
