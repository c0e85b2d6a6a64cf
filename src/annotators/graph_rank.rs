//! Graph-based sentence centrality: LexRank and TextRank.
//!
//! Both build a sentence × sentence weight matrix over the whole input and
//! rank it with [`PageRank`], configured from the system config.

use ndarray::Array2;

use crate::annotators::tfidf::similarity_matrix;
use crate::annotators::{read_rows, sentence_counts, split_scores, write_rows};
use crate::errors::Result;
use crate::pipeline::{Annotator, Frame, MatrixStore};
use crate::rank::PageRank;
use crate::types::{
    Bag, SummarizerConfig, Value, BINARY_BOW, F_LEXRANK, F_TEXTRANK, SENT_TEXT,
    TFIDF_COSINE_MATRIX,
};

// ─── LexRank ────────────────────────────────────────────────────────────────

/// PageRank over the TF-IDF cosine graph.
///
/// With `lexrank_threshold > 0` an edge exists (weight 1) where similarity
/// reaches the threshold; with `0` the similarities themselves are the
/// weights (continuous LexRank). Self-loops are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexRank;

impl LexRank {
    pub fn weights(similarity: &Array2<f64>, threshold: f64) -> Array2<f64> {
        Array2::from_shape_fn(similarity.dim(), |(i, j)| {
            let s = similarity[[i, j]];
            if i == j {
                0.0
            } else if threshold > 0.0 {
                if s >= threshold {
                    1.0
                } else {
                    0.0
                }
            } else {
                s.max(0.0)
            }
        })
    }
}

impl Annotator for LexRank {
    fn name(&self) -> &str {
        "LexRank"
    }

    fn requires(&self) -> Vec<&str> {
        vec![SENT_TEXT]
    }

    fn ndarray_requires(&self) -> Vec<&str> {
        vec![TFIDF_COSINE_MATRIX]
    }

    fn returns(&self) -> Vec<&str> {
        vec![F_LEXRANK]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let counts = sentence_counts(&frame, self.name())?;
        let total = counts.iter().sum();
        let similarity = similarity_matrix(&matrices, self.name(), total)?;

        let weights = Self::weights(similarity, cfg.lexrank_threshold);
        let result = PageRank::from_config(cfg).run(&weights);
        tracing::debug!(
            converged = result.converged,
            iterations = result.iterations,
            "lexrank"
        );

        write_rows(&mut frame, F_LEXRANK, split_scores(&result.scores, &counts))?;
        Ok((frame, matrices))
    }
}

// ─── TextRank ───────────────────────────────────────────────────────────────

/// PageRank over word-overlap similarity.
///
/// The weight between two sentences is `|si ∩ sj| / (ln|si| + ln|sj|)`,
/// computed on their binary bags of words. Pairs whose denominator is not
/// positive (both sentences a single word) get weight 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRank;

impl TextRank {
    pub fn overlap(a: &Bag, b: &Bag) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let shared = a.keys().filter(|k| b.contains_key(*k)).count() as f64;
        let denom = (a.len() as f64).ln() + (b.len() as f64).ln();
        if shared > 0.0 && denom > 0.0 {
            shared / denom
        } else {
            0.0
        }
    }

    pub fn weights(bags: &[&Bag]) -> Array2<f64> {
        let n = bags.len();
        Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                0.0
            } else {
                Self::overlap(bags[i], bags[j])
            }
        })
    }
}

impl Annotator for TextRank {
    fn name(&self) -> &str {
        "TextRank"
    }

    fn requires(&self) -> Vec<&str> {
        vec![BINARY_BOW]
    }

    fn returns(&self) -> Vec<&str> {
        vec![F_TEXTRANK]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let rows = read_rows(&frame, self.name(), BINARY_BOW, "bags", Value::as_bags)?;
        let counts: Vec<usize> = rows.iter().map(|r| r.len()).collect();
        let bags: Vec<&Bag> = rows.into_iter().flatten().collect();

        let result = PageRank::from_config(cfg).run(&Self::weights(&bags));
        tracing::debug!(
            converged = result.converged,
            iterations = result.iterations,
            "textrank"
        );

        let scores = split_scores(&result.scores, &counts);
        write_rows(&mut frame, F_TEXTRANK, scores)?;
        Ok((frame, matrices))
    }
}
