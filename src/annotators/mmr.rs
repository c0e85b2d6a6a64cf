//! Maximal marginal relevance.

use ndarray::Array2;

use crate::annotators::tfidf::similarity_matrix;
use crate::annotators::{read_rows, split_scores, write_rows};
use crate::errors::Result;
use crate::pipeline::{Annotator, Frame, MatrixStore};
use crate::types::{SummarizerConfig, Value, F_CENTROID, F_MMR, TFIDF_COSINE_MATRIX};

/// Greedy MMR selection over centroid relevance and cosine redundancy.
///
/// At each step the unselected sentence maximizing
/// `λ · relevance − (1 − λ) · max similarity to the selected set` is picked
/// (lowest position on ties). A sentence's score is `(n − k) / n` where `k`
/// is its zero-based selection step, so the first pick scores 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mmr;

impl Mmr {
    /// Selection order of every sentence.
    pub fn select(relevance: &[f64], similarity: &Array2<f64>, lambda: f64) -> Vec<usize> {
        let n = relevance.len();
        let mut selected: Vec<usize> = Vec::with_capacity(n);
        let mut redundancy = vec![0.0f64; n];
        let mut taken = vec![false; n];

        while selected.len() < n {
            let mut best: Option<(usize, f64)> = None;
            for i in (0..n).filter(|&i| !taken[i]) {
                let score = lambda * relevance[i] - (1.0 - lambda) * redundancy[i];
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((i, score));
                }
            }
            let Some((pick, _)) = best else { break };

            taken[pick] = true;
            selected.push(pick);
            for (i, r) in redundancy.iter_mut().enumerate() {
                *r = r.max(similarity[[i, pick]]);
            }
        }
        selected
    }
}

impl Annotator for Mmr {
    fn name(&self) -> &str {
        "Mmr"
    }

    fn requires(&self) -> Vec<&str> {
        vec![F_CENTROID]
    }

    fn ndarray_requires(&self) -> Vec<&str> {
        vec![TFIDF_COSINE_MATRIX]
    }

    fn returns(&self) -> Vec<&str> {
        vec![F_MMR]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let rows = read_rows(&frame, self.name(), F_CENTROID, "scores", Value::as_scores)?;
        let counts: Vec<usize> = rows.iter().map(|r| r.len()).collect();
        let relevance: Vec<f64> = rows.into_iter().flatten().copied().collect();
        let similarity = similarity_matrix(&matrices, self.name(), relevance.len())?;

        let n = relevance.len();
        let mut flat = vec![0.0; n];
        for (step, sentence) in Self::select(&relevance, similarity, cfg.mmr_lambda)
            .into_iter()
            .enumerate()
        {
            flat[sentence] = (n - step) as f64 / n as f64;
        }

        write_rows(&mut frame, F_MMR, split_scores(&flat, &counts))?;
        Ok((frame, matrices))
    }
}
