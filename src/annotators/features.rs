//! Position and centroid sentence features.

use ndarray::Axis;

use crate::annotators::{sentence_counts, sentence_matrix, split_scores, write_rows};
use crate::errors::Result;
use crate::pipeline::{Annotator, Frame, MatrixStore};
use crate::types::{SummarizerConfig, Value, F_CENTROID, F_LEDE, SENT_TEXT, TFIDF_MATRIX};

/// Lead-sentence feature: `1 / (position + 1)` within each document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lede;

impl Annotator for Lede {
    fn name(&self) -> &str {
        "Lede"
    }

    fn requires(&self) -> Vec<&str> {
        vec![SENT_TEXT]
    }

    fn returns(&self) -> Vec<&str> {
        vec![F_LEDE]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let scores: Vec<Value> = sentence_counts(&frame, self.name())?
            .into_iter()
            .map(|n| Value::Scores((0..n).map(|i| 1.0 / (i + 1) as f64).collect()))
            .collect();
        write_rows(&mut frame, F_LEDE, scores)?;
        Ok((frame, matrices))
    }
}

/// Cosine similarity of each sentence's TF-IDF row to the mean row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Centroid;

impl Annotator for Centroid {
    fn name(&self) -> &str {
        "Centroid"
    }

    fn requires(&self) -> Vec<&str> {
        vec![SENT_TEXT]
    }

    fn ndarray_requires(&self) -> Vec<&str> {
        vec![TFIDF_MATRIX]
    }

    fn returns(&self) -> Vec<&str> {
        vec![F_CENTROID]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let counts = sentence_counts(&frame, self.name())?;
        let total: usize = counts.iter().sum();
        let tfidf = sentence_matrix(&matrices, self.name(), TFIDF_MATRIX, total)?;

        let flat: Vec<f64> = match tfidf.mean_axis(Axis(0)) {
            Some(centroid) => {
                let centroid_norm = centroid.dot(&centroid).sqrt();
                tfidf
                    .rows()
                    .into_iter()
                    .map(|row| {
                        let norm = row.dot(&row).sqrt();
                        if norm > 0.0 && centroid_norm > 0.0 {
                            row.dot(&centroid) / (norm * centroid_norm)
                        } else {
                            0.0
                        }
                    })
                    .collect()
            }
            // No sentences at all.
            None => Vec::new(),
        };

        write_rows(&mut frame, F_CENTROID, split_scores(&flat, &counts))?;
        Ok((frame, matrices))
    }
}
