//! TF-IDF matrix and sentence similarity.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::annotators::{read_rows, sentence_matrix};
use crate::errors::{Result, SummarizerError};
use crate::pipeline::{Annotator, Frame, MatrixStore};
use crate::types::{SummarizerConfig, Value, RAW_BOW, TFIDF_COSINE_MATRIX, TFIDF_MATRIX};

/// Sentence × term TF-IDF weights.
///
/// Columns are the vocabulary in lexicographic order. A term's weight is
/// `tf * (ln(N / df) + 1)` where `N` is the number of sentences in the
/// input and `df` the number of sentences containing the term.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdf;

impl TfIdf {
    /// Compute the matrix for a flat list of sentence bags.
    pub fn matrix(bags: &[&BTreeMap<String, f64>]) -> Array2<f64> {
        let mut df: BTreeMap<&str, f64> = BTreeMap::new();
        for bag in bags {
            for term in bag.keys() {
                *df.entry(term.as_str()).or_insert(0.0) += 1.0;
            }
        }

        let column: BTreeMap<&str, usize> =
            df.keys().enumerate().map(|(i, term)| (*term, i)).collect();
        let n = bags.len() as f64;

        let mut matrix = Array2::zeros((bags.len(), column.len()));
        for (row, bag) in bags.iter().enumerate() {
            for (term, tf) in bag.iter() {
                let term = term.as_str();
                if let (Some(&col), Some(&df)) = (column.get(term), df.get(term)) {
                    matrix[[row, col]] = tf * ((n / df).ln() + 1.0);
                }
            }
        }
        matrix
    }
}

impl Annotator for TfIdf {
    fn name(&self) -> &str {
        "TfIdf"
    }

    fn requires(&self) -> Vec<&str> {
        vec![RAW_BOW]
    }

    fn ndarray_returns(&self) -> Vec<&str> {
        vec![TFIDF_MATRIX]
    }

    fn process(
        &self,
        frame: Frame,
        mut matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let rows = read_rows(&frame, self.name(), RAW_BOW, "bags", Value::as_bags)?;
        let bags: Vec<_> = rows.into_iter().flatten().collect();
        let matrix = Self::matrix(&bags);
        tracing::debug!(
            sentences = matrix.nrows(),
            terms = matrix.ncols(),
            "tf-idf matrix"
        );
        matrices.insert(TFIDF_MATRIX, matrix);
        Ok((frame, matrices))
    }
}

fn cosine(a: ArrayView1<f64>, b: ArrayView1<f64>, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a > 0.0 && norm_b > 0.0 {
        a.dot(&b) / (norm_a * norm_b)
    } else {
        0.0
    }
}

/// Pairwise cosine similarity of the rows of `matrix`.
///
/// Rows with zero norm are similar to nothing, themselves included. Rows of
/// the result are computed in parallel.
pub fn cosine_similarity(matrix: &Array2<f64>) -> Array2<f64> {
    let n = matrix.nrows();
    let norms: Vec<f64> = matrix.rows().into_iter().map(|r| r.dot(&r).sqrt()).collect();

    let cells: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let norms = &norms;
            (0..n).map(move |j| cosine(matrix.row(i), matrix.row(j), norms[i], norms[j]))
        })
        .collect();

    Array2::from_shape_fn((n, n), |(i, j)| cells[i * n + j])
}

/// Sentence × sentence cosine similarity of the TF-IDF matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfCosineSimilarity;

impl Annotator for TfIdfCosineSimilarity {
    fn name(&self) -> &str {
        "TfIdfCosineSimilarity"
    }

    fn ndarray_requires(&self) -> Vec<&str> {
        vec![TFIDF_MATRIX]
    }

    fn ndarray_returns(&self) -> Vec<&str> {
        vec![TFIDF_COSINE_MATRIX]
    }

    fn process(
        &self,
        frame: Frame,
        mut matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let tfidf = matrices.get(TFIDF_MATRIX).ok_or_else(|| {
            SummarizerError::annotator(self.name(), format!("matrix \"{TFIDF_MATRIX}\" is unknown"))
        })?;
        let similarity = cosine_similarity(tfidf);
        matrices.insert(TFIDF_COSINE_MATRIX, similarity);
        Ok((frame, matrices))
    }
}

/// Borrow the cosine matrix, checked against the sentence count.
pub(crate) fn similarity_matrix<'a>(
    matrices: &'a MatrixStore,
    annotator: &str,
    sentences: usize,
) -> Result<&'a Array2<f64>> {
    let matrix = sentence_matrix(matrices, annotator, TFIDF_COSINE_MATRIX, sentences)?;
    if matrix.ncols() != sentences {
        return Err(SummarizerError::annotator(
            annotator,
            format!(
                "matrix \"{TFIDF_COSINE_MATRIX}\" has {} columns for {sentences} sentences",
                matrix.ncols()
            ),
        ));
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotators::testing;
    use crate::types::Bag;
    use ndarray::array;

    fn bag(terms: &[(&str, f64)]) -> Bag {
        terms.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn test_tfidf_weights() {
        let a = bag(&[("cat", 2.0), ("dog", 1.0)]);
        let b = bag(&[("cat", 1.0)]);
        let m = TfIdf::matrix(&[&a, &b]);

        // vocabulary: [cat, dog]
        assert_eq!(m.dim(), (2, 2));
        assert!((m[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((m[[0, 1]] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert_eq!(m[[1, 1]], 0.0);
    }

    #[test]
    fn test_tfidf_empty_vocabulary() {
        let empty = Bag::new();
        let m = TfIdf::matrix(&[&empty]);
        assert_eq!(m.dim(), (1, 0));
    }

    #[test]
    fn test_cosine_similarity() {
        let m = array![[1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        let s = cosine_similarity(&m);

        assert!((s[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((s[[0, 1]] - 1.0 / 2.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(s[[0, 1]], s[[1, 0]]);
        assert_eq!(s[[2, 2]], 0.0);
    }

    #[test]
    fn test_tfidf_annotator_flattens_rows() {
        let mut frame = Frame::with_rows(2);
        frame.ensure_column(RAW_BOW);
        frame
            .set(0, RAW_BOW, Value::Bags(vec![bag(&[("a", 1.0)]), bag(&[("b", 1.0)])]))
            .unwrap();
        frame
            .set(1, RAW_BOW, Value::Bags(vec![bag(&[("a", 1.0)])]))
            .unwrap();

        let (_, matrices) = testing::run(&TfIdf, frame, MatrixStore::new()).unwrap();
        assert_eq!(matrices.get(TFIDF_MATRIX).map(|m| m.dim()), Some((3, 2)));

        let (_, matrices) =
            testing::run(&TfIdfCosineSimilarity, Frame::with_rows(1), matrices).unwrap();
        assert_eq!(
            matrices.get(TFIDF_COSINE_MATRIX).map(|m| m.dim()),
            Some((3, 3))
        );
    }

    #[test]
    fn test_cosine_requires_tfidf() {
        let err = testing::run(&TfIdfCosineSimilarity, Frame::with_rows(1), MatrixStore::new())
            .unwrap_err();
        assert!(err.to_string().contains("tfidf"));
    }
}
