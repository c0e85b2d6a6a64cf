//! Built-in annotators.
//!
//! Every annotator here is an ordinary implementation of
//! [`Annotator`](crate::pipeline::Annotator); systems compose them by
//! contract alone. Per-document fields hold one entry per sentence, and
//! matrix rows enumerate sentences across the whole input in
//! `(doc id, sentence)` order.
//!
//! | annotator | requires | returns |
//! |-----------|----------|---------|
//! | [`SentenceTokenizer`] | `doc text` | `sent text` |
//! | [`WordTokenizer`] | `sent text` | `words` |
//! | [`RawBow`] | `words` | `raw bow` |
//! | [`BinaryBow`] | `words` | `binary bow` |
//! | [`TfIdf`] | `raw bow` | matrix `tfidf` |
//! | [`TfIdfCosineSimilarity`] | matrix `tfidf` | matrix `tfidf cosine` |
//! | [`Lede`] | `sent text` | `f:lede` |
//! | [`Centroid`] | `sent text`, matrix `tfidf` | `f:centroid` |
//! | [`LexRank`] | `sent text`, matrix `tfidf cosine` | `f:lexrank` |
//! | [`TextRank`] | `binary bow` | `f:textrank` |
//! | [`Mmr`] | `f:centroid`, matrix `tfidf cosine` | `f:mmr` |

pub mod bow;
pub mod features;
pub mod graph_rank;
pub mod mmr;
pub mod tfidf;
pub mod tokenize;

pub use bow::{BinaryBow, RawBow};
pub use features::{Centroid, Lede};
pub use graph_rank::{LexRank, TextRank};
pub use mmr::Mmr;
pub use tfidf::{cosine_similarity, TfIdf, TfIdfCosineSimilarity};
pub use tokenize::{SentenceTokenizer, WordTokenizer};

use ndarray::Array2;

use crate::errors::{Result, SummarizerError};
use crate::pipeline::{Frame, MatrixStore};
use crate::types::{Value, SENT_TEXT};

// ─── Shared frame/matrix access ─────────────────────────────────────────────

/// Read `field` from every row, converting each cell with `extract`.
///
/// An unknown cell or a value of the wrong kind is reported as a failure of
/// `annotator`.
pub(crate) fn read_rows<'a, T: ?Sized>(
    frame: &'a Frame,
    annotator: &str,
    field: &str,
    expected: &str,
    extract: impl Fn(&'a Value) -> Option<&'a T>,
) -> Result<Vec<&'a T>> {
    (0..frame.len())
        .map(|row| {
            let value = frame.get(row, field).ok_or_else(|| {
                SummarizerError::annotator(
                    annotator,
                    format!("row {row}: \"{field}\" is unknown"),
                )
            })?;
            extract(value).ok_or_else(|| {
                SummarizerError::annotator(
                    annotator,
                    format!(
                        "row {row}: \"{field}\" holds {}, expected {expected}",
                        value.kind()
                    ),
                )
            })
        })
        .collect()
}

/// Number of sentences in each row.
pub(crate) fn sentence_counts(frame: &Frame, annotator: &str) -> Result<Vec<usize>> {
    Ok(read_rows(frame, annotator, SENT_TEXT, "texts", Value::as_texts)?
        .into_iter()
        .map(<[String]>::len)
        .collect())
}

/// Fill `field` with one value per row.
pub(crate) fn write_rows(frame: &mut Frame, field: &str, values: Vec<Value>) -> Result<()> {
    frame.set_column(field, values.into_iter().map(Some).collect())
}

/// Split a flat per-sentence score list back into per-row score lists.
pub(crate) fn split_scores(flat: &[f64], counts: &[usize]) -> Vec<Value> {
    let mut offset = 0;
    counts
        .iter()
        .map(|&n| {
            let scores = flat[offset..offset + n].to_vec();
            offset += n;
            Value::Scores(scores)
        })
        .collect()
}

/// Borrow a known matrix whose row count must equal `sentences`.
pub(crate) fn sentence_matrix<'a>(
    matrices: &'a MatrixStore,
    annotator: &str,
    key: &str,
    sentences: usize,
) -> Result<&'a Array2<f64>> {
    let matrix = matrices.get(key).ok_or_else(|| {
        SummarizerError::annotator(annotator, format!("matrix \"{key}\" is unknown"))
    })?;
    if matrix.nrows() != sentences {
        return Err(SummarizerError::annotator(
            annotator,
            format!(
                "matrix \"{key}\" has {} rows for {sentences} sentences",
                matrix.nrows()
            ),
        ));
    }
    Ok(matrix)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_scores() {
        let rows = split_scores(&[1.0, 2.0, 3.0], &[2, 0, 1]);
        assert_eq!(
            rows,
            vec![
                Value::Scores(vec![1.0, 2.0]),
                Value::Scores(vec![]),
                Value::Scores(vec![3.0]),
            ]
        );
    }

    #[test]
    fn test_read_rows_reports_wrong_kind() {
        let frame = Frame::from_texts(["a"]);
        let err = read_rows(&frame, "x", crate::types::DOC_TEXT, "texts", Value::as_texts)
            .unwrap_err();
        assert!(matches!(err, SummarizerError::Annotator { .. }));
        assert!(err.to_string().contains("holds text"));
    }

    #[test]
    fn test_sentence_matrix_checks_rows() {
        let matrices = MatrixStore::new().with("m", Array2::zeros((2, 2)));
        assert!(sentence_matrix(&matrices, "x", "m", 2).is_ok());
        assert!(sentence_matrix(&matrices, "x", "m", 3).is_err());
        assert!(sentence_matrix(&matrices, "x", "n", 2).is_err());
    }
}
