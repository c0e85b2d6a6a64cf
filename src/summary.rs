//! Summary construction from an annotated frame.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SummarizerError};
use crate::pipeline::{Frame, MatrixStore};
use crate::types::{SummarizerConfig, Value, SENT_TEXT};

/// One selected sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySentence {
    /// `doc id` of the source row.
    pub doc_id: usize,
    /// Position of the sentence within its document.
    pub position: usize,
    pub text: String,
    pub score: f64,
}

impl SummarySentence {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Ranked sentences, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    sentences: Vec<SummarySentence>,
}

impl Summary {
    pub fn new(sentences: Vec<SummarySentence>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[SummarySentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummarySentence> {
        self.sentences.iter()
    }

    pub fn word_count(&self) -> usize {
        self.sentences.iter().map(SummarySentence::word_count).sum()
    }

    /// Sentence texts joined by single spaces, in rank order.
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, sentence) in self.sentences.iter().enumerate() {
            if rank > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", rank + 1, sentence.text)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Summary {
    type Item = &'a SummarySentence;
    type IntoIter = std::slice::Iter<'a, SummarySentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

// ============================================================================
// Summary builders
// ============================================================================

/// Turns the annotated stores into a [`Summary`].
pub trait SummaryBuilder: Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str;

    /// Frame fields read by [`summarize`](Self::summarize).
    fn requires(&self) -> Vec<&str>;

    fn summarize(
        &self,
        frame: &Frame,
        matrices: &MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<Summary>;
}

/// Ranks every sentence by one score column.
///
/// Higher scores rank first; ties go to the earlier `(doc id, position)`.
/// The result holds at most `summary_sentences` sentences (0 = no limit).
/// With `summary_words` set, sentences are taken in rank order while the
/// running word count stays within the budget; the first sentence that would
/// exceed it ends the summary.
#[derive(Debug, Clone)]
pub struct FeatureRanker {
    feature: String,
}

impl FeatureRanker {
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    fn read<'a>(&self, frame: &'a Frame, row: usize, field: &str) -> Result<&'a Value> {
        frame
            .get(row, field)
            .ok_or_else(|| SummarizerError::schema_mismatch(self.name(), field))
    }
}

impl SummaryBuilder for FeatureRanker {
    fn name(&self) -> &str {
        "FeatureRanker"
    }

    fn requires(&self) -> Vec<&str> {
        vec![SENT_TEXT, self.feature.as_str()]
    }

    fn summarize(
        &self,
        frame: &Frame,
        _matrices: &MatrixStore,
        cfg: &SummarizerConfig,
    ) -> Result<Summary> {
        let mut ranked = Vec::new();
        for (row, &doc_id) in frame.index().iter().enumerate() {
            let texts = self.read(frame, row, SENT_TEXT)?.as_texts();
            let scores = self.read(frame, row, &self.feature)?.as_scores();
            let (Some(texts), Some(scores)) = (texts, scores) else {
                return Err(SummarizerError::bad_input(format!(
                    "row {row}: \"{SENT_TEXT}\" and \"{}\" must hold texts and scores",
                    self.feature
                )));
            };
            if texts.len() != scores.len() {
                return Err(SummarizerError::bad_input(format!(
                    "row {row}: {} sentences but {} scores",
                    texts.len(),
                    scores.len()
                )));
            }

            ranked.extend(texts.iter().zip(scores).enumerate().map(
                |(position, (text, &score))| SummarySentence {
                    doc_id,
                    position,
                    text: text.clone(),
                    score,
                },
            ));
        }

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.doc_id.cmp(&b.doc_id))
                .then(a.position.cmp(&b.position))
        });

        if cfg.summary_sentences > 0 {
            ranked.truncate(cfg.summary_sentences);
        }

        if let Some(budget) = cfg.summary_words {
            let mut used = 0;
            let keep = ranked
                .iter()
                .take_while(|s| {
                    used += s.word_count();
                    used <= budget
                })
                .count();
            ranked.truncate(keep);
        }

        Ok(Summary::new(ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::F_LEDE;

    fn frame(docs: &[(&[&str], &[f64])]) -> Frame {
        let mut frame = Frame::with_rows(docs.len());
        frame.ensure_column(SENT_TEXT);
        frame.ensure_column(F_LEDE);
        for (row, (texts, scores)) in docs.iter().enumerate() {
            let texts = texts.iter().map(|s| s.to_string()).collect();
            frame.set(row, SENT_TEXT, Value::Texts(texts)).unwrap();
            frame
                .set(row, F_LEDE, Value::Scores(scores.to_vec()))
                .unwrap();
        }
        frame
    }

    #[test]
    fn test_ranks_by_score_then_position() {
        let frame = frame(&[
            (&["a one.", "a two."], &[0.5, 0.9]),
            (&["b one."], &[0.5]),
        ]);
        let cfg = SummarizerConfig::default();
        let summary = FeatureRanker::new(F_LEDE)
            .summarize(&frame, &MatrixStore::new(), &cfg)
            .unwrap();

        let texts: Vec<&str> = summary.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a two.", "a one.", "b one."]);
        assert_eq!(summary.sentences()[2].doc_id, 1);
        assert_eq!(summary.sentences()[0].position, 1);
    }

    #[test]
    fn test_sentence_limit() {
        let frame = frame(&[(&["x.", "y.", "z."], &[0.1, 0.2, 0.3])]);
        let cfg = SummarizerConfig::default().with_summary_sentences(2);
        let summary = FeatureRanker::new(F_LEDE)
            .summarize(&frame, &MatrixStore::new(), &cfg)
            .unwrap();
        assert_eq!(summary.text(), "z. y.");

        let cfg = SummarizerConfig::default().with_summary_sentences(0);
        let summary = FeatureRanker::new(F_LEDE)
            .summarize(&frame, &MatrixStore::new(), &cfg)
            .unwrap();
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn test_word_budget() {
        let frame = frame(&[(
            &["one two three.", "four five.", "six."],
            &[0.9, 0.8, 0.7],
        )]);
        let cfg = SummarizerConfig::default().with_summary_words(5);
        let summary = FeatureRanker::new(F_LEDE)
            .summarize(&frame, &MatrixStore::new(), &cfg)
            .unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.word_count(), 5);
    }

    #[test]
    fn test_missing_feature_is_schema_mismatch() {
        let mut frame = Frame::with_rows(1);
        frame.ensure_column(SENT_TEXT);
        frame
            .set(0, SENT_TEXT, Value::Texts(vec!["x.".into()]))
            .unwrap();
        let err = FeatureRanker::new("f:missing")
            .summarize(&frame, &MatrixStore::new(), &SummarizerConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            SummarizerError::schema_mismatch("FeatureRanker", "f:missing")
        );
    }

    #[test]
    fn test_display_numbers_sentences() {
        let summary = Summary::new(vec![
            SummarySentence {
                doc_id: 0,
                position: 0,
                text: "First.".into(),
                score: 1.0,
            },
            SummarySentence {
                doc_id: 0,
                position: 1,
                text: "Second.".into(),
                score: 0.5,
            },
        ]);
        assert_eq!(summary.to_string(), "1. First.\n2. Second.");
        assert!(summary.to_json().unwrap().contains("\"doc_id\":0"));
    }
}
