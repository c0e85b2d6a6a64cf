//! Sentence and word segmentation annotators.

use crate::annotators::{read_rows, write_rows};
use crate::errors::Result;
use crate::nlp::{StopwordFilter, Tokenizer};
use crate::pipeline::{Annotator, Frame, MatrixStore};
use crate::types::{SummarizerConfig, Value, DOC_TEXT, SENT_TEXT, WORDS};

/// Splits each document's text into sentences.
#[derive(Debug, Clone, Default)]
pub struct SentenceTokenizer {
    tokenizer: Tokenizer,
}

impl SentenceTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Annotator for SentenceTokenizer {
    fn name(&self) -> &str {
        "SentenceTokenizer"
    }

    fn requires(&self) -> Vec<&str> {
        vec![DOC_TEXT]
    }

    fn returns(&self) -> Vec<&str> {
        vec![SENT_TEXT]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let sentences: Vec<Value> = read_rows(&frame, self.name(), DOC_TEXT, "text", Value::as_text)?
            .into_iter()
            .map(|text| Value::Texts(self.tokenizer.sentences(text)))
            .collect();
        write_rows(&mut frame, SENT_TEXT, sentences)?;
        Ok((frame, matrices))
    }
}

/// Splits each sentence into lowercase words, dropping stopwords.
///
/// The stopword set is prepared once in `build` from the system config
/// (built-in list for `language` plus `stopwords`). When
/// `remove_stopwords` is off, or before `build`, every word is kept.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    tokenizer: Tokenizer,
    stopwords: StopwordFilter,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Words of one sentence after stopword removal.
    pub fn words(&self, sentence: &str) -> Vec<String> {
        self.tokenizer
            .words(sentence)
            .into_iter()
            .filter(|w| !self.stopwords.is_stopword(w))
            .collect()
    }
}

impl Annotator for WordTokenizer {
    fn name(&self) -> &str {
        "WordTokenizer"
    }

    fn requires(&self) -> Vec<&str> {
        vec![SENT_TEXT]
    }

    fn returns(&self) -> Vec<&str> {
        vec![WORDS]
    }

    fn build(&mut self, cfg: &SummarizerConfig) -> Result<()> {
        self.stopwords = if cfg.remove_stopwords {
            StopwordFilter::for_language(&cfg.language)?.with_extra(&cfg.stopwords)
        } else {
            StopwordFilter::empty()
        };
        tracing::debug!(stopwords = self.stopwords.len(), "word tokenizer ready");
        Ok(())
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let words: Vec<Value> = read_rows(&frame, self.name(), SENT_TEXT, "texts", Value::as_texts)?
            .into_iter()
            .map(|sentences| Value::Tokens(sentences.iter().map(|s| self.words(s)).collect()))
            .collect();
        write_rows(&mut frame, WORDS, words)?;
        Ok((frame, matrices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotators::testing;

    #[test]
    fn test_sentence_tokenizer_per_row() {
        let frame = Frame::from_texts(["One. Two.", "Three."]);
        let (frame, _) =
            testing::run(&SentenceTokenizer::new(), frame, MatrixStore::new()).unwrap();

        assert_eq!(
            frame.get(0, SENT_TEXT),
            Some(&Value::Texts(vec!["One.".into(), "Two.".into()]))
        );
        assert_eq!(
            frame.get(1, SENT_TEXT),
            Some(&Value::Texts(vec!["Three.".into()]))
        );
    }

    #[test]
    fn test_empty_document_has_no_sentences() {
        let frame = Frame::from_texts([""]);
        let (frame, _) =
            testing::run(&SentenceTokenizer::new(), frame, MatrixStore::new()).unwrap();
        assert_eq!(frame.get(0, SENT_TEXT), Some(&Value::Texts(vec![])));
    }

    #[test]
    fn test_word_tokenizer_removes_stopwords_after_build() {
        let mut annotator = WordTokenizer::new();
        annotator.build(&SummarizerConfig::default()).unwrap();

        let frame = testing::sentences(&[&["The cat sat on the mat."]]);
        let (frame, _) = testing::run(&annotator, frame, MatrixStore::new()).unwrap();

        assert_eq!(
            frame.get(0, WORDS),
            Some(&Value::Tokens(vec![vec![
                "cat".to_string(),
                "sat".to_string(),
                "mat".to_string()
            ]]))
        );
    }

    #[test]
    fn test_word_tokenizer_extra_stopwords() {
        let mut annotator = WordTokenizer::new();
        annotator
            .build(&SummarizerConfig::default().with_stopwords(["cat"]))
            .unwrap();
        assert_eq!(annotator.words("The cat sat"), vec!["sat"]);
    }

    #[test]
    fn test_word_tokenizer_keeps_everything_when_disabled() {
        let mut annotator = WordTokenizer::new();
        annotator
            .build(&SummarizerConfig::default().with_remove_stopwords(false))
            .unwrap();
        assert_eq!(annotator.words("The cat"), vec!["the", "cat"]);
    }

    #[test]
    fn test_word_tokenizer_unknown_language_fails_build() {
        let mut annotator = WordTokenizer::new();
        let err = annotator
            .build(&SummarizerConfig::default().with_language("xx"))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::errors::SummarizerError::InvalidConfig { .. }
        ));
    }
}
