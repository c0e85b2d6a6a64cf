//! Bag-of-words annotators.

use crate::annotators::{read_rows, write_rows};
use crate::errors::Result;
use crate::pipeline::{Annotator, Frame, MatrixStore};
use crate::types::{Bag, SummarizerConfig, Value, BINARY_BOW, RAW_BOW, WORDS};

/// Map every sentence's words to a bag with `weigh`.
fn bags(
    frame: &Frame,
    annotator: &str,
    weigh: impl Fn(&[String]) -> Bag,
) -> Result<Vec<Value>> {
    Ok(read_rows(frame, annotator, WORDS, "tokens", Value::as_tokens)?
        .into_iter()
        .map(|sentences| Value::Bags(sentences.iter().map(|w| weigh(w)).collect()))
        .collect())
}

/// Term counts per sentence.
pub fn count_terms(words: &[String]) -> Bag {
    let mut bag = Bag::new();
    for word in words {
        *bag.entry(word.clone()).or_insert(0.0) += 1.0;
    }
    bag
}

/// Term presence (1.0) per sentence.
pub fn mark_terms(words: &[String]) -> Bag {
    words.iter().map(|w| (w.clone(), 1.0)).collect()
}

/// Raw term frequencies for every sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBow;

impl Annotator for RawBow {
    fn name(&self) -> &str {
        "RawBow"
    }

    fn requires(&self) -> Vec<&str> {
        vec![WORDS]
    }

    fn returns(&self) -> Vec<&str> {
        vec![RAW_BOW]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let values = bags(&frame, self.name(), count_terms)?;
        write_rows(&mut frame, RAW_BOW, values)?;
        Ok((frame, matrices))
    }
}

/// Binary term presence for every sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryBow;

impl Annotator for BinaryBow {
    fn name(&self) -> &str {
        "BinaryBow"
    }

    fn requires(&self) -> Vec<&str> {
        vec![WORDS]
    }

    fn returns(&self) -> Vec<&str> {
        vec![BINARY_BOW]
    }

    fn process(
        &self,
        mut frame: Frame,
        matrices: MatrixStore,
        _cfg: &SummarizerConfig,
    ) -> Result<(Frame, MatrixStore)> {
        let values = bags(&frame, self.name(), mark_terms)?;
        write_rows(&mut frame, BINARY_BOW, values)?;
        Ok((frame, matrices))
    }
}
