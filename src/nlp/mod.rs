//! Text segmentation and stopword handling.

pub mod stopwords;
pub mod tokenizer;

pub use stopwords::StopwordFilter;
pub use tokenizer::Tokenizer;
