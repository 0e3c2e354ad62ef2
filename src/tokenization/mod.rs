pub mod filter;
pub mod normalizer;
pub mod tokenizer;
pub mod vocabulary;

pub use filter::{FilteredText, InputFilter, PatternFilter, PositionFilter};
pub use normalizer::{GenericNormalizer, Normalizer};
pub use vocabulary::Vocabulary;
