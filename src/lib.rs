//! Consensus ("vulgate") building over several witnesses of the same text.
//!
//! Each page of every witness is tokenized and encoded with a per-run
//! [`Vocabulary`](tokenization::Vocabulary), the witnesses are aligned token
//! by token against the first one, and every row of the alignment elects
//! the reading with the highest combined weight.

pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod tokenization;
pub mod types;
pub mod weighing;

pub use config::VulgateConfig;
pub use error::VulgateError;
pub use pipeline::builder::VulgatizerBuilder;
pub use pipeline::memory_witness::MemoryWitness;
pub use pipeline::runtime::Vulgatizer;
pub use pipeline::traits::{Tokenizer, Vulgaligner, Witness};
pub use types::{
    AlignmentMatrix, ConfidenceAnnotation, PageAnnotation, PageSpan, Token, TokenizedText,
    VulgateUnit,
};
