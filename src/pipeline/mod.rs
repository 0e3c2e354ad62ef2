pub mod builder;
pub mod cursor;
pub mod defaults;
pub mod memory_witness;
pub mod runtime;
pub mod traits;

pub use builder::VulgatizerBuilder;
pub use memory_witness::MemoryWitness;
pub use runtime::Vulgatizer;
pub use traits::{Tokenizer, Vulgaligner, Witness};
