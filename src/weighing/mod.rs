//! Scoring of alignment rows and election of one reading per row.

pub mod confidence;
pub mod election;
pub mod frequency;
pub mod matrix;
pub mod validity;

use std::sync::Arc;

use crate::types::Cell;

pub use confidence::{ConfidenceIndex, ConfidenceSource, ConfidenceWeigher};
pub use election::{elect, elect_rows};
pub use frequency::FrequencyWeigher;
pub use matrix::MatrixWeigher;
pub use validity::ValidityWeigher;

/// Highest weight a cell can get.
pub const CERTAIN: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeigherMode {
    /// Contributes to the weighted average of a cell.
    Absolute,
    /// Scales the absolute average of a cell by `weight / 100`.
    Relative,
}

/// Scores the candidates of one alignment row.
pub trait TokenWeigher: Send + Sync {
    fn mode(&self) -> WeigherMode;

    /// One weight in `0..=100` per column (`None` for no opinion on that
    /// cell), or `None` when the weigher has nothing to say about the row.
    fn weigh(&self, row: &[Cell]) -> Option<Vec<Option<u8>>>;
}

impl<T: TokenWeigher + ?Sized> TokenWeigher for Arc<T> {
    fn mode(&self) -> WeigherMode {
        (**self).mode()
    }

    fn weigh(&self, row: &[Cell]) -> Option<Vec<Option<u8>>> {
        (**self).weigh(row)
    }
}

impl<T: TokenWeigher + ?Sized> TokenWeigher for Box<T> {
    fn mode(&self) -> WeigherMode {
        (**self).mode()
    }

    fn weigh(&self, row: &[Cell]) -> Option<Vec<Option<u8>>> {
        (**self).weigh(row)
    }
}

pub(crate) fn mode_for(relative: bool) -> WeigherMode {
    if relative {
        WeigherMode::Relative
    } else {
        WeigherMode::Absolute
    }
}
