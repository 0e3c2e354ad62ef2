use std::collections::HashMap;

use super::{TokenWeigher, WeigherMode};
use crate::config::FrequencyConfig;
use crate::types::Cell;

/// Weighs each candidate by how many cells of the row share its text:
/// `floor(100 * occurrences / candidates)`.
///
/// Gaps are not candidates unless `count_gaps` is set, in which case a gap
/// is one more reading that can be voted for.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyWeigher {
    count_gaps: bool,
}

impl FrequencyWeigher {
    pub fn new(count_gaps: bool) -> Self {
        Self { count_gaps }
    }

    pub fn from_config(config: &FrequencyConfig) -> Self {
        Self::new(config.count_gaps)
    }
}

impl TokenWeigher for FrequencyWeigher {
    fn mode(&self) -> WeigherMode {
        WeigherMode::Absolute
    }

    fn weigh(&self, row: &[Cell]) -> Option<Vec<Option<u8>>> {
        let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
        for cell in row {
            let reading = cell.as_ref().map(|t| t.text.as_str());
            if reading.is_some() || self.count_gaps {
                *counts.entry(reading).or_default() += 1;
            }
        }
        let total: usize = counts.values().sum();
        if total == 0 {
            return None;
        }
        let weights = row
            .iter()
            .map(|cell| {
                let reading = cell.as_ref().map(|t| t.text.as_str());
                counts
                    .get(&reading)
                    .map(|&n| (100 * n / total) as u8)
            })
            .collect();
        Some(weights)
    }
}
