use super::{TokenWeigher, WeigherMode, CERTAIN};
use crate::types::{AlignmentMatrix, Cell, WeightMatrix};

/// Combines several weighers into one weight per cell.
///
/// Absolute weighers are averaged with their weights; relative weighers are
/// averaged separately and scale the absolute average by `relative / 100`.
/// A cell without any absolute weight stays unweighted.
pub struct MatrixWeigher<'a> {
    weighers: Vec<(Box<dyn TokenWeigher + 'a>, u32)>,
    skip_identical_rows: bool,
}

impl<'a> MatrixWeigher<'a> {
    pub fn new(skip_identical_rows: bool) -> Self {
        Self {
            weighers: Vec::new(),
            skip_identical_rows,
        }
    }

    pub fn add_weigher(&mut self, weigher: Box<dyn TokenWeigher + 'a>, weight: u32) {
        self.weighers.push((weigher, weight));
    }

    pub fn with_weigher(mut self, weigher: Box<dyn TokenWeigher + 'a>, weight: u32) -> Self {
        self.add_weigher(weigher, weight);
        self
    }

    pub fn len(&self) -> usize {
        self.weighers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weighers.is_empty()
    }

    pub fn weigh_matrix(&self, matrix: &AlignmentMatrix) -> WeightMatrix {
        matrix.rows().iter().map(|row| self.weigh_row(row)).collect()
    }

    pub fn weigh_row(&self, row: &[Cell]) -> Vec<Option<u8>> {
        if self.skip_identical_rows && is_uniform(row) {
            return row
                .iter()
                .map(|cell| cell.as_ref().map(|_| CERTAIN))
                .collect();
        }
        if let [(weigher, _)] = self.weighers.as_slice() {
            return weigher.weigh(row).unwrap_or_else(|| vec![None; row.len()]);
        }

        let columns = row.len();
        let mut absolute = vec![(0u64, 0u64); columns];
        let mut relative = vec![(0u64, 0u64); columns];
        for (weigher, weight) in &self.weighers {
            let Some(weights) = weigher.weigh(row) else {
                continue;
            };
            let sums = match weigher.mode() {
                WeigherMode::Absolute => &mut absolute,
                WeigherMode::Relative => &mut relative,
            };
            for (sum, value) in sums.iter_mut().zip(weights) {
                if let Some(value) = value {
                    sum.0 += value as u64 * *weight as u64;
                    sum.1 += *weight as u64;
                }
            }
        }

        absolute
            .iter()
            .zip(&relative)
            .map(|(&(abs_sum, abs_total), &(rel_sum, rel_total))| {
                if abs_total == 0 {
                    return None;
                }
                let mut weight = abs_sum / abs_total;
                if rel_total > 0 {
                    weight = weight * (rel_sum / rel_total) / 100;
                }
                Some(weight.min(CERTAIN as u64) as u8)
            })
            .collect()
    }
}

/// Whether every cell of the row holds a token with the same text.
///
/// A gap is a reading of its own, so a row holding one is never uniform.
fn is_uniform(row: &[Cell]) -> bool {
    let Some((first, rest)) = row.split_first() else {
        return false;
    };
    let Some(first) = first else {
        return false;
    };
    rest.iter()
        .all(|cell| cell.as_ref().is_some_and(|t| t.text == first.text))
}
