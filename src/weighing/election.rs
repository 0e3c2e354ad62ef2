use crate::types::WeightMatrix;

/// Column with the strictly greatest weight; the first one wins a tie.
///
/// Scanning starts from a weight of 0, so a row where nothing scores above 0
/// elects column 0.
pub fn elect(weights: &[Option<u8>]) -> usize {
    let mut top = 0u8;
    let mut elected = 0;
    for (column, weight) in weights.iter().enumerate() {
        if let Some(weight) = *weight {
            if weight > top {
                top = weight;
                elected = column;
            }
        }
    }
    elected
}

pub fn elect_rows(weights: &WeightMatrix) -> Vec<usize> {
    weights.iter().map(|row| elect(row)).collect()
}
