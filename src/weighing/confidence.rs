use super::{mode_for, TokenWeigher, WeigherMode, CERTAIN};
use crate::config::ConfidenceConfig;
use crate::types::Cell;

/// Externally supplied per-range confidence of one witness.
pub trait ConfidenceSource: Send + Sync {
    /// Lowest confidence (0..=100) of the ranges overlapping `[start, end)`,
    /// or `None` when no data covers it.
    fn min_confidence(&self, start: usize, end: usize) -> Option<u8>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConfidenceRange {
    start: usize,
    end: usize,
    confidence: u8,
}

/// Interval index over confidence ranges.
///
/// Ranges are sorted by start; `max_end[i]` is the furthest end among the
/// first `i + 1` ranges, which bounds the backwards scan of a query.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceIndex {
    ranges: Vec<ConfidenceRange>,
    max_end: Vec<usize>,
}

impl ConfidenceIndex {
    pub fn new(ranges: impl IntoIterator<Item = (usize, usize, u8)>) -> Self {
        let mut ranges: Vec<ConfidenceRange> = ranges
            .into_iter()
            .filter(|&(start, end, _)| end > start)
            .map(|(start, end, confidence)| ConfidenceRange {
                start,
                end,
                confidence: confidence.min(CERTAIN),
            })
            .collect();
        ranges.sort_by_key(|r| (r.start, r.end));
        let max_end = ranges
            .iter()
            .scan(0usize, |furthest, r| {
                *furthest = (*furthest).max(r.end);
                Some(*furthest)
            })
            .collect();
        Self { ranges, max_end }
    }

    /// Builds the index from confidences expressed as fractions in `0.0..=1.0`.
    pub fn from_fractions(ranges: impl IntoIterator<Item = (usize, usize, f32)>) -> Self {
        Self::new(
            ranges
                .into_iter()
                .map(|(start, end, c)| (start, end, (c.clamp(0.0, 1.0) * 100.0) as u8)),
        )
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl ConfidenceSource for ConfidenceIndex {
    fn min_confidence(&self, start: usize, end: usize) -> Option<u8> {
        // a zero-width query still looks at the range containing its position
        let end = end.max(start + 1);
        let candidates = self.ranges.partition_point(|r| r.start < end);
        let mut lowest: Option<u8> = None;
        for i in (0..candidates).rev() {
            if self.max_end[i] <= start {
                break;
            }
            let range = &self.ranges[i];
            if range.end > start {
                lowest = Some(lowest.map_or(range.confidence, |l| l.min(range.confidence)));
            }
        }
        lowest
    }
}

/// Weighs each candidate by the lowest confidence its witness reports over
/// the token's source span; full confidence when nothing is reported.
pub struct ConfidenceWeigher<'a> {
    /// One source per matrix column.
    sources: Vec<Option<&'a dyn ConfidenceSource>>,
    gap_weight: Option<u8>,
    relative: bool,
}

impl<'a> ConfidenceWeigher<'a> {
    pub fn new(sources: Vec<Option<&'a dyn ConfidenceSource>>, config: &ConfidenceConfig) -> Self {
        Self {
            sources,
            gap_weight: config.gap_weight,
            relative: config.relative,
        }
    }
}

impl TokenWeigher for ConfidenceWeigher<'_> {
    fn mode(&self) -> WeigherMode {
        mode_for(self.relative)
    }

    fn weigh(&self, row: &[Cell]) -> Option<Vec<Option<u8>>> {
        Some(
            row.iter()
                .enumerate()
                .map(|(column, cell)| match cell {
                    None => self.gap_weight,
                    Some(token) => Some(
                        self.sources
                            .get(column)
                            .copied()
                            .flatten()
                            .and_then(|s| s.min_confidence(token.start, token.end))
                            .unwrap_or(CERTAIN),
                    ),
                })
                .collect(),
        )
    }
}
