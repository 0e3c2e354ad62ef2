//! Filtered views of a witness text that can map any position of the view
//! back to a byte offset of the original text.
//!
//! A filter wraps either a raw string or another filter and is consumed when
//! its text is produced, so a chain never holds more than one copy of the
//! transformed text:
//!
//! ```
//! use vulgate::tokenization::filter::{InputFilter, PatternFilter, PositionFilter};
//! use regex::Regex;
//!
//! let text = "aaXbbcc";
//! let view = PositionFilter::new(text, 2, None);
//! let view = PatternFilter::literal(view, Regex::new("bc").unwrap(), "d");
//! let filtered = view.into_filtered().unwrap();
//! assert_eq!(filtered.text(), "Xbdc");
//! assert_eq!(filtered.correct_position(3), 6);
//! ```

mod pattern;
mod position;

use std::borrow::Cow;

pub use pattern::{PatternFilter, Replacement};
pub use position::PositionFilter;

use crate::error::VulgateError;

/// A source that can be turned, once, into filtered text.
pub trait InputFilter<'a> {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError>;
}

/// Breakpoints of one filter layer: from `positions[i]` on (in the layer's
/// output), positions are shifted by `diffs[i]` to reach the layer's input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetTable {
    positions: Vec<usize>,
    diffs: Vec<isize>,
}

impl OffsetTable {
    pub(crate) fn constant(offset: usize) -> Self {
        Self {
            positions: vec![0],
            diffs: vec![offset as isize],
        }
    }

    /// Records a cumulative diff starting at `position`.
    ///
    /// Positions never go backwards; an equal position overwrites the last
    /// diff and a diff equal to the last one is not recorded again.
    pub(crate) fn push(&mut self, position: usize, diff: isize) {
        match self.positions.last() {
            Some(&last) if last == position => {
                if let Some(d) = self.diffs.last_mut() {
                    *d = diff;
                }
            }
            Some(_) if self.diffs.last() == Some(&diff) => {}
            None if diff == 0 => {}
            _ => {
                debug_assert!(self.positions.last().map_or(true, |&last| position > last));
                self.positions.push(position);
                self.diffs.push(diff);
            }
        }
    }

    pub fn correct(&self, position: usize) -> usize {
        let idx = self.positions.partition_point(|&p| p <= position);
        if idx == 0 {
            return position;
        }
        (position as isize + self.diffs[idx - 1]).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

/// Offset tables of every layer of a filter chain, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    layers: Vec<OffsetTable>,
}

impl PositionMap {
    pub(crate) fn push_layer(&mut self, table: OffsetTable) {
        if !table.is_empty() {
            self.layers.push(table);
        }
    }

    pub fn correct_position(&self, position: usize) -> usize {
        self.layers
            .iter()
            .rev()
            .fold(position, |pos, layer| layer.correct(pos))
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

/// Text produced by a filter chain together with its position map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredText<'a> {
    text: Cow<'a, str>,
    map: PositionMap,
}

impl<'a> FilteredText<'a> {
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            text: text.into(),
            map: PositionMap::default(),
        }
    }

    pub(crate) fn with_layer(text: Cow<'a, str>, mut map: PositionMap, table: OffsetTable) -> Self {
        map.push_layer(table);
        Self { text, map }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maps a byte offset of the filtered text to the original text.
    pub fn correct_position(&self, position: usize) -> usize {
        self.map.correct_position(position)
    }

    pub fn position_map(&self) -> &PositionMap {
        &self.map
    }

    pub fn into_parts(self) -> (Cow<'a, str>, PositionMap) {
        (self.text, self.map)
    }
}

impl<'a> InputFilter<'a> for FilteredText<'a> {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        Ok(self)
    }
}

impl<'a> InputFilter<'a> for &'a str {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        Ok(FilteredText::raw(self))
    }
}

impl<'a> InputFilter<'a> for &'a String {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        Ok(FilteredText::raw(self.as_str()))
    }
}

impl<'a> InputFilter<'a> for String {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        Ok(FilteredText::raw(self))
    }
}

impl<'a> InputFilter<'a> for Cow<'a, str> {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        Ok(FilteredText::raw(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use regex::Regex;

    #[test]
    fn offset_table_overwrites_and_compresses() {
        let mut table = OffsetTable::default();
        table.push(0, 0);
        assert!(table.is_empty());
        table.push(3, -1);
        table.push(4, -2);
        table.push(5, -2);
        assert_eq!(table.len(), 2);
        table.push(4, -3);
        assert_eq!(table.len(), 2);
        assert_eq!(table.correct(2), 2);
        assert_eq!(table.correct(3), 2);
        assert_eq!(table.correct(9), 6);
    }

    #[test]
    fn raw_sources_are_borrowed_without_layers() {
        let filtered = "plain".into_filtered().unwrap();
        assert!(matches!(filtered.text, Cow::Borrowed(_)));
        assert_eq!(filtered.position_map().depth(), 0);
        assert_eq!(filtered.correct_position(4), 4);

        let owned = String::from("owned").into_filtered().unwrap();
        assert_eq!(owned.text(), "owned");
    }

    fn random_text(rng: &mut StdRng, len: usize) -> String {
        (0..len)
            .map(|_| ['a', 'b', 'c'][rng.gen_range(0..3)])
            .collect()
    }

    #[test]
    fn untouched_characters_map_back_to_themselves() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let patterns = [
            (Regex::new("bc").unwrap(), "x"),
            (Regex::new("a+").unwrap(), "yyy"),
            (Regex::new("cab").unwrap(), ""),
            (Regex::new("b").unwrap(), "zz"),
        ];
        for _ in 0..200 {
            let len = rng.gen_range(0..40);
            let original = random_text(&mut rng, len);
            let start = rng.gen_range(0..=original.len());
            let end = rng.gen_range(start..=original.len());
            let first = &patterns[rng.gen_range(0..patterns.len())];
            let second = &patterns[rng.gen_range(0..patterns.len())];

            let view = PositionFilter::new(original.as_str(), start, Some(end));
            let view = PatternFilter::literal(view, first.0.clone(), first.1);
            let view = PatternFilter::literal(view, second.0.clone(), second.1);
            let filtered = view.into_filtered().unwrap();

            let out = filtered.text().as_bytes();
            let mut previous = 0;
            for (pos, &byte) in out.iter().enumerate() {
                let corrected = filtered.correct_position(pos);
                assert!(corrected >= previous, "{original:?} -> {:?}", filtered.text());
                assert!(corrected <= original.len());
                previous = corrected;
                if matches!(byte, b'a' | b'b' | b'c') {
                    assert_eq!(
                        original.as_bytes()[corrected],
                        byte,
                        "{original:?} -> {:?} at {pos}",
                        filtered.text()
                    );
                }
            }
            assert!(filtered.correct_position(out.len()) <= end);
        }
    }
}
