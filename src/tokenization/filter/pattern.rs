use std::borrow::Cow;

use regex::Regex;

use super::{FilteredText, InputFilter, OffsetTable};
use crate::error::VulgateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Inserted as is.
    Literal(String),
    /// Expanded per match with [`regex::Captures::expand`] (`$1`, `${name}`).
    Template(String),
}

/// Replaces every non-overlapping match of a pattern in its source.
///
/// When a replacement is longer than its match, the extra output positions
/// all map back to the start of the last character of the match instead of
/// being interpolated. For a multi-byte last character this starts at the
/// output position of its second byte, which keeps corrections monotonic.
#[derive(Debug, Clone)]
pub struct PatternFilter<S> {
    source: S,
    pattern: Regex,
    replacement: Replacement,
}

impl<S> PatternFilter<S> {
    pub fn new(source: S, pattern: Regex, replacement: Replacement) -> Self {
        Self {
            source,
            pattern,
            replacement,
        }
    }

    pub fn literal(source: S, pattern: Regex, replacement: impl Into<String>) -> Self {
        Self::new(source, pattern, Replacement::Literal(replacement.into()))
    }

    pub fn template(source: S, pattern: Regex, template: impl Into<String>) -> Self {
        Self::new(source, pattern, Replacement::Template(template.into()))
    }
}

fn record_replacement(
    table: &mut OffsetTable,
    original: &str,
    matched: regex::Match<'_>,
    out_start: usize,
    replacement_len: usize,
) {
    let group_len = matched.len();
    let after = out_start + replacement_len;
    let resume_diff = matched.end() as isize - after as isize;
    if replacement_len < group_len {
        table.push(after, resume_diff);
    } else if replacement_len > group_len {
        let target = original[matched.start()..matched.end()]
            .char_indices()
            .next_back()
            .map_or(matched.start(), |(i, _)| matched.start() + i);
        for p in out_start + (target - matched.start()) + 1..after {
            table.push(p, target as isize - p as isize);
        }
        table.push(after, resume_diff);
    }
}

impl<'a, S: InputFilter<'a>> InputFilter<'a> for PatternFilter<S> {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        let (text, map) = self.source.into_filtered()?.into_parts();
        let mut table = OffsetTable::default();
        let mut out = String::with_capacity(text.len());
        let mut expanded = String::new();
        let mut last_end = 0;
        let mut matched_any = false;

        for caps in self.pattern.captures_iter(&text) {
            let Some(m) = caps.get(0) else { continue };
            let replacement: &str = match &self.replacement {
                Replacement::Literal(literal) => literal,
                Replacement::Template(template) => {
                    expanded.clear();
                    caps.expand(template, &mut expanded);
                    &expanded
                }
            };
            out.push_str(&text[last_end..m.start()]);
            record_replacement(&mut table, &text, m, out.len(), replacement.len());
            out.push_str(replacement);
            last_end = m.end();
            matched_any = true;
        }

        if !matched_any {
            return Ok(FilteredText { text, map });
        }
        out.push_str(&text[last_end..]);
        Ok(FilteredText::with_layer(Cow::Owned(out), map, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenization::filter::PositionFilter;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn corrections(filtered: &FilteredText<'_>) -> Vec<usize> {
        (0..=filtered.text().len())
            .map(|p| filtered.correct_position(p))
            .collect()
    }

    #[test]
    fn shorter_replacement_shifts_following_positions() {
        let filtered = PatternFilter::literal("bbcc", re("bc"), "d")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), "bdc");
        assert_eq!(corrections(&filtered), vec![0, 1, 3, 4]);
    }

    #[test]
    fn longer_replacement_maps_extra_positions_to_last_matched_char() {
        let filtered = PatternFilter::literal("bbcc", re("bc"), "dddd")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), "bddddc");
        assert_eq!(corrections(&filtered), vec![0, 1, 2, 2, 2, 3, 4]);
    }

    #[test]
    fn template_replacement_uses_captures() {
        let filtered = PatternFilter::template("bbcc", re("(b)bc(c)"), "${2}d${1}")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), "cdb");
        assert_eq!(corrections(&filtered), vec![0, 1, 2, 4]);
    }

    #[test]
    fn chained_pattern_filters() {
        let view = PatternFilter::literal("bbbcc", re("[ab]c"), "d");
        let filtered = PatternFilter::literal(view, re("bd"), "efgh")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), "befghc");
        assert_eq!(corrections(&filtered), vec![0, 1, 2, 2, 2, 4, 5]);
    }

    #[test]
    fn empty_match_insertion() {
        let filtered = PatternFilter::literal("ab", re("^"), ">>")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), ">>ab");
        assert_eq!(corrections(&filtered), vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn no_match_keeps_source_and_map() {
        let view = PositionFilter::new("xxabc", 2, None);
        let filtered = PatternFilter::literal(view, re("z"), "y")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), "abc");
        assert_eq!(filtered.position_map().depth(), 1);
        assert_eq!(filtered.correct_position(1), 3);
    }

    #[test]
    fn multibyte_replacement_targets_char_start() {
        // "é" is two bytes; everything past its first byte maps back onto it
        let filtered = PatternFilter::literal("aéb", re("é"), "eee")
            .into_filtered()
            .unwrap();
        assert_eq!(filtered.text(), "aeeeb");
        assert_eq!(corrections(&filtered), vec![0, 1, 1, 1, 3, 4]);
    }
}
