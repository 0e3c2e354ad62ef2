use std::borrow::Cow;

use super::{FilteredText, InputFilter, OffsetTable};
use crate::error::VulgateError;

/// Extracts the `[start, end)` byte range of its source.
#[derive(Debug, Clone)]
pub struct PositionFilter<S> {
    source: S,
    start: usize,
    end: Option<usize>,
}

impl<S> PositionFilter<S> {
    /// `end = None` keeps everything after `start`.
    pub fn new(source: S, start: usize, end: Option<usize>) -> Self {
        Self { source, start, end }
    }
}

impl<'a, S: InputFilter<'a>> InputFilter<'a> for PositionFilter<S> {
    fn into_filtered(self) -> Result<FilteredText<'a>, VulgateError> {
        let (text, map) = self.source.into_filtered()?.into_parts();
        let len = text.len();
        let end = self.end.unwrap_or(len);
        if self.start > end
            || end > len
            || !text.is_char_boundary(self.start)
            || !text.is_char_boundary(end)
        {
            return Err(VulgateError::InvalidSpan {
                start: self.start,
                end,
                len,
            });
        }
        let text = match text {
            Cow::Borrowed(s) => Cow::Borrowed(&s[self.start..end]),
            Cow::Owned(s) => Cow::Owned(s[self.start..end].to_string()),
        };
        Ok(FilteredText::with_layer(
            text,
            map,
            OffsetTable::constant(self.start),
        ))
    }
}
