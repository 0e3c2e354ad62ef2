use crate::tokenization::normalizer::Normalizer;
use crate::types::{ConfidenceAnnotation, PageAnnotation, Token, VulgateUnit};

/// Append-only consensus output of one base unit.
#[derive(Debug)]
pub struct OutputCursor {
    unit: VulgateUnit,
    page_start: usize,
    separator: String,
}

impl OutputCursor {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            unit: VulgateUnit::default(),
            page_start: 0,
            separator: separator.into(),
        }
    }

    /// Byte length of the text written so far.
    pub fn position(&self) -> usize {
        self.unit.text.len()
    }

    pub fn append_token(
        &mut self,
        normalizer: &dyn Normalizer,
        token: &Token,
        confidence: Option<u8>,
    ) {
        if token.text.is_empty() {
            return;
        }
        let start = self.position();
        normalizer.append_token_text(&mut self.unit.text, &token.text);
        let end = self.position();
        if let Some(confidence) = confidence {
            if end > start {
                self.unit.confidences.push(ConfidenceAnnotation {
                    start,
                    end,
                    confidence,
                });
            }
        }
    }

    /// Records the page span written since the previous page and appends
    /// the page separator.
    pub fn end_page(&mut self, page_id: &str) {
        self.unit.pages.push(PageAnnotation {
            page_id: page_id.to_string(),
            start: self.page_start,
            end: self.position(),
        });
        self.unit.text.push_str(&self.separator);
        self.page_start = self.position();
    }

    pub fn mark_skipped(&mut self, page_id: &str) {
        self.unit.skipped_pages.push(page_id.to_string());
    }

    pub fn into_unit(self) -> VulgateUnit {
        self.unit
    }
}
