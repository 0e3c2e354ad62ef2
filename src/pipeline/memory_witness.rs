use crate::pipeline::traits::Witness;
use crate::types::PageSpan;
use crate::weighing::confidence::{ConfidenceIndex, ConfidenceSource};

#[derive(Debug, Clone)]
struct MemoryUnit {
    id: String,
    text: String,
    pages: Vec<PageSpan>,
    confidence: ConfidenceIndex,
}

/// Witness held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryWitness {
    id: String,
    units: Vec<MemoryUnit>,
}

impl MemoryWitness {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            units: Vec::new(),
        }
    }

    /// Adds (or replaces) a unit with explicit page spans.
    pub fn with_unit(
        mut self,
        unit_id: impl Into<String>,
        text: impl Into<String>,
        pages: Vec<PageSpan>,
    ) -> Self {
        let unit = MemoryUnit {
            id: unit_id.into(),
            text: text.into(),
            pages,
            confidence: ConfidenceIndex::default(),
        };
        match self.units.iter_mut().find(|u| u.id == unit.id) {
            Some(existing) => *existing = unit,
            None => self.units.push(unit),
        }
        self
    }

    /// Adds a unit made of the given pages joined by `"\n"`.
    pub fn with_pages<'p>(
        self,
        unit_id: impl Into<String>,
        pages: impl IntoIterator<Item = (&'p str, &'p str)>,
    ) -> Self {
        let mut text = String::new();
        let mut spans = Vec::new();
        for (page_id, page_text) in pages {
            if !text.is_empty() {
                text.push('\n');
            }
            let start = text.len();
            text.push_str(page_text);
            spans.push(PageSpan {
                page_id: page_id.to_string(),
                start,
                end: text.len(),
            });
        }
        self.with_unit(unit_id, text, spans)
    }

    /// Attaches `(start, end, confidence)` ranges to a unit added before.
    pub fn with_confidences(
        mut self,
        unit_id: &str,
        ranges: impl IntoIterator<Item = (usize, usize, u8)>,
    ) -> Self {
        if let Some(unit) = self.units.iter_mut().find(|u| u.id == unit_id) {
            unit.confidence = ConfidenceIndex::new(ranges);
        }
        self
    }

    fn unit(&self, unit_id: &str) -> Option<&MemoryUnit> {
        self.units.iter().find(|u| u.id == unit_id)
    }
}

impl Witness for MemoryWitness {
    fn id(&self) -> &str {
        &self.id
    }

    fn base_units(&self) -> Vec<String> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    fn unit_text(&self, unit_id: &str) -> Option<&str> {
        self.unit(unit_id).map(|u| u.text.as_str())
    }

    fn pagination(&self, unit_id: &str) -> Option<Vec<PageSpan>> {
        self.unit(unit_id)
            .filter(|u| !u.pages.is_empty())
            .map(|u| u.pages.clone())
    }

    fn page_span(&self, unit_id: &str, page_id: &str) -> Option<(usize, usize)> {
        self.unit(unit_id)?
            .pages
            .iter()
            .find(|p| p.page_id == page_id)
            .map(|p| (p.start, p.end))
    }

    fn confidence_in_range(&self, unit_id: &str, start: usize, end: usize) -> Option<u8> {
        self.unit(unit_id)?.confidence.min_confidence(start, end)
    }
}
