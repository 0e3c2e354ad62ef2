use crate::error::VulgateError;
use crate::tokenization::filter::FilteredText;
use crate::tokenization::vocabulary::Vocabulary;
use crate::types::{AlignmentMatrix, PageSpan, TokenizedText};

pub trait Tokenizer: Send + Sync {
    fn tokenize(
        &self,
        input: &FilteredText<'_>,
        vocabulary: &mut Vocabulary,
    ) -> Result<TokenizedText, VulgateError>;
}

pub trait Vulgaligner: Send + Sync {
    /// Aligns the witnesses of one page; the first one is the base.
    fn align(&self, witnesses: &[&TokenizedText]) -> Result<AlignmentMatrix, VulgateError>;
}

/// One rendition of the text, split in base units (e.g. volumes) that are
/// themselves paginated.
pub trait Witness: Send + Sync {
    fn id(&self) -> &str;

    /// Unit ids in processing order.
    fn base_units(&self) -> Vec<String>;

    fn unit_text(&self, unit_id: &str) -> Option<&str>;

    /// Ordered pages of a unit; only read from the reference witness.
    fn pagination(&self, unit_id: &str) -> Option<Vec<PageSpan>>;

    /// `[start, end)` byte span of a page within the unit text.
    fn page_span(&self, unit_id: &str, page_id: &str) -> Option<(usize, usize)>;

    /// Unit of this witness holding the same text as `reference_unit` of the
    /// reference witness.
    fn comparable_unit(&self, reference_unit: &str) -> Option<String> {
        self.unit_text(reference_unit)
            .map(|_| reference_unit.to_string())
    }

    /// Lowest confidence (0..=100) reported over `[start, end)` of the unit
    /// text, if the witness carries any.
    fn confidence_in_range(&self, _unit_id: &str, _start: usize, _end: usize) -> Option<u8> {
        None
    }
}
