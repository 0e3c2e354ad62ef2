use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::Level;

use crate::alignment::render::render_matrix;
use crate::config::{ConfidenceConfig, VocabularyConfig};
use crate::error::VulgateError;
use crate::pipeline::cursor::OutputCursor;
use crate::pipeline::traits::{Tokenizer, Vulgaligner, Witness};
use crate::tokenization::filter::{InputFilter, PositionFilter};
use crate::tokenization::normalizer::Normalizer;
use crate::tokenization::vocabulary::Vocabulary;
use crate::types::{Token, TokenizedText, VulgateUnit};
use crate::weighing::{
    elect_rows, ConfidenceSource, ConfidenceWeigher, MatrixWeigher, TokenWeigher,
};

/// Builds the consensus text of several witnesses, page by page.
pub struct Vulgatizer {
    vocabulary: VocabularyConfig,
    page_separator: String,
    skip_identical_rows: bool,
    confidence: Option<ConfidenceConfig>,
    normalizer: Arc<dyn Normalizer>,
    tokenizer: Box<dyn Tokenizer>,
    vulgaligner: Box<dyn Vulgaligner>,
    weighers: Vec<(Arc<dyn TokenWeigher>, u32)>,
}

pub(crate) struct VulgatizerParts {
    pub vocabulary: VocabularyConfig,
    pub page_separator: String,
    pub skip_identical_rows: bool,
    pub confidence: Option<ConfidenceConfig>,
    pub normalizer: Arc<dyn Normalizer>,
    pub tokenizer: Box<dyn Tokenizer>,
    pub vulgaligner: Box<dyn Vulgaligner>,
    pub weighers: Vec<(Arc<dyn TokenWeigher>, u32)>,
}

/// Page text of one witness taking part in a page alignment.
struct Segment<'w> {
    witness: &'w dyn Witness,
    unit_id: &'w str,
    text: &'w str,
    start: usize,
    end: usize,
}

/// Unit of a non-reference witness matched to the reference unit.
struct ComparableUnit<'w> {
    witness: &'w dyn Witness,
    unit_id: String,
    text: &'w str,
}

/// Confidence data of one witness unit seen through [`ConfidenceSource`].
struct WitnessConfidence<'w> {
    witness: &'w dyn Witness,
    unit_id: &'w str,
}

impl ConfidenceSource for WitnessConfidence<'_> {
    fn min_confidence(&self, start: usize, end: usize) -> Option<u8> {
        self.witness.confidence_in_range(self.unit_id, start, end)
    }
}

impl Vulgatizer {
    pub(crate) fn from_parts(parts: VulgatizerParts) -> Self {
        Self {
            vocabulary: parts.vocabulary,
            page_separator: parts.page_separator,
            skip_identical_rows: parts.skip_identical_rows,
            confidence: parts.confidence,
            normalizer: parts.normalizer,
            tokenizer: parts.tokenizer,
            vulgaligner: parts.vulgaligner,
            weighers: parts.weighers,
        }
    }

    /// Builds one consensus unit per base unit of the reference witness
    /// (`witnesses[0]`).
    ///
    /// A page that fails on its data is logged, left empty and listed in
    /// [`VulgateUnit::skipped_pages`]; an alignment invariant violation aborts
    /// the whole build.
    pub fn build_vulgate(
        &self,
        witnesses: &[&dyn Witness],
    ) -> Result<BTreeMap<String, VulgateUnit>, VulgateError> {
        let [reference, others @ ..] = witnesses else {
            return Err(VulgateError::config("no witness given"));
        };
        if others.is_empty() {
            return Err(VulgateError::config(format!(
                "cannot build a vulgate from the single witness {}",
                reference.id()
            )));
        }

        let mut vocabulary = Vocabulary::new(&self.vocabulary);
        let mut vulgate = BTreeMap::new();
        for unit_id in reference.base_units() {
            if let Some(unit) = self.build_unit(*reference, others, &unit_id, &mut vocabulary)? {
                vulgate.insert(unit_id, unit);
            }
        }
        Ok(vulgate)
    }

    fn build_unit(
        &self,
        reference: &dyn Witness,
        others: &[&dyn Witness],
        unit_id: &str,
        vocabulary: &mut Vocabulary,
    ) -> Result<Option<VulgateUnit>, VulgateError> {
        let (Some(pagination), Some(reference_text)) =
            (reference.pagination(unit_id), reference.unit_text(unit_id))
        else {
            tracing::warn!(
                witness = reference.id(),
                unit_id,
                "vulgatizer: reference unit has no pagination or text, skipping"
            );
            return Ok(None);
        };

        let comparable: Vec<ComparableUnit<'_>> = others
            .iter()
            .filter_map(|&witness| {
                let unit_id = witness.comparable_unit(unit_id)?;
                let text = witness.unit_text(&unit_id)?;
                Some(ComparableUnit {
                    witness,
                    unit_id,
                    text,
                })
            })
            .collect();

        let mut cursor = OutputCursor::new(self.page_separator.as_str());
        for page in &pagination {
            let mut segments = vec![Segment {
                witness: reference,
                unit_id,
                text: reference_text,
                start: page.start,
                end: page.end,
            }];
            segments.extend(
                comparable
                    .iter()
                    .filter_map(|unit| other_segment(unit, &page.page_id)),
            );

            match self.elect_page(&segments, vocabulary) {
                Ok(elected) => {
                    for (token, confidence) in &elected {
                        cursor.append_token(self.normalizer.as_ref(), token, *confidence);
                    }
                }
                Err(e) if e.is_page_local() => {
                    tracing::warn!(
                        unit_id,
                        page_id = page.page_id.as_str(),
                        error = %e,
                        "vulgatizer: page failed, skipping"
                    );
                    cursor.mark_skipped(&page.page_id);
                }
                Err(e) => return Err(e),
            }
            cursor.end_page(&page.page_id);
            vocabulary.reset();
        }

        let unit = cursor.into_unit();
        tracing::info!(
            unit_id,
            witnesses = comparable.len() + 1,
            pages = pagination.len() - unit.skipped_pages.len(),
            skipped = unit.skipped_pages.len(),
            output_bytes = unit.text.len(),
            "vulgatizer: unit done"
        );
        Ok(Some(unit))
    }

    /// Elected token of every non-gap row of one page, with the confidence
    /// its witness reports for it.
    fn elect_page(
        &self,
        segments: &[Segment<'_>],
        vocabulary: &mut Vocabulary,
    ) -> Result<Vec<(Token, Option<u8>)>, VulgateError> {
        let mut tokenized = Vec::with_capacity(segments.len());
        for segment in segments {
            let input =
                PositionFilter::new(segment.text, segment.start, Some(segment.end)).into_filtered()?;
            tokenized.push(self.tokenizer.tokenize(&input, vocabulary)?);
        }
        if tracing::enabled!(Level::DEBUG) && self.vocabulary.allow_decode {
            debug_encoded(segments, &tokenized, vocabulary);
        }

        let witnesses: Vec<&TokenizedText> = tokenized.iter().collect();
        let matrix = self.vulgaligner.align(&witnesses)?;
        if tracing::enabled!(Level::DEBUG) {
            tracing::debug!(
                rows = matrix.row_count(),
                gaps = matrix.gap_count(),
                "vulgatizer: alignment matrix\n{}",
                render_matrix(&matrix)
            );
        }

        let sources: Vec<WitnessConfidence<'_>> = segments
            .iter()
            .map(|s| WitnessConfidence {
                witness: s.witness,
                unit_id: s.unit_id,
            })
            .collect();
        let mut weigher = MatrixWeigher::new(self.skip_identical_rows);
        for (token_weigher, weight) in &self.weighers {
            weigher.add_weigher(Box::new(Arc::clone(token_weigher)), *weight);
        }
        if let Some(config) = &self.confidence {
            let columns = sources
                .iter()
                .map(|s| Some(s as &dyn ConfidenceSource))
                .collect();
            weigher.add_weigher(Box::new(ConfidenceWeigher::new(columns, config)), config.weight);
        }

        let weights = weigher.weigh_matrix(&matrix);
        let mut elected = Vec::new();
        for (row, column) in matrix.rows().iter().zip(elect_rows(&weights)) {
            if column != 0 && tracing::enabled!(Level::DEBUG) {
                let candidates: Vec<Option<&str>> = row
                    .iter()
                    .map(|c| c.as_ref().map(|t| t.text.as_str()))
                    .collect();
                tracing::debug!(
                    column,
                    witness = segments[column].witness.id(),
                    candidates = ?candidates,
                    "vulgatizer: elected a non-base reading"
                );
            }
            // an elected gap means the slot is most likely empty
            let Some(token) = &row[column] else {
                continue;
            };
            let confidence = sources[column].min_confidence(token.start, token.end);
            elected.push((token.clone(), confidence));
        }
        Ok(elected)
    }
}

/// Page segment of a non-reference witness, or `None` when the witness has
/// no usable span for that page.
fn other_segment<'w>(unit: &'w ComparableUnit<'w>, page_id: &str) -> Option<Segment<'w>> {
    let (start, end) = unit.witness.page_span(&unit.unit_id, page_id)?;
    let text = unit.text;
    if start > end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end)
    {
        tracing::debug!(
            witness = unit.witness.id(),
            unit_id = unit.unit_id.as_str(),
            page_id,
            start,
            end,
            "vulgatizer: invalid page span, witness left out of the page"
        );
        return None;
    }
    Some(Segment {
        witness: unit.witness,
        unit_id: &unit.unit_id,
        text,
        start,
        end,
    })
}

fn debug_encoded(segments: &[Segment<'_>], tokenized: &[TokenizedText], vocabulary: &Vocabulary) {
    for (segment, text) in segments.iter().zip(tokenized) {
        match vocabulary.decode_units(&text.encoded, "|") {
            Ok(decoded) => tracing::debug!(
                witness = segment.witness.id(),
                tokens = text.tokens.len(),
                "vulgatizer: encoded {decoded}"
            ),
            Err(e) => tracing::debug!(
                witness = segment.witness.id(),
                error = %e,
                "vulgatizer: cannot decode encoded text"
            ),
        }
    }
}
