use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::alignment::vulgaligner::build_alignment_matrix;
use crate::config::TokenizerConfig;
use crate::error::VulgateError;
use crate::pipeline::traits::{Tokenizer, Vulgaligner};
use crate::tokenization::filter::FilteredText;
use crate::tokenization::normalizer::Normalizer;
use crate::tokenization::tokenizer::tokenize_pattern;
use crate::tokenization::vocabulary::Vocabulary;
use crate::types::{AlignmentMatrix, TokenizedText};

/// Regex-driven tokenizer: every match of the token pattern is one token.
pub struct PatternTokenizer {
    pattern: Regex,
    stop_words: HashSet<String>,
    normalizer: Arc<dyn Normalizer>,
}

impl PatternTokenizer {
    pub fn new(
        config: &TokenizerConfig,
        normalizer: Arc<dyn Normalizer>,
    ) -> Result<Self, VulgateError> {
        let pattern = Regex::new(&config.token_pattern)
            .map_err(|e| VulgateError::pattern("token pattern", e))?;
        // stop words are matched against the comparison form of tokens
        let stop_words = config
            .stop_words
            .iter()
            .map(|w| normalizer.normalize_pre_comparison(w).into_owned())
            .collect();
        Ok(Self {
            pattern,
            stop_words,
            normalizer,
        })
    }
}

impl Tokenizer for PatternTokenizer {
    fn tokenize(
        &self,
        input: &FilteredText<'_>,
        vocabulary: &mut Vocabulary,
    ) -> Result<TokenizedText, VulgateError> {
        tokenize_pattern(
            input,
            &self.pattern,
            &self.stop_words,
            self.normalizer.as_ref(),
            vocabulary,
        )
    }
}

pub struct MyersVulgaligner;

impl Vulgaligner for MyersVulgaligner {
    fn align(&self, witnesses: &[&TokenizedText]) -> Result<AlignmentMatrix, VulgateError> {
        build_alignment_matrix(witnesses)
    }
}
