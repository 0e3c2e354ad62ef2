use std::sync::Arc;

use crate::config::VulgateConfig;
use crate::error::VulgateError;
use crate::pipeline::defaults::{MyersVulgaligner, PatternTokenizer};
use crate::pipeline::runtime::{Vulgatizer, VulgatizerParts};
use crate::pipeline::traits::{Tokenizer, Vulgaligner};
use crate::tokenization::normalizer::{GenericNormalizer, Normalizer};
use crate::weighing::{FrequencyWeigher, TokenWeigher, ValidityWeigher};

pub struct VulgatizerBuilder {
    config: VulgateConfig,
    normalizer: Option<Arc<dyn Normalizer>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    vulgaligner: Option<Box<dyn Vulgaligner>>,
    weighers: Vec<(Arc<dyn TokenWeigher>, u32)>,
}

impl VulgatizerBuilder {
    pub fn new(config: VulgateConfig) -> Self {
        Self {
            config,
            normalizer: None,
            tokenizer: None,
            vulgaligner: None,
            weighers: Vec::new(),
        }
    }

    /// Normalizer of the default tokenizer and of the output text.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_vulgaligner(mut self, vulgaligner: Box<dyn Vulgaligner>) -> Self {
        self.vulgaligner = Some(vulgaligner);
        self
    }

    /// Adds a weigher on top of the configured ones.
    pub fn with_weigher(mut self, weigher: Arc<dyn TokenWeigher>, weight: u32) -> Self {
        self.weighers.push((weigher, weight));
        self
    }

    pub fn build(self) -> Result<Vulgatizer, VulgateError> {
        let config = self.config;
        config.validate()?;
        if self.weighers.iter().any(|(_, weight)| *weight == 0) {
            return Err(VulgateError::config("weigher weights must be positive"));
        }

        let normalizer = self
            .normalizer
            .unwrap_or_else(|| Arc::new(GenericNormalizer));
        let tokenizer: Box<dyn Tokenizer> = match self.tokenizer {
            Some(tokenizer) => tokenizer,
            None => Box::new(PatternTokenizer::new(
                &config.tokenizer,
                Arc::clone(&normalizer),
            )?),
        };

        let weighing = config.weighing;
        let mut weighers: Vec<(Arc<dyn TokenWeigher>, u32)> = Vec::new();
        if let Some(frequency) = &weighing.frequency {
            weighers.push((
                Arc::new(FrequencyWeigher::from_config(frequency)),
                frequency.weight,
            ));
        }
        if let Some(validity) = &weighing.validity {
            weighers.push((Arc::new(ValidityWeigher::from_config(validity)?), validity.weight));
        }
        weighers.extend(self.weighers);
        if weighers.is_empty() && weighing.confidence.is_none() {
            return Err(VulgateError::config("at least one weigher must be enabled"));
        }

        Ok(Vulgatizer::from_parts(VulgatizerParts {
            vocabulary: config.vocabulary,
            page_separator: config.page_separator,
            skip_identical_rows: weighing.skip_identical_rows,
            confidence: weighing.confidence,
            normalizer,
            tokenizer,
            vulgaligner: self
                .vulgaligner
                .unwrap_or_else(|| Box::new(MyersVulgaligner)),
            weighers,
        }))
    }
}
