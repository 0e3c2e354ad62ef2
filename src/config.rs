use std::path::Path;

use serde::Deserialize;

use crate::error::VulgateError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VulgateConfig {
    pub vocabulary: VocabularyConfig,
    pub tokenizer: TokenizerConfig,
    pub weighing: WeighingConfig,
    /// Marker appended after every page of a unit.
    pub page_separator: String,
}

impl Default for VulgateConfig {
    fn default() -> Self {
        Self {
            vocabulary: VocabularyConfig::default(),
            tokenizer: TokenizerConfig::default(),
            weighing: WeighingConfig::default(),
            page_separator: "\n\n".to_string(),
        }
    }
}

impl VulgateConfig {
    pub fn load(path: &Path) -> Result<Self, VulgateError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| VulgateError::io("read vulgate config", e))?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, VulgateError> {
        let config: Self = serde_json::from_str(data)
            .map_err(|e| VulgateError::json("parse vulgate config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VulgateError> {
        if self.vocabulary.shift > VocabularyConfig::MAX_SHIFT {
            return Err(VulgateError::config(format!(
                "vocabulary shift {} leaves no room for codes (max {})",
                self.vocabulary.shift,
                VocabularyConfig::MAX_SHIFT
            )));
        }
        if self.tokenizer.token_pattern.is_empty() {
            return Err(VulgateError::config("token pattern must not be empty"));
        }
        let w = &self.weighing;
        let weights = [
            w.frequency.as_ref().map(|f| f.weight),
            w.validity.as_ref().map(|v| v.weight),
            w.confidence.as_ref().map(|c| c.weight),
        ];
        if weights.iter().flatten().any(|&weight| weight == 0) {
            return Err(VulgateError::config("weigher weights must be positive"));
        }
        for (name, value) in [
            ("validity.invalid_weight", w.validity.as_ref().map(|v| v.invalid_weight)),
            (
                "validity.non_applicable_weight",
                w.validity.as_ref().and_then(|v| v.non_applicable_weight),
            ),
            ("validity.gap_weight", w.validity.as_ref().and_then(|v| v.gap_weight)),
            ("confidence.gap_weight", w.confidence.as_ref().and_then(|c| c.gap_weight)),
        ] {
            if value.is_some_and(|v| v > 100) {
                return Err(VulgateError::config(format!("{name} must be within 0..=100")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_shift")]
    pub shift: u16,
    #[serde(default = "default_true")]
    pub split_wide_codes: bool,
    #[serde(default)]
    pub allow_decode: bool,
    #[serde(default)]
    pub track_frequencies: bool,
}

impl VocabularyConfig {
    pub const DEFAULT_SHIFT: u16 = 32;
    /// Highest shift that still leaves single-unit codes after the reserved ranges.
    pub const MAX_SHIFT: u16 = u16::MAX - 32;
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            shift: Self::DEFAULT_SHIFT,
            split_wide_codes: true,
            allow_decode: false,
            track_frequencies: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

impl TokenizerConfig {
    pub const DEFAULT_TOKEN_PATTERN: &'static str = r"\w+\s*|\W+";
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            token_pattern: default_token_pattern(),
            stop_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeighingConfig {
    #[serde(default = "default_true")]
    pub skip_identical_rows: bool,
    #[serde(default = "default_frequency")]
    pub frequency: Option<FrequencyConfig>,
    #[serde(default)]
    pub validity: Option<ValidityConfig>,
    #[serde(default = "default_confidence")]
    pub confidence: Option<ConfidenceConfig>,
}

impl Default for WeighingConfig {
    fn default() -> Self {
        Self {
            skip_identical_rows: true,
            frequency: default_frequency(),
            validity: None,
            confidence: default_confidence(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrequencyConfig {
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub count_gaps: bool,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            weight: 1,
            count_gaps: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidityConfig {
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Well-formedness grammar; matched against the whole stripped candidate.
    pub grammar: String,
    #[serde(default = "default_applicable")]
    pub applicable: String,
    #[serde(default = "default_strip")]
    pub strip: String,
    #[serde(default = "default_invalid_weight")]
    pub invalid_weight: u8,
    #[serde(default)]
    pub non_applicable_weight: Option<u8>,
    #[serde(default)]
    pub gap_weight: Option<u8>,
    #[serde(default = "default_true")]
    pub relative: bool,
}

impl ValidityConfig {
    pub fn new(grammar: impl Into<String>) -> Self {
        Self {
            weight: 1,
            grammar: grammar.into(),
            applicable: default_applicable(),
            strip: default_strip(),
            invalid_weight: default_invalid_weight(),
            non_applicable_weight: None,
            gap_weight: None,
            relative: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfidenceConfig {
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub gap_weight: Option<u8>,
    #[serde(default)]
    pub relative: bool,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            weight: 1,
            gap_weight: None,
            relative: false,
        }
    }
}

fn default_shift() -> u16 {
    VocabularyConfig::DEFAULT_SHIFT
}
fn default_true() -> bool {
    true
}
fn default_token_pattern() -> String {
    TokenizerConfig::DEFAULT_TOKEN_PATTERN.to_string()
}
fn default_weight() -> u32 {
    1
}
fn default_frequency() -> Option<FrequencyConfig> {
    Some(FrequencyConfig::default())
}
fn default_confidence() -> Option<ConfidenceConfig> {
    Some(ConfidenceConfig::default())
}
fn default_applicable() -> String {
    r"\p{L}".to_string()
}
fn default_strip() -> String {
    r"\s".to_string()
}
fn default_invalid_weight() -> u8 {
    70
}
