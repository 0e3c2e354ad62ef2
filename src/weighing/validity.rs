use regex::Regex;

use super::{mode_for, TokenWeigher, WeigherMode, CERTAIN};
use crate::config::ValidityConfig;
use crate::error::VulgateError;
use crate::types::Cell;

/// Weighs candidates against a well-formedness grammar of the content
/// language.
///
/// Text the grammar does not apply to (no character matching the
/// applicability pattern, e.g. punctuation or foreign script) and gaps get
/// their own configurable weights.
#[derive(Debug, Clone)]
pub struct ValidityWeigher {
    grammar: Regex,
    applicable: Regex,
    strip: Regex,
    invalid_weight: u8,
    non_applicable_weight: Option<u8>,
    gap_weight: Option<u8>,
    relative: bool,
}

impl ValidityWeigher {
    pub fn from_config(config: &ValidityConfig) -> Result<Self, VulgateError> {
        let grammar = Regex::new(&format!("^(?:{})$", config.grammar))
            .map_err(|e| VulgateError::pattern("validity grammar", e))?;
        let applicable = Regex::new(&config.applicable)
            .map_err(|e| VulgateError::pattern("validity applicability", e))?;
        let strip = Regex::new(&config.strip)
            .map_err(|e| VulgateError::pattern("validity strip characters", e))?;
        Ok(Self {
            grammar,
            applicable,
            strip,
            invalid_weight: config.invalid_weight,
            non_applicable_weight: config.non_applicable_weight,
            gap_weight: config.gap_weight,
            relative: config.relative,
        })
    }

    fn weigh_text(&self, text: &str) -> Option<u8> {
        if !self.applicable.is_match(text) {
            return self.non_applicable_weight;
        }
        let stripped = self.strip.replace_all(text, "");
        if self.grammar.is_match(&stripped) {
            Some(CERTAIN)
        } else {
            Some(self.invalid_weight)
        }
    }
}

impl TokenWeigher for ValidityWeigher {
    fn mode(&self) -> WeigherMode {
        mode_for(self.relative)
    }

    fn weigh(&self, row: &[Cell]) -> Option<Vec<Option<u8>>> {
        Some(
            row.iter()
                .map(|cell| match cell {
                    Some(token) => self.weigh_text(&token.text),
                    None => self.gap_weight,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;

    fn weigher() -> ValidityWeigher {
        let mut config = ValidityConfig::new("(?:[bcdfg][aeiou])+");
        config.non_applicable_weight = Some(90);
        config.gap_weight = Some(100);
        ValidityWeigher::from_config(&config).unwrap()
    }

    fn cell(text: &str) -> Cell {
        Some(Token::new(0, text.len(), 1, text))
    }

    #[test]
    fn grammar_must_match_the_whole_stripped_token() {
        let w = weigher();
        let row = vec![cell("bada "), cell("badx"), cell("xbada"), cell("ba\nda")];
        let weights = w.weigh(&row).unwrap();
        assert_eq!(weights, vec![Some(100), Some(70), Some(70), Some(100)]);
    }

    #[test]
    fn non_applicable_text_and_gaps() {
        let w = weigher();
        let row = vec![cell(", "), None, cell("12")];
        assert_eq!(w.weigh(&row).unwrap(), vec![Some(90), Some(100), Some(90)]);
        assert_eq!(w.mode(), WeigherMode::Relative);
    }

    #[test]
    fn bad_grammar_is_reported() {
        let config = ValidityConfig::new("(unclosed");
        let err = ValidityWeigher::from_config(&config).unwrap_err();
        assert!(matches!(err, VulgateError::Pattern { .. }));
    }
}
