use std::collections::HashSet;

use regex::Regex;

use crate::error::VulgateError;
use crate::tokenization::filter::FilteredText;
use crate::tokenization::normalizer::Normalizer;
use crate::tokenization::vocabulary::Vocabulary;
use crate::types::{Token, TokenizedText};

/// Splits `input` on every match of `pattern` and encodes the tokens.
///
/// Token offsets are corrected back to the original text. A token is
/// ignorable (increment 0) when its surface text is empty, when its
/// comparison form is a stop word, or when nothing is left of it after
/// diff normalization; ignorable tokens stay in the list but are not encoded.
/// Text that no match covers becomes an ignorable token of its own, so the
/// tokens always span the whole input.
pub fn tokenize_pattern(
    input: &FilteredText<'_>,
    pattern: &Regex,
    stop_words: &HashSet<String>,
    normalizer: &dyn Normalizer,
    vocabulary: &mut Vocabulary,
) -> Result<TokenizedText, VulgateError> {
    let text = input.text();
    let mut out = TokenizedText::default();
    let mut covered = 0;
    for m in pattern.find_iter(text) {
        if m.start() > covered {
            push_uncovered(&mut out, input, normalizer, covered, m.start());
        }
        covered = m.end();

        let surface = normalizer.normalize_always(m.as_str());
        let start = input.correct_position(m.start());
        let end = input.correct_position(m.end());

        let compared = normalizer.normalize_pre_comparison(&surface);
        let diffed = normalizer.normalize_pre_diff(&surface);
        // whitespace-only tokens trim to nothing and are ignorable as well
        if surface.is_empty() || diffed.is_empty() || stop_words.contains(compared.as_ref()) {
            out.tokens.push(Token::new(start, end, 0, surface));
            continue;
        }

        let (fragment, consumed) = vocabulary.encode_str(&diffed)?;
        out.encoded.extend_from_slice(fragment.units());
        out.tokens.push(Token::new(start, end, consumed as u8, surface));
    }
    if covered < text.len() {
        push_uncovered(&mut out, input, normalizer, covered, text.len());
    }
    Ok(out)
}

fn push_uncovered(
    out: &mut TokenizedText,
    input: &FilteredText<'_>,
    normalizer: &dyn Normalizer,
    from: usize,
    to: usize,
) {
    let surface = normalizer.normalize_always(&input.text()[from..to]);
    out.tokens.push(Token::new(
        input.correct_position(from),
        input.correct_position(to),
        0,
        surface,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TokenizerConfig, VocabularyConfig};
    use crate::tokenization::filter::{InputFilter, PatternFilter, PositionFilter};
    use crate::tokenization::normalizer::GenericNormalizer;

    fn word_pattern() -> Regex {
        Regex::new(TokenizerConfig::DEFAULT_TOKEN_PATTERN).unwrap()
    }

    fn tokenize(text: &str, stop_words: &[&str], vocabulary: &mut Vocabulary) -> TokenizedText {
        let stop: HashSet<String> = stop_words.iter().map(|s| s.to_string()).collect();
        let input = text.into_filtered().unwrap();
        tokenize_pattern(&input, &word_pattern(), &stop, &GenericNormalizer, vocabulary).unwrap()
    }

    fn texts(tokenized: &TokenizedText) -> Vec<&str> {
        tokenized.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn words_keep_their_trailing_separator() {
        let mut vocab = Vocabulary::default();
        let out = tokenize("Hello, wide  world.", &[], &mut vocab);
        assert_eq!(texts(&out), vec!["Hello", ", ", "wide  ", "world", "."]);
        assert_eq!(out.tokens[2], Token::new(7, 13, 1, "wide  "));
        assert_eq!(out.encoded.len(), 5);
        out.check_increments().unwrap();
    }

    #[test]
    fn case_and_trailing_space_share_a_code() {
        let mut vocab = Vocabulary::default();
        let out = tokenize("The dog the", &[], &mut vocab);
        assert_eq!(out.encoded[0], out.encoded[2]);
        assert_ne!(out.encoded[0], out.encoded[1]);
    }

    #[test]
    fn stop_words_are_ignorable() {
        let mut vocab = Vocabulary::default();
        let out = tokenize("over The lazy", &["the"], &mut vocab);
        let increments: Vec<u8> = out.tokens.iter().map(|t| t.position_increment).collect();
        assert_eq!(increments, vec![1, 0, 1]);
        assert_eq!(out.encoded.len(), 2);
        assert!(!vocab.contains("the"));
        out.check_increments().unwrap();
    }

    #[test]
    fn leading_whitespace_token_is_ignorable() {
        let mut vocab = Vocabulary::default();
        let out = tokenize("  word", &[], &mut vocab);
        assert_eq!(texts(&out), vec!["  ", "word"]);
        assert_eq!(out.tokens[0].position_increment, 0);
        assert_eq!(out.encoded.len(), 1);
    }

    #[test]
    fn text_between_matches_is_kept_as_ignorable_tokens() {
        let mut vocab = Vocabulary::default();
        let input = "¿one, two".into_filtered().unwrap();
        let out = tokenize_pattern(
            &input,
            &Regex::new(r"\w+").unwrap(),
            &HashSet::new(),
            &GenericNormalizer,
            &mut vocab,
        )
        .unwrap();
        assert_eq!(texts(&out), vec!["¿", "one", ", ", "two"]);
        let increments: Vec<u8> = out.tokens.iter().map(|t| t.position_increment).collect();
        assert_eq!(increments, vec![0, 1, 0, 1]);
        assert_eq!(out.tokens[2], Token::new(5, 7, 0, ", "));
        assert_eq!(out.encoded.len(), 2);
        out.check_increments().unwrap();

        let out = tokenize_pattern(
            &"one two. ".into_filtered().unwrap(),
            &Regex::new(r"\w+").unwrap(),
            &HashSet::new(),
            &GenericNormalizer,
            &mut vocab,
        )
        .unwrap();
        assert_eq!(texts(&out), vec!["one", " ", "two", ". "]);
        assert_eq!(out.tokens[3], Token::new(7, 9, 0, ". "));
    }

    #[test]
    fn offsets_are_corrected_through_filters() {
        let source = "###  abc déf";
        let view = PositionFilter::new(source, 3, None);
        let view = PatternFilter::literal(view, Regex::new(" +").unwrap(), " ");
        let input = view.into_filtered().unwrap();
        assert_eq!(input.text(), " abc déf");

        let mut vocab = Vocabulary::default();
        let out = tokenize_pattern(
            &input,
            &word_pattern(),
            &HashSet::new(),
            &GenericNormalizer,
            &mut vocab,
        )
        .unwrap();
        assert_eq!(texts(&out), vec![" ", "abc ", "déf"]);
        assert_eq!((out.tokens[1].start, out.tokens[1].end), (5, 9));
        assert_eq!(&source[out.tokens[2].start..out.tokens[2].end], "déf");
    }

    #[test]
    fn wide_codes_take_two_units() {
        let mut vocab = Vocabulary::new(&VocabularyConfig {
            shift: VocabularyConfig::MAX_SHIFT,
            split_wide_codes: true,
            allow_decode: false,
            track_frequencies: false,
        });
        let room = 65536 - vocab.gap_code() - 1;
        for i in 0..room {
            vocab.encode(&format!("filler{i}")).unwrap();
        }
        let out = tokenize("alpha beta", &[], &mut vocab);
        let increments: Vec<u8> = out.tokens.iter().map(|t| t.position_increment).collect();
        assert_eq!(increments, vec![2, 2]);
        assert_eq!(out.encoded.len(), 4);
        out.check_increments().unwrap();
    }
}
