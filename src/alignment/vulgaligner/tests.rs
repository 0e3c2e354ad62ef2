use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use super::*;
use crate::alignment::render::column_texts;
use crate::config::TokenizerConfig;
use crate::tokenization::filter::InputFilter;
use crate::tokenization::normalizer::GenericNormalizer;
use crate::tokenization::tokenizer::tokenize_pattern;
use crate::tokenization::vocabulary::Vocabulary;
use crate::types::Token;
use crate::weighing::{FrequencyWeigher, MatrixWeigher};

fn tokenize_all(strings: &[&str], stop_words: &[&str]) -> Vec<TokenizedText> {
    let pattern = Regex::new(TokenizerConfig::DEFAULT_TOKEN_PATTERN).unwrap();
    let stop: HashSet<String> = stop_words.iter().map(|s| s.to_string()).collect();
    let mut vocabulary = Vocabulary::default();
    strings
        .iter()
        .map(|s| {
            let input = s.into_filtered().unwrap();
            tokenize_pattern(&input, &pattern, &stop, &GenericNormalizer, &mut vocabulary).unwrap()
        })
        .collect()
}

fn align(strings: &[&str], stop_words: &[&str]) -> AlignmentMatrix {
    let tokenized = tokenize_all(strings, stop_words);
    let refs: Vec<&TokenizedText> = tokenized.iter().collect();
    build_alignment_matrix(&refs).unwrap()
}

fn assert_columns(strings: &[&str], stop_words: &[&str], expected: &[&[&str]]) {
    let matrix = align(strings, stop_words);
    let columns = column_texts(&matrix);
    for (column, want) in columns.iter().zip(expected) {
        assert_eq!(column, want, "aligning {strings:?}");
    }
}

/// One token per character, each with the given increment.
fn char_tokens(text: &str, increments: &[u8]) -> TokenizedText {
    let mut encoded = Vec::new();
    let mut tokens = Vec::new();
    let mut units = text.chars().map(|c| c as u16);
    for (i, &inc) in increments.iter().enumerate() {
        let mut label = String::new();
        for _ in 0..inc {
            let unit = units.next().unwrap();
            encoded.push(unit);
            label.push(char::from_u32(unit as u32).unwrap());
        }
        tokens.push(Token::new(i, i + 1, inc, label));
    }
    TokenizedText { tokens, encoded }
}

#[test]
fn deletion_and_insertion_in_the_middle() {
    assert_columns(
        &[
            "The quick brown fox jumped over the lazy dog.",
            "The brown fox jumped over the very lazy dog.",
        ],
        &[],
        &[
            &["The ", "quick ", "brown ", "fox ", "jumped ", "over ", "the ", "-", "lazy ", "dog", "."],
            &["The ", "-", "brown ", "fox ", "jumped ", "over ", "the ", "very ", "lazy ", "dog", "."],
        ],
    );
}

#[test]
fn insertion_before_the_first_base_token() {
    assert_columns(
        &[
            "quick brown fox jumped over the lazy dog.",
            "The quick brown fox jumped over the very lazy dog.",
        ],
        &[],
        &[
            &["-", "quick ", "brown ", "fox ", "jumped ", "over ", "the ", "-", "lazy ", "dog", "."],
            &["The ", "quick ", "brown ", "fox ", "jumped ", "over ", "the ", "very ", "lazy ", "dog", "."],
        ],
    );
}

#[test]
fn substitution_and_trailing_insertion() {
    assert_columns(
        &["the fast", "the quick"],
        &[],
        &[&["the ", "fast"], &["the ", "quick"]],
    );
    assert_columns(&["the", "the quick"], &[], &[&["the", "-"], &["the ", "quick"]]);
}

#[test]
fn stop_words_ride_with_their_neighbours() {
    assert_columns(
        &["and", "and the quick"],
        &["the"],
        &[&["and", "-", "-"], &["and ", "the ", "quick"]],
    );
    assert_columns(
        &["over the lazy", "over the lazy"],
        &["the"],
        &[&["over ", "the ", "lazy"], &["over ", "the ", "lazy"]],
    );
}

#[test]
fn stop_word_at_either_end() {
    assert_columns(
        &["over lazy the", "over the lazy"],
        &["the"],
        &[&["over ", "-", "lazy ", "the"], &["over ", "the ", "lazy", "-"]],
    );
    assert_columns(
        &["over the lazy", "over lazy the"],
        &["the"],
        &[&["over ", "the ", "lazy", "-"], &["over ", "-", "lazy ", "the"]],
    );
}

#[test]
fn one_character_substitution() {
    let base = char_tokens("ABC", &[1, 1, 1]);
    let other = char_tokens("ADC", &[1, 1, 1]);
    let matrix = build_alignment_matrix(&[&base, &other]).unwrap();
    assert_eq!(matrix.row_count(), 3);
    assert_eq!(matrix.gap_count(), 0);
    assert_eq!(
        column_texts(&matrix),
        vec![vec!["A", "B", "C"], vec!["A", "D", "C"]]
    );
}

#[test]
fn two_unit_base_token_hosts_partial_match() {
    let base = char_tokens("ABC", &[2, 1]);
    let other = char_tokens("AC", &[1, 1]);
    let matrix = build_alignment_matrix(&[&base, &other]).unwrap();
    assert_eq!(
        column_texts(&matrix),
        vec![vec!["AB", "C"], vec!["A", "C"]]
    );
}

#[test]
fn three_witnesses_share_one_budget() {
    let matrix = align(
        &["a b c", "a x y b c", "z a b c"],
        &[],
    );
    assert_eq!(
        column_texts(&matrix),
        vec![
            vec!["-", "a ", "-", "-", "b ", "c"],
            vec!["-", "a ", "x ", "y ", "b ", "c"],
            vec!["z ", "a ", "-", "-", "b ", "c"],
        ]
    );
}

#[test]
fn base_alone_and_empty_witnesses() {
    let matrix = align(&["one two"], &[]);
    assert_eq!(matrix.row_count(), 2);
    assert_eq!(matrix.column_count(), 1);

    let matrix = align(&["", "only other"], &[]);
    assert_eq!(
        column_texts(&matrix),
        vec![vec!["-", "-"], vec!["only ", "other"]]
    );

    let matrix = align(&["", ""], &[]);
    assert_eq!(matrix.row_count(), 0);

    assert!(build_alignment_matrix(&[]).is_err());
}

#[test]
fn broken_increments_are_invariant_errors() {
    let mut base = char_tokens("AB", &[1, 1]);
    base.encoded.pop();
    let other = char_tokens("AB", &[1, 1]);
    let err = build_alignment_matrix(&[&base, &other]).unwrap_err();
    assert!(!err.is_page_local());
}

#[test]
fn self_alignment_has_no_gaps() {
    let text = "In the beginning was the Word, and the Word was with God.";
    let matrix = align(&[text, text, text], &["the"]);
    let tokens = tokenize_all(&[text], &["the"]).remove(0).tokens;
    assert_eq!(matrix.row_count(), tokens.len());
    assert_eq!(matrix.gap_count(), 0);
    for row in matrix.rows() {
        assert!(row.iter().all(|cell| cell == &row[0]));
    }

    for skip_identical_rows in [true, false] {
        let weigher = MatrixWeigher::new(skip_identical_rows)
            .with_weigher(Box::new(FrequencyWeigher::new(false)), 1);
        let weights = weigher.weigh_matrix(&matrix);
        assert_eq!(weights.len(), tokens.len());
        for row in weights {
            assert_eq!(row, vec![Some(100); 3]);
        }
    }
}

#[test]
fn column_rows_must_be_complete_ordered_and_inside_the_matrix() {
    assert!(check_column_rows(1, &[0, 2, 3], 3, 4).is_ok());
    assert!(check_column_rows(1, &[], 0, 0).is_ok());

    for (rows, tokens, total) in [
        (&[0, 2][..], 3, 4),
        (&[0, 2, 2][..], 3, 4),
        (&[1, 0][..], 2, 4),
        (&[0, 2, 4][..], 3, 4),
    ] {
        let err = check_column_rows(1, rows, tokens, total).unwrap_err();
        assert!(matches!(err, VulgateError::Invariant { context: "matrix fill", .. }));
    }
}

#[test]
fn random_witnesses_keep_token_order_in_every_column() {
    let words = ["a ", "b ", "c ", "the ", "d ", ", ", "e "];
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let texts: Vec<String> = (0..rng.gen_range(2..5))
            .map(|_| {
                let len = rng.gen_range(0..12);
                (0..len).map(|_| words[rng.gen_range(0..words.len())]).collect()
            })
            .collect();
        let strings: Vec<&str> = texts.iter().map(String::as_str).collect();
        let tokenized = tokenize_all(&strings, &["the"]);
        let refs: Vec<&TokenizedText> = tokenized.iter().collect();
        let matrix = build_alignment_matrix(&refs).unwrap();

        let longest = tokenized.iter().map(|t| t.tokens.len()).max().unwrap_or(0);
        assert!(matrix.row_count() >= longest);
        for (column, witness) in tokenized.iter().enumerate() {
            let placed: Vec<&Token> = matrix.column_tokens(column).collect();
            let expected: Vec<&Token> = witness.tokens.iter().collect();
            assert_eq!(placed, expected, "column {column} of {strings:?}");
        }
        for row in matrix.rows() {
            assert!(row.iter().any(Option::is_some));
        }
    }
}
