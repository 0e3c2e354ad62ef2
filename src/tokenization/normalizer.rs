use std::borrow::Cow;

/// Text normalization applied by the tokenizer in three phases of
/// increasing aggressiveness.
pub trait Normalizer: Send + Sync {
    /// Lossless normalization; its output is the token surface text.
    fn normalize_always<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Normalization used to compare a token against the stop list.
    fn normalize_pre_comparison<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Normalization of the text handed to the vocabulary.
    fn normalize_pre_diff<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Appends an elected token surface text to the consensus output.
    fn append_token_text(&self, output: &mut String, token_text: &str) {
        output.push_str(token_text);
    }
}

/// Script-agnostic normalizer: tokens compare case-insensitively and
/// without their trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericNormalizer;

impl GenericNormalizer {
    fn fold<'a>(text: &'a str) -> Cow<'a, str> {
        let trimmed = text.trim_end();
        if trimmed.chars().any(char::is_uppercase) {
            Cow::Owned(trimmed.to_lowercase())
        } else {
            Cow::Borrowed(trimmed)
        }
    }
}

impl Normalizer for GenericNormalizer {
    fn normalize_always<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    fn normalize_pre_comparison<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Self::fold(text)
    }

    fn normalize_pre_diff<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Self::fold(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_normalizer_folds_case_and_trailing_space() {
        let n = GenericNormalizer;
        assert_eq!(n.normalize_always("Word  "), "Word  ");
        assert_eq!(n.normalize_pre_comparison("Word \n"), "word");
        assert_eq!(n.normalize_pre_diff("ÉTÉ "), "été");
        assert!(matches!(n.normalize_pre_diff("plain"), Cow::Borrowed("plain")));
        assert_eq!(n.normalize_pre_diff("  "), "");
    }

    #[test]
    fn default_append_concatenates() {
        let mut out = String::from("a ");
        GenericNormalizer.append_token_text(&mut out, "b ");
        assert_eq!(out, "a b ");
    }
}
