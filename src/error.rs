use thiserror::Error;

#[derive(Debug, Error)]
pub enum VulgateError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid pattern for {context}: {source}")]
    Pattern {
        context: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("invalid configuration: {message}")]
    Config { message: String },
    #[error("vocabulary exhausted: all {capacity} codes are in use")]
    VocabularyExhausted { capacity: u32 },
    #[error("vocabulary was created without decoding support")]
    DecodeDisabled,
    #[error("no vocabulary element is encoded as {code}")]
    UnknownCode { code: u32 },
    #[error("span {start}..{end} is not a valid range of a text of {len} bytes")]
    InvalidSpan { start: usize, end: usize, len: usize },
    #[error("alignment invariant violated in {context}: {message}")]
    Invariant {
        context: &'static str,
        message: String,
    },
}

impl VulgateError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn pattern(context: &'static str, source: regex::Error) -> Self {
        Self::Pattern { context, source }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn invariant(context: &'static str, message: impl Into<String>) -> Self {
        Self::Invariant {
            context,
            message: message.into(),
        }
    }

    /// Whether the failure can be confined to the page being processed.
    ///
    /// Invariant violations mean the alignment preconditions are broken and
    /// must reach the caller instead of being skipped like bad data.
    pub fn is_page_local(&self) -> bool {
        !matches!(self, Self::Invariant { .. } | Self::Config { .. })
    }
}
