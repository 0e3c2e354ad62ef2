use serde::Serialize;

use crate::error::VulgateError;

/// Unit of the encoded comparison alphabet produced by the vocabulary.
pub type CodeUnit = u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte interval is [start, end) in the original, untransformed text.
    pub start: usize,
    pub end: usize,
    /// Number of code units the token contributes to the encoded string (0, 1 or 2).
    pub position_increment: u8,
    /// Surface text after the lossless normalization phase.
    pub text: String,
}

impl Token {
    pub fn new(start: usize, end: usize, position_increment: u8, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            position_increment,
            text: text.into(),
        }
    }

    pub fn is_ignorable(&self) -> bool {
        self.position_increment == 0
    }
}

/// Tokens of one witness segment and their vocabulary encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedText {
    pub tokens: Vec<Token>,
    pub encoded: Vec<CodeUnit>,
}

impl TokenizedText {
    pub fn increment_total(&self) -> usize {
        self.tokens
            .iter()
            .map(|t| t.position_increment as usize)
            .sum()
    }

    pub fn check_increments(&self) -> Result<(), VulgateError> {
        let total = self.increment_total();
        if total != self.encoded.len() {
            return Err(VulgateError::invariant(
                "token increments",
                format!(
                    "increments sum to {total} but the encoded string has {} units",
                    self.encoded.len()
                ),
            ));
        }
        Ok(())
    }
}

/// A matrix cell; `None` is a gap.
pub type Cell = Option<Token>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    Equal,
    Delete,
    Insert,
}

/// A maximal span of one edit operation, counted in code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRun {
    pub op: DiffOp,
    pub len: usize,
}

impl DiffRun {
    pub fn equal(len: usize) -> Self {
        Self {
            op: DiffOp::Equal,
            len,
        }
    }

    pub fn delete(len: usize) -> Self {
        Self {
            op: DiffOp::Delete,
            len,
        }
    }

    pub fn insert(len: usize) -> Self {
        Self {
            op: DiffOp::Insert,
            len,
        }
    }
}

/// Rows are aligned slots, columns are witnesses (column 0 is the base).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    columns: usize,
    rows: Vec<Vec<Cell>>,
}

impl AlignmentMatrix {
    pub(crate) fn empty(row_count: usize, columns: usize) -> Self {
        Self {
            columns,
            rows: vec![vec![None; columns]; row_count],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Token> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Tokens of one column in row order, gaps skipped.
    pub fn column_tokens(&self, column: usize) -> impl Iterator<Item = &Token> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column)?.as_ref())
    }

    pub fn gap_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_none()).count()
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, token: Token) {
        self.rows[row][column] = Some(token);
    }

    pub(crate) fn is_vacant(&self, row: usize, column: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .is_some_and(Option::is_none)
    }
}

/// Per-cell weights in 0..=100, parallel to an [`AlignmentMatrix`].
pub type WeightMatrix = Vec<Vec<Option<u8>>>;

/// One page of a witness unit: [start, end) byte span of the unit text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct PageSpan {
    pub page_id: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageAnnotation {
    pub page_id: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfidenceAnnotation {
    pub start: usize,
    pub end: usize,
    /// Confidence in 0..=100 of the witness the text was elected from.
    pub confidence: u8,
}

/// Consensus output for one base unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VulgateUnit {
    pub text: String,
    pub pages: Vec<PageAnnotation>,
    pub confidences: Vec<ConfidenceAnnotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_pages: Vec<String>,
}
