use std::collections::HashMap;

use crate::config::VocabularyConfig;
use crate::error::VulgateError;
use crate::types::CodeUnit;

/// Number of code units reserved after `shift` for the high halves of split codes.
pub const HIGH_RANGE: u16 = 16;

const SINGLE_UNIT_LIMIT: u32 = 1 << 16;

/// Encoded form of one vocabulary element: one code unit, or two when the
/// code is too wide for a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedFragment {
    units: [CodeUnit; 2],
    len: u8,
}

impl EncodedFragment {
    fn single(unit: CodeUnit) -> Self {
        Self {
            units: [unit, 0],
            len: 1,
        }
    }

    fn pair(high: CodeUnit, low: CodeUnit) -> Self {
        Self {
            units: [high, low],
            len: 2,
        }
    }

    pub fn units(&self) -> &[CodeUnit] {
        &self.units[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Assigns codes to normalized token strings for one alignment run.
///
/// Code layout for a given `shift`:
/// - `[0, shift)` is never used;
/// - `[shift, shift + 16)` holds the high halves of split codes;
/// - `shift + 16` encodes the gap (the empty element);
/// - fresh elements are minted from `shift + 17` upwards.
///
/// A code that does not fit in one unit is written as `(high, low)` with
/// `w = code - 65536`, `L = 65536 - (shift + 16)`, `high = shift + w / L` and
/// `low = shift + 16 + w % L`. Consumers advance by the fragment length, so a
/// token encoded this way has a position increment of 2.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    shift: u16,
    split_wide_codes: bool,
    codes: HashMap<String, u32>,
    last: u32,
    elements: Option<Vec<String>>,
    frequencies: Option<Vec<u64>>,
}

impl Vocabulary {
    pub fn new(config: &VocabularyConfig) -> Self {
        let mut vocabulary = Self {
            shift: config.shift,
            split_wide_codes: config.split_wide_codes,
            codes: HashMap::new(),
            last: 0,
            elements: config.allow_decode.then(Vec::new),
            frequencies: config.track_frequencies.then(Vec::new),
        };
        vocabulary.reset();
        vocabulary
    }

    pub fn gap_code(&self) -> u32 {
        self.shift as u32 + HIGH_RANGE as u32
    }

    fn low_range_len(&self) -> u32 {
        SINGLE_UNIT_LIMIT - self.gap_code()
    }

    /// Highest code (exclusive) this vocabulary can represent.
    pub fn capacity(&self) -> u32 {
        if self.split_wide_codes {
            SINGLE_UNIT_LIMIT + HIGH_RANGE as u32 * self.low_range_len()
        } else {
            SINGLE_UNIT_LIMIT
        }
    }

    /// Drops every minted code; only the gap element survives.
    pub fn reset(&mut self) {
        self.codes.clear();
        let gap = self.gap_code();
        self.codes.insert(String::new(), gap);
        self.last = gap;
        if let Some(elements) = self.elements.as_mut() {
            elements.clear();
            elements.push(String::new());
        }
        if let Some(frequencies) = self.frequencies.as_mut() {
            frequencies.clear();
            frequencies.push(0);
        }
    }

    /// Number of elements known, the gap included.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.len() <= 1
    }

    pub fn contains(&self, element: &str) -> bool {
        self.codes.contains_key(element)
    }

    pub fn encode(&mut self, element: &str) -> Result<u32, VulgateError> {
        let gap = self.gap_code();
        if let Some(&code) = self.codes.get(element) {
            if let Some(frequencies) = self.frequencies.as_mut() {
                frequencies[(code - gap) as usize] += 1;
            }
            return Ok(code);
        }
        let code = self.last + 1;
        if code >= self.capacity() {
            return Err(VulgateError::VocabularyExhausted {
                capacity: self.capacity(),
            });
        }
        self.last = code;
        self.codes.insert(element.to_string(), code);
        if let Some(elements) = self.elements.as_mut() {
            elements.push(element.to_string());
        }
        if let Some(frequencies) = self.frequencies.as_mut() {
            frequencies.push(1);
        }
        Ok(code)
    }

    /// Encodes `element` and returns its fragment with the number of units it occupies.
    pub fn encode_str(&mut self, element: &str) -> Result<(EncodedFragment, usize), VulgateError> {
        let code = self.encode(element)?;
        let fragment = self.fragment(code);
        Ok((fragment, fragment.len()))
    }

    fn fragment(&self, code: u32) -> EncodedFragment {
        if code < SINGLE_UNIT_LIMIT {
            return EncodedFragment::single(code as CodeUnit);
        }
        let wide = code - SINGLE_UNIT_LIMIT;
        let span = self.low_range_len();
        let high = self.shift as u32 + wide / span;
        let low = self.gap_code() + wide % span;
        EncodedFragment::pair(high as CodeUnit, low as CodeUnit)
    }

    pub fn decode(&self, code: u32) -> Result<&str, VulgateError> {
        let elements = self.elements.as_ref().ok_or(VulgateError::DecodeDisabled)?;
        code.checked_sub(self.gap_code())
            .and_then(|index| elements.get(index as usize))
            .map(String::as_str)
            .ok_or(VulgateError::UnknownCode { code })
    }

    /// Renders an encoded string as `|elem|elem|`, recombining split pairs.
    pub fn decode_units(&self, units: &[CodeUnit], separator: &str) -> Result<String, VulgateError> {
        let mut out = String::from(separator);
        let mut i = 0;
        while i < units.len() {
            let unit = units[i] as u32;
            let code = if self.split_wide_codes && self.is_high_half(unit) && i + 1 < units.len() {
                let low = units[i + 1] as u32;
                i += 1;
                SINGLE_UNIT_LIMIT
                    + (unit - self.shift as u32) * self.low_range_len()
                    + (low.saturating_sub(self.gap_code()))
            } else {
                unit
            };
            out.push_str(self.decode(code)?);
            out.push_str(separator);
            i += 1;
        }
        Ok(out)
    }

    fn is_high_half(&self, unit: u32) -> bool {
        unit >= self.shift as u32 && unit < self.gap_code()
    }

    pub fn code_frequency(&self, code: u32) -> Option<u64> {
        let frequencies = self.frequencies.as_ref()?;
        let index = code.checked_sub(self.gap_code())?;
        frequencies.get(index as usize).copied()
    }

    pub fn element_frequency(&self, element: &str) -> Option<u64> {
        self.frequencies.as_ref()?;
        match self.codes.get(element) {
            Some(&code) => self.code_frequency(code),
            None => Some(0),
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(&VocabularyConfig::default())
    }
}
