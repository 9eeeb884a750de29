//! Symbolic address codec.
//!
//! Converts between the textual addresses users type (`M10.1`, `Q0.0`,
//! `DB5.DBX2.3`, `MW4`) and [`MemoryReference`], the structured form the
//! transport works with.
//!
//! # Grammar
//!
//! Input is case-insensitive. Whitespace is not trimmed.
//!
//! | Prefix | Area |
//! |--------|------|
//! | `M` | [`MemoryArea::Markers`] |
//! | `A`, `Q` | [`MemoryArea::ProcessOutputs`] |
//! | `E`, `I` | [`MemoryArea::ProcessInputs`] |
//! | `DB<n>.DB` | [`MemoryArea::DataBlock`] number `n` |
//!
//! A one-letter area takes `B`, `W` or `D` for byte, word and double word
//! sizes and no letter for bits. After `.DB` a size letter is mandatory,
//! with `X` for bits. The offset follows: `byte.bit` for bits, a plain
//! byte offset otherwise.
//!
//! # Example
//!
//! ```
//! use s7_dio::address::{format, parse};
//! use s7_dio::{MemoryArea, WordLength};
//!
//! let reference = parse("db5.dbx2.3")?;
//! assert_eq!(reference.area(), MemoryArea::DataBlock);
//! assert_eq!(reference.db_number(), Some(5));
//! assert_eq!(reference.word_length(), WordLength::Bit);
//! assert_eq!(reference.start(), 19);
//!
//! assert_eq!(format(&reference), "DB5.DBX2.3");
//! # Ok::<(), s7_dio::ParseError>(())
//! ```

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::memory::{MemoryArea, WordLength};
use crate::utils::{bit_offset, parse_decimal, split_bit_offset};

/// A parsed PLC memory location.
///
/// The data block number is present exactly when the area is
/// [`MemoryArea::DataBlock`]; the constructors enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryReference {
    area: MemoryArea,
    word_length: WordLength,
    db_number: Option<u16>,
    start: u32,
    amount: u16,
}

impl MemoryReference {
    /// Creates a reference outside data blocks.
    ///
    /// `start` is a bit offset (`byte * 8 + bit`) for [`WordLength::Bit`]
    /// and a byte offset otherwise. Returns `None` for
    /// [`MemoryArea::DataBlock`], which needs [`MemoryReference::data_block`].
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::{MemoryArea, MemoryReference, WordLength};
    ///
    /// let marker = MemoryReference::new(MemoryArea::Markers, WordLength::Bit, 81).unwrap();
    /// assert_eq!(marker.to_string(), "M10.1");
    /// assert!(MemoryReference::new(MemoryArea::DataBlock, WordLength::Bit, 0).is_none());
    /// ```
    pub fn new(area: MemoryArea, word_length: WordLength, start: u32) -> Option<Self> {
        if area.has_db_number() {
            return None;
        }
        Some(Self {
            area,
            word_length,
            db_number: None,
            start,
            amount: 1,
        })
    }

    /// Creates a reference inside data block `db_number`.
    pub fn data_block(db_number: u16, word_length: WordLength, start: u32) -> Self {
        Self {
            area: MemoryArea::DataBlock,
            word_length,
            db_number: Some(db_number),
            start,
            amount: 1,
        }
    }

    /// Memory area.
    pub fn area(&self) -> MemoryArea {
        self.area
    }

    /// Addressed unit size.
    pub fn word_length(&self) -> WordLength {
        self.word_length
    }

    /// Data block number, set only for [`MemoryArea::DataBlock`].
    pub fn db_number(&self) -> Option<u16> {
        self.db_number
    }

    /// Offset: bits for [`WordLength::Bit`], bytes otherwise.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Number of addressed units. Always 1 for points.
    pub fn amount(&self) -> u16 {
        self.amount
    }

    /// Returns whether this reference addresses a single bit.
    pub fn is_bit(&self) -> bool {
        self.word_length == WordLength::Bit
    }
}

impl std::fmt::Display for MemoryReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.db_number {
            Some(db) => write!(f, "DB{}.DB{}", db, self.word_length.letter())?,
            None if self.is_bit() => write!(f, "{}", self.area)?,
            None => write!(f, "{}{}", self.area, self.word_length.letter())?,
        }
        if self.is_bit() {
            let (byte, bit) = split_bit_offset(self.start);
            write!(f, "{}.{}", byte, bit)
        } else {
            write!(f, "{}", self.start)
        }
    }
}

impl FromStr for MemoryReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<&str> for MemoryReference {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}

/// Parses an address string into a [`MemoryReference`].
///
/// Area prefixes are tried in the order `M`, `A`/`Q`, `E`/`I`, `DB`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing which part of `text` is invalid.
///
/// # Example
///
/// ```
/// use s7_dio::address::parse;
/// use s7_dio::{MemoryArea, WordLength};
///
/// let marker = parse("M10.1").unwrap();
/// assert_eq!(marker.area(), MemoryArea::Markers);
/// assert_eq!(marker.start(), 81);
///
/// let word = parse("QW10").unwrap();
/// assert_eq!(word.word_length(), WordLength::Word);
/// assert_eq!(word.start(), 10);
///
/// assert!(parse("Z1.0").is_err());
/// ```
pub fn parse(text: &str) -> Result<MemoryReference, ParseError> {
    let upper = text.to_ascii_uppercase();
    let first = *upper.as_bytes().first().ok_or(ParseError::Empty)?;

    match first {
        b'M' => parse_area(MemoryArea::Markers, &upper[1..], text),
        b'A' | b'Q' => parse_area(MemoryArea::ProcessOutputs, &upper[1..], text),
        b'E' | b'I' => parse_area(MemoryArea::ProcessInputs, &upper[1..], text),
        b'D' if upper.starts_with("DB") => parse_data_block(&upper[2..], text),
        _ => Err(ParseError::UnknownArea {
            input: text.to_string(),
        }),
    }
}

/// Formats a [`MemoryReference`] as address text.
///
/// The output always parses back to the same reference. Bit offsets are
/// printed normalised (`bit` in `0..=7`).
pub fn format(reference: &MemoryReference) -> String {
    reference.to_string()
}

/// Parses the part after a one-letter area prefix.
fn parse_area(area: MemoryArea, rest: &str, input: &str) -> Result<MemoryReference, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::TooShort {
            input: input.to_string(),
        });
    }
    let sized = WordLength::from_letter(rest.as_bytes()[0])
        .filter(|length| *length != WordLength::Bit);
    let (word_length, offset) = match sized {
        Some(word_length) => (word_length, &rest[1..]),
        None => (WordLength::Bit, rest),
    };
    Ok(MemoryReference {
        area,
        word_length,
        db_number: None,
        start: parse_offset(word_length, offset, input)?,
        amount: 1,
    })
}

/// Parses `<n>.DB<size><offset>`, the part after the leading `DB`.
fn parse_data_block(rest: &str, input: &str) -> Result<MemoryReference, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::TooShort {
            input: input.to_string(),
        });
    }
    let number = rest.split('.').next().unwrap_or(rest);
    let db_number = parse_decimal::<u16>(number).ok_or_else(|| ParseError::InvalidDbNumber {
        input: input.to_string(),
    })?;

    let missing_access = || ParseError::MissingDbAccess {
        input: input.to_string(),
    };
    let access = rest[number.len()..]
        .strip_prefix(".DB")
        .ok_or_else(missing_access)?;
    let word_length = access
        .as_bytes()
        .first()
        .copied()
        .and_then(WordLength::from_letter)
        .ok_or_else(missing_access)?;
    let offset = &access[1..];
    Ok(MemoryReference {
        area: MemoryArea::DataBlock,
        word_length,
        db_number: Some(db_number),
        start: parse_offset(word_length, offset, input)?,
        amount: 1,
    })
}

fn parse_offset(word_length: WordLength, text: &str, input: &str) -> Result<u32, ParseError> {
    let offset = match word_length {
        WordLength::Bit => text.split_once('.').and_then(|(byte, bit)| {
            bit_offset(parse_decimal(byte)?, parse_decimal(bit)?)
        }),
        _ => parse_decimal(text),
    };
    offset.ok_or_else(|| ParseError::InvalidOffset {
        input: input.to_string(),
    })
}
