//! Memory area, word length and point direction definitions.
//!
//! # Memory Areas Overview
//!
//! | Area | Mnemonics | Code | Input points | Output points |
//! |------|-----------|:----:|:------------:|:-------------:|
//! | Process inputs | `I`, `E` | `0x81` | ✓ | ✗ |
//! | Process outputs | `Q`, `A` | `0x82` | ✗ | ✓ |
//! | Markers | `M` | `0x83` | ✓ | ✓ |
//! | Data block | `DB<n>.DB` | `0x84` | ✓ | ✓ |
//!
//! # Example
//!
//! ```
//! use s7_dio::{Direction, MemoryArea};
//!
//! assert!(Direction::Input.permits(MemoryArea::ProcessInputs));
//! assert!(!Direction::Input.permits(MemoryArea::ProcessOutputs));
//! assert!(Direction::Output.permits(MemoryArea::Markers));
//!
//! assert_eq!(MemoryArea::DataBlock.to_string(), "DB");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Memory areas of an S7 PLC reachable by a digital point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemoryArea {
    /// Process image of the inputs (`I`/`E`).
    ProcessInputs,
    /// Process image of the outputs (`Q`/`A`).
    ProcessOutputs,
    /// Marker (flag) memory (`M`).
    Markers,
    /// Global data block (`DB`).
    DataBlock,
}

impl MemoryArea {
    /// Returns the protocol code of this area.
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::MemoryArea;
    ///
    /// assert_eq!(MemoryArea::Markers.code(), 0x83);
    /// ```
    pub fn code(self) -> u8 {
        match self {
            MemoryArea::ProcessInputs => 0x81,
            MemoryArea::ProcessOutputs => 0x82,
            MemoryArea::Markers => 0x83,
            MemoryArea::DataBlock => 0x84,
        }
    }

    /// Returns whether addresses in this area carry a data block number.
    pub fn has_db_number(self) -> bool {
        matches!(self, MemoryArea::DataBlock)
    }
}

impl std::fmt::Display for MemoryArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryArea::ProcessInputs => write!(f, "I"),
            MemoryArea::ProcessOutputs => write!(f, "Q"),
            MemoryArea::Markers => write!(f, "M"),
            MemoryArea::DataBlock => write!(f, "DB"),
        }
    }
}

/// Size of the addressed unit.
///
/// Only [`WordLength::Bit`] backs a digital point; the other sizes are
/// parsed so that a wrong address can be reported precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WordLength {
    /// Single bit (`X`).
    Bit,
    /// 8 bits (`B`).
    Byte,
    /// 16 bits (`W`).
    Word,
    /// 32 bits (`D`).
    DWord,
}

impl WordLength {
    /// Returns the protocol transport-size code.
    pub fn code(self) -> u8 {
        match self {
            WordLength::Bit => 0x01,
            WordLength::Byte => 0x02,
            WordLength::Word => 0x04,
            WordLength::DWord => 0x06,
        }
    }

    /// Maps an address letter to a word length.
    ///
    /// Returns `None` for characters that are not a size letter; the caller
    /// then falls back to [`WordLength::Bit`] without consuming the character.
    pub(crate) fn from_letter(letter: u8) -> Option<Self> {
        match letter {
            b'X' => Some(WordLength::Bit),
            b'B' => Some(WordLength::Byte),
            b'W' => Some(WordLength::Word),
            b'D' => Some(WordLength::DWord),
            _ => None,
        }
    }

    /// The letter used when printing an address of this size.
    pub(crate) fn letter(self) -> char {
        match self {
            WordLength::Bit => 'X',
            WordLength::Byte => 'B',
            WordLength::Word => 'W',
            WordLength::DWord => 'D',
        }
    }
}

/// Which side of the PLC interface a point represents.
///
/// Input points are polled from the PLC into host signals; output points
/// carry host signal changes to the PLC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Digital input point (polled).
    Input,
    /// Digital output point (written).
    Output,
}

impl Direction {
    /// Returns whether a point of this direction may live in `area`.
    pub fn permits(self, area: MemoryArea) -> bool {
        match self {
            Direction::Input => !matches!(area, MemoryArea::ProcessOutputs),
            Direction::Output => !matches!(area, MemoryArea::ProcessInputs),
        }
    }

    /// Both directions, inputs first.
    pub const ALL: [Direction; 2] = [Direction::Input, Direction::Output];
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_codes() {
        assert_eq!(MemoryArea::ProcessInputs.code(), 0x81);
        assert_eq!(MemoryArea::ProcessOutputs.code(), 0x82);
        assert_eq!(MemoryArea::Markers.code(), 0x83);
        assert_eq!(MemoryArea::DataBlock.code(), 0x84);
    }

    #[test]
    fn test_word_length_codes() {
        assert_eq!(WordLength::Bit.code(), 0x01);
        assert_eq!(WordLength::Byte.code(), 0x02);
        assert_eq!(WordLength::Word.code(), 0x04);
        assert_eq!(WordLength::DWord.code(), 0x06);
    }

    #[test]
    fn test_word_length_letters() {
        assert_eq!(WordLength::from_letter(b'X'), Some(WordLength::Bit));
        assert_eq!(WordLength::from_letter(b'D'), Some(WordLength::DWord));
        assert_eq!(WordLength::from_letter(b'1'), None);
        assert_eq!(WordLength::Word.letter(), 'W');
    }

    #[test]
    fn test_input_permissions() {
        assert!(Direction::Input.permits(MemoryArea::ProcessInputs));
        assert!(Direction::Input.permits(MemoryArea::Markers));
        assert!(Direction::Input.permits(MemoryArea::DataBlock));
        assert!(!Direction::Input.permits(MemoryArea::ProcessOutputs));
    }

    #[test]
    fn test_output_permissions() {
        assert!(Direction::Output.permits(MemoryArea::ProcessOutputs));
        assert!(Direction::Output.permits(MemoryArea::Markers));
        assert!(Direction::Output.permits(MemoryArea::DataBlock));
        assert!(!Direction::Output.permits(MemoryArea::ProcessInputs));
    }

    #[test]
    fn test_display() {
        assert_eq!(MemoryArea::ProcessInputs.to_string(), "I");
        assert_eq!(MemoryArea::ProcessOutputs.to_string(), "Q");
        assert_eq!(Direction::Input.to_string(), "input");
        assert_eq!(Direction::Output.to_string(), "output");
    }
}
