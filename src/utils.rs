//! Helpers for bit offsets and single-bit values.
//!
//! Bit references store one flat offset (`byte * 8 + bit`); these helpers
//! convert between that form and the `byte.bit` notation, and between the
//! one-byte buffers the transport exchanges and `bool` point values.
//!
//! # Example
//!
//! ```
//! use s7_dio::utils::{bit_offset, split_bit_offset, byte_to_bit, bit_to_byte};
//!
//! assert_eq!(bit_offset(10, 1), Some(81));
//! assert_eq!(split_bit_offset(81), (10, 1));
//!
//! assert!(byte_to_bit(0x40));
//! assert_eq!(bit_to_byte(false), 0);
//! ```

/// Joins a byte address and a bit index into a flat bit offset.
///
/// Returns `None` if the result does not fit in a `u32`.
#[inline]
pub fn bit_offset(byte: u32, bit: u32) -> Option<u32> {
    byte.checked_mul(8)?.checked_add(bit)
}

/// Splits a flat bit offset into `(byte, bit)` with `bit` in `0..=7`.
#[inline]
pub fn split_bit_offset(offset: u32) -> (u32, u8) {
    (offset / 8, (offset % 8) as u8)
}

/// Coerces a byte read from the PLC to a point value (non-zero is ON).
#[inline]
pub fn byte_to_bit(value: u8) -> bool {
    value != 0
}

/// Encodes a point value as the single byte written to the PLC.
#[inline]
pub fn bit_to_byte(value: bool) -> u8 {
    u8::from(value)
}

/// Parses a strictly decimal unsigned integer.
///
/// Unlike `str::parse`, a leading `+` or any whitespace is rejected.
pub(crate) fn parse_decimal<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
