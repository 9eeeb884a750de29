//! Request construction for batched reads and single-point writes.
//!
//! This module provides the request types handed to a
//! [`Transport`](crate::Transport):
//!
//! - [`DataItem`] - one memory item (area, size, DB number, start, amount)
//! - [`ReadRequest`] - up to [`MAX_ITEMS_PER_READ`] items read in one round trip
//! - [`WriteRequest`] - one item plus the bytes to write
//!
//! # Example
//!
//! ```
//! use s7_dio::address::parse;
//! use s7_dio::{DataItem, ReadRequest, WriteRequest};
//!
//! let items = ["M0.0", "I1.2", "DB5.DBX2.3"]
//!     .iter()
//!     .map(|text| parse(text).map(|reference| DataItem::from(&reference)))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let request = ReadRequest::new(items).unwrap();
//! assert_eq!(request.len(), 3);
//!
//! let write = WriteRequest::bit(&parse("Q0.1")?, true);
//! assert_eq!(write.data(), &[1]);
//! # Ok::<(), s7_dio::ParseError>(())
//! ```
//!
//! # Constants
//!
//! - [`MAX_ITEMS_PER_READ`] - Maximum number of items (20) per batched read
//! - [`ITEM_SPEC_SIZE`] - Size of one encoded item specification (12 bytes)

use crate::address::MemoryReference;
use crate::memory::{MemoryArea, WordLength};
use crate::status::StatusCode;
use crate::utils::bit_to_byte;

/// Maximum number of items in one batched read.
pub const MAX_ITEMS_PER_READ: usize = 20;

/// Size of one encoded item specification.
pub const ITEM_SPEC_SIZE: usize = 12;

/// Variable specification marker.
const SPEC_TYPE: u8 = 0x12;
/// Length of the address part that follows the length byte.
const SPEC_LENGTH: u8 = 0x0A;
/// Syntax ID for any-type addressing.
const SYNTAX_ID_ANY: u8 = 0x10;
/// Largest address the 24-bit address field can carry.
const MAX_BIT_ADDRESS: u32 = 0x00FF_FFFF;

/// One memory item as the transport addresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataItem {
    /// Memory area.
    pub area: MemoryArea,
    /// Unit size.
    pub word_length: WordLength,
    /// Data block number, 0 outside data blocks.
    pub db_number: u16,
    /// Bit offset for [`WordLength::Bit`], byte offset otherwise.
    pub start: u32,
    /// Number of units.
    pub amount: u16,
}

impl DataItem {
    /// Returns the 24-bit address field: the bit offset for bits,
    /// `byte * 8` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StatusCode::ADDRESS_OUT_OF_RANGE`] if the address does not
    /// fit in 24 bits.
    pub fn bit_address(&self) -> Result<u32, StatusCode> {
        let address = match self.word_length {
            WordLength::Bit => Some(self.start),
            _ => self.start.checked_mul(8),
        };
        address
            .filter(|&address| address <= MAX_BIT_ADDRESS)
            .ok_or(StatusCode::ADDRESS_OUT_OF_RANGE)
    }

    /// Serializes the item as a variable specification for a read/write job.
    ///
    /// # Errors
    ///
    /// Returns [`StatusCode::ADDRESS_OUT_OF_RANGE`] if the address does not
    /// fit in 24 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::address::parse;
    /// use s7_dio::DataItem;
    ///
    /// let item = DataItem::from(&parse("DB5.DBX2.3").unwrap());
    /// let bytes = item.to_bytes().unwrap();
    /// assert_eq!(
    ///     bytes,
    ///     [0x12, 0x0A, 0x10, 0x01, 0x00, 0x01, 0x00, 0x05, 0x84, 0x00, 0x00, 0x13]
    /// );
    /// ```
    pub fn to_bytes(&self) -> Result<[u8; ITEM_SPEC_SIZE], StatusCode> {
        let address = self.bit_address()?;
        let amount = self.amount.to_be_bytes();
        let db_number = self.db_number.to_be_bytes();
        let address = address.to_be_bytes();
        Ok([
            SPEC_TYPE,
            SPEC_LENGTH,
            SYNTAX_ID_ANY,
            self.word_length.code(),
            amount[0],
            amount[1],
            db_number[0],
            db_number[1],
            self.area.code(),
            address[1],
            address[2],
            address[3],
        ])
    }
}

impl From<&MemoryReference> for DataItem {
    fn from(reference: &MemoryReference) -> Self {
        Self {
            area: reference.area(),
            word_length: reference.word_length(),
            db_number: reference.db_number().unwrap_or(0),
            start: reference.start(),
            amount: reference.amount(),
        }
    }
}

/// A batched read of several items in one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    items: Vec<DataItem>,
}

impl ReadRequest {
    /// Creates a batched read.
    ///
    /// # Errors
    ///
    /// Returns [`StatusCode::INVALID_PARAMS`] if `items` is empty and
    /// [`StatusCode::TOO_MANY_ITEMS`] if it holds more than
    /// [`MAX_ITEMS_PER_READ`] items.
    pub fn new(items: Vec<DataItem>) -> Result<Self, StatusCode> {
        if items.is_empty() {
            return Err(StatusCode::INVALID_PARAMS);
        }
        if items.len() > MAX_ITEMS_PER_READ {
            return Err(StatusCode::TOO_MANY_ITEMS);
        }
        Ok(Self { items })
    }

    /// Items in request order.
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: a request holds at least one item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serializes every item specification back to back.
    ///
    /// # Errors
    ///
    /// Returns the first item encoding error.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StatusCode> {
        let mut bytes = Vec::with_capacity(self.items.len() * ITEM_SPEC_SIZE);
        for item in &self.items {
            bytes.extend_from_slice(&item.to_bytes()?);
        }
        Ok(bytes)
    }
}

/// A write of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    item: DataItem,
    data: Vec<u8>,
}

impl WriteRequest {
    /// Creates a one-byte write of a point value (1 for ON, 0 for OFF).
    pub fn bit(reference: &MemoryReference, value: bool) -> Self {
        Self {
            item: DataItem::from(reference),
            data: vec![bit_to_byte(value)],
        }
    }

    /// Target item.
    pub fn item(&self) -> &DataItem {
        &self.item
    }

    /// Bytes to write.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
