//! Results of a batched read.
//!
//! A batched read either fails as a whole (the transport returns a
//! [`StatusCode`]) or yields a [`ReadResponse`] holding one [`ItemResult`]
//! per requested item. Each item carries its own status, so some items can
//! succeed while others fail.
//!
//! # Example
//!
//! ```
//! use s7_dio::{ItemResult, ReadResponse, StatusCode};
//!
//! let response = ReadResponse::new(vec![
//!     ItemResult::ok(vec![0x01]),
//!     ItemResult::failed(StatusCode::ITEM_NOT_AVAILABLE),
//! ]);
//!
//! assert_eq!(response.len(), 2);
//! assert_eq!(response.items()[0].bit(), Some(true));
//! assert_eq!(response.items()[1].bit(), None);
//! assert_eq!(response.first_error(), Some(StatusCode::ITEM_NOT_AVAILABLE));
//! ```

use crate::status::StatusCode;
use crate::utils::byte_to_bit;

/// Outcome of one item in a batched read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    /// Per-item status (zero = success).
    pub status: StatusCode,
    /// Bytes read for this item; empty when the item failed.
    pub data: Vec<u8>,
}

impl ItemResult {
    /// A successful item holding `data`.
    pub fn ok(data: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    /// A failed item.
    pub fn failed(status: StatusCode) -> Self {
        Self {
            status,
            data: Vec::new(),
        }
    }

    /// Returns whether this item was read successfully.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Point value of the item, or the status explaining why there is none.
    ///
    /// A successful item without data reports
    /// [`StatusCode::INVALID_DATA_SIZE_RECEIVED`].
    pub fn value(&self) -> Result<bool, StatusCode> {
        if !self.is_ok() {
            return Err(self.status);
        }
        self.data
            .first()
            .copied()
            .map(byte_to_bit)
            .ok_or(StatusCode::INVALID_DATA_SIZE_RECEIVED)
    }

    /// Point value of a successful item (first byte non-zero is ON).
    ///
    /// Returns `None` when the item failed or carries no data.
    pub fn bit(&self) -> Option<bool> {
        self.value().ok()
    }
}

/// Per-item results of a batched read, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadResponse {
    items: Vec<ItemResult>,
}

impl ReadResponse {
    /// Creates a response from per-item results.
    pub fn new(items: Vec<ItemResult>) -> Self {
        Self { items }
    }

    /// Item results in request order.
    pub fn items(&self) -> &[ItemResult] {
        &self.items
    }

    /// Number of item results.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the response holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Status of the first item without a value, if any.
    pub fn first_error(&self) -> Option<StatusCode> {
        self.items.iter().find_map(|item| item.value().err())
    }

    /// Checks that the response answers a request of `expected` items.
    ///
    /// # Errors
    ///
    /// Returns [`StatusCode::INVALID_PLC_ANSWER`] on a count mismatch.
    pub fn check_len(&self, expected: usize) -> Result<(), StatusCode> {
        if self.items.len() == expected {
            Ok(())
        } else {
            Err(StatusCode::INVALID_PLC_ANSWER)
        }
    }
}

impl FromIterator<ItemResult> for ReadResponse {
    fn from_iter<I: IntoIterator<Item = ItemResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_bit_coercion() {
        assert_eq!(ItemResult::ok(vec![0x00]).bit(), Some(false));
        assert_eq!(ItemResult::ok(vec![0x01]).bit(), Some(true));
        assert_eq!(ItemResult::ok(vec![0x80]).bit(), Some(true));
        assert_eq!(ItemResult::ok(vec![]).bit(), None);
    }

    #[test]
    fn test_failed_item() {
        let item = ItemResult::failed(StatusCode::ADDRESS_OUT_OF_RANGE);
        assert!(!item.is_ok());
        assert_eq!(item.bit(), None);

        let stale = ItemResult {
            status: StatusCode::ITEM_NOT_AVAILABLE,
            data: vec![1],
        };
        assert_eq!(stale.bit(), None);
    }

    #[test]
    fn test_first_error() {
        let all_ok: ReadResponse = vec![ItemResult::ok(vec![1]), ItemResult::ok(vec![0])]
            .into_iter()
            .collect();
        assert_eq!(all_ok.first_error(), None);

        let partial = ReadResponse::new(vec![
            ItemResult::ok(vec![1]),
            ItemResult::failed(StatusCode::INVALID_TRANSPORT_SIZE),
            ItemResult::failed(StatusCode::ITEM_NOT_AVAILABLE),
        ]);
        assert_eq!(partial.first_error(), Some(StatusCode::INVALID_TRANSPORT_SIZE));

        let short = ReadResponse::new(vec![ItemResult::ok(vec![]), ItemResult::ok(vec![1])]);
        assert_eq!(short.first_error(), Some(StatusCode::INVALID_DATA_SIZE_RECEIVED));
    }

    #[test]
    fn test_check_len() {
        let response = ReadResponse::new(vec![ItemResult::ok(vec![1])]);
        assert_eq!(response.check_len(1), Ok(()));
        assert_eq!(response.check_len(2), Err(StatusCode::INVALID_PLC_ANSWER));
        assert!(ReadResponse::default().is_empty());
    }
}
