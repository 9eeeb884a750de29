//! Error types for address parsing, point tables and the PLC session.
//!
//! Errors fall into four families:
//!
//! | Family | Variant | Raised by |
//! |--------|---------|-----------|
//! | Syntax | [`DioError::Syntax`] | address text that does not follow the grammar |
//! | Range | [`DioError::InvalidIndex`] | slot index outside the current table |
//! | Configuration | [`DioError::InvalidEndpoint`] | PLC address that is not an IPv4 literal |
//! | Protocol | [`DioError::Protocol`] | any non-zero status from the transport |
//!
//! The remaining variants reject an operation because of the session state
//! (for example writing while disconnected) and never reach the transport.

use thiserror::Error;

use crate::memory::Direction;
use crate::status::StatusCode;

/// Result type alias for point and session operations.
pub type Result<T> = std::result::Result<T, DioError>;

/// Reasons an address string fails to parse.
///
/// Every variant is a syntax error; the variants only narrow down which part
/// of the text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The address text is empty.
    #[error("address is empty")]
    Empty,

    /// The text does not start with a known area prefix (`M`, `A`/`Q`, `E`/`I`, `DB`).
    #[error("unknown memory area in '{input}'")]
    UnknownArea {
        /// The rejected text.
        input: String,
    },

    /// The text holds an area prefix and nothing after it.
    #[error("address '{input}' is too short")]
    TooShort {
        /// The rejected text.
        input: String,
    },

    /// The data block number after `DB` is missing or not a decimal integer.
    #[error("invalid data block number in '{input}'")]
    InvalidDbNumber {
        /// The rejected text.
        input: String,
    },

    /// A data block address lacks the `.DB<size>` access part.
    #[error("missing '.DB' access in '{input}'")]
    MissingDbAccess {
        /// The rejected text.
        input: String,
    },

    /// The byte/bit offset is missing or not a decimal integer.
    #[error("invalid offset in '{input}'")]
    InvalidOffset {
        /// The rejected text.
        input: String,
    },
}

/// Errors raised by the point tables and the PLC session.
#[derive(Debug, Error)]
pub enum DioError {
    /// Address text could not be parsed.
    #[error("Invalid syntax: {0}")]
    Syntax(#[from] ParseError),

    /// Slot index outside the bounds of its table.
    #[error("Invalid {direction} index {index}: table holds {len} slots")]
    InvalidIndex {
        /// Table the index was looked up in.
        direction: Direction,
        /// Requested index.
        index: usize,
        /// Current table length.
        len: usize,
    },

    /// The PLC endpoint address is not an IPv4 literal.
    #[error("Invalid PLC address '{address}'")]
    InvalidEndpoint {
        /// The rejected address text.
        address: String,
    },

    /// The transport reported a non-zero status.
    #[error("Protocol error {code}: {text}")]
    Protocol {
        /// Status code returned by the transport.
        code: StatusCode,
        /// Transport description of the status.
        text: String,
    },

    /// The operation needs a live session.
    #[error("Not connected")]
    NotConnected,

    /// The operation edits configuration that is locked while connected.
    #[error("Configuration is locked while connected")]
    Locked,

    /// Connect was requested while some address or the endpoint is invalid.
    #[error("Cannot connect: {reason}")]
    ConnectBlocked {
        /// Which part of the configuration blocks the connection.
        reason: String,
    },

    /// The slot exists but its address is not usable for its direction.
    #[error("{direction} slot {index} has no valid address")]
    InvalidSlot {
        /// Table holding the slot.
        direction: Direction,
        /// Slot index.
        index: usize,
    },
}

impl DioError {
    /// Creates a new `Protocol` error.
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::{DioError, StatusCode};
    ///
    /// let err = DioError::protocol(StatusCode::TCP_CONNECTION_FAILED, "TCP : Connection failed");
    /// assert!(err.is_protocol());
    /// ```
    pub fn protocol(code: StatusCode, text: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            text: text.into(),
        }
    }

    /// Creates a new `InvalidIndex` error.
    pub fn invalid_index(direction: Direction, index: usize, len: usize) -> Self {
        Self::InvalidIndex {
            direction,
            index,
            len,
        }
    }

    /// Creates a new `InvalidEndpoint` error.
    pub fn invalid_endpoint(address: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            address: address.into(),
        }
    }

    /// Creates a new `ConnectBlocked` error.
    pub fn connect_blocked(reason: impl Into<String>) -> Self {
        Self::ConnectBlocked {
            reason: reason.into(),
        }
    }

    /// Returns whether this error came from the transport.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}
