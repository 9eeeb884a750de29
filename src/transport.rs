//! Transport client contract.
//!
//! The socket-level client (connection setup, PDU negotiation, framing and
//! timeouts) lives outside this crate. [`Transport`] is the seam the
//! [`Coordinator`](crate::Coordinator) drives it through. Every call
//! returns within the client's own timeout; failures come back as a
//! [`StatusCode`].
//!
//! # Design
//!
//! - **Synchronous** - each call is one blocking round trip
//! - **No retries** - a failed call is reported once and never repeated here
//! - **One session** - the coordinator owns exactly one transport
//!
//! # Example
//!
//! A transport that always refuses the connection:
//!
//! ```
//! use s7_dio::{ReadRequest, ReadResponse, StatusCode, Transport, WriteRequest};
//!
//! struct Offline;
//!
//! impl Transport for Offline {
//!     fn connect_to(&mut self, _address: &str, _rack: u16, _slot: u16) -> Result<(), StatusCode> {
//!         Err(StatusCode::TCP_CONNECTION_FAILED)
//!     }
//!     fn disconnect(&mut self) {}
//!     fn connected(&self) -> bool {
//!         false
//!     }
//!     fn read_multi(&mut self, _request: &ReadRequest) -> Result<ReadResponse, StatusCode> {
//!         Err(StatusCode::TCP_NOT_CONNECTED)
//!     }
//!     fn write_area(&mut self, _request: &WriteRequest) -> Result<(), StatusCode> {
//!         Err(StatusCode::TCP_NOT_CONNECTED)
//!     }
//! }
//!
//! let mut transport = Offline;
//! assert!(transport.connect_to("192.168.0.1", 0, 1).is_err());
//! assert_eq!(transport.error_text(StatusCode::TCP_CONNECTION_FAILED), "TCP : Connection Error");
//! ```

use crate::command::{ReadRequest, WriteRequest};
use crate::response::ReadResponse;
use crate::status::{describe, StatusCode};

/// Client side of one PLC session.
pub trait Transport {
    /// Opens the session to the PLC at `address` (IPv4 text), `rack` and `slot`.
    fn connect_to(&mut self, address: &str, rack: u16, slot: u16) -> Result<(), StatusCode>;

    /// Closes the session. Must be safe to call when already closed.
    fn disconnect(&mut self);

    /// Returns whether the session is open.
    fn connected(&self) -> bool;

    /// Reads every item of `request` in one round trip.
    ///
    /// On success the response holds one result per item, in request order.
    fn read_multi(&mut self, request: &ReadRequest) -> Result<ReadResponse, StatusCode>;

    /// Writes one item.
    fn write_area(&mut self, request: &WriteRequest) -> Result<(), StatusCode>;

    /// Human-readable text for a status this transport returned.
    fn error_text(&self, status: StatusCode) -> String {
        describe(status)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect_to(&mut self, address: &str, rack: u16, slot: u16) -> Result<(), StatusCode> {
        (**self).connect_to(address, rack, slot)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn connected(&self) -> bool {
        (**self).connected()
    }

    fn read_multi(&mut self, request: &ReadRequest) -> Result<ReadResponse, StatusCode> {
        (**self).read_multi(request)
    }

    fn write_area(&mut self, request: &WriteRequest) -> Result<(), StatusCode> {
        (**self).write_area(request)
    }

    fn error_text(&self, status: StatusCode) -> String {
        (**self).error_text(status)
    }
}
