//! Transport status codes.
//!
//! The transport client reports every operation as a 32-bit status word:
//! zero is success, anything else is an error. The low 16 bits carry
//! TCP-level errors, bits 16..20 ISO-level errors and the high bits the
//! client/CPU errors, so a code can be described even when it combines
//! several layers.
//!
//! # Example
//!
//! ```
//! use s7_dio::StatusCode;
//! use s7_dio::status::describe;
//!
//! assert!(StatusCode::OK.is_ok());
//! assert_eq!(describe(StatusCode::ITEM_NOT_AVAILABLE), "CPU : Item not available");
//! assert_eq!(describe(StatusCode::new(0x7FFF_0000)), "Unknown error (0x7FFF0000)");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status word returned by the transport client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusCode(u32);

impl StatusCode {
    /// Success.
    pub const OK: StatusCode = StatusCode(0);

    /// TCP socket could not be created.
    pub const TCP_SOCKET_CREATION: StatusCode = StatusCode(0x0000_0001);
    /// TCP connection timed out.
    pub const TCP_CONNECTION_TIMEOUT: StatusCode = StatusCode(0x0000_0002);
    /// TCP connection failed.
    pub const TCP_CONNECTION_FAILED: StatusCode = StatusCode(0x0000_0003);
    /// Receive timed out.
    pub const TCP_RECEIVE_TIMEOUT: StatusCode = StatusCode(0x0000_0004);
    /// Receive failed.
    pub const TCP_DATA_RECEIVE: StatusCode = StatusCode(0x0000_0005);
    /// Send timed out.
    pub const TCP_SEND_TIMEOUT: StatusCode = StatusCode(0x0000_0006);
    /// Send failed.
    pub const TCP_DATA_SEND: StatusCode = StatusCode(0x0000_0007);
    /// Connection reset by the peer.
    pub const TCP_CONNECTION_RESET: StatusCode = StatusCode(0x0000_0008);
    /// Socket is not connected.
    pub const TCP_NOT_CONNECTED: StatusCode = StatusCode(0x0000_0009);
    /// Host unreachable.
    pub const TCP_UNREACHABLE_HOST: StatusCode = StatusCode(0x0000_2751);

    /// ISO connection failed.
    pub const ISO_CONNECT: StatusCode = StatusCode(0x0001_0000);
    /// Malformed ISO PDU.
    pub const ISO_INVALID_PDU: StatusCode = StatusCode(0x0003_0000);
    /// ISO data size mismatch.
    pub const ISO_INVALID_DATA_SIZE: StatusCode = StatusCode(0x0004_0000);

    /// PDU negotiation failed.
    pub const NEGOTIATING_PDU: StatusCode = StatusCode(0x0010_0000);
    /// Invalid request parameters.
    pub const INVALID_PARAMS: StatusCode = StatusCode(0x0020_0000);
    /// Another job is pending.
    pub const JOB_PENDING: StatusCode = StatusCode(0x0030_0000);
    /// Too many items in a batched request.
    pub const TOO_MANY_ITEMS: StatusCode = StatusCode(0x0040_0000);
    /// Word length not supported.
    pub const INVALID_WORD_LEN: StatusCode = StatusCode(0x0050_0000);
    /// Only part of the data was written.
    pub const PARTIAL_DATA_WRITTEN: StatusCode = StatusCode(0x0060_0000);
    /// Request does not fit in the negotiated PDU.
    pub const SIZE_OVER_PDU: StatusCode = StatusCode(0x0070_0000);
    /// The PLC answer could not be understood.
    pub const INVALID_PLC_ANSWER: StatusCode = StatusCode(0x0080_0000);
    /// Address outside the CPU memory.
    pub const ADDRESS_OUT_OF_RANGE: StatusCode = StatusCode(0x0090_0000);
    /// Transport size not supported by the CPU.
    pub const INVALID_TRANSPORT_SIZE: StatusCode = StatusCode(0x00A0_0000);
    /// Written data size does not match.
    pub const WRITE_DATA_SIZE_MISMATCH: StatusCode = StatusCode(0x00B0_0000);
    /// The addressed item does not exist.
    pub const ITEM_NOT_AVAILABLE: StatusCode = StatusCode(0x00C0_0000);
    /// Invalid value.
    pub const INVALID_VALUE: StatusCode = StatusCode(0x00D0_0000);
    /// Function not available on this CPU.
    pub const FUNCTION_NOT_AVAILABLE: StatusCode = StatusCode(0x0140_0000);
    /// Received data size does not match the request.
    pub const INVALID_DATA_SIZE_RECEIVED: StatusCode = StatusCode(0x0160_0000);
    /// Invalid block type.
    pub const INVALID_BLOCK_TYPE: StatusCode = StatusCode(0x0170_0000);
    /// Job timed out.
    pub const JOB_TIMEOUT: StatusCode = StatusCode(0x0200_0000);
    /// Only part of the data was read.
    pub const PARTIAL_DATA_READ: StatusCode = StatusCode(0x0210_0000);
    /// Receive buffer too small.
    pub const BUFFER_TOO_SMALL: StatusCode = StatusCode(0x0220_0000);
    /// Function refused by the CPU.
    pub const FUNCTION_REFUSED: StatusCode = StatusCode(0x0230_0000);

    /// Creates a status from its raw value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw status value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns whether this status is success.
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Returns whether this status is an error.
    pub const fn is_err(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

const TCP_MASK: u32 = 0x0000_FFFF;
const ISO_MASK: u32 = 0x000F_0000;
const CLIENT_MASK: u32 = 0xFFF0_0000;

/// Returns a human-readable description of a status code.
///
/// Codes that combine layers are described layer by layer, joined with
/// `" - "`. Codes outside the known table are reported with their value.
pub fn describe(code: StatusCode) -> String {
    if code.is_ok() {
        return "OK".to_string();
    }

    let layers = [
        code.value() & CLIENT_MASK,
        code.value() & ISO_MASK,
        code.value() & TCP_MASK,
    ];
    let mut parts = Vec::new();
    for layer in layers.into_iter().filter(|&value| value != 0) {
        match known_text(StatusCode(layer)) {
            Some(text) => parts.push(text),
            None => return format!("Unknown error ({})", code),
        }
    }
    parts.join(" - ")
}

fn known_text(code: StatusCode) -> Option<&'static str> {
    let text = match code {
        StatusCode::TCP_SOCKET_CREATION => "SYS : Error creating the Socket",
        StatusCode::TCP_CONNECTION_TIMEOUT => "TCP : Connection Timeout",
        StatusCode::TCP_CONNECTION_FAILED => "TCP : Connection Error",
        StatusCode::TCP_RECEIVE_TIMEOUT => "TCP : Data receive Timeout",
        StatusCode::TCP_DATA_RECEIVE => "TCP : Error receiving Data",
        StatusCode::TCP_SEND_TIMEOUT => "TCP : Data send Timeout",
        StatusCode::TCP_DATA_SEND => "TCP : Error sending Data",
        StatusCode::TCP_CONNECTION_RESET => "TCP : Connection reset by the Peer",
        StatusCode::TCP_NOT_CONNECTED => "CLI : Client not connected",
        StatusCode::TCP_UNREACHABLE_HOST => "TCP : Unreachable host",
        StatusCode::ISO_CONNECT => "ISO : Connection Error",
        StatusCode::ISO_INVALID_PDU => "ISO : Invalid PDU received",
        StatusCode::ISO_INVALID_DATA_SIZE => "ISO : Invalid Buffer passed to Send/Receive",
        StatusCode::NEGOTIATING_PDU => "CLI : Error in PDU negotiation",
        StatusCode::INVALID_PARAMS => "CLI : invalid param(s) supplied",
        StatusCode::JOB_PENDING => "CLI : Job pending",
        StatusCode::TOO_MANY_ITEMS => "CLI : too may items (>20) in multi read/write",
        StatusCode::INVALID_WORD_LEN => "CLI : invalid WordLength",
        StatusCode::PARTIAL_DATA_WRITTEN => "CLI : Partial data written",
        StatusCode::SIZE_OVER_PDU => "CPU : total data exceeds the PDU size",
        StatusCode::INVALID_PLC_ANSWER => "CLI : invalid CPU answer",
        StatusCode::ADDRESS_OUT_OF_RANGE => "CPU : Address out of range",
        StatusCode::INVALID_TRANSPORT_SIZE => "CPU : Invalid Transport size",
        StatusCode::WRITE_DATA_SIZE_MISMATCH => "CPU : Data size mismatch",
        StatusCode::ITEM_NOT_AVAILABLE => "CPU : Item not available",
        StatusCode::INVALID_VALUE => "CPU : Invalid value supplied",
        StatusCode::FUNCTION_NOT_AVAILABLE => "CPU : Function not available",
        StatusCode::INVALID_DATA_SIZE_RECEIVED => "CPU : Invalid data size received",
        StatusCode::INVALID_BLOCK_TYPE => "CPU : Invalid block type",
        StatusCode::JOB_TIMEOUT => "CLI : Job Timeout",
        StatusCode::PARTIAL_DATA_READ => "CLI : Partial data read",
        StatusCode::BUFFER_TOO_SMALL => "CLI : The buffer supplied is too small to accomplish the operation",
        StatusCode::FUNCTION_REFUSED => "CPU : Function refused by CPU (Unknown error)",
        _ => return None,
    };
    Some(text)
}
