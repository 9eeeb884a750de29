//! # S7 Digital I/O Binding Library
//!
//! A Rust library that mirrors Siemens S7 PLC memory bits as boolean process
//! points of a hosted component.
//!
//! The crate covers the logic between a host (a simulation or automation
//! environment that owns signals and properties) and an S7 transport client
//! (the socket-level protocol implementation). It does not open sockets
//! itself.
//!
//! ## Features
//!
//! - **Address codec**: `M10.1`, `Q0.0`, `I1.2`, `DB5.DBX2.3`, `MW4` to
//!   structured references and back
//! - **Point tables**: resizable per-direction slot tables with validation
//! - **Batched reads**: all input points in one round trip per cycle
//! - **Per-event writes**: one single-bit write per output change
//! - **Fail closed**: every transport error disconnects and is reported
//! - **No panics**: all errors returned as `Result<T, DioError>`
//!
//! ## Quick Start
//!
//! ```
//! use s7_dio::address::{format, parse};
//! use s7_dio::{Direction, MemoryArea};
//!
//! let reference = parse("M10.1")?;
//! assert_eq!(reference.area(), MemoryArea::Markers);
//! assert_eq!(reference.start(), 81);
//! assert_eq!(format(&reference), "M10.1");
//!
//! // Outputs may not point at process inputs.
//! assert!(!Direction::Output.permits(parse("I0.0")?.area()));
//! # Ok::<(), s7_dio::ParseError>(())
//! ```
//!
//! ## Memory Areas
//!
//! | Area | Prefix | Code | Input points | Output points |
//! |------|--------|:----:|:------------:|:-------------:|
//! | [`MemoryArea::ProcessInputs`] | `I`, `E` | 0x81 | ✓ | ✗ |
//! | [`MemoryArea::ProcessOutputs`] | `Q`, `A` | 0x82 | ✗ | ✓ |
//! | [`MemoryArea::Markers`] | `M` | 0x83 | ✓ | ✓ |
//! | [`MemoryArea::DataBlock`] | `DB<n>.DB` | 0x84 | ✓ | ✓ |
//!
//! ## Wiring a Component
//!
//! A host implements [`Host`] (signals, properties, status text, UI flags),
//! a transport client implements [`Transport`], and [`Component`] connects
//! the two:
//!
//! ```no_run
//! # use s7_dio::{Host, Transport};
//! use s7_dio::{Component, ComponentConfig, Endpoint, SignalChange, Trigger};
//! use std::time::Duration;
//!
//! # fn run<T: Transport, H: Host>(transport: T, host: &mut H) -> s7_dio::Result<()> {
//! let config = ComponentConfig::new("conveyor")
//!     .with_endpoint(Endpoint::new("192.168.0.10", 0, 1))
//!     .with_read_interval(Duration::from_millis(50));
//! let mut component = Component::new(transport, config);
//!
//! component.on_load(8, 4, host)?;
//! component.on_signal_changed(SignalChange::Trigger(Trigger::Connect, true), host)?;
//! component.on_simulation_step(Duration::from_millis(50), host)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use s7_dio::{DioError, ParseError};
//!
//! let err = DioError::from(ParseError::Empty);
//! match err {
//!     DioError::Syntax(reason) => println!("bad address: {}", reason),
//!     DioError::Protocol { code, text } => println!("PLC error {}: {}", code, text),
//!     other => println!("Error: {}", other),
//! }
//! ```
//!
//! ## Design Philosophy
//!
//! 1. One transport round trip per operation
//! 2. No retries or automatic reconnection; the host decides
//! 3. A session never stays open after a failure
//! 4. Configuration is locked while a session is open

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod address;
mod binding;
mod command;
mod component;
mod config;
mod coordinator;
mod error;
mod host;
mod memory;
pub mod names;
mod response;
pub mod status;
mod transport;
pub mod utils;

// Public re-exports
pub use address::MemoryReference;
pub use binding::{BindingSlot, BindingTable, ValidationOutcome, DEFAULT_ADDRESS};
pub use command::{DataItem, ReadRequest, WriteRequest, ITEM_SPEC_SIZE, MAX_ITEMS_PER_READ};
pub use component::{Component, PropertyChange, SignalChange};
pub use config::{
    ComponentConfig, Endpoint, DEFAULT_PLC_ADDRESS, DEFAULT_RACK, DEFAULT_READ_INTERVAL,
    DEFAULT_SLOT,
};
pub use coordinator::{Coordinator, SessionState, STATUS_CONNECTED, STATUS_DISCONNECTED};
pub use error::{DioError, ParseError, Result};
pub use host::{Field, Host, PointRegistry, PropertyHandle, SignalHandle, SlotHandles, Trigger};
pub use memory::{Direction, MemoryArea, WordLength};
pub use response::{ItemResult, ReadResponse};
pub use status::StatusCode;
pub use transport::Transport;
