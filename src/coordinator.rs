//! PLC session coordinator.
//!
//! This module provides the [`Coordinator`], which owns one [`Transport`]
//! session and the two point tables of a component.
//!
//! # Overview
//!
//! The coordinator handles:
//! - Editing the endpoint, table sizes and slot addresses while disconnected
//! - The connect gate (valid endpoint and every slot valid)
//! - One batched read of all input slots per cycle
//! - One single-item write per output change
//! - Disconnecting on every transport failure
//!
//! Each operation produces at most one transport round trip. There are no
//! retries and no automatic reconnection; after a failure the session is
//! closed and the status text shows the transport's description.
//!
//! # Example
//!
//! ```
//! use s7_dio::{
//!     ComponentConfig, Coordinator, Direction, Field, Host, ItemResult, PointRegistry,
//!     PropertyHandle, ReadRequest, ReadResponse, SignalHandle, SlotHandles, StatusCode,
//!     Transport, Trigger, WriteRequest,
//! };
//! use std::collections::HashMap;
//!
//! // A PLC whose inputs are all ON.
//! struct AllOn(bool);
//!
//! impl Transport for AllOn {
//!     fn connect_to(&mut self, _: &str, _: u16, _: u16) -> Result<(), StatusCode> {
//!         self.0 = true;
//!         Ok(())
//!     }
//!     fn disconnect(&mut self) {
//!         self.0 = false;
//!     }
//!     fn connected(&self) -> bool {
//!         self.0
//!     }
//!     fn read_multi(&mut self, request: &ReadRequest) -> Result<ReadResponse, StatusCode> {
//!         Ok(request.items().iter().map(|_| ItemResult::ok(vec![1])).collect())
//!     }
//!     fn write_area(&mut self, _: &WriteRequest) -> Result<(), StatusCode> {
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Signals {
//!     values: HashMap<u64, bool>,
//!     next: u64,
//! }
//!
//! impl PointRegistry for Signals {
//!     fn attach_point(&mut self, _: Direction, _: usize, _: &str) -> SlotHandles {
//!         self.next += 1;
//!         SlotHandles { signal: SignalHandle(self.next), property: PropertyHandle(self.next) }
//!     }
//!     fn detach_point(&mut self, _: Direction, _: usize, _: SlotHandles) {}
//!     fn address_text(&self, _: PropertyHandle) -> Option<String> {
//!         None
//!     }
//! }
//!
//! impl Host for Signals {
//!     fn set_signal(&mut self, signal: SignalHandle, value: bool) {
//!         self.values.insert(signal.0, value);
//!     }
//!     fn set_status(&mut self, _: &str) {}
//!     fn set_read_only(&mut self, _: Field, _: bool) {}
//!     fn set_trigger_visible(&mut self, _: Trigger, _: bool) {}
//!     fn reset_connect_trigger(&mut self) {}
//! }
//!
//! let mut host = Signals::default();
//! let mut coordinator = Coordinator::new(AllOn(false), ComponentConfig::new("demo"));
//!
//! coordinator.resize(Direction::Input, 2, &mut host)?;
//! coordinator.set_address(Direction::Input, 0, "I0.0", &mut host)?;
//! coordinator.set_address(Direction::Input, 1, "DB1.DBX0.1", &mut host)?;
//! assert!(coordinator.can_connect());
//!
//! coordinator.connect(&mut host)?;
//! assert_eq!(coordinator.read_cycle(&mut host)?, 2);
//! assert_eq!(host.values.get(&1), Some(&true));
//!
//! coordinator.disconnect(&mut host);
//! # Ok::<(), s7_dio::DioError>(())
//! ```

use tracing::{debug, info, warn};

use crate::binding::{BindingTable, ValidationOutcome};
use crate::command::{DataItem, ReadRequest, WriteRequest};
use crate::config::{ComponentConfig, Endpoint};
use crate::error::{DioError, Result};
use crate::host::{Field, Host, Trigger};
use crate::memory::Direction;
use crate::status::StatusCode;
use crate::transport::Transport;

/// Status text shown while a session is open.
pub const STATUS_CONNECTED: &str = "Connected";

/// Status text shown after a clean disconnect.
pub const STATUS_DISCONNECTED: &str = "Disconnected";

/// Session state of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session is open.
    #[default]
    Disconnected,
    /// A session is open.
    Connected,
}

/// Owns the PLC session and the point tables of one component.
///
/// Input slots are polled by [`Coordinator::read_cycle`]; output slots are
/// written by [`Coordinator::write_one`]. Every method that takes a host
/// keeps its status text and UI flags in step with the session state.
///
/// Calls must be serialized by the caller; the coordinator spawns nothing
/// and is not reentrant.
#[derive(Debug)]
pub struct Coordinator<T: Transport> {
    name: String,
    transport: T,
    endpoint: Endpoint,
    inputs: BindingTable,
    outputs: BindingTable,
    state: SessionState,
}

impl<T: Transport> Coordinator<T> {
    /// Creates a disconnected coordinator with empty tables.
    pub fn new(transport: T, config: ComponentConfig) -> Self {
        Self {
            inputs: BindingTable::with_default_address(
                Direction::Input,
                config.default_address.as_str(),
            ),
            outputs: BindingTable::with_default_address(Direction::Output, config.default_address),
            name: config.name,
            transport,
            endpoint: config.endpoint,
            state: SessionState::Disconnected,
        }
    }

    /// Component name used in log records.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns whether a session is open.
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Current endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The table of one direction.
    pub fn table(&self, direction: Direction) -> &BindingTable {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut BindingTable {
        match direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        }
    }

    /// The owned transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The owned transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.is_connected() {
            return Err(DioError::Locked);
        }
        Ok(())
    }

    /// Sets the PLC address text.
    ///
    /// The text is stored even when it is not an IPv4 literal; the connect
    /// gate stays closed until it is.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::Locked`] while connected and
    /// [`DioError::InvalidEndpoint`] when the stored text is not an IPv4
    /// literal.
    pub fn set_endpoint_address<H: Host + ?Sized>(
        &mut self,
        address: &str,
        host: &mut H,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.endpoint.address = address.to_string();
        self.refresh_gate(host);
        self.endpoint.ip().map(|_| ())
    }

    /// Sets the PLC rack number.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::Locked`] while connected.
    pub fn set_rack(&mut self, rack: u16) -> Result<()> {
        self.ensure_unlocked()?;
        self.endpoint.rack = rack;
        Ok(())
    }

    /// Sets the PLC slot number.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::Locked`] while connected.
    pub fn set_slot(&mut self, slot: u16) -> Result<()> {
        self.ensure_unlocked()?;
        self.endpoint.slot = slot;
        Ok(())
    }

    /// Resizes the table of `direction` to `count` slots.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::Locked`] while connected.
    pub fn resize<H: Host + ?Sized>(
        &mut self,
        direction: Direction,
        count: usize,
        host: &mut H,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.table_mut(direction).resize(count, host);
        self.update_ui(host);
        Ok(())
    }

    /// Assigns address text to one slot and re-validates it.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::Locked`] while connected. A bad index or bad text
    /// is reported through the returned [`ValidationOutcome`].
    pub fn set_address<H: Host + ?Sized>(
        &mut self,
        direction: Direction,
        index: usize,
        text: &str,
        host: &mut H,
    ) -> Result<ValidationOutcome> {
        self.ensure_unlocked()?;
        let outcome = self.table_mut(direction).set_address(index, text);
        if outcome == ValidationOutcome::InvalidSyntax {
            debug!(component = %self.name, %direction, index, text, "address rejected");
        }
        self.refresh_gate(host);
        Ok(outcome)
    }

    /// Re-reads every slot address from the host and re-validates both
    /// tables.
    pub fn sync_addresses<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.inputs.sync_from(&*host);
        self.outputs.sync_from(&*host);
        self.refresh_gate(host);
    }

    /// Returns whether a connection may be attempted.
    ///
    /// True when the endpoint address is an IPv4 literal and every slot of
    /// both tables is valid.
    pub fn can_connect(&self) -> bool {
        self.blocking_reason().is_none()
    }

    /// Describes what keeps the connect gate closed, if anything.
    pub fn blocking_reason(&self) -> Option<String> {
        if let Err(err) = self.endpoint.ip() {
            return Some(err.to_string());
        }
        [&self.inputs, &self.outputs].into_iter().find_map(|table| {
            let invalid = table.invalid_indices();
            (!invalid.is_empty())
                .then(|| format!("{} slots {:?} have invalid addresses", table.direction(), invalid))
        })
    }

    /// Shows the connect trigger exactly when the gate is open.
    pub fn refresh_gate<H: Host + ?Sized>(&self, host: &mut H) {
        host.set_trigger_visible(Trigger::Connect, self.can_connect());
    }

    /// Pushes lock flags and trigger visibility for the current state.
    ///
    /// While connected the endpoint fields, both point counts and every slot
    /// address are read-only. The read trigger is visible only while
    /// connected with at least one input slot.
    pub fn update_ui<H: Host + ?Sized>(&self, host: &mut H) {
        let locked = self.is_connected();
        for field in [
            Field::EndpointAddress,
            Field::Rack,
            Field::Slot,
            Field::PointCount(Direction::Input),
            Field::PointCount(Direction::Output),
        ] {
            host.set_read_only(field, locked);
        }
        for slot in self.inputs.iter().chain(self.outputs.iter()) {
            host.set_read_only(Field::SlotAddress(slot.handles().property), locked);
        }
        host.set_trigger_visible(Trigger::Read, locked && !self.inputs.is_empty());
        self.refresh_gate(host);
    }

    /// Opens the session.
    ///
    /// Does nothing when a session is already open.
    ///
    /// # Errors
    ///
    /// - [`DioError::InvalidEndpoint`] if the address is not IPv4; the
    ///   transport is not contacted
    /// - [`DioError::ConnectBlocked`] if any slot is invalid; the transport
    ///   is not contacted
    /// - [`DioError::Protocol`] if the transport refuses; the session is
    ///   left disconnected
    pub fn connect<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if self.is_connected() {
            debug!(component = %self.name, "connect ignored, already connected");
            return Ok(());
        }
        self.endpoint.ip()?;
        if let Some(reason) = self.blocking_reason() {
            return Err(DioError::connect_blocked(reason));
        }

        let result = self.transport.connect_to(
            &self.endpoint.address,
            self.endpoint.rack,
            self.endpoint.slot,
        );
        match result {
            Ok(()) => {
                self.state = SessionState::Connected;
                host.set_status(STATUS_CONNECTED);
                self.update_ui(host);
                info!(
                    component = %self.name,
                    address = %self.endpoint.address,
                    rack = self.endpoint.rack,
                    slot = self.endpoint.slot,
                    "connected to PLC"
                );
                Ok(())
            }
            Err(status) => Err(self.fail(status, host)),
        }
    }

    /// Closes the session.
    ///
    /// Always drives the transport's disconnect and clears the connect
    /// trigger; calling it again is harmless.
    pub fn disconnect<H: Host + ?Sized>(&mut self, host: &mut H) {
        let was_connected = self.is_connected();
        self.transport.disconnect();
        host.reset_connect_trigger();
        self.state = SessionState::Disconnected;
        host.set_status(STATUS_DISCONNECTED);
        self.update_ui(host);
        if was_connected {
            info!(component = %self.name, "disconnected from PLC");
        }
    }

    /// Reads every input slot in one batched request and scatters the
    /// results into the slot signals.
    ///
    /// Returns the number of signals updated. With no input slots nothing
    /// is sent and zero is returned.
    ///
    /// # Errors
    ///
    /// - [`DioError::NotConnected`] without a session
    /// - [`DioError::InvalidSlot`] if a slot lost its valid address; no
    ///   request is sent
    /// - [`DioError::Protocol`] on any transport failure, including a
    ///   single failed item; the session is closed, but the items that
    ///   were read are still scattered
    pub fn read_cycle<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<usize> {
        if !self.is_connected() {
            return Err(DioError::NotConnected);
        }
        if !self.transport.connected() {
            return Err(self.fail(StatusCode::TCP_NOT_CONNECTED, host));
        }
        if self.inputs.is_empty() {
            debug!(component = %self.name, "read skipped, no input slots");
            return Ok(0);
        }

        let items = (0..self.inputs.len())
            .map(|index| {
                let reference = self.inputs.valid_reference(index).inspect_err(|_| {
                    debug!(component = %self.name, index, "read skipped, input slot invalid");
                })?;
                Ok(DataItem::from(&reference))
            })
            .collect::<Result<Vec<_>>>()?;
        let request = match ReadRequest::new(items) {
            Ok(request) => request,
            Err(status) => return Err(self.fail(status, host)),
        };

        let response = match self.transport.read_multi(&request) {
            Ok(response) => response,
            Err(status) => return Err(self.fail(status, host)),
        };
        if let Err(status) = response.check_len(request.len()) {
            return Err(self.fail(status, host));
        }

        let mut scattered = 0;
        for (slot, item) in self.inputs.iter().zip(response.items()) {
            match item.value() {
                Ok(value) => {
                    host.set_signal(slot.handles().signal, value);
                    scattered += 1;
                }
                Err(status) => warn!(
                    component = %self.name,
                    index = slot.index(),
                    code = %status,
                    text = %self.transport.error_text(status),
                    "input item failed"
                ),
            }
        }

        match response.first_error() {
            Some(status) => Err(self.fail(status, host)),
            None => Ok(scattered),
        }
    }

    /// Writes one output slot (1 for ON, 0 for OFF).
    ///
    /// # Errors
    ///
    /// - [`DioError::NotConnected`] without a session
    /// - [`DioError::InvalidIndex`] or [`DioError::InvalidSlot`] for a slot
    ///   that does not exist or has no valid address; the transport is not
    ///   contacted
    /// - [`DioError::Protocol`] if the write fails; the session is closed
    pub fn write_one<H: Host + ?Sized>(
        &mut self,
        index: usize,
        value: bool,
        host: &mut H,
    ) -> Result<()> {
        if !self.is_connected() {
            return Err(DioError::NotConnected);
        }
        let reference = self.outputs.valid_reference(index)?;
        if !self.transport.connected() {
            return Err(self.fail(StatusCode::TCP_NOT_CONNECTED, host));
        }

        let request = WriteRequest::bit(&reference, value);
        match self.transport.write_area(&request) {
            Ok(()) => {
                debug!(component = %self.name, index, %reference, value, "output written");
                Ok(())
            }
            Err(status) => Err(self.fail(status, host)),
        }
    }

    /// Logs a transport failure, closes the session and shows the failure
    /// text as status.
    fn fail<H: Host + ?Sized>(&mut self, status: StatusCode, host: &mut H) -> DioError {
        let text = self.transport.error_text(status);
        warn!(component = %self.name, code = %status, text = %text, "PLC communication failed");
        self.disconnect(host);
        host.set_status(&text);
        DioError::protocol(status, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MAX_ITEMS_PER_READ;
    use crate::host::mock::RecordingHost;
    use crate::response::{ItemResult, ReadResponse};
    use crate::transport::mock::MockTransport;

    fn coordinator() -> Coordinator<MockTransport> {
        Coordinator::new(MockTransport::default(), ComponentConfig::new("test"))
    }

    /// A coordinator with valid `I0.n` inputs and `Q0.n` outputs.
    fn ready(inputs: usize, outputs: usize) -> (Coordinator<MockTransport>, RecordingHost) {
        let mut host = RecordingHost::default();
        let mut c = coordinator();
        c.resize(Direction::Input, inputs, &mut host).unwrap();
        c.resize(Direction::Output, outputs, &mut host).unwrap();
        for i in 0..inputs {
            host.set_address(Direction::Input, i, &format!("I0.{i}"));
        }
        for i in 0..outputs {
            host.set_address(Direction::Output, i, &format!("Q0.{i}"));
        }
        c.sync_addresses(&mut host);
        (c, host)
    }

    fn connected(inputs: usize, outputs: usize) -> (Coordinator<MockTransport>, RecordingHost) {
        let (mut c, mut host) = ready(inputs, outputs);
        c.connect(&mut host).unwrap();
        (c, host)
    }

    #[test]
    fn test_new_coordinator() {
        let c = coordinator();
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(c.name(), "test");
        assert!(c.table(Direction::Input).is_empty());
        assert!(c.table(Direction::Output).is_empty());
        assert!(c.can_connect());
    }

    #[test]
    fn test_gate_closed_until_fresh_slots_sync() {
        let mut host = RecordingHost::default();
        let mut c = coordinator();
        c.resize(Direction::Output, 2, &mut host).unwrap();
        assert!(!c.can_connect());
        assert!(!host.is_visible(Trigger::Connect));

        c.sync_addresses(&mut host);
        assert!(c.can_connect());
        assert!(host.is_visible(Trigger::Connect));
    }

    #[test]
    fn test_gate_follows_address_edits() {
        let (mut c, mut host) = ready(1, 1);
        assert!(c.can_connect());

        let outcome = c.set_address(Direction::Input, 0, "Q0.0", &mut host).unwrap();
        assert_eq!(outcome, ValidationOutcome::InvalidSyntax);
        assert!(!c.can_connect());
        assert!(!host.is_visible(Trigger::Connect));
        assert_eq!(
            c.blocking_reason().unwrap(),
            "input slots [0] have invalid addresses"
        );

        let outcome = c.set_address(Direction::Input, 0, "E0.0", &mut host).unwrap();
        assert_eq!(outcome, ValidationOutcome::Valid);
        assert!(c.can_connect());

        let outcome = c.set_address(Direction::Output, 5, "Q0.0", &mut host).unwrap();
        assert_eq!(outcome, ValidationOutcome::InvalidIndex);
    }

    #[test]
    fn test_gate_follows_endpoint() {
        let (mut c, mut host) = ready(1, 0);

        let err = c.set_endpoint_address("plc-1", &mut host).unwrap_err();
        assert!(matches!(err, DioError::InvalidEndpoint { .. }));
        assert_eq!(c.endpoint().address, "plc-1");
        assert!(!c.can_connect());
        assert!(!host.is_visible(Trigger::Connect));

        c.set_endpoint_address("10.1.2.3", &mut host).unwrap();
        assert!(c.can_connect());
        assert!(host.is_visible(Trigger::Connect));
    }

    #[test]
    fn test_connect_rejects_invalid_endpoint_without_transport() {
        let (mut c, mut host) = ready(0, 0);
        let _ = c.set_endpoint_address("10.0.0", &mut host);

        let err = c.connect(&mut host).unwrap_err();
        assert!(matches!(err, DioError::InvalidEndpoint { .. }));
        assert!(c.transport().connect_calls.is_empty());
        assert_eq!(c.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_connect_blocked_without_transport() {
        let mut host = RecordingHost::default();
        let mut c = coordinator();
        c.resize(Direction::Input, 1, &mut host).unwrap();

        let err = c.connect(&mut host).unwrap_err();
        assert!(matches!(err, DioError::ConnectBlocked { .. }));
        assert!(c.transport().connect_calls.is_empty());
    }

    #[test]
    fn test_connect_success_locks_ui() {
        let (mut c, mut host) = ready(2, 1);
        c.set_rack(0).unwrap();
        c.set_slot(2).unwrap();
        c.connect(&mut host).unwrap();

        assert_eq!(c.state(), SessionState::Connected);
        assert_eq!(
            c.transport().connect_calls,
            vec![("192.168.0.1".to_string(), 0, 2)]
        );
        assert_eq!(host.status, STATUS_CONNECTED);
        assert!(host.is_read_only(Field::EndpointAddress));
        assert!(host.is_read_only(Field::Rack));
        assert!(host.is_read_only(Field::Slot));
        assert!(host.is_read_only(Field::PointCount(Direction::Input)));
        assert!(host.is_read_only(Field::PointCount(Direction::Output)));
        let property = host.handles(Direction::Output, 0).property;
        assert!(host.is_read_only(Field::SlotAddress(property)));
        assert!(host.is_visible(Trigger::Read));
        assert!(host.is_visible(Trigger::Connect));
    }

    #[test]
    fn test_read_trigger_hidden_without_inputs() {
        let (_c, host) = connected(0, 2);
        assert!(!host.is_visible(Trigger::Read));
    }

    #[test]
    fn test_connect_failure_reports_and_stays_disconnected() {
        let (mut c, mut host) = ready(1, 1);
        c.transport_mut().connect_result = Some(StatusCode::TCP_CONNECTION_FAILED);

        let err = c.connect(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::TCP_CONNECTION_FAILED, .. }
        ));
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(host.status, "TCP : Connection Error");
        assert_eq!(c.transport().disconnect_calls, 1);
        assert_eq!(host.connect_resets, 1);
        assert!(!host.is_read_only(Field::EndpointAddress));
    }

    #[test]
    fn test_connect_while_connected_is_noop() {
        let (mut c, mut host) = connected(1, 0);
        c.connect(&mut host).unwrap();
        assert_eq!(c.transport().connect_calls.len(), 1);
        assert!(c.is_connected());
    }

    #[test]
    fn test_edits_locked_while_connected() {
        let (mut c, mut host) = connected(1, 1);

        assert!(matches!(
            c.resize(Direction::Input, 3, &mut host),
            Err(DioError::Locked)
        ));
        assert!(matches!(
            c.set_address(Direction::Output, 0, "Q1.0", &mut host),
            Err(DioError::Locked)
        ));
        assert!(matches!(
            c.set_endpoint_address("10.0.0.1", &mut host),
            Err(DioError::Locked)
        ));
        assert!(matches!(c.set_rack(1), Err(DioError::Locked)));
        assert!(matches!(c.set_slot(3), Err(DioError::Locked)));
        assert_eq!(c.table(Direction::Input).len(), 1);
    }

    #[test]
    fn test_disconnect_twice() {
        let (mut c, mut host) = connected(1, 1);

        c.disconnect(&mut host);
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(host.status, STATUS_DISCONNECTED);
        assert!(!host.is_read_only(Field::Rack));
        assert!(!host.is_visible(Trigger::Read));

        c.disconnect(&mut host);
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(host.status, STATUS_DISCONNECTED);
        assert_eq!(host.connect_resets, 2);
    }

    #[test]
    fn test_read_cycle_scatters_values() {
        let (mut c, mut host) = connected(3, 0);
        c.transport_mut().reads.push_back(Ok(ReadResponse::new(vec![
            ItemResult::ok(vec![1]),
            ItemResult::ok(vec![0]),
            ItemResult::ok(vec![0xFF]),
        ])));

        assert_eq!(c.read_cycle(&mut host).unwrap(), 3);
        assert_eq!(host.signal(Direction::Input, 0), Some(true));
        assert_eq!(host.signal(Direction::Input, 1), Some(false));
        assert_eq!(host.signal(Direction::Input, 2), Some(true));

        let request = &c.transport().read_calls[0];
        assert_eq!(request.len(), 3);
        assert_eq!(request.items()[2].start, 2);
        assert!(c.is_connected());
    }

    #[test]
    fn test_read_cycle_partial_failure() {
        let (mut c, mut host) = connected(3, 0);
        c.transport_mut().reads.push_back(Ok(ReadResponse::new(vec![
            ItemResult::ok(vec![1]),
            ItemResult::failed(StatusCode::ITEM_NOT_AVAILABLE),
            ItemResult::ok(vec![1]),
        ])));

        let err = c.read_cycle(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::ITEM_NOT_AVAILABLE, .. }
        ));
        assert_eq!(host.signal(Direction::Input, 0), Some(true));
        assert_eq!(host.signal(Direction::Input, 1), None);
        assert_eq!(host.signal(Direction::Input, 2), Some(true));
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(host.status, "CPU : Item not available");
    }

    #[test]
    fn test_read_cycle_empty_item_data_fails() {
        let (mut c, mut host) = connected(1, 0);
        c.transport_mut()
            .reads
            .push_back(Ok(ReadResponse::new(vec![ItemResult::ok(vec![])])));

        let err = c.read_cycle(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::INVALID_DATA_SIZE_RECEIVED, .. }
        ));
        assert!(!c.is_connected());
    }

    #[test]
    fn test_read_cycle_top_level_failure_touches_no_signal() {
        let (mut c, mut host) = connected(2, 0);
        c.transport_mut()
            .reads
            .push_back(Err(StatusCode::TCP_RECEIVE_TIMEOUT));

        let err = c.read_cycle(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::TCP_RECEIVE_TIMEOUT, .. }
        ));
        assert!(host.signals.is_empty());
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(host.status, "TCP : Data receive Timeout");
    }

    #[test]
    fn test_read_cycle_answer_count_mismatch() {
        let (mut c, mut host) = connected(2, 0);
        c.transport_mut()
            .reads
            .push_back(Ok(ReadResponse::new(vec![ItemResult::ok(vec![1])])));

        let err = c.read_cycle(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::INVALID_PLC_ANSWER, .. }
        ));
        assert!(host.signals.is_empty());
    }

    #[test]
    fn test_read_cycle_requires_session() {
        let (mut c, mut host) = ready(2, 0);
        assert!(matches!(
            c.read_cycle(&mut host),
            Err(DioError::NotConnected)
        ));
        assert!(c.transport().read_calls.is_empty());
    }

    #[test]
    fn test_read_cycle_without_inputs() {
        let (mut c, mut host) = connected(0, 1);
        assert_eq!(c.read_cycle(&mut host).unwrap(), 0);
        assert!(c.transport().read_calls.is_empty());
        assert!(c.is_connected());
    }

    #[test]
    fn test_read_cycle_too_many_items() {
        let (mut c, mut host) = connected(MAX_ITEMS_PER_READ + 1, 0);

        let err = c.read_cycle(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::TOO_MANY_ITEMS, .. }
        ));
        assert!(c.transport().read_calls.is_empty());
        assert!(!c.is_connected());
    }

    #[test]
    fn test_read_cycle_detects_dropped_session() {
        let (mut c, mut host) = connected(1, 0);
        c.transport_mut().open = false;

        let err = c.read_cycle(&mut host).unwrap_err();
        assert!(matches!(
            err,
            DioError::Protocol { code: StatusCode::TCP_NOT_CONNECTED, .. }
        ));
        assert!(c.transport().read_calls.is_empty());
        assert_eq!(host.status, "CLI : Client not connected");
    }

    #[test]
    fn test_read_cycle_aborts_on_invalid_slot() {
        let (mut c, mut host) = connected(2, 0);
        // Bypass the lock to simulate a slot that lost its address.
        c.inputs.set_address(1, "QW2");

        assert!(matches!(
            c.read_cycle(&mut host),
            Err(DioError::InvalidSlot { index: 1, .. })
        ));
        assert!(c.transport().read_calls.is_empty());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_cycle_logs_invalid_slot() {
        let (mut c, mut host) = connected(2, 0);
        c.inputs.set_address(1, "QW2");

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || c.read_cycle(&mut host));
        assert!(matches!(result, Err(DioError::InvalidSlot { index: 1, .. })));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("read skipped, input slot invalid"), "{output}");
        assert!(output.contains("component=test"), "{output}");
        assert!(output.contains("index=1"), "{output}");
    }

    #[test]
    fn test_write_one() {
        let (mut c, mut host) = connected(0, 2);
        c.write_one(1, true, &mut host).unwrap();
        c.write_one(0, false, &mut host).unwrap();

        let writes = &c.transport().write_calls;
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].item().start, 1);
        assert_eq!(writes[0].data(), &[1]);
        assert_eq!(writes[1].item().start, 0);
        assert_eq!(writes[1].data(), &[0]);
        assert!(c.is_connected());
    }

    #[test]
    fn test_write_one_rejects_bad_slots_without_transport() {
        let (mut c, mut host) = connected(0, 1);

        assert!(matches!(
            c.write_one(4, true, &mut host),
            Err(DioError::InvalidIndex { index: 4, len: 1, .. })
        ));

        c.outputs.set_address(0, "I0.0");
        assert!(matches!(
            c.write_one(0, true, &mut host),
            Err(DioError::InvalidSlot { index: 0, .. })
        ));
        assert!(c.transport().write_calls.is_empty());
        assert!(c.is_connected());
    }

    #[test]
    fn test_write_one_requires_session() {
        let (mut c, mut host) = ready(0, 1);
        assert!(matches!(
            c.write_one(0, true, &mut host),
            Err(DioError::NotConnected)
        ));
        assert!(c.transport().write_calls.is_empty());
    }

    #[test]
    fn test_write_failure_disconnects() {
        let (mut c, mut host) = connected(0, 1);
        c.transport_mut().write_result = Some(StatusCode::ADDRESS_OUT_OF_RANGE);

        let err = c.write_one(0, true, &mut host).unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(c.state(), SessionState::Disconnected);
        assert_eq!(host.status, "CPU : Address out of range");
        assert!(!host.is_read_only(Field::PointCount(Direction::Output)));
    }
}
