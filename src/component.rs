//! Lifecycle adapter.
//!
//! [`Component`] turns the host's lifecycle hooks into coordinator calls:
//!
//! | Hook | Effect |
//! |------|--------|
//! | [`Component::on_load`] | disconnect, size both tables, pull addresses |
//! | [`Component::on_property_changed`] | endpoint edit, resize or address edit |
//! | [`Component::on_signal_changed`] | connect/disconnect, read now, write an output |
//! | [`Component::on_simulation_step`] | periodic read, throttled by the read interval |
//!
//! Hosts that identify properties and signals by name can build the change
//! events with [`PropertyChange::from_host`] and [`SignalChange::from_host`].

use std::time::Duration;

use tracing::debug;

use crate::address::MemoryReference;
use crate::binding::ValidationOutcome;
use crate::config::ComponentConfig;
use crate::coordinator::Coordinator;
use crate::error::{DioError, Result};
use crate::host::{Host, Trigger};
use crate::memory::Direction;
use crate::names::PointName;
use crate::transport::Transport;
use crate::utils::parse_decimal;

/// A host property that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyChange<'a> {
    /// PLC address text.
    EndpointAddress(&'a str),
    /// PLC rack number.
    Rack(u16),
    /// PLC slot number.
    Slot(u16),
    /// Point count of one direction.
    PointCount(Direction, usize),
    /// Address text of one slot.
    SlotAddress(Direction, usize, &'a str),
}

impl<'a> PropertyChange<'a> {
    /// Builds a change from a host property name and its text value.
    ///
    /// Returns `None` for names this component does not own and for
    /// numeric properties whose value is not a decimal integer.
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::{Direction, PropertyChange};
    ///
    /// assert_eq!(
    ///     PropertyChange::from_host("DI_Number", "4"),
    ///     Some(PropertyChange::PointCount(Direction::Input, 4))
    /// );
    /// assert_eq!(
    ///     PropertyChange::from_host("DO_Address_1", "Q0.1"),
    ///     Some(PropertyChange::SlotAddress(Direction::Output, 1, "Q0.1"))
    /// );
    /// assert_eq!(PropertyChange::from_host("Status", "Connected"), None);
    /// ```
    pub fn from_host(name: &str, value: &'a str) -> Option<Self> {
        match name.parse::<PointName>().ok()? {
            PointName::PlcAddress => Some(PropertyChange::EndpointAddress(value)),
            PointName::PlcRack => parse_decimal(value).map(PropertyChange::Rack),
            PointName::PlcSlot => parse_decimal(value).map(PropertyChange::Slot),
            PointName::Count(direction) => {
                parse_decimal(value).map(|count| PropertyChange::PointCount(direction, count))
            }
            PointName::Address(direction, index) => {
                Some(PropertyChange::SlotAddress(direction, index, value))
            }
            _ => None,
        }
    }
}

/// A host signal that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalChange {
    /// A trigger went high or low.
    Trigger(Trigger, bool),
    /// A point signal changed.
    Point(Direction, usize, bool),
}

impl SignalChange {
    /// Builds a change from a host signal name and its new value.
    ///
    /// Returns `None` for names this component does not own.
    pub fn from_host(name: &str, value: bool) -> Option<Self> {
        match name.parse::<PointName>().ok()? {
            PointName::Trigger(trigger) => Some(SignalChange::Trigger(trigger, value)),
            PointName::Signal(direction, index) => Some(SignalChange::Point(direction, index, value)),
            _ => None,
        }
    }
}

/// One hosted component instance.
#[derive(Debug)]
pub struct Component<T: Transport> {
    coordinator: Coordinator<T>,
    read_interval: Duration,
    last_read: Option<Duration>,
}

impl<T: Transport> Component<T> {
    /// Creates a component around `transport`.
    pub fn new(transport: T, config: ComponentConfig) -> Self {
        Self {
            read_interval: config.read_interval,
            coordinator: Coordinator::new(transport, config),
            last_read: None,
        }
    }

    /// The owned coordinator.
    pub fn coordinator(&self) -> &Coordinator<T> {
        &self.coordinator
    }

    /// The owned coordinator, mutably.
    pub fn coordinator_mut(&mut self) -> &mut Coordinator<T> {
        &mut self.coordinator
    }

    /// Handles the host's load hook.
    ///
    /// Closes any session left over from a previous run, sizes both tables
    /// from the stored counts and pulls every slot address from the host.
    pub fn on_load<H: Host + ?Sized>(
        &mut self,
        input_count: usize,
        output_count: usize,
        host: &mut H,
    ) -> Result<()> {
        self.coordinator.disconnect(host);
        self.coordinator.resize(Direction::Input, input_count, host)?;
        self.coordinator.resize(Direction::Output, output_count, host)?;
        self.coordinator.sync_addresses(host);
        self.last_read = None;
        Ok(())
    }

    /// Handles a property change.
    ///
    /// # Errors
    ///
    /// - [`DioError::Locked`] while connected
    /// - [`DioError::InvalidEndpoint`] for a PLC address that is not IPv4
    /// - [`DioError::Syntax`] for slot text that does not parse
    /// - [`DioError::InvalidSlot`] for slot text that parses but is not a
    ///   bit the slot's direction may use
    /// - [`DioError::InvalidIndex`] for a slot that does not exist
    ///
    /// The new value is kept in every case except `Locked`; the connect gate
    /// reflects it.
    pub fn on_property_changed<H: Host + ?Sized>(
        &mut self,
        change: PropertyChange<'_>,
        host: &mut H,
    ) -> Result<()> {
        match change {
            PropertyChange::EndpointAddress(address) => {
                self.coordinator.set_endpoint_address(address, host)
            }
            PropertyChange::Rack(rack) => self.coordinator.set_rack(rack),
            PropertyChange::Slot(slot) => self.coordinator.set_slot(slot),
            PropertyChange::PointCount(direction, count) => {
                self.coordinator.resize(direction, count, host)?;
                self.coordinator.sync_addresses(host);
                Ok(())
            }
            PropertyChange::SlotAddress(direction, index, text) => {
                match self.coordinator.set_address(direction, index, text, host)? {
                    ValidationOutcome::Valid => Ok(()),
                    ValidationOutcome::InvalidIndex => Err(DioError::invalid_index(
                        direction,
                        index,
                        self.coordinator.table(direction).len(),
                    )),
                    ValidationOutcome::InvalidSyntax => match text.parse::<MemoryReference>() {
                        Err(err) => Err(err.into()),
                        Ok(_) => Err(DioError::InvalidSlot { direction, index }),
                    },
                }
            }
        }
    }

    /// Handles a signal change.
    ///
    /// `Connect` going high opens the session when the gate is open and
    /// closes it otherwise; going low closes it. `Read` going high runs one
    /// read cycle. An output point change writes that point. Input point
    /// changes are the component's own writes and are ignored, as are reads
    /// and writes while disconnected.
    ///
    /// # Errors
    ///
    /// Returns the coordinator error of the triggered operation.
    pub fn on_signal_changed<H: Host + ?Sized>(
        &mut self,
        change: SignalChange,
        host: &mut H,
    ) -> Result<()> {
        match change {
            SignalChange::Trigger(Trigger::Connect, true) => {
                if self.coordinator.can_connect() {
                    self.last_read = None;
                    self.coordinator.connect(host)
                } else {
                    self.coordinator.disconnect(host);
                    Ok(())
                }
            }
            SignalChange::Trigger(Trigger::Connect, false) => {
                self.coordinator.disconnect(host);
                Ok(())
            }
            SignalChange::Trigger(Trigger::Read, true) => {
                ignore_idle(self.coordinator.read_cycle(host)).map(|_| ())
            }
            SignalChange::Trigger(Trigger::Read, false) => Ok(()),
            SignalChange::Point(Direction::Output, index, value) => {
                ignore_idle(self.coordinator.write_one(index, value, host))
            }
            SignalChange::Point(Direction::Input, ..) => Ok(()),
        }
    }

    /// Handles a simulation step at simulated time `now`.
    ///
    /// Runs a read cycle when connected and at least the read interval has
    /// passed since the previous periodic read. Returns the number of
    /// signals updated.
    ///
    /// # Errors
    ///
    /// Returns the read cycle error; the session is then closed.
    pub fn on_simulation_step<H: Host + ?Sized>(
        &mut self,
        now: Duration,
        host: &mut H,
    ) -> Result<usize> {
        if !self.coordinator.is_connected() {
            return Ok(0);
        }
        if let Some(last) = self.last_read {
            if now.saturating_sub(last) < self.read_interval {
                return Ok(0);
            }
        }
        self.last_read = Some(now);
        ignore_idle(self.coordinator.read_cycle(host))
    }
}

/// Treats an operation rejected for lack of a session as a no-op.
fn ignore_idle<R: Default>(result: Result<R>) -> Result<R> {
    match result {
        Err(DioError::NotConnected) => {
            debug!("operation skipped, not connected");
            Ok(R::default())
        }
        other => other,
    }
}
