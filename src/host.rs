//! Boundary to the hosting environment.
//!
//! The host owns signal and property storage, the status text and the UI
//! flags. The core reaches them only through the two traits here, by
//! handle, never by name:
//!
//! - [`PointRegistry`] creates and removes the signal/property pair behind
//!   each slot and hands back the current address text of a slot property.
//! - [`Host`] adds the outputs the coordinator drives: signal values, the
//!   status text, read-only flags and trigger visibility.
//!
//! Turning handles into host names is the adapter's job; see
//! [`names`](crate::names) for the naming convention.

use crate::memory::Direction;

/// Opaque handle to a host signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalHandle(pub u64);

/// Opaque handle to a host property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyHandle(pub u64);

/// The signal and the address property bound to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandles {
    /// Point value signal.
    pub signal: SignalHandle,
    /// Address text property.
    pub property: PropertyHandle,
}

/// Host fields that are locked while a session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// PLC IPv4 address.
    EndpointAddress,
    /// PLC rack number.
    Rack,
    /// PLC slot number.
    Slot,
    /// Point count of one direction.
    PointCount(Direction),
    /// Address property of one slot.
    SlotAddress(PropertyHandle),
}

/// Host trigger signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Opens the session when set, closes it when cleared.
    Connect,
    /// Runs one read cycle when set.
    Read,
}

/// Creates and removes the host objects behind slots.
pub trait PointRegistry {
    /// Ensures the signal and address property for `index` exist and
    /// returns their handles.
    ///
    /// Objects that already exist are reused. A newly created property
    /// starts with `default_address`.
    fn attach_point(&mut self, direction: Direction, index: usize, default_address: &str)
        -> SlotHandles;

    /// Removes the signal and property of a slot dropped from the table.
    fn detach_point(&mut self, direction: Direction, index: usize, handles: SlotHandles);

    /// Current text of an address property, if the property exists.
    fn address_text(&self, property: PropertyHandle) -> Option<String>;
}

/// Host outputs driven by the coordinator.
pub trait Host: PointRegistry {
    /// Sets a point signal.
    fn set_signal(&mut self, signal: SignalHandle, value: bool);

    /// Replaces the status text.
    fn set_status(&mut self, status: &str);

    /// Locks or unlocks a field for editing.
    fn set_read_only(&mut self, field: Field, read_only: bool);

    /// Shows or hides a trigger.
    fn set_trigger_visible(&mut self, trigger: Trigger, visible: bool);

    /// Clears the connect trigger without raising a change event.
    fn reset_connect_trigger(&mut self);
}

/// In-memory host shared by the unit tests.
#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingHost {
        next_id: u64,
        pub(crate) points: HashMap<(Direction, usize), SlotHandles>,
        pub(crate) addresses: HashMap<PropertyHandle, String>,
        pub(crate) signals: HashMap<SignalHandle, bool>,
        pub(crate) status: String,
        pub(crate) read_only: HashMap<Field, bool>,
        pub(crate) visible: HashMap<Trigger, bool>,
        pub(crate) connect_resets: usize,
        pub(crate) attach_calls: usize,
        pub(crate) detached: Vec<(Direction, usize)>,
    }

    impl RecordingHost {
        pub(crate) fn handles(&self, direction: Direction, index: usize) -> SlotHandles {
            self.points[&(direction, index)]
        }

        pub(crate) fn set_address(&mut self, direction: Direction, index: usize, text: &str) {
            let property = self.handles(direction, index).property;
            self.addresses.insert(property, text.to_string());
        }

        pub(crate) fn signal(&self, direction: Direction, index: usize) -> Option<bool> {
            self.signals.get(&self.handles(direction, index).signal).copied()
        }

        pub(crate) fn is_read_only(&self, field: Field) -> bool {
            self.read_only.get(&field).copied().unwrap_or(false)
        }

        pub(crate) fn is_visible(&self, trigger: Trigger) -> bool {
            self.visible.get(&trigger).copied().unwrap_or(false)
        }
    }

    impl PointRegistry for RecordingHost {
        fn attach_point(
            &mut self,
            direction: Direction,
            index: usize,
            default_address: &str,
        ) -> SlotHandles {
            self.attach_calls += 1;
            if let Some(handles) = self.points.get(&(direction, index)) {
                return *handles;
            }
            self.next_id += 1;
            let handles = SlotHandles {
                signal: SignalHandle(self.next_id),
                property: PropertyHandle(self.next_id),
            };
            self.points.insert((direction, index), handles);
            self.addresses
                .insert(handles.property, default_address.to_string());
            handles
        }

        fn detach_point(&mut self, direction: Direction, index: usize, handles: SlotHandles) {
            self.points.remove(&(direction, index));
            self.addresses.remove(&handles.property);
            self.signals.remove(&handles.signal);
            self.detached.push((direction, index));
        }

        fn address_text(&self, property: PropertyHandle) -> Option<String> {
            self.addresses.get(&property).cloned()
        }
    }

    impl Host for RecordingHost {
        fn set_signal(&mut self, signal: SignalHandle, value: bool) {
            self.signals.insert(signal, value);
        }

        fn set_status(&mut self, status: &str) {
            self.status = status.to_string();
        }

        fn set_read_only(&mut self, field: Field, read_only: bool) {
            self.read_only.insert(field, read_only);
        }

        fn set_trigger_visible(&mut self, trigger: Trigger, visible: bool) {
            self.visible.insert(trigger, visible);
        }

        fn reset_connect_trigger(&mut self) {
            self.connect_resets += 1;
        }
    }
}
