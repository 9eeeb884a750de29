//! Point tables.
//!
//! A [`BindingTable`] holds the slots of one [`Direction`] as one dense,
//! index-addressed sequence. Each [`BindingSlot`] keeps its address text,
//! the parsed [`MemoryReference`], whether that reference is usable for the
//! direction, and the host handles of its signal and property.
//!
//! # Validity
//!
//! A slot is valid when its text parses, addresses a single bit and lies in
//! an area the direction permits. An empty table counts as all valid so a
//! direction with no points never blocks a connection.
//!
//! # Example
//!
//! ```
//! use s7_dio::{BindingTable, Direction, PointRegistry, PropertyHandle, SignalHandle, SlotHandles, ValidationOutcome};
//!
//! struct Counter(u64);
//!
//! impl PointRegistry for Counter {
//!     fn attach_point(&mut self, _: Direction, _: usize, _: &str) -> SlotHandles {
//!         self.0 += 1;
//!         SlotHandles { signal: SignalHandle(self.0), property: PropertyHandle(self.0) }
//!     }
//!     fn detach_point(&mut self, _: Direction, _: usize, _: SlotHandles) {}
//!     fn address_text(&self, _: PropertyHandle) -> Option<String> { None }
//! }
//!
//! let mut registry = Counter(0);
//! let mut outputs = BindingTable::new(Direction::Output);
//! assert!(outputs.all_valid());
//!
//! outputs.resize(2, &mut registry);
//! assert!(!outputs.all_valid());
//!
//! assert_eq!(outputs.set_address(0, "Q0.0"), ValidationOutcome::Valid);
//! assert_eq!(outputs.set_address(1, "I0.0"), ValidationOutcome::InvalidSyntax);
//! assert_eq!(outputs.set_address(2, "Q0.1"), ValidationOutcome::InvalidIndex);
//! ```

use tracing::debug;

use crate::address::{parse, MemoryReference};
use crate::error::{DioError, Result};
use crate::host::{PointRegistry, SlotHandles};
use crate::memory::Direction;

/// Address text given to newly created slots.
pub const DEFAULT_ADDRESS: &str = "M0.0";

/// Result of assigning an address to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The address is usable for the slot.
    Valid,
    /// The text does not parse, is not a bit or lies in a forbidden area.
    InvalidSyntax,
    /// No slot with that index exists.
    InvalidIndex,
}

impl ValidationOutcome {
    /// Returns whether the outcome is [`ValidationOutcome::Valid`].
    pub fn is_valid(self) -> bool {
        self == ValidationOutcome::Valid
    }
}

/// One configured digital point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSlot {
    index: usize,
    direction: Direction,
    address_text: String,
    parsed: Option<MemoryReference>,
    is_valid: bool,
    handles: SlotHandles,
}

impl BindingSlot {
    fn new(index: usize, direction: Direction, address_text: &str, handles: SlotHandles) -> Self {
        Self {
            index,
            direction,
            address_text: address_text.to_string(),
            parsed: None,
            is_valid: false,
            handles,
        }
    }

    /// Position in the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Direction of the owning table.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Address text as last assigned.
    pub fn address_text(&self) -> &str {
        &self.address_text
    }

    /// Parsed reference, if the text parsed.
    pub fn reference(&self) -> Option<&MemoryReference> {
        self.parsed.as_ref()
    }

    /// Returns whether the address is usable for this slot.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Host handles of the slot's signal and property.
    pub fn handles(&self) -> SlotHandles {
        self.handles
    }

    fn assign(&mut self, text: &str) -> ValidationOutcome {
        self.address_text = text.to_string();
        self.parsed = parse(text).ok();
        self.is_valid = self
            .parsed
            .is_some_and(|reference| reference.is_bit() && self.direction.permits(reference.area()));
        if self.is_valid {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::InvalidSyntax
        }
    }
}

/// The ordered slots of one direction.
#[derive(Debug, Clone)]
pub struct BindingTable {
    direction: Direction,
    default_address: String,
    slots: Vec<BindingSlot>,
}

impl BindingTable {
    /// Creates an empty table whose new slots start at [`DEFAULT_ADDRESS`].
    pub fn new(direction: Direction) -> Self {
        Self::with_default_address(direction, DEFAULT_ADDRESS)
    }

    /// Creates an empty table whose new slots start at `default_address`.
    pub fn with_default_address(direction: Direction, default_address: impl Into<String>) -> Self {
        Self {
            direction,
            default_address: default_address.into(),
            slots: Vec::new(),
        }
    }

    /// Direction of every slot in the table.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the table holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&BindingSlot> {
        self.slots.get(index)
    }

    /// Slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::InvalidIndex`] if `index` is out of bounds.
    pub fn slot(&self, index: usize) -> Result<&BindingSlot> {
        self.slots
            .get(index)
            .ok_or_else(|| DioError::invalid_index(self.direction, index, self.slots.len()))
    }

    /// Slots in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, BindingSlot> {
        self.slots.iter()
    }

    /// Grows or shrinks the table to exactly `new_count` slots.
    ///
    /// New slots are appended with the default address, marked invalid,
    /// and get their handles from `registry`. Removed slots are taken from
    /// the tail and their handles are released through `registry`.
    pub fn resize<R: PointRegistry + ?Sized>(&mut self, new_count: usize, registry: &mut R) {
        let old_count = self.slots.len();
        if new_count == old_count {
            return;
        }
        debug!(direction = %self.direction, old_count, new_count, "resizing point table");

        if new_count > old_count {
            self.slots.reserve(new_count - old_count);
            for index in old_count..new_count {
                let handles = registry.attach_point(self.direction, index, &self.default_address);
                self.slots.push(BindingSlot::new(
                    index,
                    self.direction,
                    &self.default_address,
                    handles,
                ));
            }
        } else {
            while self.slots.len() > new_count {
                if let Some(slot) = self.slots.pop() {
                    registry.detach_point(self.direction, slot.index, slot.handles);
                }
            }
        }
    }

    /// Assigns `text` to the slot at `index` and re-validates it.
    pub fn set_address(&mut self, index: usize, text: &str) -> ValidationOutcome {
        match self.slots.get_mut(index) {
            Some(slot) => slot.assign(text),
            None => ValidationOutcome::InvalidIndex,
        }
    }

    /// Re-reads every slot's address from its host property and
    /// re-validates it. Slots whose property is gone keep their text.
    pub fn sync_from<R: PointRegistry + ?Sized>(&mut self, registry: &R) {
        for slot in &mut self.slots {
            let text = registry
                .address_text(slot.handles.property)
                .unwrap_or_else(|| slot.address_text.clone());
            slot.assign(&text);
        }
    }

    /// Returns whether every slot is valid. True for an empty table.
    pub fn all_valid(&self) -> bool {
        self.slots.iter().all(BindingSlot::is_valid)
    }

    /// Indices of the slots that are not valid.
    pub fn invalid_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|slot| !slot.is_valid)
            .map(BindingSlot::index)
            .collect()
    }

    /// The reference of a valid slot.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::InvalidIndex`] for an index out of bounds and
    /// [`DioError::InvalidSlot`] when the slot's address is not valid.
    pub fn valid_reference(&self, index: usize) -> Result<MemoryReference> {
        let slot = self.slot(index)?;
        match slot.parsed {
            Some(reference) if slot.is_valid => Ok(reference),
            _ => Err(DioError::InvalidSlot {
                direction: self.direction,
                index,
            }),
        }
    }
}
