//! Host naming convention.
//!
//! The host stores signals and properties under string keys. This module is
//! the only place those keys are built or taken apart:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `DI_<n>` / `DO_<n>` | point signal of input / output slot `n` |
//! | `DI_Address_<n>` / `DO_Address_<n>` | address property of slot `n` |
//! | `DI_Number` / `DO_Number` | point count of a direction |
//! | `PLC_Addr`, `PLC_Rack`, `PLC_Slot` | endpoint fields |
//! | `Status` | status text |
//! | `Connect`, `Read` | trigger signals |
//!
//! # Example
//!
//! ```
//! use s7_dio::names::PointName;
//! use s7_dio::Direction;
//!
//! let name: PointName = "DO_Address_3".parse().unwrap();
//! assert_eq!(name, PointName::Address(Direction::Output, 3));
//! assert_eq!(PointName::Signal(Direction::Input, 0).to_string(), "DI_0");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::host::Trigger;
use crate::memory::Direction;
use crate::utils::parse_decimal;

const ADDRESS_INFIX: &str = "Address_";
const NUMBER_SUFFIX: &str = "Number";

/// A host signal or property key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointName {
    /// Point signal of one slot.
    Signal(Direction, usize),
    /// Address property of one slot.
    Address(Direction, usize),
    /// Point count property of one direction.
    Count(Direction),
    /// PLC address property.
    PlcAddress,
    /// PLC rack property.
    PlcRack,
    /// PLC slot property.
    PlcSlot,
    /// Status text property.
    Status,
    /// Trigger signal.
    Trigger(Trigger),
}

fn prefix(direction: Direction) -> &'static str {
    match direction {
        Direction::Input => "DI_",
        Direction::Output => "DO_",
    }
}

impl fmt::Display for PointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointName::Signal(direction, index) => write!(f, "{}{}", prefix(*direction), index),
            PointName::Address(direction, index) => {
                write!(f, "{}{}{}", prefix(*direction), ADDRESS_INFIX, index)
            }
            PointName::Count(direction) => write!(f, "{}{}", prefix(*direction), NUMBER_SUFFIX),
            PointName::PlcAddress => f.write_str("PLC_Addr"),
            PointName::PlcRack => f.write_str("PLC_Rack"),
            PointName::PlcSlot => f.write_str("PLC_Slot"),
            PointName::Status => f.write_str("Status"),
            PointName::Trigger(Trigger::Connect) => f.write_str("Connect"),
            PointName::Trigger(Trigger::Read) => f.write_str("Read"),
        }
    }
}

/// Error for a key outside the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown host name '{0}'")]
pub struct UnknownName(pub String);

impl FromStr for PointName {
    type Err = UnknownName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let fixed = match name {
            "PLC_Addr" => Some(PointName::PlcAddress),
            "PLC_Rack" => Some(PointName::PlcRack),
            "PLC_Slot" => Some(PointName::PlcSlot),
            "Status" => Some(PointName::Status),
            "Connect" => Some(PointName::Trigger(Trigger::Connect)),
            "Read" => Some(PointName::Trigger(Trigger::Read)),
            _ => None,
        };
        if let Some(fixed) = fixed {
            return Ok(fixed);
        }

        Direction::ALL
            .into_iter()
            .find_map(|direction| {
                let rest = name.strip_prefix(prefix(direction))?;
                if rest == NUMBER_SUFFIX {
                    return Some(PointName::Count(direction));
                }
                match rest.strip_prefix(ADDRESS_INFIX) {
                    Some(index) => parse_decimal(index).map(|i| PointName::Address(direction, i)),
                    None => parse_decimal(rest).map(|i| PointName::Signal(direction, i)),
                }
            })
            .ok_or_else(|| UnknownName(name.to_string()))
    }
}
