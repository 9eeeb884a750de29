//! Component configuration.
//!
//! [`Endpoint`] is the PLC a session connects to; [`ComponentConfig`] adds
//! the component name used in log records, the address text new slots start
//! with and the minimum interval between periodic reads.

use std::net::Ipv4Addr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::binding::DEFAULT_ADDRESS;
use crate::error::{DioError, Result};

/// Default PLC address.
pub const DEFAULT_PLC_ADDRESS: &str = "192.168.0.1";

/// Default rack number.
pub const DEFAULT_RACK: u16 = 0;

/// Default slot number.
pub const DEFAULT_SLOT: u16 = 1;

/// Default minimum interval between periodic reads.
pub const DEFAULT_READ_INTERVAL: Duration = Duration::from_millis(100);

/// PLC session target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Endpoint {
    /// Dotted-quad IPv4 address, as the user typed it.
    pub address: String,
    /// Rack number.
    pub rack: u16,
    /// Slot number.
    pub slot: u16,
}

impl Endpoint {
    /// Creates an endpoint.
    ///
    /// The address is not checked here; see [`Endpoint::ip`].
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::Endpoint;
    ///
    /// let endpoint = Endpoint::new("10.0.0.5", 0, 2);
    /// assert!(endpoint.is_valid());
    /// assert!(!Endpoint::new("10.0.0", 0, 2).is_valid());
    /// ```
    pub fn new(address: impl Into<String>, rack: u16, slot: u16) -> Self {
        Self {
            address: address.into(),
            rack,
            slot,
        }
    }

    /// Parses the address as an IPv4 literal.
    ///
    /// # Errors
    ///
    /// Returns [`DioError::InvalidEndpoint`] when the address is not a
    /// dotted-quad IPv4 literal.
    pub fn ip(&self) -> Result<Ipv4Addr> {
        self.address
            .parse()
            .map_err(|_| DioError::invalid_endpoint(&self.address))
    }

    /// Returns whether the address is an IPv4 literal.
    pub fn is_valid(&self) -> bool {
        self.ip().is_ok()
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_PLC_ADDRESS, DEFAULT_RACK, DEFAULT_SLOT)
    }
}

/// Settings of one component instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentConfig {
    /// Name shown in log records.
    pub name: String,
    /// PLC session target.
    pub endpoint: Endpoint,
    /// Address text given to newly created slots.
    pub default_address: String,
    /// Minimum interval between periodic reads. Zero reads on every step.
    pub read_interval: Duration,
}

impl ComponentConfig {
    /// Creates a configuration with default endpoint and timing.
    ///
    /// # Example
    ///
    /// ```
    /// use s7_dio::{ComponentConfig, Endpoint};
    /// use std::time::Duration;
    ///
    /// let config = ComponentConfig::new("press_line")
    ///     .with_endpoint(Endpoint::new("10.0.0.5", 0, 2))
    ///     .with_read_interval(Duration::from_millis(50));
    ///
    /// assert_eq!(config.name, "press_line");
    /// assert_eq!(config.default_address, "M0.0");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: Endpoint::default(),
            default_address: DEFAULT_ADDRESS.to_string(),
            read_interval: DEFAULT_READ_INTERVAL,
        }
    }

    /// Sets the PLC endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the address text for new slots (default is `M0.0`).
    pub fn with_default_address(mut self, address: impl Into<String>) -> Self {
        self.default_address = address.into();
        self
    }

    /// Sets the minimum interval between periodic reads (default is 100 ms).
    pub fn with_read_interval(mut self, interval: Duration) -> Self {
        self.read_interval = interval;
        self
    }
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self::new("s7-dio")
    }
}
