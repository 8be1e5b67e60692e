//! I2C command-link abstractions
//!
//! A command link is an ordered list of bus [`Operation`]s that the
//! controller executes as one atomic unit: the bus is claimed on START and
//! released on STOP, with no other traffic in between. Chip-specific HALs
//! implement [`CommandBus`] to run these lists on real hardware.

use core::fmt;
use core::future::Future;

/// Highest valid 7-bit device address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Highest SCL frequency accepted by [`I2cConfig::validate`] (Fast-mode Plus)
pub const MAX_FREQUENCY_HZ: u32 = 1_000_000;

/// Transfer direction, carried in bit 0 of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    /// Master writes to the device
    Write = 0,
    /// Master reads from the device
    Read = 1,
}

/// Build the first byte of a transfer: `(address << 1) | direction`
///
/// Only the low 7 bits of `address` are used.
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    ((address & MAX_ADDRESS) << 1) | direction as u8
}

/// Whether the master checks the device's ACK after a written byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckCheck {
    /// A missing ACK fails the transaction
    Require,
    /// The ACK bit is clocked but not checked
    Ignore,
}

/// One step of a command link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// START condition (claims the bus)
    Start,
    /// Write a single byte
    Write {
        /// Byte placed on the wire
        byte: u8,
        /// ACK policy for this byte
        ack: AckCheck,
    },
    /// STOP condition (releases the bus)
    Stop,
}

/// Raw driver status code
///
/// Drivers report the outcome of a command link as a plain integer, the
/// way vendor SDKs do. The well-known values are provided as constants;
/// anything else is passed through untouched for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// Transaction completed and every checked byte was acknowledged
    pub const OK: Self = Self(0);
    /// Generic failure (NACK on a checked byte, bus error)
    pub const FAIL: Self = Self(-1);
    /// Malformed command link
    pub const INVALID_ARG: Self = Self(0x102);
    /// Driver not configured, or bus busy
    pub const INVALID_STATE: Self = Self(0x103);
    /// Transaction did not finish within its timeout
    pub const TIMEOUT: Self = Self(0x107);

    /// Check for success
    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    /// Raw integer value
    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Controller role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// This node drives SCL and starts transfers
    #[default]
    Master,
    /// This node answers at its own address
    Slave,
}

/// Errors from one-time bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Requested mode not supported by this driver
    UnsupportedMode,
    /// SDA/SCL pin cannot carry the I2C function (or both are the same pin),
    /// or its pad setup differs from what the driver was built with
    InvalidPin,
    /// Clock frequency is zero or above [`MAX_FREQUENCY_HZ`]
    FrequencyOutOfRange,
    /// The driver rejected the configuration
    Driver,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedMode => write!(f, "unsupported bus mode"),
            ConfigError::InvalidPin => write!(f, "invalid SDA/SCL pin assignment"),
            ConfigError::FrequencyOutOfRange => write!(f, "clock frequency out of range"),
            ConfigError::Driver => write!(f, "driver rejected configuration"),
        }
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Controller role
    pub mode: BusMode,
    /// GPIO number carrying SDA
    pub sda_pin: u8,
    /// GPIO number carrying SCL
    pub scl_pin: u8,
    /// Enable the internal pull-up on SDA
    pub sda_pullup: bool,
    /// Enable the internal pull-up on SCL
    pub scl_pullup: bool,
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            mode: BusMode::Master,
            sda_pin: 4,
            scl_pin: 5,
            sda_pullup: true,
            scl_pullup: true,
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Check the chip-independent constraints
    ///
    /// Chip HALs add their own pin-function checks on top of this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode != BusMode::Master {
            return Err(ConfigError::UnsupportedMode);
        }
        if self.sda_pin == self.scl_pin {
            return Err(ConfigError::InvalidPin);
        }
        if self.frequency == 0 || self.frequency > MAX_FREQUENCY_HZ {
            return Err(ConfigError::FrequencyOutOfRange);
        }
        Ok(())
    }
}

/// I2C command-link master
///
/// Runs a whole operation list as one transaction and reports the raw
/// driver status. Implementations block (or suspend) the calling task until
/// the STOP condition has been sent or `timeout_ms` has elapsed.
pub trait CommandBus {
    /// Apply the one-time bus configuration
    ///
    /// On error nothing of `config` is retained.
    fn configure(&mut self, config: &I2cConfig) -> Result<(), ConfigError>;

    /// Execute a command link
    ///
    /// # Arguments
    /// * `ops` - Operations in wire order, START first and STOP last
    /// * `timeout_ms` - Upper bound on the whole transaction
    fn execute(
        &mut self,
        ops: &[Operation],
        timeout_ms: u32,
    ) -> impl Future<Output = StatusCode>;
}
