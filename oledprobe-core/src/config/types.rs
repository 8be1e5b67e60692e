//! Configuration type definitions

use heapless::String;
use oledprobe_hal::i2c::MAX_ADDRESS;
use oledprobe_hal::{ConfigError, I2cConfig};

/// Maximum task name length
pub const MAX_TASK_NAME_LEN: usize = 16;

/// SH1106 7-bit I2C address (0x3C, or 0x3D with SA0 high)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Control byte announcing a command stream
pub const CONTROL_COMMAND_STREAM: u8 = 0x00;

/// Upper bound on one bus transaction
pub const DEFAULT_TIMEOUT_MS: u32 = 50;

/// Delay between monitor iterations
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// 10 kHz is slow enough for a cheap logic analyser
pub const DEFAULT_FREQUENCY_HZ: u32 = 10_000;

/// Name of the worker task
pub const DEFAULT_TASK_NAME: &str = "SH1106_task";

/// Validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Bus section rejected
    Bus(ConfigError),
    /// Device address does not fit in 7 bits
    AddressOutOfRange,
    /// Transaction timeout of zero
    ZeroTimeout,
    /// Monitor interval of zero
    ZeroInterval,
    /// Task name is empty
    EmptyTaskName,
}

impl From<ConfigError> for ValidationError {
    fn from(e: ConfigError) -> Self {
        ValidationError::Bus(e)
    }
}

/// SH1106 framing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Byte sent between address and command
    pub control_byte: u8,
    /// Transaction timeout (ms)
    pub timeout_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            control_byte: CONTROL_COMMAND_STREAM,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Monitor loop parameters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Name used in log markers
    pub task_name: String<MAX_TASK_NAME_LEN>,
    /// Delay between iterations (ms)
    pub interval_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let mut task_name = String::new();
        let _ = task_name.push_str(DEFAULT_TASK_NAME);
        Self {
            task_name,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// Complete probe configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeConfig {
    /// One-time bus setup
    pub bus: I2cConfig,
    /// SH1106 framing
    pub device: DeviceConfig,
    /// Monitor loop
    pub monitor: MonitorConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            bus: I2cConfig {
                frequency: DEFAULT_FREQUENCY_HZ,
                ..I2cConfig::default()
            },
            device: DeviceConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl ProbeConfig {
    /// Check every section
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bus.validate()?;

        if self.device.address > MAX_ADDRESS {
            return Err(ValidationError::AddressOutOfRange);
        }
        if self.device.timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        if self.monitor.interval_ms == 0 {
            return Err(ValidationError::ZeroInterval);
        }
        if self.monitor.task_name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }

        Ok(())
    }
}
