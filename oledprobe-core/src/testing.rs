//! Host-side test doubles for the bus, delay and console

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use oledprobe_hal::{CommandBus, ConfigError, I2cConfig, Operation, StatusCode};

use crate::console::SharedConsole;

/// Console backed by a growable string
pub type TestConsole = SharedConsole<NoopRawMutex, String>;

/// Scripted command bus that records every transaction
pub struct MockBus {
    /// Statuses returned in order; `fallback` once exhausted
    responses: VecDeque<StatusCode>,
    fallback: StatusCode,
    /// Operation lists in submission order
    pub transactions: Vec<Vec<Operation>>,
    /// Timeouts in submission order
    pub timeouts: Vec<u32>,
    /// Last accepted configuration
    pub configured: Option<I2cConfig>,
}

impl MockBus {
    /// Bus that answers every transaction with `status`
    pub fn responding(status: StatusCode) -> Self {
        Self {
            responses: VecDeque::new(),
            fallback: status,
            transactions: Vec::new(),
            timeouts: Vec::new(),
            configured: None,
        }
    }

    /// Bus that answers with `script` in order, then OK
    pub fn scripted(script: &[StatusCode]) -> Self {
        let mut bus = Self::responding(StatusCode::OK);
        bus.responses.extend(script.iter().copied());
        bus
    }

    /// Bytes written by transaction `index`
    pub fn written(&self, index: usize) -> Vec<u8> {
        self.transactions[index]
            .iter()
            .filter_map(|op| match op {
                Operation::Write { byte, .. } => Some(*byte),
                _ => None,
            })
            .collect()
    }
}

impl CommandBus for MockBus {
    fn configure(&mut self, config: &I2cConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.configured = Some(*config);
        Ok(())
    }

    async fn execute(&mut self, ops: &[Operation], timeout_ms: u32) -> StatusCode {
        self.transactions.push(ops.to_vec());
        self.timeouts.push(timeout_ms);
        self.responses.pop_front().unwrap_or(self.fallback)
    }
}

/// Delay that returns at once and raises `stop` after `stop_after` waits
pub struct MockDelay<'a> {
    /// Requested delays in milliseconds
    pub waits: Vec<u32>,
    stop_after: Option<usize>,
    stop: Option<&'a Signal<NoopRawMutex, ()>>,
}

impl<'a> MockDelay<'a> {
    /// Delay that never raises the stop signal
    pub fn new() -> Self {
        Self {
            waits: Vec::new(),
            stop_after: None,
            stop: None,
        }
    }

    /// Delay that raises `stop` during its `count`-th wait
    pub fn stopping_after(count: usize, stop: &'a Signal<NoopRawMutex, ()>) -> Self {
        Self {
            waits: Vec::new(),
            stop_after: Some(count),
            stop: Some(stop),
        }
    }

    fn record(&mut self, ms: u32) {
        self.waits.push(ms);
        if Some(self.waits.len()) == self.stop_after {
            if let Some(stop) = self.stop {
                stop.signal(());
            }
        }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oledprobe_hal::BusMode;

    #[test]
    fn test_configure_keeps_accepted_config() {
        let mut bus = MockBus::responding(StatusCode::OK);
        let config = I2cConfig {
            frequency: 10_000,
            sda_pullup: false,
            ..I2cConfig::default()
        };

        assert_eq!(bus.configure(&config), Ok(()));
        assert_eq!(bus.configured, Some(config));
    }

    #[test]
    fn test_rejected_config_is_not_retained() {
        let rejected = [
            (
                I2cConfig {
                    mode: BusMode::Slave,
                    ..I2cConfig::default()
                },
                ConfigError::UnsupportedMode,
            ),
            (
                I2cConfig {
                    scl_pin: 4,
                    ..I2cConfig::default()
                },
                ConfigError::InvalidPin,
            ),
            (
                I2cConfig {
                    frequency: 0,
                    ..I2cConfig::default()
                },
                ConfigError::FrequencyOutOfRange,
            ),
        ];

        for (config, error) in rejected {
            let mut bus = MockBus::responding(StatusCode::OK);
            assert_eq!(bus.configure(&config), Err(error));
            assert_eq!(bus.configured, None);
            assert!(bus.transactions.is_empty());
        }
    }
}
