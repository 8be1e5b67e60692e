//! SH1106 OLED command layer
//!
//! Frames single SH1106 commands for the command bus:
//!
//! - presence probe: address byte only, ACK required
//! - command: address byte and control byte with ACK ignored, then the
//!   command byte with ACK required
//!
//! The control byte `0x00` tells the controller that a command stream
//! follows, not display data.

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use oledprobe_hal::{AckCheck, CommandBus, Direction};

use crate::bus::{submit, CommandResult, Transaction};
use crate::config::DeviceConfig;
use crate::console::SharedConsole;

/// SH1106 commands used by bring-up
pub mod cmd {
    /// Display off (sleep mode)
    pub const DISPLAY_OFF: u8 = 0xAE;
}

/// Log name of the bring-up command
pub const DISPLAY_OFF_NAME: &str = "SH1106_DISPLAYOFF";

/// Console line for a presence probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport(pub CommandResult);

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RESULT of check_SH1106: {}", self.0)
    }
}

/// Log line for a named command
///
/// `send_command` logs exactly this text and hands the report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandReport<'a> {
    /// Log name, e.g. `SH1106_DISPLAYOFF`
    pub name: &'a str,
    pub result: CommandResult,
}

impl fmt::Display for CommandReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.is_ok() {
            write!(f, "COMMAND[{}] SUCCEEDED", self.name)
        } else {
            write!(f, "COMMAND[{}] FAILED: {}", self.name, self.result)
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandReport<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", defmt::Display2Format(self))
    }
}

/// SH1106 driver over a command bus
pub struct Sh1106<B> {
    bus: B,
    config: DeviceConfig,
}

impl<B: CommandBus> Sh1106<B> {
    /// Create a driver for an already configured bus
    pub fn new(bus: B, config: DeviceConfig) -> Self {
        Self { bus, config }
    }

    /// Address-only presence probe
    pub fn probe_transaction(&self) -> Transaction {
        Transaction::builder(self.config.address, Direction::Write, AckCheck::Require).build()
    }

    /// Single-command transaction for `command`
    pub fn command_transaction(&self, command: u8) -> Transaction {
        Transaction::builder(self.config.address, Direction::Write, AckCheck::Ignore)
            .control(self.config.control_byte)
            .payload(command)
            .build()
    }

    /// Check that a device acknowledges its address
    pub async fn probe(&mut self) -> CommandResult {
        let transaction = self.probe_transaction();
        submit(&mut self.bus, &transaction, self.config.timeout_ms).await
    }

    /// Send one command byte and log the outcome under `name`
    ///
    /// Returns the logged report with the full result; Timeout and Other
    /// both log as FAILED.
    pub async fn send_command<'n>(&mut self, command: u8, name: &'n str) -> CommandReport<'n> {
        let transaction = self.command_transaction(command);
        let result = submit(&mut self.bus, &transaction, self.config.timeout_ms).await;
        let report = CommandReport { name, result };

        if result.is_ok() {
            #[cfg(feature = "defmt")]
            defmt::info!("{}", report);
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("{}", report);
        }

        report
    }

    /// Bring the controller to a known state
    ///
    /// Puts the panel to sleep; nothing else is required before monitoring.
    pub async fn initialize(&mut self) -> CommandReport<'static> {
        self.send_command(cmd::DISPLAY_OFF, DISPLAY_OFF_NAME).await
    }

    /// Probe and write the outcome to the console as one line
    ///
    /// The console line is written before the result is returned, so the
    /// caller never acts on an unreported result.
    pub async fn check_and_report<M: RawMutex, W: Write>(
        &mut self,
        console: &SharedConsole<M, W>,
    ) -> CommandResult {
        let result = self.probe().await;

        // A console write error leaves nothing else to report to
        let _ = console.write_line(ProbeReport(result)).await;

        result
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBus, TestConsole};
    use embassy_futures::block_on;
    use oledprobe_hal::{Operation, StatusCode};
    use proptest::prelude::*;
    use std::string::{String, ToString};

    fn device(bus: MockBus) -> Sh1106<MockBus> {
        Sh1106::new(bus, DeviceConfig::default())
    }

    #[test]
    fn test_probe_frames_address_only() {
        let mut dev = device(MockBus::responding(StatusCode::OK));

        assert_eq!(block_on(dev.probe()), CommandResult::Ok);

        let bus = dev.release();
        assert_eq!(
            bus.transactions[0],
            [
                Operation::Start,
                Operation::Write {
                    byte: 0x78,
                    ack: AckCheck::Require
                },
                Operation::Stop,
            ]
        );
        assert_eq!(bus.timeouts, [50]);
    }

    #[test]
    fn test_initialize_sends_display_off() {
        let mut dev = device(MockBus::responding(StatusCode::OK));

        let report = block_on(dev.initialize());
        assert_eq!(report.result, CommandResult::Ok);
        assert_eq!(report.to_string(), "COMMAND[SH1106_DISPLAYOFF] SUCCEEDED");
        assert_eq!(dev.bus().written(0), [0x78, 0x00, 0xAE]);
    }

    #[test]
    fn test_send_command_keeps_failure_detail() {
        let mut dev = device(MockBus::responding(StatusCode(5)));

        let report = block_on(dev.send_command(0xAF, "SH1106_DISPLAYON"));
        assert_eq!(report.result, CommandResult::Other(StatusCode(5)));
        assert_eq!(report.to_string(), "COMMAND[SH1106_DISPLAYON] FAILED: UNKNOWN 5");
        assert_eq!(dev.bus().written(0), [0x78, 0x00, 0xAF]);
    }

    #[test]
    fn test_initialize_timeout_logs_failed() {
        let mut dev = device(MockBus::responding(StatusCode::TIMEOUT));

        let report = block_on(dev.initialize());
        assert_eq!(report.name, DISPLAY_OFF_NAME);
        assert_eq!(report.to_string(), "COMMAND[SH1106_DISPLAYOFF] FAILED: TIMEOUT");
    }

    #[test]
    fn test_custom_address_and_control() {
        let config = DeviceConfig {
            address: 0x3D,
            control_byte: 0x80,
            timeout_ms: 20,
        };
        let mut dev = Sh1106::new(MockBus::responding(StatusCode::OK), config);

        block_on(dev.send_command(cmd::DISPLAY_OFF, DISPLAY_OFF_NAME));
        assert_eq!(dev.bus().written(0), [0x7A, 0x80, 0xAE]);
        assert_eq!(dev.bus().timeouts, [20]);
    }

    #[test]
    fn test_check_and_report_lines() {
        let cases = [
            (StatusCode::OK, "RESULT of check_SH1106: OK\r\n"),
            (StatusCode::TIMEOUT, "RESULT of check_SH1106: TIMEOUT\r\n"),
            (StatusCode::FAIL, "RESULT of check_SH1106: UNKNOWN -1\r\n"),
        ];

        for (status, expected) in cases {
            let console = TestConsole::new(String::new());
            let mut dev = device(MockBus::responding(status));

            let result = block_on(dev.check_and_report(&console));

            assert_eq!(result, CommandResult::from_status(status));
            assert_eq!(console.into_inner(), expected);
        }
    }

    #[test]
    fn test_command_report_text() {
        let ok = CommandReport {
            name: DISPLAY_OFF_NAME,
            result: CommandResult::Ok,
        };
        assert_eq!(ok.to_string(), "COMMAND[SH1106_DISPLAYOFF] SUCCEEDED");

        let failed = CommandReport {
            name: DISPLAY_OFF_NAME,
            result: CommandResult::Timeout,
        };
        assert_eq!(
            failed.to_string(),
            "COMMAND[SH1106_DISPLAYOFF] FAILED: TIMEOUT"
        );
    }

    #[test]
    fn test_repeated_probe_of_silent_address_times_out() {
        let mut dev = device(MockBus::responding(StatusCode::TIMEOUT));

        for _ in 0..8 {
            assert_eq!(block_on(dev.probe()), CommandResult::Timeout);
        }
        assert_eq!(dev.bus().transactions.len(), 8);
    }

    proptest! {
        #[test]
        fn probe_writes_only_address(address in 0u8..=0x7F) {
            let config = DeviceConfig { address, ..DeviceConfig::default() };
            let dev = Sh1106::new(MockBus::responding(StatusCode::OK), config);

            let tx = dev.probe_transaction();
            let writes: std::vec::Vec<_> = tx.writes().collect();
            prop_assert_eq!(writes, [(address << 1, AckCheck::Require)]);
        }

        #[test]
        fn command_writes_three_bytes(command in any::<u8>()) {
            let dev = device(MockBus::responding(StatusCode::OK));

            let tx = dev.command_transaction(command);
            let ops = tx.operations();
            prop_assert_eq!(ops.first(), Some(&Operation::Start));
            prop_assert_eq!(ops.last(), Some(&Operation::Stop));
            prop_assert_eq!(ops.iter().filter(|op| **op == Operation::Start).count(), 1);
            prop_assert_eq!(ops.iter().filter(|op| **op == Operation::Stop).count(), 1);

            let writes: std::vec::Vec<_> = tx.writes().collect();
            prop_assert_eq!(
                writes,
                [
                    (0x78, AckCheck::Ignore),
                    (0x00, AckCheck::Ignore),
                    (command, AckCheck::Require),
                ]
            );
        }

        #[test]
        fn silent_probe_is_idempotent(address in 0u8..=0x7F, repeats in 1usize..16) {
            let config = DeviceConfig { address, ..DeviceConfig::default() };
            let mut dev = Sh1106::new(MockBus::responding(StatusCode::TIMEOUT), config);

            for _ in 0..repeats {
                prop_assert_eq!(block_on(dev.probe()), CommandResult::Timeout);
            }
        }
    }
}
