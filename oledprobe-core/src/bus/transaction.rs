//! Command-link transaction builder
//!
//! Layout of every transaction, in wire order:
//!
//! ```text
//! START
//! WRITE(address << 1 | dir)   ack = caller policy
//! WRITE(control)              ack = caller policy     (optional)
//! WRITE(payload)              ack = required          (optional)
//! STOP
//! ```
//!
//! A [`Transaction`] can only be produced by [`TransactionBuilder::build`],
//! so it always starts with exactly one START and ends with exactly one STOP.

use heapless::Vec;
use oledprobe_hal::i2c::address_byte;
use oledprobe_hal::{AckCheck, CommandBus, Direction, Operation};

use super::result::CommandResult;

/// START + three writes + STOP
pub const MAX_OPERATIONS: usize = 5;

/// An immutable, framed command link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    ops: Vec<Operation, MAX_OPERATIONS>,
}

impl Transaction {
    /// Start building a transaction to `address`
    ///
    /// `framing_ack` applies to the address byte and the control byte.
    pub fn builder(address: u8, direction: Direction, framing_ack: AckCheck) -> TransactionBuilder {
        TransactionBuilder {
            address_byte: address_byte(address, direction),
            framing_ack,
            control: None,
            payload: None,
        }
    }

    /// Operations in wire order
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// The WRITE operations only, as `(byte, ack)` pairs
    pub fn writes(&self) -> impl Iterator<Item = (u8, AckCheck)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            Operation::Write { byte, ack } => Some((byte, ack)),
            _ => None,
        })
    }
}

/// Builder for [`Transaction`]
#[derive(Debug, Clone, Copy)]
pub struct TransactionBuilder {
    address_byte: u8,
    framing_ack: AckCheck,
    control: Option<u8>,
    payload: Option<u8>,
}

impl TransactionBuilder {
    /// Append a control byte after the address
    pub fn control(mut self, byte: u8) -> Self {
        self.control = Some(byte);
        self
    }

    /// Append the payload byte (always ACK-checked)
    pub fn payload(mut self, byte: u8) -> Self {
        self.payload = Some(byte);
        self
    }

    /// Produce the framed operation list
    pub fn build(self) -> Transaction {
        let mut ops = Vec::new();

        // Capacity is MAX_OPERATIONS, enough for the longest layout
        let _ = ops.push(Operation::Start);
        let _ = ops.push(Operation::Write {
            byte: self.address_byte,
            ack: self.framing_ack,
        });
        if let Some(byte) = self.control {
            let _ = ops.push(Operation::Write {
                byte,
                ack: self.framing_ack,
            });
        }
        if let Some(byte) = self.payload {
            let _ = ops.push(Operation::Write {
                byte,
                ack: AckCheck::Require,
            });
        }
        let _ = ops.push(Operation::Stop);

        Transaction { ops }
    }
}

/// Submit a transaction as one atomic unit and classify the outcome
///
/// Suspends the caller until the driver finishes or `timeout_ms` elapses.
pub async fn submit<B: CommandBus>(
    bus: &mut B,
    transaction: &Transaction,
    timeout_ms: u32,
) -> CommandResult {
    let status = bus.execute(transaction.operations(), timeout_ms).await;
    CommandResult::from_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBus;
    use embassy_futures::block_on;
    use oledprobe_hal::StatusCode;

    #[test]
    fn test_address_only_layout() {
        let tx = Transaction::builder(0x3C, Direction::Write, AckCheck::Require).build();

        assert_eq!(
            tx.operations(),
            &[
                Operation::Start,
                Operation::Write {
                    byte: 0x78,
                    ack: AckCheck::Require
                },
                Operation::Stop,
            ]
        );
    }

    #[test]
    fn test_full_layout() {
        let tx = Transaction::builder(0x3C, Direction::Write, AckCheck::Ignore)
            .control(0x00)
            .payload(0xAE)
            .build();

        assert_eq!(tx.operations().len(), MAX_OPERATIONS);
        assert_eq!(tx.operations()[0], Operation::Start);
        assert_eq!(tx.operations()[4], Operation::Stop);

        let writes: std::vec::Vec<_> = tx.writes().collect();
        assert_eq!(
            writes,
            [
                (0x78, AckCheck::Ignore),
                (0x00, AckCheck::Ignore),
                (0xAE, AckCheck::Require),
            ]
        );
    }

    #[test]
    fn test_payload_without_control() {
        let tx = Transaction::builder(0x10, Direction::Write, AckCheck::Ignore)
            .payload(0x42)
            .build();

        let writes: std::vec::Vec<_> = tx.writes().collect();
        assert_eq!(writes, [(0x20, AckCheck::Ignore), (0x42, AckCheck::Require)]);
    }

    #[test]
    fn test_submit_passes_ops_and_timeout() {
        let mut bus = MockBus::responding(StatusCode::OK);
        let tx = Transaction::builder(0x3C, Direction::Write, AckCheck::Require).build();

        let result = block_on(submit(&mut bus, &tx, 50));

        assert_eq!(result, CommandResult::Ok);
        assert_eq!(bus.transactions.len(), 1);
        assert_eq!(bus.transactions[0].as_slice(), tx.operations());
        assert_eq!(bus.timeouts, [50]);
    }

    #[test]
    fn test_submit_classifies_driver_status() {
        let mut bus = MockBus::scripted(&[StatusCode::TIMEOUT, StatusCode(5), StatusCode::OK]);
        let tx = Transaction::builder(0x3C, Direction::Write, AckCheck::Require).build();

        assert_eq!(block_on(submit(&mut bus, &tx, 50)), CommandResult::Timeout);
        assert_eq!(
            block_on(submit(&mut bus, &tx, 50)),
            CommandResult::Other(StatusCode(5))
        );
        assert_eq!(block_on(submit(&mut bus, &tx, 50)), CommandResult::Ok);
    }
}
