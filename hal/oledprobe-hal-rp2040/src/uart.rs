//! Blocking UART console writer
//!
//! Adapts a blocking `UartTx` to `core::fmt::Write` so it can sit behind
//! the shared console. Writes go straight to the TX FIFO.

use core::fmt;

use embassy_rp::uart::{Blocking, UartTx};

/// Console baud rate
pub const CONSOLE_BAUD: u32 = 115_200;

/// `fmt::Write` adapter over a blocking UART transmitter
pub struct UartConsole<'d> {
    tx: UartTx<'d, Blocking>,
}

impl<'d> UartConsole<'d> {
    pub fn new(tx: UartTx<'d, Blocking>) -> Self {
        Self { tx }
    }
}

impl fmt::Write for UartConsole<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.tx.blocking_write(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
