//! Shared, mutex-guarded console
//!
//! Every status line goes through one [`SharedConsole`]. A line is written
//! while the lock is held, so reports from different tasks never interleave
//! mid-line.
//!
//! The console is created once by the initialisation context and handed to
//! tasks by reference (`&'static` on target). Tasks never tear it down; it
//! lives as long as its owner.

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

/// Line terminator expected by serial terminals
pub const LINE_END: &str = "\r\n";

/// Console writer guarded by an async mutex
pub struct SharedConsole<M: RawMutex, W> {
    writer: Mutex<M, W>,
}

impl<M: RawMutex, W> SharedConsole<M, W> {
    /// Wrap a writer
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Acquire the console for a multi-part write
    ///
    /// The guard releases the console when dropped.
    pub async fn lock(&self) -> MutexGuard<'_, M, W> {
        self.writer.lock().await
    }

    /// Take the writer back
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<M: RawMutex, W: Write> SharedConsole<M, W> {
    /// Write one `\r\n`-terminated line under the lock
    pub async fn write_line(&self, line: impl fmt::Display) -> fmt::Result {
        let mut writer = self.writer.lock().await;
        write!(writer, "{}{}", line, LINE_END)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestConsole;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use std::string::String;

    #[test]
    fn test_write_line_appends_crlf() {
        let console = TestConsole::new(String::new());
        block_on(console.write_line("RESULT of check_SH1106: OK")).unwrap();
        assert_eq!(console.into_inner(), "RESULT of check_SH1106: OK\r\n");
    }

    #[test]
    fn test_lock_allows_multi_part_line() {
        let console = TestConsole::new(String::new());
        block_on(async {
            let mut out = console.lock().await;
            out.push_str("RESULT of check_SH1106: ");
            out.push_str("TIMEOUT\r\n");
        });
        assert_eq!(console.into_inner(), "RESULT of check_SH1106: TIMEOUT\r\n");
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave() {
        let console = TestConsole::new(String::new());

        let first = async {
            let mut out = console.lock().await;
            out.push_str("first ");
            // Give the other writer a chance to run while the lock is held
            embassy_futures::yield_now().await;
            out.push_str("line\r\n");
        };
        let second = async {
            console.write_line("second line").await.unwrap();
        };
        block_on(join(first, second));

        assert_eq!(console.into_inner(), "first line\r\nsecond line\r\n");
    }
}
