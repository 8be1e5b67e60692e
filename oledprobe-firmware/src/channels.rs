//! Inter-task signals
//!
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Raise to end the SH1106 monitor loop before its next iteration
pub static MONITOR_STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
