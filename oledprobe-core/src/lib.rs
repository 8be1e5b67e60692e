//! Board-agnostic core logic for the SH1106 probe firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Command-link transaction builder and result classification
//! - SH1106 command framing (probe, single commands, bring-up)
//! - Mutex-guarded console shared by every reporting call site
//! - Bring-up sequencer (presence, then power-off)
//! - Cancellable monitor loop and the worker task that ties it together
//! - Configuration types, validation and the `probe.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod console;
pub mod device;
pub mod monitor;
pub mod sequencer;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;
