//! Device command layers
//!
//! Each driver owns a [`CommandBus`](oledprobe_hal::CommandBus) and frames
//! its commands through [`Transaction`](crate::bus::Transaction).

pub mod sh1106;

pub use sh1106::{cmd, CommandReport, ProbeReport, Sh1106};
