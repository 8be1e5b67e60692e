//! oledprobe Hardware Abstraction Layer
//!
//! This crate defines the bus abstraction that chip-specific HALs implement
//! (RP2040 today). Application code builds command-link transactions out of
//! [`i2c::Operation`]s and hands them to a [`CommandBus`] without knowing
//! which controller sits underneath.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  oledprobe-core (sequencer, SH1106)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oledprobe-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ oledprobe-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::CommandBus`] - Atomic START/WRITE/STOP command links

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

// Re-export key types at crate root for convenience
pub use i2c::{AckCheck, BusMode, CommandBus, ConfigError, Direction, I2cConfig, Operation, StatusCode};
