//! RP2040-specific HAL for the oledprobe firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `oledprobe-hal` traits, plus RP2040-specific helpers:
//!
//! - I2C command bus over `embassy-rp` (implements `oledprobe_hal::CommandBus`)
//! - I2C pin-function table for config validation
//! - Blocking UART console writer

#![no_std]

pub mod i2c;
pub mod pins;
pub mod uart;
