//! Configuration types
//!
//! Device and protocol constants live in [`ProbeConfig`], parsed from
//! `probe.toml` and validated once at startup.

pub mod toml;
pub mod types;

pub use toml::{load_config, parse_config, LoadError, ParseError};
pub use types::*;
