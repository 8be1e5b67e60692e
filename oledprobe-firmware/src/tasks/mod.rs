//! Embassy async tasks
//!
//! Thin concrete wrappers around the generic task bodies in
//! `oledprobe-core`.

pub mod sh1106;

pub use sh1106::{sh1106_task, Console, ProbeBus};
