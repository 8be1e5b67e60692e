//! Device bring-up sequencer
//!
//! Presence probe, then power-off command. The first failure ends the
//! sequence; there are no retries and no way back to an earlier step.

pub mod machine;

pub use machine::{run_bring_up, BringUp, BringUpState, BringUpStep};
