//! Bring-up state machine
//!
//! ```text
//! Presence --Ok--> PowerOff --Ok--> Monitoring
//!     |                |
//!     +--err--> Failed <--err--+
//! ```

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use oledprobe_hal::CommandBus;

use crate::bus::CommandResult;
use crate::console::SharedConsole;
use crate::device::{CommandReport, Sh1106};

/// Steps that touch the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpStep {
    /// Address probe, reported on the console
    Presence,
    /// Display-off command
    PowerOff,
}

impl BringUpStep {
    /// Name used in `TASK[...]` failure markers
    pub fn action(&self) -> &'static str {
        match self {
            BringUpStep::Presence => "check_and_report_SH1106",
            BringUpStep::PowerOff => "initialize_SH1106",
        }
    }
}

/// Bring-up states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpState {
    /// Waiting to probe the device
    Presence,
    /// Device present, power-off pending
    PowerOff,
    /// Bring-up complete; monitor loop may run
    Monitoring,
    /// A step failed; no further bus activity
    Failed {
        step: BringUpStep,
        result: CommandResult,
    },
}

impl BringUpState {
    /// Step to run in this state, if any
    pub fn step(&self) -> Option<BringUpStep> {
        match self {
            BringUpState::Presence => Some(BringUpStep::Presence),
            BringUpState::PowerOff => Some(BringUpStep::PowerOff),
            _ => None,
        }
    }

    /// Check if bring-up is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, BringUpState::Monitoring | BringUpState::Failed { .. })
    }

    /// Check if bring-up succeeded
    pub fn is_monitoring(&self) -> bool {
        matches!(self, BringUpState::Monitoring)
    }

    /// Apply the result of the current step
    ///
    /// Terminal states ignore further results.
    pub fn transition(self, result: CommandResult) -> Self {
        use BringUpState::*;

        match (self, result) {
            (Presence, CommandResult::Ok) => PowerOff,
            (Presence, result) => Failed {
                step: BringUpStep::Presence,
                result,
            },
            (PowerOff, CommandResult::Ok) => Monitoring,
            (PowerOff, result) => Failed {
                step: BringUpStep::PowerOff,
                result,
            },
            (state, _) => state,
        }
    }
}

/// Outcome of [`run_bring_up`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUp {
    /// [`BringUpState::Monitoring`] or [`BringUpState::Failed`]
    pub state: BringUpState,
    /// Logged report of the power-off command, if it was sent
    pub power_off: Option<CommandReport<'static>>,
}

/// Run bring-up to completion
pub async fn run_bring_up<B, M, W>(
    task_name: &str,
    device: &mut Sh1106<B>,
    console: &SharedConsole<M, W>,
) -> BringUp
where
    B: CommandBus,
    M: RawMutex,
    W: Write,
{
    let mut state = BringUpState::Presence;
    let mut power_off = None;

    while let Some(step) = state.step() {
        let result = match step {
            BringUpStep::Presence => device.check_and_report(console).await,
            BringUpStep::PowerOff => {
                let report = device.initialize().await;
                power_off = Some(report);
                report.result
            }
        };

        if !result.is_ok() {
            #[cfg(feature = "defmt")]
            defmt::error!("TASK[{}] {} FAILED", task_name, step.action());
        }

        state = state.transition(result);
    }

    #[cfg(not(feature = "defmt"))]
    let _ = task_name;

    BringUp { state, power_off }
}
