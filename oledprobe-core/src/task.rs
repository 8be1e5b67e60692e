//! SH1106 worker task body
//!
//! A plain `async fn`, not an Embassy task: Embassy tasks cannot be
//! generic, so firmware wraps this in a thin concrete task.
//!
//! Control flow:
//!
//! 1. `TASK[name] STARTED`
//! 2. Bring-up: presence probe (reported on the console), then power-off
//! 3. Monitor loop, only if bring-up succeeded
//! 4. `TASK[name] ENDED`
//!
//! The console belongs to the caller and outlives the task; it is never
//! released here.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use oledprobe_hal::CommandBus;

use crate::config::MonitorConfig;
use crate::console::SharedConsole;
use crate::device::Sh1106;
use crate::monitor::{run_monitor, MonitorState};
use crate::device::CommandReport;
use crate::sequencer::{run_bring_up, BringUpState};

/// How the worker task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskExit {
    /// Final bring-up state
    pub bring_up: BringUpState,
    /// Logged report of the power-off command, if it was sent
    pub power_off: Option<CommandReport<'static>>,
    /// Monitor iterations run
    pub iterations: u32,
}

/// Run bring-up and then monitor until `stop` is raised
pub async fn sh1106_task<B, M, W, D, S>(
    config: &MonitorConfig,
    device: &mut Sh1106<B>,
    console: &SharedConsole<M, W>,
    delay: &mut D,
    stop: &Signal<S, ()>,
) -> TaskExit
where
    B: CommandBus,
    M: RawMutex,
    W: Write,
    D: DelayNs,
    S: RawMutex,
{
    let task_name = config.task_name.as_str();

    #[cfg(feature = "defmt")]
    defmt::info!("TASK[{}] STARTED", task_name);

    let bring_up = run_bring_up(task_name, device, console).await;

    let mut state = MonitorState::new(task_name, bring_up.state.is_monitoring());
    let iterations = run_monitor(&mut state, delay, config.interval_ms, stop).await;

    #[cfg(feature = "defmt")]
    defmt::info!("TASK[{}] ENDED", task_name);

    TaskExit {
        bring_up: bring_up.state,
        power_off: bring_up.power_off,
        iterations,
    }
}
