//! Periodic monitor loop
//!
//! Runs after a successful bring-up: log a progress marker, wait one
//! interval, repeat. The loop never touches the bus.
//!
//! The loop stops cooperatively. A stop signal is checked before every
//! iteration and raced against the delay, so a raised signal ends the loop
//! without waiting out the current interval.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

/// Monitor loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorState<'a> {
    task_name: &'a str,
    iteration: u32,
    running: bool,
}

impl<'a> MonitorState<'a> {
    /// Create the state; `running` is false after a failed bring-up
    pub fn new(task_name: &'a str, running: bool) -> Self {
        Self {
            task_name,
            iteration: 0,
            running,
        }
    }

    /// Name used in progress markers
    pub fn task_name(&self) -> &'a str {
        self.task_name
    }

    /// Iterations completed so far
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Check if another iteration may start
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Count one iteration, returning its zero-based index
    pub fn tick(&mut self) -> u32 {
        let current = self.iteration;
        self.iteration = self.iteration.wrapping_add(1);
        current
    }

    /// Stop the loop before its next iteration
    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// Run the monitor loop until `stop` is raised
///
/// Returns the number of iterations run. A state that is not running
/// returns at once with zero iterations.
pub async fn run_monitor<D, M>(
    state: &mut MonitorState<'_>,
    delay: &mut D,
    interval_ms: u32,
    stop: &Signal<M, ()>,
) -> u32
where
    D: DelayNs,
    M: RawMutex,
{
    while state.is_running() {
        if stop.signaled() {
            state.stop();
            break;
        }

        let _iteration = state.tick();
        #[cfg(feature = "defmt")]
        defmt::info!("TASK[{}] iteration: {}", state.task_name(), _iteration);

        match select(delay.delay_ms(interval_ms), stop.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => state.stop(),
        }
    }

    state.iteration()
}
