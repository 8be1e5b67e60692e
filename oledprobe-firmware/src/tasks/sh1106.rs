//! SH1106 worker task
//!
//! Runs bring-up, then the monitor loop until `MONITOR_STOP` is raised.

use defmt::*;
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;

use oledprobe_core::config::MonitorConfig;
use oledprobe_core::console::SharedConsole;
use oledprobe_core::device::Sh1106;
use oledprobe_hal_rp2040::i2c::Rp2040CommandBus;
use oledprobe_hal_rp2040::uart::UartConsole;

use crate::channels::MONITOR_STOP;

/// Command bus on I2C0
pub type ProbeBus = Rp2040CommandBus<'static, I2C0>;

/// Shared console on UART0
pub type Console = SharedConsole<CriticalSectionRawMutex, UartConsole<'static>>;

/// SH1106 task - probe, power down, then monitor
#[embassy_executor::task]
pub async fn sh1106_task(
    mut device: Sh1106<ProbeBus>,
    config: &'static MonitorConfig,
    console: &'static Console,
) {
    let mut delay = Delay;

    let exit = oledprobe_core::task::sh1106_task(
        config,
        &mut device,
        console,
        &mut delay,
        &MONITOR_STOP,
    )
    .await;

    if exit.bring_up.is_monitoring() {
        info!("SH1106 task stopped after {} iterations", exit.iterations);
    } else {
        warn!("SH1106 bring-up failed: {}", exit.bring_up);
    }
}
