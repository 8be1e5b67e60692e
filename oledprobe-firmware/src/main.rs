//! oledprobe - SH1106 OLED bring-up probe
//!
//! Main firmware binary for RP2040-based boards. Probes an SH1106
//! controller on I2C0, reports the result on the UART console, powers the
//! panel down and keeps a periodic monitor task running.
//!
//! Wiring (fixed on the board, checked against probe.toml at startup):
//! - I2C0: GPIO4 = SDA, GPIO5 = SCL
//! - UART0 console: GPIO0 = TX, 115200 baud

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::clk_peri_freq;
use embassy_rp::i2c::{I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::{Config as UartConfig, UartTx};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use oledprobe_core::config::{load_config, ProbeConfig};
use oledprobe_core::console::SharedConsole;
use oledprobe_core::device::Sh1106;
use oledprobe_hal::CommandBus;
use oledprobe_hal_rp2040::i2c::{controller_config, Rp2040CommandBus, Wiring};
use oledprobe_hal_rp2040::uart::{UartConsole, CONSOLE_BAUD};

use crate::tasks::Console;

/// Embedded configuration (compiled into firmware)
/// Edit probe.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../probe.toml");

/// GPIO numbers of the I2C0 pins passed to `I2c::new_async` below
const WIRING: Wiring = Wiring {
    sda_pin: 4,
    scl_pin: 5,
};

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

// Static cells for state shared with tasks (must live forever)
static CONFIG: StaticCell<ProbeConfig> = StaticCell::new();
static CONSOLE: StaticCell<Console> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("oledprobe firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static ProbeConfig = match load_config(EMBEDDED_CONFIG) {
        Ok(config) => CONFIG.init(config),
        Err(e) => defmt::panic!("Invalid probe.toml: {}", e),
    };
    info!(
        "Configuration loaded: SH1106 @ {:#x}, {} Hz, timeout {} ms",
        config.device.address, config.bus.frequency, config.device.timeout_ms
    );

    // Console on UART0 TX, shared by every reporting task
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = CONSOLE_BAUD;
    let tx = UartTx::new_blocking(p.UART0, p.PIN_0, uart_config);
    let console = CONSOLE.init(SharedConsole::new(UartConsole::new(tx)));
    info!("Console initialized");

    // One-time bus setup; failure is fatal. Pad pull-ups are fixed here.
    let hw = match controller_config(&config.bus, WIRING, clk_peri_freq()) {
        Ok(hw) => hw,
        Err(e) => defmt::panic!("I2C configuration failed: {}", e),
    };
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, hw);
    let mut bus = Rp2040CommandBus::new(i2c, WIRING, &hw);
    if let Err(e) = bus.configure(&config.bus) {
        defmt::panic!("I2C configuration failed: {}", e);
    }
    info!("I2C configured");

    let device = Sh1106::new(bus, config.device);

    spawner
        .spawn(tasks::sh1106_task(device, &config.monitor, console))
        .unwrap();

    info!("All tasks spawned");
}
