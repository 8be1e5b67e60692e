//! I2C command bus for RP2040
//!
//! Implements the `CommandBus` trait from `oledprobe-hal` on top of the
//! `embassy-rp` async I2C controller.
//!
//! The RP2040 controller runs a whole write as one hardware transfer and
//! aborts on the first NACK, so per-byte ACK policies cannot be honoured:
//! every byte is effectively ACK-checked. It also cannot issue a
//! zero-length write, so an address-only probe is sent as a one-byte read,
//! which still stops after the address byte when nothing acknowledges.
//!
//! Pad pull-ups are only set when the controller is created, so build the
//! controller from [`controller_config`] and let `configure` confirm it.

use embassy_embedded_hal::SetConfig;
use embassy_rp::clocks::clk_peri_freq;
use embassy_rp::i2c::{self, Async, I2c, Instance};
use embassy_time::{with_timeout, Duration};
use embedded_hal::i2c::{Error as _, ErrorKind};
use heapless::Vec;
use oledprobe_hal::{CommandBus, ConfigError, Direction, I2cConfig, Operation, StatusCode};

use crate::pins::i2c_pair;

/// Bytes that may follow the address byte
pub const MAX_PAYLOAD: usize = 4;

/// Operation list reduced to what the controller needs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// 7-bit address
    pub address: u8,
    /// Read or write, from bit 0 of the address byte
    pub direction: Direction,
    /// Bytes after the address byte
    pub payload: Vec<u8, MAX_PAYLOAD>,
}

/// Reduce a START / WRITE... / STOP list to a [`Frame`]
///
/// Returns `INVALID_ARG` for any other layout.
pub fn decode(ops: &[Operation]) -> Result<Frame, StatusCode> {
    let [Operation::Start, body @ .., Operation::Stop] = ops else {
        return Err(StatusCode::INVALID_ARG);
    };

    let mut bytes = body.iter().map(|op| match *op {
        Operation::Write { byte, .. } => Ok(byte),
        _ => Err(StatusCode::INVALID_ARG),
    });

    let first = bytes.next().ok_or(StatusCode::INVALID_ARG)??;
    let direction = if first & 1 == 0 {
        Direction::Write
    } else {
        Direction::Read
    };

    let mut payload = Vec::new();
    for byte in bytes {
        payload.push(byte?).map_err(|_| StatusCode::INVALID_ARG)?;
    }

    Ok(Frame {
        address: first >> 1,
        direction,
        payload,
    })
}

/// Map an I2C error to a driver status code
pub fn status_from_kind(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NoAcknowledge(_) => StatusCode::FAIL,
        ErrorKind::ArbitrationLoss | ErrorKind::Bus => StatusCode::INVALID_STATE,
        _ => StatusCode::FAIL,
    }
}

/// GPIO numbers the controller is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wiring {
    /// GPIO carrying SDA
    pub sda_pin: u8,
    /// GPIO carrying SCL
    pub scl_pin: u8,
}

/// Check SCL timing the way the controller will, without touching it
///
/// The controller is disabled before its own divisor checks run, so a
/// frequency it rejects would leave the bus off.
pub fn check_divisors(clk_peri_hz: u32, frequency: u32) -> Result<(), ConfigError> {
    if frequency == 0 {
        return Err(ConfigError::FrequencyOutOfRange);
    }
    let clk = u64::from(clk_peri_hz);
    let frequency = u64::from(frequency);

    let period = (clk + frequency / 2) / frequency;
    let lcnt = period * 3 / 5;
    let hcnt = period - lcnt;
    if hcnt > 0xffff || lcnt > 0xffff || hcnt < 8 || lcnt < 8 {
        return Err(ConfigError::FrequencyOutOfRange);
    }

    // SDA hold: 300 ns below Fast-mode Plus, 120 ns (and clk > 32 MHz) at it
    let sda_hold = if frequency < 1_000_000 {
        clk * 3 / 10_000_000 + 1
    } else {
        if clk <= 32_000_000 {
            return Err(ConfigError::FrequencyOutOfRange);
        }
        clk * 3 / 25_000_000 + 1
    };
    if sda_hold > lcnt - 2 {
        return Err(ConfigError::FrequencyOutOfRange);
    }

    Ok(())
}

/// Check `config` against the board wiring and the peripheral clock
///
/// Returns the controller configuration to build or update the driver
/// with. Nothing is written to hardware.
pub fn controller_config(
    config: &I2cConfig,
    wiring: Wiring,
    clk_peri_hz: u32,
) -> Result<i2c::Config, ConfigError> {
    config.validate()?;

    if i2c_pair(config.sda_pin, config.scl_pin).is_none()
        || config.sda_pin != wiring.sda_pin
        || config.scl_pin != wiring.scl_pin
    {
        return Err(ConfigError::InvalidPin);
    }

    check_divisors(clk_peri_hz, config.frequency)?;

    let mut hw = i2c::Config::default();
    hw.frequency = config.frequency;
    hw.sda_pullup = config.sda_pullup;
    hw.scl_pullup = config.scl_pullup;
    Ok(hw)
}

/// RP2040 I2C command bus
pub struct Rp2040CommandBus<'d, T: Instance> {
    i2c: I2c<'d, T, Async>,
    wiring: Wiring,
    /// Pad pull-ups (SDA, SCL) the controller was created with
    pullups: (bool, bool),
}

impl<'d, T: Instance> Rp2040CommandBus<'d, T> {
    /// Wrap a controller created with `hw` on `wiring`
    pub fn new(i2c: I2c<'d, T, Async>, wiring: Wiring, hw: &i2c::Config) -> Self {
        Self {
            i2c,
            wiring,
            pullups: (hw.sda_pullup, hw.scl_pullup),
        }
    }
}

impl<'d, T: Instance> CommandBus for Rp2040CommandBus<'d, T> {
    fn configure(&mut self, config: &I2cConfig) -> Result<(), ConfigError> {
        let hw = controller_config(config, self.wiring, clk_peri_freq())?;

        // Pull-ups cannot change after the pads are set up
        if (hw.sda_pullup, hw.scl_pullup) != self.pullups {
            return Err(ConfigError::InvalidPin);
        }

        self.i2c.set_config(&hw).map_err(|_| ConfigError::Driver)
    }

    async fn execute(&mut self, ops: &[Operation], timeout_ms: u32) -> StatusCode {
        let frame = match decode(ops) {
            Ok(frame) => frame,
            Err(status) => return status,
        };
        let timeout = Duration::from_millis(u64::from(timeout_ms));

        let result = if frame.direction == Direction::Read || frame.payload.is_empty() {
            let mut scratch = [0u8; 1];
            with_timeout(
                timeout,
                embedded_hal_async::i2c::I2c::read(&mut self.i2c, frame.address, &mut scratch),
            )
            .await
        } else {
            with_timeout(
                timeout,
                embedded_hal_async::i2c::I2c::write(&mut self.i2c, frame.address, &frame.payload),
            )
            .await
        };

        match result {
            Ok(Ok(())) => StatusCode::OK,
            Ok(Err(e)) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("I2C {:#x}: {}", frame.address, e);
                status_from_kind(e.kind())
            }
            Err(_) => StatusCode::TIMEOUT,
        }
    }
}
