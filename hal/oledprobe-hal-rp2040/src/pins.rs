//! I2C pin functions
//!
//! Every RP2040 GPIO can carry exactly one I2C signal: even pins are SDA,
//! odd pins are SCL, and the controller alternates every two pins.

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: u8 = 30;

/// I2C controller identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cId {
    I2c0,
    I2c1,
}

/// Signal carried by a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSignal {
    Sda,
    Scl,
}

/// Determine which I2C controller and signal a GPIO pin can carry
pub fn gpio_to_i2c(gpio: u8) -> Option<(I2cId, I2cSignal)> {
    // I2C0: GPIO 0/1, 4/5, 8/9, 12/13, 16/17, 20/21, 24/25, 28/29
    // I2C1: GPIO 2/3, 6/7, 10/11, 14/15, 18/19, 22/23, 26/27
    if gpio >= GPIO_COUNT {
        return None;
    }

    let id = if (gpio / 2) % 2 == 0 {
        I2cId::I2c0
    } else {
        I2cId::I2c1
    };
    let signal = if gpio % 2 == 0 {
        I2cSignal::Sda
    } else {
        I2cSignal::Scl
    };

    Some((id, signal))
}

/// Check that `sda` and `scl` form a valid pair on one controller
pub fn i2c_pair(sda: u8, scl: u8) -> Option<I2cId> {
    match (gpio_to_i2c(sda)?, gpio_to_i2c(scl)?) {
        ((sda_id, I2cSignal::Sda), (scl_id, I2cSignal::Scl)) if sda_id == scl_id => Some(sda_id),
        _ => None,
    }
}
