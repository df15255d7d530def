//! `embedded-hal` glue binding an I2C temperature/humidity device to
//! [`station_core::transport::AmbientSensor`]. The particulate sensor's
//! serial transport is a host concern (`station-cli`'s `serialport`-backed
//! implementation); real MCU bring-up is out of scope. This crate mirrors
//! the teacher's `apc1-embedded`: one `embedded-hal` I2C device bound to a
//! `station-core` trait.

use embedded_hal::i2c::I2c;
use station_core::error::AmbientError;
use station_core::transport::{AmbientReading, AmbientSensor};

const SHT3X_ADDR: u8 = 0x44;
const SINGLE_SHOT_HIGH_REPEATABILITY: [u8; 2] = [0x24, 0x00];

/// An SHT3x-family temperature/humidity sensor wired over I2C, used as one
/// of the station's two ambient devices (spec.md §6.5).
pub struct Sht3xAmbient<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Sht3xAmbient<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }
}

impl<I2C: I2c> AmbientSensor for Sht3xAmbient<I2C> {
    fn read(&mut self) -> Result<AmbientReading, AmbientError> {
        self.i2c
            .write(SHT3X_ADDR, &SINGLE_SHOT_HIGH_REPEATABILITY)
            .map_err(|_| AmbientError::Hardware)?;

        let mut buf = [0u8; 6];
        self.i2c
            .read(SHT3X_ADDR, &mut buf)
            .map_err(|_| AmbientError::Hardware)?;

        let raw_temp = u16::from_be_bytes([buf[0], buf[1]]);
        let raw_hum = u16::from_be_bytes([buf[3], buf[4]]);

        Ok(AmbientReading {
            temperature_c: -45.0 + 175.0 * (raw_temp as f32 / 65535.0),
            relative_humidity_pct: 100.0 * (raw_hum as f32 / 65535.0),
        })
    }
}
