//! Host-side ambient temperature/humidity stand-in.
//!
//! Real bring-up bit-bangs a DHT22 or talks SHT3x over I2C
//! (`station-embedded::Sht3xAmbient`); neither is addressable from a host
//! CLI, so this returns a fixed reading. It exists only so the acquisition
//! loop has an `AmbientSensor` to drive end to end on a development host;
//! real deployments wire `station-embedded`'s I2C implementation instead.
use station_core::error::AmbientError;
use station_core::transport::{AmbientReading, AmbientSensor};

pub struct StaticAmbient {
    reading: AmbientReading,
}

impl StaticAmbient {
    pub fn new(temperature_c: f32, relative_humidity_pct: f32) -> Self {
        Self {
            reading: AmbientReading {
                temperature_c,
                relative_humidity_pct,
            },
        }
    }
}

impl Default for StaticAmbient {
    fn default() -> Self {
        Self::new(20.0, 50.0)
    }
}

impl AmbientSensor for StaticAmbient {
    fn read(&mut self) -> Result<AmbientReading, AmbientError> {
        Ok(self.reading)
    }
}
