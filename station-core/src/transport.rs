//! Collaborator interfaces for hardware the pipeline talks to but does not
//! own (spec.md §6.4, §6.5).

use crate::error::AmbientError;

/// A byte-oriented link to a particulate sensor, one frame at a time.
///
/// Concrete implementations (serial port, blocking UART peripheral) live
/// outside this crate; `station-core` only needs to send a framed request
/// and read back a framed response.
pub trait SensorTransport {
    type Error;

    /// Writes `frame` to the wire.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Writes raw, unframed bytes — used only for the wake-up pulse
    /// (spec.md §4.2: a single `0xFF` byte ahead of the framed wake request).
    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads a single framed response, blocking until the closing delimiter
    /// arrives or the implementation's own timeout elapses.
    fn read_frame(&mut self, buf: &mut Vec<u8>) -> Result<(), Self::Error>;
}

/// Blocking millisecond delay, the host side of the bounded suspension
/// points spec.md §5 allows (`DELAY_MS_SPS30_LECTURA`, the wake-settle
/// delay). Mirrors `embedded-hal::delay::DelayNs` in shape, kept separate so
/// `station-core` does not pull in `embedded-hal` itself.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// A reading from an ambient temperature/humidity device (spec.md §6.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientReading {
    pub temperature_c: f32,
    pub relative_humidity_pct: f32,
}

/// The station's ambient environmental sensor.
pub trait AmbientSensor {
    fn read(&mut self) -> Result<AmbientReading, AmbientError>;
}
