//! Numeric constants pulled from the acquisition firmware's configuration
//! headers (`config_sistema.h`, `ParticulateDataAnalyzer.h` in the original
//! source). Kept in one place, as `config_sistema.h` does, rather than
//! scattered across modules.

/// Particulate sensors on the station (spec.md §3: sensor id 1..=N, N=3).
pub const NUM_PM_SENSORS: usize = 3;

/// A channel value is valid iff it is strictly greater than this...
pub const MIN_CONC: f32 = 0.5;
/// ...and less than or equal to this (µg/m³).
pub const MAX_CONC: f32 = 500.0;

/// Capacity of a sensor's high-frequency (10-minute) ring, in samples.
pub const MAX_SAMPLES_PER_10MIN: usize = 60;
/// Capacity of a sensor's hourly ring, in closed 10-minute statistics.
pub const MAX_10MIN_PER_HOUR: usize = 6;
/// Capacity of a sensor's daily ring, in closed 1-hour statistics.
pub const MAX_HOURS_PER_DAY: usize = 24;

/// Per-sensor retry budget inside the `READ` state.
pub const NUM_REINT: u8 = 3;

/// Minimum time, in milliseconds, between `start_measurement` and
/// `read_concentrations` for the SPS30-family sensor.
pub const DELAY_MS_SPS30_LECTURA: u32 = 5_000;

/// Settle delay after the wake-up pulse, before the framed wake request.
pub const DELAY_MS_WAKE_SETTLE: u32 = 50;

/// Ten-minute blocks per day: `24 * 6`.
pub const BLOCKS_PER_DAY: u16 = 144;

/// Sentinel returned by [`crate::stats`] when a statistic has no data to
/// summarize (empty input or all channels invalid). Matches the original
/// firmware's `MSN_VOID_ARRAY_VALUE`.
pub const NO_DATA: f32 = -999.0;
/// Sentinel returned by [`crate::stats::stddev`] when fewer than two valid
/// samples are available (Bessel correction is undefined for n <= 1).
/// Matches the original firmware's `MSN_NOT_DATA`.
pub const STDDEV_UNDEFINED: f32 = -777.0;

/// Tolerance for the bisection square root used by [`crate::stats::stddev`].
pub const SQRT_TOLERANCE: f64 = 1e-7;
