//! CLI arguments and the static location/threshold config file.
//!
//! Mirrors the teacher's `apc1-cli::Args` (a `clap::Parser` struct) plus a
//! `serde`/`toml` config layer for settings the original firmware keeps in
//! `config_sistema.h` (station location, latitude/longitude) — not part of
//! any [MODULE] in `spec.md`, but carried as ambient configuration.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

/// Station acquisition daemon.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Serial device for each particulate sensor, e.g. `/dev/ttyUSB0`. One
    /// physical sensor per transport (spec.md §4.2: "bound to one serial
    /// transport"), so pass this flag once per sensor.
    #[arg(long = "serial-device", env = "STATION_SERIAL_DEVICES", value_delimiter = ',')]
    pub serial_devices: Vec<PathBuf>,

    /// Baud rate for the particulate sensor link.
    #[arg(long, default_value_t = 115_200)]
    pub baud_rate: u32,

    /// Root of the removable storage card the date-indexed CSV tree is
    /// written under.
    #[arg(long, env = "STATION_MOUNT_ROOT")]
    pub mount_root: PathBuf,

    /// Path to the static location/threshold config (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Poll interval between acquisition ticks, in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub tick_interval_ms: u64,

    /// A 14-digit `YYYYMMDDhhmmss;` provisioning timestamp, normally
    /// supplied over the diagnostic channel at boot (spec.md §6.6). Exposed
    /// here as a flag for host-side provisioning.
    #[arg(long)]
    pub provision_time: Option<String>,
}

/// Static, rarely-changing station metadata (`config_sistema.h` in the
/// original source). None of this is part of any persisted record; it is
/// stamped into the startup log line only.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            location_name: "unknown".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl StationConfig {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
