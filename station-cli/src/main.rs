mod ambient;
mod clock;
mod config;
mod delay;
mod persistence;
mod provisioning;
mod transport;

use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use station_core::clock::Clock;
use station_core::constants::NUM_PM_SENSORS;
use station_core::driver::ParticulateSensor;
use station_core::fsm::ObservationMachine;

use ambient::StaticAmbient;
use clock::SystemClock;
use config::{Args, StationConfig};
use delay::ThreadDelay;
use persistence::FsSink;
use transport::SerialTransport;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

pub fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => StationConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => StationConfig::default(),
    };
    tracing::info!(
        location = %config.location_name,
        lat = config.latitude,
        lon = config.longitude,
        "[OK] station starting"
    );

    let mut clock = SystemClock::new();
    if let Some(raw) = &args.provision_time {
        match provisioning::parse_provision_timestamp(raw) {
            Some(dt) => {
                clock.set_datetime(dt).context("provisioning clock")?;
                tracing::info!(%dt, "[OK] clock provisioned");
            }
            None => {
                tracing::warn!(%raw, "[WARN] malformed provisioning timestamp, falling back to system clock");
            }
        }
    }

    anyhow::ensure!(
        args.serial_devices.len() == NUM_PM_SENSORS,
        "expected {NUM_PM_SENSORS} --serial-device flags, got {}",
        args.serial_devices.len()
    );

    let mut sensors = Vec::with_capacity(NUM_PM_SENSORS);
    for path in &args.serial_devices {
        let device = path.to_str().context("serial device path must be valid UTF-8")?;
        let port = SerialTransport::open(device, args.baud_rate)
            .with_context(|| format!("opening serial device {device}"))?;
        sensors.push(ParticulateSensor::new(port));
    }

    let mount_root = args
        .mount_root
        .to_str()
        .context("mount root path must be valid UTF-8")?
        .to_string();

    let mut machine = ObservationMachine::new(
        clock,
        FsSink,
        sensors,
        ThreadDelay,
        StaticAmbient::default(),
        mount_root,
    );

    let tick = Duration::from_millis(args.tick_interval_ms);
    loop {
        machine.step();
        thread::sleep(tick);
    }
}
