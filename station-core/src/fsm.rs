//! Observation state machine + window manager (C5, spec.md §4.5).
//!
//! Grounded on the original firmware's `observador_MEF.c`: the same seven
//! states (`ESTADO_REPOSO/LECTURA/ALMACENAMIENTO/CALCULO/GUARDADO/LIMPIESA`
//! map to `Idle/Read/Store/Compute/Persist/Clean`, `ERROR` unchanged), and
//! `proceso_observador.c`'s per-sensor retry loop. The host calls [`step`]
//! on a timer; each call performs exactly one transition (spec.md §5, §9 —
//! "model as an explicit step function returning the new state").

use std::collections::VecDeque;
use std::fmt;

use crate::clock::Clock;
use crate::constants::{DELAY_MS_SPS30_LECTURA, MIN_CONC, MAX_CONC, NUM_REINT};
use crate::datetime::DateTime;
use crate::driver::ParticulateSensor;
use crate::persistence::{append_record, avg_path, day_dir, raw_path, PersistenceSink, RawRecord, Resolution, StatRecord, AVG_HEADER, RAW_HEADER};
use crate::ring::Ring;
use crate::sample::Sample;
use crate::stats;
use crate::transport::{AmbientSensor, Delay, SensorTransport};
use crate::window::WindowManager;

const HF_CAPACITY: usize = crate::constants::MAX_SAMPLES_PER_10MIN;
const HOURLY_CAPACITY: usize = crate::constants::MAX_10MIN_PER_HOUR;
const DAILY_CAPACITY: usize = crate::constants::MAX_HOURS_PER_DAY;

/// The seven observation states (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Read,
    Store,
    Compute,
    Persist,
    Clean,
    Error,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Idle => "IDLE",
            State::Read => "READ",
            State::Store => "STORE",
            State::Compute => "COMPUTE",
            State::Persist => "PERSIST",
            State::Clean => "CLEAN",
            State::Error => "ERROR",
        };
        f.write_str(name)
    }
}

struct ClosureJob {
    resolution: Resolution,
    window_end: DateTime,
    records: Vec<StatRecord>,
}

/// The observation pipeline's state machine, owning every ring buffer and
/// the collaborator handles it needs to drive one acquisition cycle.
pub struct ObservationMachine<C, Snk, T, D, A> {
    state: State,
    clock: C,
    sink: Snk,
    sensors: Vec<ParticulateSensor<T>>,
    delay: D,
    ambient: A,
    mount_root: String,
    window: WindowManager,
    ring_hf: Vec<Ring<Sample, HF_CAPACITY>>,
    ring_hourly: Vec<Ring<f32, HOURLY_CAPACITY>>,
    ring_daily: Vec<Ring<f32, DAILY_CAPACITY>>,
    pending_samples: Vec<Option<Sample>>,
    pending_closures: VecDeque<ClosureJob>,
}

impl<C, Snk, T, D, A> ObservationMachine<C, Snk, T, D, A>
where
    C: Clock,
    Snk: PersistenceSink,
    T: SensorTransport,
    D: Delay,
    A: AmbientSensor,
{
    pub fn new(clock: C, sink: Snk, sensors: Vec<ParticulateSensor<T>>, delay: D, ambient: A, mount_root: impl Into<String>) -> Self {
        let n = sensors.len();
        Self {
            state: State::Idle,
            clock,
            sink,
            sensors,
            delay,
            ambient,
            mount_root: mount_root.into(),
            window: WindowManager::new(),
            ring_hf: (0..n).map(|_| Ring::new()).collect(),
            ring_hourly: (0..n).map(|_| Ring::new()).collect(),
            ring_daily: (0..n).map(|_| Ring::new()).collect(),
            pending_samples: Vec::new(),
            pending_closures: VecDeque::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Forces an immediate return to `IDLE` and clears every ring, abandoning
    /// any in-flight measurement (spec.md §4.5, "Cancellation"). Grounded on
    /// the original firmware's `observador_MEF_forzar_reset`.
    pub fn force_reset(&mut self) {
        for sensor in &mut self.sensors {
            let _ = sensor.stop_measurement();
        }
        for ring in &mut self.ring_hf {
            ring.drain_to_vec();
        }
        for ring in &mut self.ring_hourly {
            ring.drain_to_vec();
        }
        for ring in &mut self.ring_daily {
            ring.drain_to_vec();
        }
        self.pending_samples.clear();
        self.pending_closures.clear();
        self.state = State::Idle;
        tracing::info!("[OK] forced reset, all rings cleared");
    }

    /// Advances the machine by exactly one transition.
    pub fn step(&mut self) -> State {
        let next = match self.state {
            State::Idle => self.on_idle(),
            State::Read => self.on_read(),
            State::Store => self.on_store(),
            State::Compute => self.on_compute(),
            State::Persist => self.on_persist(),
            State::Clean => self.on_clean(),
            State::Error => self.on_error(),
        };
        if next != self.state {
            tracing::debug!(from = %self.state, to = %next, "state transition");
        }
        self.state = next;
        next
    }

    fn on_idle(&mut self) -> State {
        match self.clock.get_datetime() {
            Ok(_) => State::Read,
            Err(_) => State::Idle,
        }
    }

    fn on_read(&mut self) -> State {
        let ambient = self.ambient.read();
        let (temp_c, humidity_pct) = match ambient {
            Ok(r) => (r.temperature_c, r.relative_humidity_pct),
            Err(_) => (f32::NAN, f32::NAN),
        };

        let mut results = Vec::with_capacity(self.sensors.len());
        for (idx, sensor) in self.sensors.iter_mut().enumerate() {
            let mut succeeded = None;
            for _attempt in 0..NUM_REINT {
                if sensor.start_measurement().is_err() {
                    continue;
                }
                self.delay.delay_ms(DELAY_MS_SPS30_LECTURA);
                let reading = sensor.read_concentrations();
                let _ = sensor.stop_measurement();

                match reading {
                    Ok(c) => {
                        let any_valid = c
                            .as_array()
                            .iter()
                            .any(|&v| v > MIN_CONC && v <= MAX_CONC);
                        if any_valid {
                            succeeded = Some(c);
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            }

            match succeeded {
                Some(concentrations) => {
                    let timestamp = match self.clock.get_datetime() {
                        Ok(ts) => ts,
                        Err(_) => {
                            tracing::warn!("[WARN] clock unavailable mid-cycle");
                            results.push(None);
                            continue;
                        }
                    };
                    results.push(Some(Sample {
                        sensor_id: (idx + 1) as u8,
                        timestamp,
                        concentrations,
                        temp_c,
                        humidity_pct,
                    }));
                }
                None => {
                    let ts = self.clock.get_datetime().ok();
                    tracing::error!(
                        sensor = idx + 1,
                        ts = ?ts,
                        "[ERROR][SPS30_FAIL] sensor exhausted retry budget"
                    );
                    results.push(None);
                }
            }
        }

        if results.iter().any(Option::is_none) {
            return State::Error;
        }

        self.pending_samples = results;
        State::Store
    }

    fn on_store(&mut self) -> State {
        let samples: Vec<Sample> = self.pending_samples.drain(..).flatten().collect();
        let mut now = None;
        for sample in &samples {
            let idx = (sample.sensor_id - 1) as usize;
            if let Some(ring) = self.ring_hf.get_mut(idx) {
                ring.push(*sample);
            }

            let dir = day_dir(&self.mount_root, sample.timestamp);
            let path = raw_path(&self.mount_root, sample.timestamp);
            let record = RawRecord {
                timestamp: sample.timestamp,
                sensor_id: sample.sensor_id,
                pm1_0: sample.concentrations.pm1_0,
                pm2_5: sample.concentrations.pm2_5,
                pm4_0: sample.concentrations.pm4_0,
                pm10: sample.concentrations.pm10,
                temp_c: sample.temp_c,
                humidity_pct: sample.humidity_pct,
            };
            if let Err(e) = append_record(&mut self.sink, &dir, &path, RAW_HEADER, &record.to_csv_line()) {
                tracing::warn!(error = ?e, "[WARN] failed to persist raw sample");
            }
            now = Some(sample.timestamp);
        }

        let Some(now) = now else {
            return State::Read;
        };

        let crossed = self.window.observe(now);
        if crossed.skipped_blocks > 0 {
            tracing::warn!("[WARN] windows skipped: {}", crossed.skipped_blocks);
        }

        // Closed windows are stamped at their own closing boundary, not at
        // `now` (which may lag the boundary on a late or jumped read).
        if let Some(window_end) = crossed.boundary {
            if crossed.ten_minute {
                self.pending_closures.push_back(ClosureJob {
                    resolution: Resolution::TenMinute,
                    window_end,
                    records: Vec::new(),
                });
            }
            if crossed.hourly {
                self.pending_closures.push_back(ClosureJob {
                    resolution: Resolution::Hourly,
                    window_end,
                    records: Vec::new(),
                });
            }
            if crossed.daily {
                self.pending_closures.push_back(ClosureJob {
                    resolution: Resolution::Daily,
                    window_end,
                    records: Vec::new(),
                });
            }
        }

        if self.pending_closures.is_empty() {
            State::Read
        } else {
            State::Compute
        }
    }

    fn on_compute(&mut self) -> State {
        let Some(job) = self.pending_closures.front_mut() else {
            return State::Idle;
        };

        let n = self.ring_hf.len();
        let mut any_empty = false;
        for idx in 0..n {
            let xs: Vec<f32> = match job.resolution {
                Resolution::TenMinute => self.ring_hf[idx].iter().map(|s| s.pm2_5()).collect(),
                Resolution::Hourly => self.ring_hourly[idx].to_vec(),
                Resolution::Daily => self.ring_daily[idx].to_vec(),
            };

            if xs.is_empty() {
                any_empty = true;
                continue;
            }

            job.records.push(StatRecord {
                sensor_id: (idx + 1) as u8,
                window_end: job.window_end,
                count: stats::count_valid(&xs),
                mean: stats::mean(&xs),
                min: stats::min(&xs),
                max: stats::max(&xs),
                std: stats::stddev(&xs),
            });
        }

        if any_empty && job.records.is_empty() {
            self.pending_closures.pop_front();
            return State::Error;
        }

        State::Persist
    }

    fn on_persist(&mut self) -> State {
        let Some(job) = self.pending_closures.front() else {
            return State::Idle;
        };

        for record in &job.records {
            let dir = day_dir(&self.mount_root, job.window_end);
            let path = avg_path(&self.mount_root, job.window_end, job.resolution);
            if let Err(e) = append_record(&mut self.sink, &dir, &path, AVG_HEADER, &record.to_csv_line()) {
                tracing::warn!(error = ?e, "[WARN] failed to persist statistic record");
            }
        }

        State::Clean
    }

    fn on_clean(&mut self) -> State {
        let Some(job) = self.pending_closures.pop_front() else {
            return State::Idle;
        };

        for record in &job.records {
            let idx = (record.sensor_id - 1) as usize;
            match job.resolution {
                Resolution::TenMinute => {
                    if let Some(ring) = self.ring_hf.get_mut(idx) {
                        ring.drain_to_vec();
                    }
                    if let Some(ring) = self.ring_hourly.get_mut(idx) {
                        ring.push(record.mean);
                    }
                }
                Resolution::Hourly => {
                    if let Some(ring) = self.ring_hourly.get_mut(idx) {
                        ring.drain_to_vec();
                    }
                    if let Some(ring) = self.ring_daily.get_mut(idx) {
                        ring.push(record.mean);
                    }
                }
                Resolution::Daily => {
                    if let Some(ring) = self.ring_daily.get_mut(idx) {
                        ring.drain_to_vec();
                    }
                }
            }
        }

        tracing::info!("[OK] closed {:?} window, {} record(s)", job.resolution, job.records.len());

        if self.pending_closures.is_empty() {
            State::Idle
        } else {
            State::Compute
        }
    }

    fn on_error(&mut self) -> State {
        tracing::error!("[ERROR] recovering to IDLE");
        self.pending_samples.clear();
        State::Idle
    }

    /// Diagnostic dump of the current state, mirroring the original
    /// firmware's `observador_MEF_debug_estado`.
    pub fn debug_state(&self) -> String {
        format!(
            "state={} pending_closures={} hf_lens={:?}",
            self.state,
            self.pending_closures.len(),
            self.ring_hf.iter().map(Ring::len).collect::<Vec<_>>()
        )
    }
}
