//! Persistence sink interface and record formatting (spec.md §6.1, §6.2).
//!
//! The core never touches a filesystem directly: it builds paths and CSV
//! lines, and drives three primitives (`mkdir_p`, `append_line`, `exists`)
//! against a [`PersistenceSink`] implemented by the host (`station-cli`).

use crate::datetime::DateTime;
use crate::error::PersistenceError;

/// Sink consumed by C5 inside `PERSIST` (spec.md §6.2). Every method may
/// fail; failures are logged by the caller and never halt acquisition.
pub trait PersistenceSink {
    /// Creates `path` and all missing ancestors.
    fn mkdir_p(&mut self, path: &str) -> Result<(), PersistenceError>;

    /// Appends `line` (without a trailing newline) to `path`, creating the
    /// file if absent.
    fn append_line(&mut self, path: &str, line: &str) -> Result<(), PersistenceError>;

    /// True iff `path` already exists.
    fn exists(&mut self, path: &str) -> Result<bool, PersistenceError>;
}

/// A resolved 10-minute/hourly/daily statistic record (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRecord {
    pub sensor_id: u8,
    pub window_end: DateTime,
    pub count: usize,
    pub mean: f32,
    pub min: f32,
    pub max: f32,
    pub std: f32,
}

/// One raw sample as persisted to `RAW_*.CSV` (spec.md §6.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRecord {
    pub timestamp: DateTime,
    pub sensor_id: u8,
    pub pm1_0: f32,
    pub pm2_5: f32,
    pub pm4_0: f32,
    pub pm10: f32,
    pub temp_c: f32,
    pub humidity_pct: f32,
}

pub const RAW_HEADER: &str = "timestamp,sensor_id,pm1_0,pm2_5,pm4_0,pm10,temp,hum";
pub const AVG_HEADER: &str = "timestamp,pm2_5_mean,sample_count,pm2_5_min,pm2_5_max,pm2_5_std";

/// The three averaging resolutions, each backed by its own file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    TenMinute,
    Hourly,
    Daily,
}

impl Resolution {
    pub const fn file_name(self) -> &'static str {
        match self {
            Resolution::TenMinute => "AVG10.csv",
            Resolution::Hourly => "AVG60.csv",
            Resolution::Daily => "AVG24.csv",
        }
    }
}

/// Builds `/YYYY/MM/DD/RAW_YYYYMMDD.CSV` under `root`.
pub fn raw_path(root: &str, date: DateTime) -> String {
    let (y, mo, d) = date.date_key();
    format!("{root}/{y:04}/{mo:02}/{d:02}/RAW_{y:04}{mo:02}{d:02}.CSV")
}

/// Builds `/YYYY/MM/DD/AVGxx.csv` under `root`.
pub fn avg_path(root: &str, date: DateTime, resolution: Resolution) -> String {
    let (y, mo, d) = date.date_key();
    format!("{root}/{y:04}/{mo:02}/{d:02}/{}", resolution.file_name())
}

/// The directory an entry lives in, for `mkdir_p`.
pub fn day_dir(root: &str, date: DateTime) -> String {
    let (y, mo, d) = date.date_key();
    format!("{root}/{y:04}/{mo:02}/{d:02}")
}

impl RawRecord {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            self.timestamp, self.sensor_id, self.pm1_0, self.pm2_5, self.pm4_0, self.pm10,
            self.temp_c, self.humidity_pct
        )
    }
}

impl StatRecord {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{:.2},{},{:.2},{:.2},{:.2}",
            self.window_end, self.mean, self.count, self.min, self.max, self.std
        )
    }
}

/// Appends `line` to `path`, creating the directory and writing `header`
/// first if the file does not yet exist. Errors are returned, not swallowed;
/// C5 decides whether to log-and-continue (spec.md §6.2).
pub fn append_record(
    sink: &mut impl PersistenceSink,
    dir: &str,
    path: &str,
    header: &str,
    line: &str,
) -> Result<(), PersistenceError> {
    sink.mkdir_p(dir)?;
    if !sink.exists(path)? {
        sink.append_line(path, header)?;
    }
    sink.append_line(path, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeSink {
        dirs: HashSet<String>,
        files: HashMap<String, Vec<String>>,
    }

    impl PersistenceSink for FakeSink {
        fn mkdir_p(&mut self, path: &str) -> Result<(), PersistenceError> {
            self.dirs.insert(path.to_string());
            Ok(())
        }

        fn append_line(&mut self, path: &str, line: &str) -> Result<(), PersistenceError> {
            self.files.entry(path.to_string()).or_default().push(line.to_string());
            Ok(())
        }

        fn exists(&mut self, path: &str) -> Result<bool, PersistenceError> {
            Ok(self.files.contains_key(path))
        }
    }

    #[test]
    fn raw_path_matches_spec_layout() {
        let dt = DateTime::new(2026, 7, 29, 12, 10, 0);
        assert_eq!(raw_path("/mnt/sd", dt), "/mnt/sd/2026/07/29/RAW_20260729.CSV");
    }

    #[test]
    fn avg_paths_use_fixed_file_names() {
        let dt = DateTime::new(2026, 7, 29, 12, 10, 0);
        assert_eq!(avg_path("/mnt/sd", dt, Resolution::TenMinute), "/mnt/sd/2026/07/29/AVG10.csv");
        assert_eq!(avg_path("/mnt/sd", dt, Resolution::Hourly), "/mnt/sd/2026/07/29/AVG60.csv");
        assert_eq!(avg_path("/mnt/sd", dt, Resolution::Daily), "/mnt/sd/2026/07/29/AVG24.csv");
    }

    #[test]
    fn raw_record_formats_two_decimal_places() {
        let r = RawRecord {
            timestamp: DateTime::new(2026, 7, 29, 12, 0, 10),
            sensor_id: 1,
            pm1_0: 1.0,
            pm2_5: 10.0,
            pm4_0: 3.0,
            pm10: 4.0,
            temp_c: 21.5,
            humidity_pct: 55.25,
        };
        assert_eq!(
            r.to_csv_line(),
            "2026-07-29T12:00:10Z,1,1.00,10.00,3.00,4.00,21.50,55.25"
        );
    }

    #[test]
    fn stat_record_header_and_line_match_spec() {
        let r = StatRecord {
            sensor_id: 1,
            window_end: DateTime::new(2026, 7, 29, 12, 10, 0),
            count: 60,
            mean: 10.0,
            min: 10.0,
            max: 10.0,
            std: 0.0,
        };
        assert_eq!(r.to_csv_line(), "2026-07-29T12:10:00Z,10.00,60,10.00,10.00,0.00");
        assert_eq!(AVG_HEADER, "timestamp,pm2_5_mean,sample_count,pm2_5_min,pm2_5_max,pm2_5_std");
    }

    #[test]
    fn append_record_writes_header_once() {
        let mut sink = FakeSink::default();
        append_record(&mut sink, "/mnt/sd/2026/07/29", "/mnt/sd/2026/07/29/AVG10.csv", AVG_HEADER, "line1").unwrap();
        append_record(&mut sink, "/mnt/sd/2026/07/29", "/mnt/sd/2026/07/29/AVG10.csv", AVG_HEADER, "line2").unwrap();

        let lines = &sink.files["/mnt/sd/2026/07/29/AVG10.csv"];
        assert_eq!(lines, &[AVG_HEADER.to_string(), "line1".to_string(), "line2".to_string()]);
    }
}
