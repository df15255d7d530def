//! Filesystem-backed `PersistenceSink` (spec.md §6.1, §6.2): the date-indexed
//! CSV tree under the configured mount root.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use station_core::error::PersistenceError;
use station_core::persistence::PersistenceSink;

pub struct FsSink;

impl PersistenceSink for FsSink {
    fn mkdir_p(&mut self, path: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(Path::new(path)).map_err(|_| PersistenceError::Mkdir)
    }

    fn append_line(&mut self, path: &str, line: &str) -> Result<(), PersistenceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|_| PersistenceError::Append)?;
        writeln!(file, "{line}").map_err(|_| PersistenceError::Append)
    }

    fn exists(&mut self, path: &str) -> Result<bool, PersistenceError> {
        Ok(Path::new(path).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use station_core::persistence::{append_record, AVG_HEADER};

    #[test]
    fn append_record_creates_directory_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("2026/07/29");
        let file = root.join("AVG10.csv");
        let mut sink = FsSink;

        append_record(
            &mut sink,
            root.to_str().unwrap(),
            file.to_str().unwrap(),
            AVG_HEADER,
            "2026-07-29T12:10:00Z,10.00,60,10.00,10.00,0.00",
        )
        .unwrap();

        let contents = std::fs::read_to_string(&file).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(AVG_HEADER));
        assert_eq!(lines.next(), Some("2026-07-29T12:10:00Z,10.00,60,10.00,10.00,0.00"));
    }
}
