//! The `Sample` type (spec.md §3): one reading from one particulate sensor
//! at one instant, paired with the most recent ambient reading.

use crate::constants::{MAX_CONC, MIN_CONC};
use crate::datetime::DateTime;
use crate::driver::Concentrations;

/// One particulate-sensor reading, immutable once stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub sensor_id: u8,
    pub timestamp: DateTime,
    pub concentrations: Concentrations,
    pub temp_c: f32,
    pub humidity_pct: f32,
}

impl Sample {
    /// True iff at least one channel is validated (spec.md §3: the sample
    /// as a whole is retained only if at least one channel is valid).
    pub fn has_any_valid_channel(&self) -> bool {
        self.concentrations
            .as_array()
            .iter()
            .any(|&v| v > MIN_CONC && v <= MAX_CONC)
    }

    /// The channel fed into the statistics kernel for window closures
    /// (spec.md §6.1: only `pm2_5` is aggregated into `AVG*.csv`).
    pub fn pm2_5(&self) -> f32 {
        self.concentrations.pm2_5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with(pm2_5: f32) -> Sample {
        Sample {
            sensor_id: 1,
            timestamp: DateTime::new(2026, 7, 29, 12, 0, 10),
            concentrations: Concentrations {
                pm1_0: -1.0,
                pm2_5,
                pm4_0: -1.0,
                pm10: -1.0,
            },
            temp_c: 20.0,
            humidity_pct: 50.0,
        }
    }

    #[test]
    fn validity_follows_pm2_5_when_it_is_the_only_in_range_channel() {
        assert!(sample_with(12.0).has_any_valid_channel());
        assert!(!sample_with(600.0).has_any_valid_channel());
        assert!(!sample_with(-1.0).has_any_valid_channel());
    }
}
