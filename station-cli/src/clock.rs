//! Host-side `Clock` implementation, backed by the system clock.
//!
//! The real station reads a battery-backed external RTC (out of scope per
//! `spec.md` §1); this stands in for it on the host using `time::OffsetDateTime`,
//! the same crate the teacher's `apc1-cli` depends on for timestamps.

use station_core::clock::Clock;
use station_core::datetime::DateTime;
use station_core::error::ClockError;
use time::OffsetDateTime;

/// A `Clock` backed by the host's system clock, with an in-memory override
/// settable via [`Clock::set_datetime`] (the provisioning path, spec.md
/// §6.6) since adjusting the host's own wall clock is not this program's
/// business.
pub struct SystemClock {
    override_offset: Option<time::Duration>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            override_offset: None,
        }
    }

    fn now(&self) -> OffsetDateTime {
        let real = OffsetDateTime::now_utc();
        match self.override_offset {
            Some(offset) => real + offset,
            None => real,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn get_datetime(&mut self) -> Result<DateTime, ClockError> {
        let now = self.now();
        Ok(DateTime::new(
            now.year() as u16,
            now.month() as u8,
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
        ))
    }

    fn set_datetime(&mut self, dt: DateTime) -> Result<(), ClockError> {
        let target = time::PrimitiveDateTime::new(
            time::Date::from_calendar_date(dt.year as i32, month_from_u8(dt.month)?, dt.day)
                .map_err(|_| ClockError::Unavailable)?,
            time::Time::from_hms(dt.hour, dt.minute, dt.second).map_err(|_| ClockError::Unavailable)?,
        )
        .assume_utc();
        self.override_offset = Some(target - OffsetDateTime::now_utc());
        Ok(())
    }
}

fn month_from_u8(m: u8) -> Result<time::Month, ClockError> {
    time::Month::try_from(m).map_err(|_| ClockError::Unavailable)
}
