//! Collaborator interface for the external battery-backed clock (spec.md §6.3).
//!
//! The station never keeps its own wall-clock state: every timestamp comes
//! from a `Clock` read at the moment it is needed. Concrete implementations
//! (a DS3231-style RTC over I2C, or the host system clock for testing) live
//! outside this crate.

use crate::datetime::DateTime;
use crate::error::ClockError;

/// Reads and sets the station's external wall clock.
pub trait Clock {
    /// Returns the current reading. Fails only if the clock hardware itself
    /// is unreachable, never on a plausible-but-stale value.
    fn get_datetime(&mut self) -> Result<DateTime, ClockError>;

    /// Sets the clock to `dt`, as used by the provisioning path (§6.6).
    fn set_datetime(&mut self, dt: DateTime) -> Result<(), ClockError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A fixed or steppable clock for exercising the state machine without
    /// real hardware.
    pub struct FakeClock {
        pub now: DateTime,
    }

    impl FakeClock {
        pub fn new(now: DateTime) -> Self {
            Self { now }
        }
    }

    impl Clock for FakeClock {
        fn get_datetime(&mut self) -> Result<DateTime, ClockError> {
            Ok(self.now)
        }

        fn set_datetime(&mut self, dt: DateTime) -> Result<(), ClockError> {
            self.now = dt;
            Ok(())
        }
    }
}
