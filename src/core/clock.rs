//! Manually advanced clock
//!
//! The script driver moves the clock to each record's time before applying
//! it. Tests use it to step across accrual years.

use crate::core::traits::Clock;
use crate::types::{LedgerError, Timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Move the clock to `time`
    ///
    /// Fails with `ClockRegression` if `time` is earlier than the current
    /// value; staying at the same time is allowed.
    pub fn advance_to(&mut self, time: Timestamp) -> Result<(), LedgerError> {
        if time < self.now {
            return Err(LedgerError::ClockRegression {
                now: self.now,
                requested: time,
            });
        }
        self.now = time;
        Ok(())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}
