//! Calendar source for date-driven booking transitions.

use std::sync::Mutex;

use chrono::{Local, NaiveDate};

/// Supplies "today" as a calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Process-local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a settable date.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        match self.today.lock() {
            Ok(mut guard) => *guard = today,
            Err(poisoned) => *poisoned.into_inner() = today,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_can_be_moved() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        clock.set(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
    }
}
