//! Date source for reminder evaluation and validation
//!
//! Every decision about "today" goes through a [`Clock`] so that ticks and
//! validation can be replayed against a fixed date in tests.

use chrono::NaiveDate;
#[cfg(test)]
use std::sync::{Arc, RwLock};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The host's local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to a date that can be moved by hand
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Arc<RwLock<NaiveDate>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Arc::new(RwLock::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        match self.date.write() {
            Ok(mut guard) => *guard = date,
            Err(poisoned) => *poisoned.into_inner() = date,
        }
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.date.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
