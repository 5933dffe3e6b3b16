//! # Clock
//!
//! Wall-clock source for the current period.

use chrono::NaiveDate;

use crate::domain::traits::Clock;

/// Local calendar date of the host.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
