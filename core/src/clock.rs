//! Dataset clock — anchors every generated date to a single "today".
//!
//! All generator windows (signup lookback, usage window, billing
//! months) are computed relative to one anchor date so a whole seeding
//! run is internally consistent. The analytical views use the query
//! date, which matches the anchor as long as seeding used `now()`.

use chrono::{Datelike, Months, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetClock {
    today: NaiveDate,
}

impl DatasetClock {
    /// Anchor at the current UTC date. Production seeding uses this so
    /// the views' sliding windows line up with the generated data.
    pub fn now() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }

    /// Anchor at a fixed date (stage-level unit tests only).
    pub fn fixed(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Today minus n calendar months, clamped to valid month ends.
    pub fn months_ago(&self, n: u32) -> NaiveDate {
        self.today - Months::new(n)
    }

    /// Today minus n days.
    pub fn days_ago(&self, n: i64) -> NaiveDate {
        self.today - chrono::Duration::days(n)
    }
}

/// Whole calendar months elapsed from `start` to `end`. A partial
/// month does not count; the result is negative when `end` precedes
/// `start` by more than a month boundary.
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = (end.year() as i64 - start.year() as i64) * 12
        + (end.month() as i64 - start.month() as i64);
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

/// Month-step dates from `start` to `end` inclusive: start, start+1mo,
/// start+2mo, … while <= end. Empty when `end` precedes `start`.
/// Day-of-month clamps at short months (Jan 31 -> Feb 28) and stays
/// clamped afterwards, which keeps each customer's dates unique.
pub fn month_steps(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut steps = Vec::new();
    let mut d = start;
    while d <= end {
        steps.push(d);
        match d.checked_add_months(Months::new(1)) {
            Some(next) => d = next,
            None => break,
        }
    }
    steps
}

/// Days elapsed from `start` to `end` (negative if end < start).
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
