// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-date rules.
//!
//! Nightly results start after 5pm MST, so the run an operator calls "11/19"
//! carries UTC timestamps on 11/20. Every query window is computed from the
//! UTC run date.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

/// The UTC run date for a date picked by an operator.
pub fn selected_to_utc_date(selected: NaiveDate) -> NaiveDate {
    selected + Duration::days(1)
}

/// The run an operator looks at by default: yesterday's, or Friday's on a Monday.
pub fn default_run_date(today: NaiveDate) -> NaiveDate {
    match today.weekday() {
        Weekday::Mon => today - Duration::days(3),
        _ => today - Duration::days(1),
    }
}

/// Step back `days_back` days from `base`, landing weekends on the previous Friday.
pub fn recent_discount_date(base: NaiveDate, days_back: i64) -> NaiveDate {
    let target = base - Duration::days(days_back);
    match target.weekday() {
        Weekday::Sun => target - Duration::days(2),
        Weekday::Sat => target - Duration::days(1),
        _ => target,
    }
}

/// An exclusive timestamp window `(start, end)` over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RunWindow {
    /// The window for one run date: from the start of `date` to the end of
    /// the following day.
    ///
    /// On Mondays the window stretches to the end of today so the Friday
    /// run picks up everything reported over the weekend.
    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        let end_day = if today.weekday() == Weekday::Mon {
            today
        } else {
            date + Duration::days(1)
        };
        Self { start, end: end_of_day(end_day) }
    }

    /// Whether a timestamp falls strictly inside the window.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at > self.start && at < self.end
    }
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    day.and_time(time)
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod tests;
