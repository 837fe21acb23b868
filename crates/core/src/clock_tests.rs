// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn system_clock_is_close_to_now() {
    let clock = SystemClock;
    let before = Utc::now();
    let now = clock.now_utc();
    assert!(now >= before);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::on(NaiveDate::from_ymd_opt(2025, 11, 19).unwrap());
    clock.advance(Duration::days(1));
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::default();
    let clock2 = clock1.clone();
    clock2.advance(Duration::hours(30));
    assert_eq!(clock1.today(), NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::default();
    let instant = Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap();
    clock.set(instant);
    assert_eq!(clock.now_utc(), instant);
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
}
