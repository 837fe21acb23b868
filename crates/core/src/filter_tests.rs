// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::discount::Discount;
use crate::test_support::failed_test;

fn sample() -> Vec<FailedTest> {
    let mut a = failed_test(1, "proj-a", "TEST", 10, "a");
    a.browser = "Chrome".to_string();
    a.owner = "Dana".to_string();
    let mut b = failed_test(2, "proj-b", "PROD", 11, "b");
    b.automation_type = "api".to_string();
    b.owner = NO_OWNER.to_string();
    b.discount = Discount::Jenkins;
    let mut c = failed_test(3, "proj-a", "PROD", 10, "c");
    c.browser = "Edge".to_string();
    c.owner = NO_OWNER.to_string();
    vec![a, b, c]
}

fn ids(tests: &[&FailedTest]) -> Vec<i64> {
    tests.iter().map(|t| t.id).collect()
}

#[test]
fn empty_filter_keeps_everything_in_order() {
    let tests = sample();
    assert_eq!(ids(&FailedTestFilter::default().apply(&tests)), vec![1, 2, 3]);
}

#[test]
fn any_marker_matches_everything() {
    let tests = sample();
    let filter = FailedTestFilter { env: Some("--".into()), ..Default::default() };
    assert_eq!(filter.apply(&tests).len(), 3);
}

#[test]
fn filters_combine() {
    let tests = sample();
    let filter = FailedTestFilter {
        env: Some("PROD".into()),
        project: Some("proj-a".into()),
        ..Default::default()
    };
    assert_eq!(ids(&filter.apply(&tests)), vec![3]);
}

#[test]
fn automation_type_is_case_insensitive() {
    let tests = sample();
    let filter = FailedTestFilter { automation_type: Some("API".into()), ..Default::default() };
    assert_eq!(ids(&filter.apply(&tests)), vec![2]);
}

#[yare::parameterized(
    all            = { DiscountState::All, vec![1, 2, 3] },
    discounted     = { DiscountState::Discounted, vec![2] },
    not_discounted = { DiscountState::NotDiscounted, vec![1, 3] },
)]
fn filters_by_discount_state(state: DiscountState, expected: Vec<i64>) {
    let tests = sample();
    let filter = FailedTestFilter { discounted: state, ..Default::default() };
    assert_eq!(ids(&filter.apply(&tests)), expected);
}

#[test]
fn filters_by_utc_date() {
    let mut tests = sample();
    tests[1].created_at = tests[1].created_at - chrono::Duration::days(1);
    let filter = FailedTestFilter {
        utc_date: Some(tests[0].created_at.date()),
        ..Default::default()
    };
    assert_eq!(ids(&filter.apply(&tests)), vec![1, 3]);
}

#[test]
fn counts_unowned_failures() {
    let tests = sample();
    let kept = FailedTestFilter::default().apply(&tests);
    assert_eq!(FailureCounts::of(&kept), FailureCounts { displayed: 3, unowned: 2 });
}
