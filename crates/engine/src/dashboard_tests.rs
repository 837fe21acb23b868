// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, NaiveDateTime};
use ns_core::test_support::{discounted_test, fixture_time};
use ns_core::{Discount, DiscountState, FakeClock};
use ns_storage::{MemoryResultStore, StoredResult};

type TestDashboard = Dashboard<MemoryResultStore, FakeClock>;

/// The run of 11/19, stamped 11/20 UTC
fn selected() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 19).unwrap()
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
}

fn setup() -> (TestDashboard, MemoryResultStore) {
    let store = MemoryResultStore::new();
    // Thursday
    let clock = FakeClock::on(NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());
    (Dashboard::new(store.clone(), clock, "dana"), store)
}

fn failure(test: &str) -> StoredResult {
    StoredResult::nightly("qe-crm-ui-tasks-v2", "TEST", test, "Failed").at(fixture_time())
}

// --- failed tests ---

#[tokio::test]
async fn failed_view_keeps_only_the_runs_utc_date() {
    let (dashboard, store) = setup();
    store.insert(failure("opensTask").owner("N/A"));
    store.insert(failure("closesTask").owner("Dana"));
    store.insert(failure("lateReport").at(at(21, 2)));

    let all = dashboard.failed_tests(selected(), None).await.unwrap();
    let view = dashboard.failed_view(selected(), &FailedTestFilter::default()).await.unwrap();

    assert_eq!(all.len(), 3);
    let names: Vec<_> = view.tests.iter().map(|t| t.test_name.as_str()).collect();
    assert_eq!(names, vec!["opensTask", "closesTask"]);
    assert_eq!(view.counts, FailureCounts { displayed: 2, unowned: 1 });
}

#[tokio::test]
async fn failed_view_applies_the_filter() {
    let (dashboard, store) = setup();
    store.insert(failure("opensTask"));
    store.insert(failure("closesTask").discounted(Discount::Jenkins, "agent"));
    store.insert(StoredResult::nightly("qe-crm-api-ivr-dotnet-v2", "PROD", "routes", "Failed").at(fixture_time()));

    let filter = FailedTestFilter {
        env: Some("TEST".into()),
        discounted: DiscountState::NotDiscounted,
        ..FailedTestFilter::default()
    };
    let view = dashboard.failed_view(selected(), &filter).await.unwrap();

    assert_eq!(view.tests.len(), 1);
    assert_eq!(view.tests[0].test_name, "opensTask");
}

#[tokio::test]
async fn selecting_failures_keeps_the_given_order() {
    let (dashboard, store) = setup();
    let a = store.insert(failure("a"));
    let b = store.insert(failure("b"));

    let picked = dashboard.select_failed(selected(), &[b, a]).await.unwrap();

    assert_eq!(picked.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b, a]);
}

#[tokio::test]
async fn selecting_an_unknown_failure_is_not_found() {
    let (dashboard, store) = setup();
    store.insert(failure("a"));

    let err = dashboard.select_failed(selected(), &[42]).await.unwrap_err();

    assert!(matches!(err, WorkflowError::Store(StoreError::NotFound { id: 42, .. })));
}

// --- discounts ---

#[yare::parameterized(
    no_tests      = { &[], "Jenkins", "agent", "No tests selected" },
    no_code       = { &[1], "", "agent", "The Discount Code is not selected" },
    no_reason     = { &[1], "Jenkins", " ", "The Discount Reason is not set" },
    unknown_code  = { &[1], "Gremlins", "agent", "Unknown discount code: Gremlins" },
)]
fn discount_validation(ids: &[i64], code: &str, reason: &str, message: &str) {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let (dashboard, store) = setup();
    store.insert(failure("a"));

    let err = rt.block_on(dashboard.discount(ids, code, reason)).unwrap_err();

    assert!(matches!(&err, WorkflowError::Validation(m) if m == message), "{err}");
    assert_eq!(store.row(1).unwrap().discount, Discount::None);
}

#[tokio::test]
async fn discount_writes_every_selected_test() {
    let (dashboard, store) = setup();
    let a = store.insert(failure("a"));
    let b = store.insert(failure("b"));

    let message = dashboard.discount(&[a, b], "CRM DevOps", "env outage").await.unwrap();

    assert_eq!(message, "Test(s) discounted");
    for id in [a, b] {
        let row = store.row(id).unwrap();
        assert_eq!(row.discount, Discount::CrmDevOps);
        assert_eq!(row.discount_reason, "env outage");
        assert_eq!(row.modified_by.as_deref(), Some("dana"));
    }
}

#[tokio::test]
async fn clearing_needs_no_reason() {
    let (dashboard, store) = setup();
    let a = store.insert(failure("a").discounted(Discount::Jenkins, "agent"));

    let message = dashboard.discount(&[a], "Clear Discount", "").await.unwrap();

    assert_eq!(message, "Discount cleared");
    assert_eq!(store.row(a).unwrap().discount, Discount::None);
    assert_eq!(store.row(a).unwrap().discount_reason, "");
}

#[tokio::test]
async fn yesterdays_discounts_read_the_selected_run() {
    let (dashboard, store) = setup();
    store.insert(failure("a").discounted(Discount::Jenkins, "agent"));
    store.insert(failure("b"));

    let discounts = dashboard.yesterdays_discounts(selected()).await.unwrap();

    assert_eq!(discounts.len(), 1);
    assert_eq!(discounts[0].discount_reason, "agent");
}

#[tokio::test]
async fn recent_discounts_step_back_to_a_weekday() {
    let (dashboard, store) = setup();
    // 11/20 minus four days is Sunday 11/16, so the Friday run is read
    store.insert(failure("friday").at(at(14, 10)).discounted(Discount::Deploy, "rollout"));
    store.insert(failure("today").discounted(Discount::Deploy, "rollout"));

    let discounts = dashboard.recent_discounts(selected(), DEFAULT_DAYS_BACK).await.unwrap();

    assert_eq!(discounts.iter().map(|d| d.test_name.as_str()).collect::<Vec<_>>(), vec!["friday"]);
}

// --- copying discounts ---

fn source(id: i64, test: &str, build_no: i64, error: &str) -> DiscountedTest {
    DiscountedTest {
        error: error.to_string(),
        ..discounted_test(id, "qe-crm-ui-tasks-v2", "TEST", build_no, test, Discount::Jenkins, "agent died")
    }
}

#[tokio::test]
async fn copy_discounts_onto_newer_builds_with_the_same_error() {
    let (dashboard, store) = setup();
    let same = store.insert(failure("same").build(11).error("Timeout waiting for grid node; retried"));
    let other = store.insert(failure("other").build(11).error("Element not found"));
    store.insert(failure("older").build(9));

    let report = dashboard
        .copy_discounts(
            selected(),
            &[
                source(100, "same", 10, "Timeout waiting for grid node"),
                source(101, "other", 10, "Timeout waiting for grid node"),
                source(102, "older", 10, ""),
            ],
            false,
        )
        .await
        .unwrap();

    assert_eq!(report.copied, vec![(100, same)]);
    assert_eq!(report.mismatched, vec![(101, other)]);
    assert_eq!(report.unmatched, vec![102]);
    assert_eq!(store.row(same).unwrap().discount, Discount::Jenkins);
    assert_eq!(store.row(same).unwrap().discount_reason, "agent died");
    assert_eq!(store.row(other).unwrap().discount, Discount::None);
}

#[tokio::test]
async fn forced_copy_ignores_the_error_text() {
    let (dashboard, store) = setup();
    let other = store.insert(failure("other").build(11).error("Element not found"));

    let report = dashboard
        .copy_discounts(selected(), &[source(101, "other", 10, "Timeout")], true)
        .await
        .unwrap();

    assert_eq!(report.copied, vec![(101, other)]);
    assert_eq!(store.row(other).unwrap().discount, Discount::Jenkins);
}

#[tokio::test]
async fn copy_compares_only_the_error_prefix() {
    let (dashboard, store) = setup();
    let head = "x".repeat(ERROR_PREFIX_CHARS);
    let target = store.insert(failure("long").build(11).error(&format!("{head} then something new")));

    let report = dashboard
        .copy_discounts(selected(), &[source(100, "long", 10, &format!("{head} then the old tail"))], false)
        .await
        .unwrap();

    assert_eq!(report.copied, vec![(100, target)]);
}

// --- reports ---

#[tokio::test]
async fn stats_report_renders_rates_and_projects() {
    let (dashboard, store) = setup();
    store.insert(failure("a").owner("Dana"));
    store.insert(StoredResult::nightly("qe-crm-ui-tasks-v2", "TEST", "b", "Passed").at(fixture_time()));
    store.insert(failure("c").owner("Dana").discounted(Discount::Jenkins, "agent"));

    let report = dashboard.stats_report(selected(), "https://ci.test").await.unwrap();

    assert_eq!(report.percentages.test_ui, 67);
    assert_eq!(
        report.text,
        "*TEST UI 67% TEST API PROD UI PROD API 100%*\n\
         \n\
         *UI*\n\
         (TEST) [Tasks](https://ci.test/job/qe-crm-ui-tasks-v2) (1) (D)\n\
         \n\
         *Discounted:*\n\
         *UI*\n\
         (TEST) [Tasks](https://ci.test/job/qe-crm-ui-tasks-v2) (1) (D) - agent\n"
    );
}

#[tokio::test]
async fn count_report_compares_baselines_with_the_run() {
    let (dashboard, store) = setup();
    store.insert(StoredResult::count("qe-crm-ui-tasks-v2", "TEST", 3));
    store.insert(failure("a"));
    store.insert(failure("b"));

    let drift = dashboard.count_report(selected()).await.unwrap();

    assert_eq!(drift.text(), "CURRENT UNDER COUNTS\nTEST qe-crm-ui-tasks-v2\nExpected: 3 Actual: 2\n\n");
}

#[tokio::test]
async fn test_details_of_a_missing_record_are_not_found() {
    let (dashboard, _store) = setup();
    assert!(matches!(
        dashboard.test_details(7).await,
        Err(WorkflowError::Store(StoreError::NotFound { id: 7, .. }))
    ));
}

#[tokio::test]
async fn unreachable_store_is_flagged_until_reset() {
    let (dashboard, store) = setup();
    store.set_unreachable(true);

    let err = dashboard.failed_tests(selected(), None).await.unwrap_err();
    assert!(err.is_store_connectivity());

    dashboard.reset().await.unwrap();
    assert_eq!(store.reset_count(), 1);
    assert!(dashboard.failed_tests(selected(), None).await.is_ok());
}

#[test]
fn monday_windows_reach_today() {
    let store = MemoryResultStore::new();
    let monday = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
    let dashboard = Dashboard::new(store, FakeClock::on(monday), "dana");

    let window = dashboard.run_window(NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());

    assert!(window.contains(at(21, 1)));
    assert!(window.contains(monday.and_hms_opt(9, 0, 0).unwrap()));
    assert!(!window.contains(at(21, 1) - Duration::days(2)));
}
