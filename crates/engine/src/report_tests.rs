// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ns_core::test_support::failure_row;
use ns_core::Discount;

const BASE: &str = "https://ci.test";

#[yare::parameterized(
    nothing_ran = { 0, 0, 100 },
    all_passed  = { 40, 0, 100 },
    rounds_down = { 3, 1, 67 },
    rounds_half = { 8, 1, 88 },
    all_failed  = { 5, 5, 0 },
)]
fn pass_rates(total: i64, failed: i64, expected: i64) {
    assert_eq!(pass_rate(total, failed), expected);
}

#[test]
fn headline_groups_equal_rates_lowest_first() {
    let percentages = Percentages { test_ui: 90, test_api: 95, prod_ui: 100, prod_api: 90 };
    assert_eq!(percentages.headline(), "TEST UI PROD API 90% TEST API 95% PROD UI 100%");
}

#[test]
fn headline_with_one_rate() {
    let percentages = Percentages::from_totals(&RunTotals::default());
    assert_eq!(percentages.headline(), "TEST UI TEST API PROD UI PROD API 100%");
}

#[test]
fn grouping_counts_env_classes_and_collects_reasons() {
    let mut rows = vec![
        failure_row("qe-crm-ui-tasks-v2", "TEST", "Dana"),
        failure_row("qe-crm-ui-tasks-v2", "BETA", "Someone Else"),
        failure_row("qe-crm-ui-tasks-v2", "PROD", "Dana"),
        failure_row("qe-crm-ui-tasks-v2", "DEV", "Dana"),
    ];
    rows[0].discount_reason = "agent died".into();
    rows[1].discount_reason = "agent died".into();
    rows[2].discount_reason = "deploy".into();

    let stats = group_failures(&rows);

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].test_count, 2);
    assert_eq!(stats[0].prod_count, 1);
    assert_eq!(stats[0].owner, "Dana");
    assert_eq!(stats[0].discount_reasons, vec!["agent died", "deploy"]);
}

#[yare::parameterized(
    both      = { 2, 3, "(PROD/TEST) [Tasks](https://ci.test/job/qe-crm-ui-tasks-v2) (2/3) (D)" },
    prod_only = { 1, 0, "(PROD) [Tasks](https://ci.test/job/qe-crm-ui-tasks-v2) (1) (D)" },
    test_only = { 0, 4, "(TEST) [Tasks](https://ci.test/job/qe-crm-ui-tasks-v2) (4) (D)" },
)]
fn project_lines(prod: usize, test: usize, expected: &str) {
    let stats = ProjectStats {
        project: "qe-crm-ui-tasks-v2".into(),
        automation_type: "ui",
        test_count: test,
        prod_count: prod,
        discount_reasons: vec![],
        owner: "Dana".into(),
    };
    assert_eq!(stats.line(BASE).as_deref(), Some(expected));
}

#[test]
fn project_line_without_counted_failures_is_skipped() {
    let stats = group_failures(&[failure_row("qe-crm-ui-tasks-v2", "DEV", "Dana")]);
    assert_eq!(stats[0].line(BASE), None);
}

#[yare::parameterized(
    named    = { "Dana", "D" },
    no_owner = { "N/A", "N/A" },
    blank    = { "", "N/A" },
)]
fn owner_initials(owner: &str, expected: &str) {
    let stats = group_failures(&[failure_row("qe-crm-ui-tasks", "TEST", owner)]);
    assert_eq!(stats[0].owner_initial(), expected);
}

#[test]
fn status_text_sorts_lines_into_sections() {
    let failing = group_failures(&[
        failure_row("qe-crm-ui-tasks-v2", "TEST", "Dana"),
        failure_row("qe-crm-ui-activity-v2", "PROD", "Lee"),
        failure_row("qe-crm-api-ivr-dotnet", "TEST", "N/A"),
    ]);
    let mut discounted_row = failure_row("qe-crm-ui-notes-v2", "TEST", "Sam");
    discounted_row.discount = Discount::Jenkins;
    discounted_row.discount_reason = "agent died".into();
    let discounted = group_failures(&[discounted_row]);
    let percentages = Percentages { test_ui: 97, test_api: 100, prod_ui: 99, prod_api: 100 };

    let text = status_text(&percentages, &failing, &discounted, BASE);

    similar_lines(
        &text,
        "*TEST UI 97% PROD UI 99% TEST API PROD API 100%*\n\
         \n\
         *UI*\n\
         (PROD) [Activity](https://ci.test/job/qe-crm-ui-activity-v2) (1) (L)\n\
         (TEST) [Tasks](https://ci.test/job/qe-crm-ui-tasks-v2) (1) (D)\n\
         *API*\n\
         (TEST) [Ivr](https://ci.test/job/qe-crm-api-ivr-dotnet) (1) (N/A)\n\
         \n\
         *Discounted:*\n\
         *UI*\n\
         (TEST) [Notes](https://ci.test/job/qe-crm-ui-notes-v2) (1) (S) - agent died\n",
    );
}

#[test]
fn status_text_without_failures_is_just_the_headline() {
    let percentages = Percentages { test_ui: 100, test_api: 100, prod_ui: 100, prod_api: 100 };
    assert_eq!(
        status_text(&percentages, &[], &[], BASE),
        "*TEST UI TEST API PROD UI PROD API 100%*\n\n"
    );
}

fn similar_lines(actual: &str, expected: &str) {
    for (a, e) in actual.lines().zip(expected.lines()) {
        assert_eq!(a, e);
    }
    assert_eq!(actual, expected);
}

fn baseline(project: &str, env: &str, expected: i64) -> CountBaseline {
    CountBaseline { project: project.into(), env: env.into(), expected }
}

fn actual(project: &str, env: &str, actual: i64) -> CountActual {
    CountActual { project: project.into(), env: env.into(), actual }
}

#[test]
fn count_drift_classifies_under_and_over() {
    let baselines = vec![
        baseline("qe-crm-ui-notes", "PROD", 5),
        baseline("qe-crm-ui-tasks", "PROD", 0),
        baseline("qe-crm-ui-tasks", "TEST", 10),
        baseline("qe-crm-ui-queue", "TEST", 3),
        baseline("qe-crm-ui-shell", "TEST", 4),
    ];
    let actuals = vec![
        actual("qe-crm-ui-extra", "TEST", 2),
        actual("qe-crm-ui-queue", "TEST", 3),
        actual("qe-crm-ui-shell", "TEST", 6),
        actual("qe-crm-ui-tasks", "TEST", 8),
    ];

    let drift = CountDrift::compare(&baselines, &actuals);

    assert_eq!(
        drift.text(),
        "CURRENT UNDER COUNTS\n\
         PROD qe-crm-ui-notes\nExpected: 5 Actual: 0\n\
         TEST qe-crm-ui-tasks\nExpected: 10 Actual: 8\n\
         \n\
         CURRENT OVER COUNTS\n\
         TEST qe-crm-ui-shell\nExpected: 4 Actual: 6\n\
         TEST qe-crm-ui-extra\nExpected: NONE Actual: 2\n\
         \n"
    );
}

#[test]
fn matching_counts_are_accurate() {
    let drift = CountDrift::compare(
        &[baseline("qe-crm-ui-tasks", "TEST", 10)],
        &[actual("qe-crm-ui-tasks", "TEST", 10)],
    );
    assert!(drift.is_accurate());
    assert_eq!(drift.text(), "All counts are accurate");
}

#[test]
fn zero_baseline_with_actuals_is_not_reported_as_unknown() {
    let drift = CountDrift::compare(
        &[baseline("qe-crm-ui-tasks", "PROD", 0)],
        &[actual("qe-crm-ui-tasks", "PROD", 3)],
    );
    assert!(drift.is_accurate());
}
