// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ns_adapters::{BuildDescriptor, CiCall, FakeCiServer};
use serde_json::json;

fn descriptor(value: serde_json::Value) -> BuildDescriptor {
    serde_json::from_value(value).unwrap()
}

fn setup() -> (CiQueries<FakeCiServer>, FakeCiServer) {
    let ci = FakeCiServer::new();
    (CiQueries::new(ci.clone()), ci)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2025-11-19 23:30 UTC in milliseconds
const NOV_19_LATE: i64 = 1_763_595_000_000;

#[tokio::test]
async fn jira_id_comes_from_build_parameters() {
    let (queries, ci) = setup();
    ci.set_build(
        "qe-crm-ui-tasks",
        "412",
        descriptor(json!({
            "actions": [
                {},
                { "parameters": [
                    { "name": "Branch", "value": "main" },
                    { "name": "JiraID", "value": "CRM-1234" }
                ]}
            ]
        })),
    );

    assert_eq!(queries.jira_id_for_build("qe-crm-ui-tasks", 412).await, "CRM-1234");
}

#[tokio::test]
async fn jira_id_lookup_failure_reads_as_empty() {
    let (queries, _ci) = setup();
    assert_eq!(queries.jira_id_for_build("missing", 1).await, "");
}

#[tokio::test]
async fn screenshot_prefers_the_primary_pattern() {
    let (queries, ci) = setup();
    ci.set_build(
        "qe-crm-ui-tasks",
        "412",
        descriptor(json!({
            "artifacts": [
                { "fileName": "opensTask_failure.png", "relativePath": "shots/lower/opensTask_failure.png" },
                { "fileName": "opensTask_Failure.png", "relativePath": "shots/opensTask_Failure.png" }
            ]
        })),
    );

    let url = queries.screenshot_url("opensTask", "qe-crm-ui-tasks", 412).await.unwrap();

    // Containment is case-insensitive, so the first artifact matches the primary pattern
    assert_eq!(
        url.as_deref(),
        Some("https://ci.test/job/qe-crm-ui-tasks/412/artifact/shots/lower/opensTask_failure.png")
    );
}

#[tokio::test]
async fn screenshot_matches_dotted_names_with_underscores() {
    let (queries, ci) = setup();
    ci.set_build(
        "qe-crm-ui-tasks",
        "7",
        descriptor(json!({
            "artifacts": { "fileName": "Tasks_opensTask_Failure.png" }
        })),
    );

    let url = queries.screenshot_url("Tasks.opensTask", "qe-crm-ui-tasks", 7).await.unwrap();

    assert_eq!(
        url.as_deref(),
        Some("https://ci.test/job/qe-crm-ui-tasks/7/artifact/Tasks_opensTask_Failure.png")
    );
}

#[tokio::test]
async fn screenshot_missing_is_none() {
    let (queries, ci) = setup();
    ci.set_build("qe-crm-ui-tasks", "7", descriptor(json!({ "artifacts": [{ "fileName": "other.png" }] })));

    assert_eq!(queries.screenshot_url("opensTask", "qe-crm-ui-tasks", 7).await.unwrap(), None);
}

#[tokio::test]
async fn screenshot_lookup_errors_propagate() {
    let (queries, _ci) = setup();
    assert!(queries.screenshot_url("opensTask", "qe-crm-ui-tasks", 7).await.is_err());
}

#[test]
fn screenshot_patterns_are_ordered() {
    assert_eq!(
        screenshot_patterns("a.b"),
        vec!["a.b_Failure.png", "a.b_failure.png", "a.b_Failure.PNG", "a_b_Failure.png", "a_b_failure.png"]
    );
}

#[tokio::test]
async fn nightly_reruns_collect_failed_and_aborted_children() {
    let (queries, ci) = setup();
    ci.set_build(
        "Nightly",
        "lastBuild",
        descriptor(json!({
            "timestamp": NOV_19_LATE,
            "subBuilds": [
                { "jobName": "UI-Nightly", "url": "job/UI-Nightly/88/" },
                { "jobName": "IVR-Maintenance", "url": "job/IVR-Maintenance/3/" },
                { "jobName": "API-Nightly", "url": "https://ci.test/job/API-Nightly/41/" }
            ]
        })),
    );
    ci.set_build_at(
        "https://ci.test/job/UI-Nightly/88/",
        descriptor(json!({
            "build": { "subBuilds": [
                { "jobName": "qe-crm-ui-tasks", "url": "job/qe-crm-ui-tasks/412/", "result": "FAILURE" },
                { "jobName": "qe-crm-ui-notes", "url": "job/qe-crm-ui-notes/90/", "result": "SUCCESS" },
                { "jobName": "qe-crm-ui-shell", "url": "job/qe-crm-ui-shell/12/", "result": "ABORTED" },
                { "jobName": "qe-crm-ui-queue", "url": "job/qe-crm-ui-queue/5/" }
            ]}
        })),
    );
    ci.set_build_at(
        "https://ci.test/job/API-Nightly/41/",
        descriptor(json!({ "build": { "subBuilds": [{ "jobName": "x", "url": "job/x/1/", "result": "SUCCESS" }] } })),
    );

    let reruns = queries.nightly_reruns("Nightly", day(2025, 11, 20)).await.unwrap();

    assert_eq!(
        reruns,
        NightlyReruns::Jobs {
            failed: vec![FailedJob {
                job_name: "UI-Nightly".to_string(),
                failed_builds: vec![
                    "https://ci.test/job/qe-crm-ui-tasks/412/".to_string(),
                    "https://ci.test/job/qe-crm-ui-shell/12/".to_string(),
                ],
            }]
        }
    );
    assert!(!ci.calls().iter().any(|c| matches!(c, CiCall::BuildAt { url } if url.contains("Maintenance"))));
}

#[yare::parameterized(
    same_day      = { 20, false },
    next_day      = { 21, true },
    two_days_late = { 22, true },
)]
fn stale_nightly_has_nothing_to_rerun(selected_day: u32, stale: bool) {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let (queries, ci) = setup();
    ci.set_build("Nightly", "lastBuild", descriptor(json!({ "timestamp": NOV_19_LATE, "subBuilds": [] })));

    let reruns = rt.block_on(queries.nightly_reruns("Nightly", day(2025, 11, selected_day))).unwrap();

    assert_eq!(matches!(reruns, NightlyReruns::Stale { .. }), stale);
}

#[tokio::test]
async fn nightly_without_timestamp_is_stale() {
    let (queries, ci) = setup();
    ci.set_build("Nightly", "lastBuild", descriptor(json!({})));

    let reruns = queries.nightly_reruns("Nightly", day(2025, 11, 20)).await.unwrap();

    assert_eq!(
        reruns,
        NightlyReruns::Stale { message: "Nightly was not successful, nothing to rerun".to_string() }
    );
}

#[test]
fn build_urls_are_absolute() {
    let (queries, _ci) = setup();
    assert_eq!(queries.build_url("qe-crm-ui-tasks", 412), "https://ci.test/job/qe-crm-ui-tasks/412/");
}
