// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ns_engine::FailedJob;
use serial_test::serial;

#[test]
fn stale_nightly_shows_the_message() {
    let reruns = NightlyReruns::Stale { message: "Nightly was not successful, nothing to rerun".into() };
    assert_eq!(reruns_text(&reruns), "Nightly was not successful, nothing to rerun");
}

#[test]
fn clean_nightly_has_nothing_to_rerun() {
    assert_eq!(reruns_text(&NightlyReruns::Jobs { failed: vec![] }), "Nothing to rerun");
}

#[test]
#[serial]
fn failed_builds_are_grouped_by_job() {
    std::env::set_var("NO_COLOR", "1");
    let reruns = NightlyReruns::Jobs {
        failed: vec![
            FailedJob {
                job_name: "Nightly-UI".into(),
                failed_builds: vec![
                    "https://ci.test/job/qe-crm-ui-tasks-v2/41/".into(),
                    "https://ci.test/job/qe-crm-ui-notes-v2/17/".into(),
                ],
            },
            FailedJob { job_name: "Nightly-API".into(), failed_builds: vec!["https://ci.test/job/qe-crm-api/9/".into()] },
        ],
    };

    assert_eq!(
        reruns_text(&reruns),
        "Nightly-UI\n  https://ci.test/job/qe-crm-ui-tasks-v2/41/\n  https://ci.test/job/qe-crm-ui-notes-v2/17/\n\
         Nightly-API\n  https://ci.test/job/qe-crm-api/9/\n"
    );
}
