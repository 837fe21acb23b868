// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `--dry-run` builds job-start URLs without contacting the CI server.

use crate::prelude::*;

#[test]
fn run_prints_trigger_and_landing_urls() {
    cli()
        .env("NIGHTLY_JENKINS_URL", "https://ci.test/")
        .args(&[
            "run",
            "--project",
            "qe-crm-ui-tasks-v2",
            "--branch",
            "feature/a b",
            "--env",
            "TEST",
            "--browser",
            "chrome",
            "--tests",
            "opensTask closesTask",
            "--dry-run",
        ])
        .passes()
        .stdout_eq(
            "trigger: https://ci.test/job/qe-crm-ui-tasks-v2/buildWithParameters?token=crmftw&Branch=feature%2Fa%20b&ENV=TEST&JiraID=&Browser=chrome&Tests=opensTask%2CclosesTask\n\
             landing: https://ci.test/job/qe-crm-ui-tasks-v2/\n",
        );
}

#[test]
fn any_browser_is_left_out() {
    cli()
        .env("NIGHTLY_JENKINS_URL", "https://ci.test")
        .args(&["run", "--project", "qe-crm-api", "--branch", "main", "--env", "PROD", "--browser=--", "--dry-run"])
        .passes()
        .stdout_lacks("Browser=");
}

#[test]
fn maintenance_as_json() {
    let run = cli()
        .config("jenkins_url = \"https://ci.test\"\ntrigger_token = \"t&k\"\n")
        .args(&["--format", "json", "maintenance", "--env", "BETA", "--dry-run"])
        .passes();

    let plan = run.json();
    assert_eq!(plan["job"], "qe-crm-api-ivr-dotnet-v2-Maintenance");
    assert_eq!(
        plan["trigger_url"],
        "https://ci.test/job/qe-crm-api-ivr-dotnet-v2-Maintenance/buildWithParameters?token=t%26k&crmUser=&ENV=BETA"
    );
    assert_eq!(plan["landing_url"], "https://ci.test/view/Maintenance/job/qe-crm-api-ivr-dotnet-v2-Maintenance/");
    assert_eq!(plan["params"], serde_json::json!({ "crmUser": "", "ENV": "BETA" }));
}

#[test]
fn configured_maintenance_job_is_used() {
    cli()
        .config("jenkins_url = \"https://ci.test\"\nmaintenance_job = \"qe-crm-ui-Maintenance\"\n")
        .args(&["maintenance", "--env", "TEST", "--dry-run"])
        .passes()
        .stdout_has("landing: https://ci.test/view/Maintenance/job/qe-crm-ui-Maintenance/");
}

#[test]
fn run_without_a_project_is_a_usage_error() {
    cli()
        .args(&["run", "--project=--", "--branch", "main", "--env", "TEST", "--dry-run"])
        .exits_with(2)
        .stderr_has("project is required");
}

#[test]
fn run_without_a_branch_is_rejected_by_the_parser() {
    cli()
        .args(&["run", "--project", "qe-crm-api", "--env", "TEST", "--dry-run"])
        .exits_with(2)
        .stderr_has("--branch");
}
