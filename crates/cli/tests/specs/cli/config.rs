// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration errors and defaults

use crate::prelude::*;

#[test]
fn malformed_config_is_a_usage_error() {
    cli()
        .config("jenkins_url = [\n")
        .args(&["whoami"])
        .exits_with(2)
        .stderr_has("invalid config");
}

#[test]
fn unknown_config_keys_are_rejected() {
    cli()
        .config("jenkins = \"https://ci.test\"\n")
        .args(&["whoami"])
        .exits_with(2)
        .stderr_has("unknown field");
}

#[test]
fn missing_named_config_is_a_usage_error() {
    let run = cli();
    let missing = run.home_path("absent.toml");
    run.env("NIGHTLY_CONFIG", missing.to_str().unwrap())
        .args(&["whoami"])
        .exits_with(2)
        .stderr_has("could not read config");
}

#[test]
fn negative_timing_is_rejected() {
    cli()
        .config("[timing]\ntrigger_delay = -5\n")
        .args(&["whoami"])
        .exits_with(2)
        .stderr_has("timing.trigger_delay");
}

#[test]
fn non_http_ci_url_fails() {
    cli()
        .config("jenkins_url = \"ftp://ci.test\"\n")
        .args(&["maintenance", "--env", "TEST", "--dry-run"])
        .exits_with(1)
        .stderr_has("base URL must be http(s)");
}

#[test]
fn store_commands_need_a_database_url() {
    cli()
        .args(&["failed"])
        .exits_with(2)
        .stderr_has("database_url is not configured");
}

#[test]
fn whoami_defaults_to_the_os_login() {
    cli()
        .args(&["whoami"])
        .passes()
        .stdout_has("operator:     spec-runner")
        .stdout_has("jenkins:      https://echoqa.jenkins.int.godaddy.com")
        .stdout_has("api token:    no")
        .stdout_has("result store: not configured");
}

#[test]
fn whoami_reads_the_config_and_env() {
    cli()
        .config("operator = \"dana\"\n")
        .env("NIGHTLY_JENKINS_TOKEN", "s3cret")
        .env("NIGHTLY_DATABASE_URL", "postgres://localhost/results")
        .args(&["--format", "json", "whoami"])
        .passes()
        .stdout_has("\"operator\": \"dana\"")
        .stdout_has("\"api_token_set\": true")
        .stdout_has("\"database_configured\": true")
        .stdout_lacks("s3cret");
}
