// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_two() {
    cli().exits_with(2).stderr_has("Usage:");
}

#[test]
fn help_lists_every_command() {
    let run = cli().args(&["--help"]).passes().stdout_has("Usage:");
    for command in [
        "failed",
        "details",
        "discount",
        "discounts",
        "copy-discounts",
        "projects",
        "stats",
        "counts",
        "run",
        "rerun",
        "maintenance",
        "open",
        "screenshot",
        "nightly-reruns",
        "post-stats",
        "reset-db",
        "whoami",
    ] {
        assert!(run.stdout().contains(command), "help is missing {}", command);
    }
}

#[yare::parameterized(
    run         = { "run" },
    rerun       = { "rerun" },
    maintenance = { "maintenance" },
)]
fn launch_commands_offer_page_and_dry_run_modes(command: &str) {
    cli().args(&[command, "--help"]).passes().stdout_has("--via-page").stdout_has("--dry-run");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}
