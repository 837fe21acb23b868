// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Config file named by NIGHTLY_CONFIG
pub fn config_override() -> Option<PathBuf> {
    non_empty("NIGHTLY_CONFIG").map(PathBuf::from)
}

/// `<config dir>/nightly/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nightly").join("config.toml"))
}

/// CI server base URL override
pub fn jenkins_url() -> Option<String> {
    non_empty("NIGHTLY_JENKINS_URL")
}

/// API token for HTTP Basic auth: NIGHTLY_JENKINS_TOKEN > JenkinsToken
pub fn api_token() -> Option<String> {
    non_empty("NIGHTLY_JENKINS_TOKEN").or_else(|| non_empty("JenkinsToken"))
}

/// Result store connection string override
pub fn database_url() -> Option<String> {
    non_empty("NIGHTLY_DATABASE_URL")
}

/// OS login of the operator: USERNAME > USER
pub fn os_login() -> Option<String> {
    non_empty("USERNAME").or_else(|| non_empty("USER"))
}

/// Log filter directives: NIGHTLY_LOG > RUST_LOG
pub fn log_filter() -> Option<String> {
    non_empty("NIGHTLY_LOG").or_else(|| non_empty("RUST_LOG"))
}
