// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `config.toml` loading with environment overrides.

use crate::env;
use ns_adapters::default_alternate_browsers;
use ns_engine::WorkflowTiming;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_JENKINS_URL: &str = "https://echoqa.jenkins.int.godaddy.com";
pub const DEFAULT_TRIGGER_TOKEN: &str = "crmftw";
pub const UNKNOWN_OPERATOR: &str = "unknown";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid timing.{field}: {value} is not a duration in seconds")]
    Timing { field: &'static str, value: f64 },
}

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub jenkins_url: String,
    /// Fixed build-trigger token sent with every job start
    pub trigger_token: String,
    /// HTTP Basic password for descriptor reads
    pub api_token: String,
    /// HTTP Basic user, also recorded as the discount author
    pub operator: String,
    pub database_url: Option<String>,
    /// Install paths tried in order by the page fallback
    pub alternate_browsers: Vec<PathBuf>,
    pub maintenance_job: String,
    pub stats_job: String,
    pub nightly_job: String,
    pub log_dir: Option<PathBuf>,
    pub desktop_notifications: bool,
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jenkins_url: DEFAULT_JENKINS_URL.to_string(),
            trigger_token: DEFAULT_TRIGGER_TOKEN.to_string(),
            api_token: String::new(),
            operator: String::new(),
            database_url: None,
            alternate_browsers: default_alternate_browsers(),
            maintenance_job: "qe-crm-api-ivr-dotnet-v2-Maintenance".to_string(),
            stats_job: "Nightly-SDET-Stats".to_string(),
            nightly_job: "Nightly".to_string(),
            log_dir: None,
            desktop_notifications: true,
            timing: TimingConfig::default(),
        }
    }
}

/// `[timing]` overrides, in seconds
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub trigger_delay: Option<f64>,
    pub max_resends: Option<u32>,
    pub poll_settle: Option<f64>,
    pub poll_interval: Option<f64>,
    pub poll_extra_attempts: Option<u32>,
    pub error_linger: Option<f64>,
    pub ready_initial: Option<f64>,
    pub ready_max: Option<f64>,
}

impl TimingConfig {
    /// `base` with every configured override applied.
    pub fn apply(&self, base: WorkflowTiming) -> Result<WorkflowTiming, ConfigError> {
        let secs = |field: &'static str, value: Option<f64>, current: Duration| match value {
            Some(value) => {
                Duration::try_from_secs_f64(value).map_err(|_| ConfigError::Timing { field, value })
            }
            None => Ok(current),
        };
        Ok(WorkflowTiming {
            trigger_delay: secs("trigger_delay", self.trigger_delay, base.trigger_delay)?,
            max_resends: self.max_resends.unwrap_or(base.max_resends),
            poll_settle: secs("poll_settle", self.poll_settle, base.poll_settle)?,
            poll_interval: secs("poll_interval", self.poll_interval, base.poll_interval)?,
            poll_extra_attempts: self.poll_extra_attempts.unwrap_or(base.poll_extra_attempts),
            error_linger: secs("error_linger", self.error_linger, base.error_linger)?,
            ready_initial: secs("ready_initial", self.ready_initial, base.ready_initial)?,
            ready_max: secs("ready_max", self.ready_max, base.ready_max)?,
        })
    }
}

impl Config {
    /// Load from `explicit`, else `$NIGHTLY_CONFIG`, else the default
    /// location when it exists, else built-in defaults.
    ///
    /// A named file that is missing is an error; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let named = explicit.map(Path::to_path_buf).or_else(env::config_override);
        let config = match named {
            Some(path) => Self::read(&path)?,
            None => match env::default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::read(&path)?,
                None => Self::default(),
            },
        };
        let config = config.with_env();
        config.workflow_timing()?;
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.message().to_string() })
    }

    /// Environment variables win over file values.
    pub fn with_env(mut self) -> Self {
        if let Some(url) = env::jenkins_url() {
            self.jenkins_url = url;
        }
        if let Some(token) = env::api_token() {
            self.api_token = token;
        }
        if let Some(url) = env::database_url() {
            self.database_url = Some(url);
        }
        if self.operator.trim().is_empty() {
            self.operator = env::os_login().unwrap_or_else(|| UNKNOWN_OPERATOR.to_string());
        }
        self
    }

    pub fn workflow_timing(&self) -> Result<WorkflowTiming, ConfigError> {
        self.timing.apply(WorkflowTiming::default())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
