// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only lookups against the CI server

use crate::error::WorkflowError;
use chrono::{Duration, NaiveDate};
use ns_adapters::{Artifact, CiServer};
use serde::Serialize;

/// Sub-builds whose job name contains this are never rerun.
const MAINTENANCE_MARKER: &str = "Maintenance";

/// A multi-job child whose own children failed or were aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedJob {
    pub job_name: String,
    pub failed_builds: Vec<String>,
}

/// What the last nightly build left to rerun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NightlyReruns {
    /// The last nightly build predates the requested run.
    Stale { message: String },
    Jobs { failed: Vec<FailedJob> },
}

/// Lookups that read build descriptors
#[derive(Clone)]
pub struct CiQueries<C> {
    ci: C,
}

impl<C: CiServer> CiQueries<C> {
    pub fn new(ci: C) -> Self {
        Self { ci }
    }

    /// Absolute URL of a build's page.
    pub fn build_url(&self, job: &str, build: i64) -> String {
        self.ci.build_url(job, &build.to_string())
    }

    /// The `JiraID` parameter a build was started with, or empty.
    ///
    /// Advisory: lookup failures are logged and read as empty.
    pub async fn jira_id_for_build(&self, job: &str, build: i64) -> String {
        match self.ci.build(job, &build.to_string()).await {
            Ok(descriptor) => descriptor.parameter_containing("JiraID").unwrap_or_default(),
            Err(e) => {
                tracing::warn!(job, build, error = %e, "could not read Jira id");
                String::new()
            }
        }
    }

    /// Download URL of a test's failure screenshot among a build's artifacts.
    pub async fn screenshot_url(
        &self,
        test_name: &str,
        job: &str,
        build: i64,
    ) -> Result<Option<String>, WorkflowError> {
        let descriptor = self.ci.build(job, &build.to_string()).await?;
        let Some(artifact) = find_screenshot(&descriptor.artifacts, test_name) else {
            let pngs: Vec<&str> = descriptor
                .artifacts
                .iter()
                .filter_map(|a| a.file_name.as_deref())
                .filter(|name| name.to_lowercase().ends_with(".png"))
                .take(10)
                .collect();
            tracing::warn!(test = test_name, job, build, available = ?pngs, "screenshot not found");
            return Ok(None);
        };

        let path = artifact.relative_path.as_deref().or(artifact.file_name.as_deref()).unwrap_or_default();
        Ok(Some(format!("{}/job/{}/{}/artifact/{}", self.ci.base_url(), job, build, path)))
    }

    /// Failed or aborted children of the last nightly build's jobs.
    ///
    /// `date` is the operator-selected run date; a last build that started
    /// before the day prior is stale.
    pub async fn nightly_reruns(
        &self,
        nightly_job: &str,
        date: NaiveDate,
    ) -> Result<NightlyReruns, WorkflowError> {
        let last = self.ci.build(nightly_job, "lastBuild").await?;

        let cutoff = (date - Duration::days(1)).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        let fresh = last.timestamp.is_some_and(|ms| ms >= cutoff.timestamp_millis());
        if !fresh {
            tracing::info!(job = nightly_job, timestamp = ?last.timestamp, "last nightly build is stale");
            return Ok(NightlyReruns::Stale {
                message: "Nightly was not successful, nothing to rerun".to_string(),
            });
        }

        let mut failed = Vec::new();
        for sub in &last.sub_builds {
            if sub.job_name.contains(MAINTENANCE_MARKER) {
                continue;
            }
            let child = self.ci.build_at(&self.resolve(&sub.url)).await?;
            let failed_builds: Vec<String> = child
                .nested_sub_builds()
                .iter()
                .filter(|b| b.result.as_deref().is_some_and(is_rerunnable_result))
                .map(|b| self.resolve(&b.url))
                .collect();
            if !failed_builds.is_empty() {
                failed.push(FailedJob { job_name: sub.job_name.clone(), failed_builds });
            }
        }
        Ok(NightlyReruns::Jobs { failed })
    }

    /// Sub-build URLs may be absolute or relative to the server root.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.ci.base_url(), url.trim_start_matches('/'))
        }
    }
}

/// Patterns tried in order; the first artifact containing one wins.
pub fn screenshot_patterns(test_name: &str) -> Vec<String> {
    let underscored = test_name.replace('.', "_");
    vec![
        format!("{}_Failure.png", test_name),
        format!("{}_failure.png", test_name),
        format!("{}_Failure.PNG", test_name),
        format!("{}_Failure.png", underscored),
        format!("{}_failure.png", underscored),
    ]
}

fn find_screenshot<'a>(artifacts: &'a [Artifact], test_name: &str) -> Option<&'a Artifact> {
    screenshot_patterns(test_name).iter().find_map(|pattern| {
        let lower = pattern.to_lowercase();
        artifacts.iter().find(|a| {
            a.file_name
                .as_deref()
                .is_some_and(|name| name.contains(pattern.as_str()) || name.to_lowercase().contains(&lower))
        })
    })
}

fn is_rerunnable_result(result: &str) -> bool {
    let result = result.to_lowercase();
    result.contains("failure") || result.contains("aborted")
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
