// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job trigger requests and their query-string encoding.
//!
//! A [`JobTriggerRequest`] targets exactly one CI job with one ordered
//! parameter set. It is built from operator input (or a selection of failed
//! tests) and consumed immediately by the trigger workflow.

use crate::record::FailedTest;
use indexmap::IndexMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;

/// Characters left unescaped in a URI component (`A-Z a-z 0-9 - _ . ! ~ * ' ( )`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Separator for test lists on projects without the `v2` naming convention.
const LEGACY_TEST_SEPARATOR: &str = " /test:";

/// Filter value meaning "no selection".
pub const ANY: &str = "--";

/// Errors building a trigger request from a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("no tests selected")]
    NoTests,
    #[error("all selected tests must be from the same project, environment, and build")]
    MixedSelection,
    #[error("{0} is required")]
    Missing(&'static str),
}

/// A single parameterised job-start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTriggerRequest {
    job: String,
    params: IndexMap<String, String>,
    previous_build: Option<i64>,
    landing_path: String,
}

impl JobTriggerRequest {
    /// Start a request for `job` with no parameters yet.
    pub fn new(job: impl Into<String>) -> Self {
        let job = job.into();
        let landing_path = format!("/job/{}/", job);
        Self { job, params: IndexMap::new(), previous_build: None, landing_path }
    }

    /// Append a parameter. Later values for the same name replace earlier ones
    /// but keep the original position.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// A fresh run of a project branch against an environment.
    ///
    /// `tests` is the operator's space-separated test list; it is sent as a
    /// comma-joined `Tests` parameter and omitted when blank.
    pub fn run_job(
        project: &str,
        branch: &str,
        env: &str,
        jira_id: Option<&str>,
        browser: Option<&str>,
        tests: Option<&str>,
    ) -> Result<Self, RequestError> {
        if project.is_empty() || project == ANY {
            return Err(RequestError::Missing("project"));
        }
        if branch.is_empty() {
            return Err(RequestError::Missing("branch"));
        }
        if env.is_empty() {
            return Err(RequestError::Missing("environment"));
        }

        let mut request = Self::new(project)
            .param("Branch", branch)
            .param("ENV", env)
            .param("JiraID", jira_id.unwrap_or_default());
        if let Some(browser) = browser.filter(|b| !b.is_empty() && *b != ANY) {
            request = request.param("Browser", browser);
        }
        if let Some(tests) = tests.map(str::trim).filter(|t| !t.is_empty()) {
            request = request.param("Tests", tests.split(' ').collect::<Vec<_>>().join(","));
        }
        Ok(request)
    }

    /// A rerun of previously failed tests against the build they failed in.
    ///
    /// All selected tests must share project, environment and build.
    pub fn rerun(selection: &[FailedTest], jira_id: Option<&str>) -> Result<Self, RequestError> {
        let first = selection.first().ok_or(RequestError::NoTests)?;
        let same_context = selection.iter().all(|t| {
            t.project == first.project && t.env == first.env && t.build_no == first.build_no
        });
        if !same_context {
            return Err(RequestError::MixedSelection);
        }

        let mut request = Self::new(&first.project)
            .param("crmUser", "")
            .param("JobType", "Nightly")
            .param("Retry", "true")
            .param("ENV", &first.env)
            .param("PreviousBuildNo", first.build_no.to_string());
        request.previous_build = Some(first.build_no);

        if first.is_ui() && !first.browser.is_empty() {
            request = request.param("Browser", &first.browser);
        }

        let names: Vec<&str> = selection.iter().map(|t| t.test_name.as_str()).collect();
        let (name, value) = test_list_param(&first.project, &names);
        request = request.param(name, value);

        if let Some(jira) = jira_id.filter(|j| !j.is_empty()) {
            request = request.param("JiraID", jira);
        }
        Ok(request)
    }

    /// A maintenance job run against one environment.
    ///
    /// Maintenance jobs live under the `Maintenance` view, which is where the
    /// landing page points.
    pub fn maintenance(job: &str, env: &str) -> Result<Self, RequestError> {
        if env.is_empty() {
            return Err(RequestError::Missing("environment"));
        }
        let mut request = Self::new(job).param("crmUser", "").param("ENV", env);
        request.landing_path = format!("/view/Maintenance/job/{}/", job);
        Ok(request)
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn previous_build(&self) -> Option<i64> {
        self.previous_build
    }

    pub fn is_retry(&self) -> bool {
        self.previous_build.is_some()
    }

    /// `token=<token>&Name=value...` with every value URI-component encoded.
    pub fn query_string(&self, token: &str) -> String {
        let mut query = format!("token={}", encode_component(token));
        for (name, value) in &self.params {
            query.push('&');
            query.push_str(name);
            query.push('=');
            query.push_str(&encode_component(value));
        }
        query
    }

    /// Path and query of the job-start endpoint.
    pub fn build_path(&self, token: &str) -> String {
        format!("/job/{}/buildWithParameters?{}", self.job, self.query_string(token))
    }

    /// Path of the job's general landing page.
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }
}

/// Name and value of the test-list parameter for a project.
///
/// Projects following the `v2` convention take a comma-joined `Tests`
/// parameter; older projects take `Test` joined with ` /test:`.
pub fn test_list_param(project: &str, tests: &[&str]) -> (&'static str, String) {
    if project.contains("v2") {
        ("Tests", tests.join(","))
    } else {
        ("Test", tests.join(LEGACY_TEST_SEPARATOR))
    }
}

/// Percent-encode a value the way a URI component is encoded.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
