// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins implementation of [`CiServer`] over HTTPS.
//!
//! Every request authenticates with HTTP Basic: the operator's login name as
//! the user and a static API token as the password.

use super::{BuildDescriptor, CiError, CiServer, JobDescriptor};
use async_trait::async_trait;
use ns_core::JobStatusSnapshot;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Timeout for job-start POSTs
const TRIGGER_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for descriptor GETs
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct JenkinsClient {
    http: reqwest::Client,
    base_url: String,
    operator: String,
    api_token: String,
}

impl JenkinsClient {
    pub fn new(
        base_url: &str,
        operator: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, CiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CiError::Config(format!("base URL must be http(s): {}", base_url)));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("nightly/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CiError::Config(e.to_string()))?;
        Ok(Self { http, base_url, operator: operator.into(), api_token: api_token.into() })
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CiError> {
        tracing::debug!(%url, "fetching descriptor");
        let response = self
            .http
            .get(url)
            .basic_auth(&self.operator, Some(&self.api_token))
            .timeout(QUERY_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CiError::Auth { url: url.to_string(), status: status.as_u16() });
        }
        if !status.is_success() {
            return Err(CiError::Status { url: url.to_string(), status: status.as_u16() });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CiError::Decode { url: url.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl CiServer for JenkinsClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn start_build(&self, path: &str) -> Result<u16, CiError> {
        let url = self.absolute(path);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.operator, Some(&self.api_token))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .timeout(TRIGGER_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let status = response.status().as_u16();
        tracing::debug!(%url, status, "job-start response");
        Ok(status)
    }

    async fn job_status(&self, job: &str) -> Result<JobStatusSnapshot, CiError> {
        let url = format!("{}/job/{}/api/json", self.base_url, job);
        let descriptor: JobDescriptor = self.get_json(&url).await?;
        Ok(JobStatusSnapshot::new(job, descriptor.color))
    }

    async fn build(&self, job: &str, build: &str) -> Result<BuildDescriptor, CiError> {
        let url = format!("{}/job/{}/{}/api/json", self.base_url, job, build);
        self.get_json(&url).await
    }

    async fn build_at(&self, url: &str) -> Result<BuildDescriptor, CiError> {
        let url = format!("{}/api/json", url.trim_end_matches('/'));
        self.get_json(&url).await
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> CiError {
    if err.is_timeout() {
        CiError::Timeout { url: url.to_string() }
    } else {
        CiError::Network { url: url.to_string(), message: err.to_string() }
    }
}

#[cfg(test)]
#[path = "jenkins_tests.rs"]
mod tests;
