// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CI server adapter: job-start requests and status descriptors.

mod descriptor;
mod jenkins;

pub use descriptor::{
    Artifact, BuildAction, BuildDescriptor, BuildParameter, JobDescriptor, NestedBuild, SubBuild,
};
pub use jenkins::JenkinsClient;

use async_trait::async_trait;
use ns_core::JobStatusSnapshot;
use thiserror::Error;

/// Errors from CI server operations
#[derive(Debug, Error)]
pub enum CiError {
    #[error("cannot reach CI server at {url}: {message}")]
    Network { url: String, message: String },
    #[error("request to {url} timed out; the CI server may be slow or unreachable")]
    Timeout { url: String },
    #[error(
        "CI server rejected credentials for {url} (HTTP {status}); \
         check the API token and that the operator has job permissions"
    )]
    Auth { url: String, status: u16 },
    #[error("CI server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("invalid CI client configuration: {0}")]
    Config(String),
}

/// Adapter for the CI server's HTTP API
#[async_trait]
pub trait CiServer: Clone + Send + Sync + 'static {
    /// Base URL of the server, without a trailing slash
    fn base_url(&self) -> &str;

    /// POST a job-start path (`/job/{name}/buildWithParameters?...` or
    /// `/job/{name}/build?...`) and return the HTTP status, whatever it is.
    ///
    /// Only transport failures are errors.
    async fn start_build(&self, path: &str) -> Result<u16, CiError>;

    /// Fetch the job's status descriptor.
    async fn job_status(&self, job: &str) -> Result<JobStatusSnapshot, CiError>;

    /// Fetch a build descriptor. `build` is a number or an alias such as
    /// `lastBuild`.
    async fn build(&self, job: &str, build: &str) -> Result<BuildDescriptor, CiError>;

    /// Fetch the descriptor of a build by its absolute URL (as listed in a
    /// parent build's sub-builds).
    async fn build_at(&self, url: &str) -> Result<BuildDescriptor, CiError>;

    /// Absolute URL of a job's page.
    fn job_url(&self, job: &str) -> String {
        format!("{}/job/{}/", self.base_url(), job)
    }

    /// Absolute URL of a build's page.
    fn build_url(&self, job: &str, build: &str) -> String {
        format!("{}/job/{}/{}/", self.base_url(), job, build)
    }

    /// Absolute URL for a server-relative path.
    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{CiCall, FakeCiServer};
