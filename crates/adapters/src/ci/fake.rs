// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{BuildDescriptor, CiError, CiServer};
use async_trait::async_trait;
use ns_core::JobStatusSnapshot;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::time::Instant;

/// Recorded CI server call
#[derive(Debug, Clone)]
pub enum CiCall {
    StartBuild { path: String, at: Instant },
    JobStatus { job: String, at: Instant },
    Build { job: String, build: String },
    BuildAt { url: String },
}

struct FakeCiState {
    calls: Vec<CiCall>,
    start_responses: VecDeque<Result<u16, String>>,
    default_start: u16,
    colors: VecDeque<Result<Option<String>, String>>,
    default_color: Option<String>,
    builds: HashMap<(String, String), BuildDescriptor>,
    builds_at: HashMap<String, BuildDescriptor>,
}

/// Fake CI server with scripted responses
///
/// Job-start responses and status colors are consumed in order; once a
/// script runs dry the defaults (201, `blue`) apply.
#[derive(Clone)]
pub struct FakeCiServer {
    base_url: String,
    inner: Arc<Mutex<FakeCiState>>,
}

impl Default for FakeCiServer {
    fn default() -> Self {
        Self {
            base_url: "https://ci.test".to_string(),
            inner: Arc::new(Mutex::new(FakeCiState {
                calls: Vec::new(),
                start_responses: VecDeque::new(),
                default_start: 201,
                colors: VecDeque::new(),
                default_color: Some("blue".to_string()),
                builds: HashMap::new(),
                builds_at: HashMap::new(),
            })),
        }
    }
}

impl FakeCiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue HTTP statuses for successive job-start requests.
    pub fn push_start_statuses(&self, statuses: &[u16]) {
        self.inner.lock().start_responses.extend(statuses.iter().map(|s| Ok(*s)));
    }

    /// Queue a transport failure for the next job-start request.
    pub fn push_start_failure(&self, message: &str) {
        self.inner.lock().start_responses.push_back(Err(message.to_string()));
    }

    /// Status returned once the job-start script is exhausted.
    pub fn set_default_start_status(&self, status: u16) {
        self.inner.lock().default_start = status;
    }

    /// Queue colors for successive status fetches.
    pub fn push_colors(&self, colors: &[&str]) {
        self.inner.lock().colors.extend(colors.iter().map(|c| Ok(Some(c.to_string()))));
    }

    /// Queue a transport failure for the next status fetch.
    pub fn push_status_failure(&self, message: &str) {
        self.inner.lock().colors.push_back(Err(message.to_string()));
    }

    /// Color returned once the status script is exhausted.
    pub fn set_default_color(&self, color: Option<&str>) {
        self.inner.lock().default_color = color.map(String::from);
    }

    pub fn set_build(&self, job: &str, build: &str, descriptor: BuildDescriptor) {
        self.inner.lock().builds.insert((job.to_string(), build.to_string()), descriptor);
    }

    pub fn set_build_at(&self, url: &str, descriptor: BuildDescriptor) {
        self.inner.lock().builds_at.insert(url.to_string(), descriptor);
    }

    pub fn calls(&self) -> Vec<CiCall> {
        self.inner.lock().calls.clone()
    }

    /// Instants of every job-start request
    pub fn start_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CiCall::StartBuild { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    /// Instants of every status fetch
    pub fn status_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CiCall::JobStatus { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn started_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                CiCall::StartBuild { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl CiServer for FakeCiServer {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn start_build(&self, path: &str) -> Result<u16, CiError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CiCall::StartBuild { path: path.to_string(), at: Instant::now() });
        let default = inner.default_start;
        match inner.start_responses.pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(CiError::Network { url: path.to_string(), message }),
            None => Ok(default),
        }
    }

    async fn job_status(&self, job: &str) -> Result<JobStatusSnapshot, CiError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CiCall::JobStatus { job: job.to_string(), at: Instant::now() });
        let default = inner.default_color.clone();
        match inner.colors.pop_front() {
            Some(Ok(color)) => Ok(JobStatusSnapshot::new(job, color)),
            Some(Err(message)) => Err(CiError::Network { url: job.to_string(), message }),
            None => Ok(JobStatusSnapshot::new(job, default)),
        }
    }

    async fn build(&self, job: &str, build: &str) -> Result<BuildDescriptor, CiError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CiCall::Build { job: job.to_string(), build: build.to_string() });
        inner.builds.get(&(job.to_string(), build.to_string())).cloned().ok_or_else(|| {
            CiError::Status { url: format!("/job/{}/{}/api/json", job, build), status: 404 }
        })
    }

    async fn build_at(&self, url: &str) -> Result<BuildDescriptor, CiError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CiCall::BuildAt { url: url.to_string() });
        inner
            .builds_at
            .get(url)
            .cloned()
            .ok_or_else(|| CiError::Status { url: url.to_string(), status: 404 })
    }
}
