// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient observations of the CI server and of a loaded job page.

use serde::{Deserialize, Serialize};

/// Substring of a job color token that marks a build in progress
/// (`blue_anime`, `red_anime`, ...).
const IN_PROGRESS_MARKER: &str = "anime";

/// A job's status as reported by the CI server on one fetch.
///
/// Used for a single running/not-running decision and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusSnapshot {
    pub job: String,
    pub color: Option<String>,
}

impl JobStatusSnapshot {
    pub fn new(job: impl Into<String>, color: Option<String>) -> Self {
        Self { job: job.into(), color }
    }

    pub fn is_running(&self) -> bool {
        self.color.as_deref().is_some_and(|c| c.contains(IN_PROGRESS_MARKER))
    }
}

/// The outcome of inspecting a loaded page's rendered content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProbeResult {
    pub has_text: bool,
    pub error_text: Option<String>,
}

impl PageProbeResult {
    /// A page with no visible text.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A page with visible text and, optionally, an error-like fragment.
    pub fn with_text(error_text: Option<String>) -> Self {
        Self { has_text: true, error_text: error_text.filter(|e| !e.is_empty()) }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
