// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ns-engine: job trigger workflow and dashboard services

mod dashboard;
mod error;
mod queries;
pub mod report;
mod timing;
mod workflow;

pub use dashboard::{
    CopyReport, Dashboard, FailedView, StatsReport, DEFAULT_DAYS_BACK, ERROR_PREFIX_CHARS,
};
pub use error::WorkflowError;
pub use queries::{screenshot_patterns, CiQueries, FailedJob, NightlyReruns};
pub use report::{CountDrift, CountMismatch, Percentages, ProjectStats};
pub use timing::WorkflowTiming;
pub use workflow::{
    page_label, FallbackReason, FallbackVia, LaunchMode, LaunchReport, PageOutcome,
    TriggerOutcome, Workflow, CREATED, LABEL_PREFIX,
};
