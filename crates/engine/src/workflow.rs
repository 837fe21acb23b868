// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job trigger, running-job poll, and page verification with fallback.
//!
//! One invocation runs strictly in sequence: trigger, poll/resend, navigate,
//! probe, decide. Invocations share nothing, so two triggers of the same job
//! are not serialized.

use crate::error::WorkflowError;
use crate::timing::WorkflowTiming;
use ns_adapters::{
    BrowserLauncher, CiServer, DisplayError, DisplaySurface, Notice, OperatorNotifier,
};
use ns_core::{encode_component, JobTriggerRequest};
use serde::Serialize;
use std::path::PathBuf;
use tokio::time::{sleep, sleep_until, Instant};

/// HTTP status of an accepted job start
pub const CREATED: u16 = 201;

/// Visible label prefix of a job page surface
pub const LABEL_PREFIX: &str = "Jenkins Job";

/// How a job start was confirmed, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// The first start request returned `201 Created`.
    Created,
    /// A poll saw the job running before the resend of `attempt`.
    ConfirmedRunning { attempt: u32 },
    /// The resend of `attempt` returned `201 Created`.
    ResentCreated { attempt: u32 },
    /// Retries ran out without a confirmation. The job may still have started.
    Unconfirmed,
}

impl TriggerOutcome {
    pub fn is_confirmed(&self) -> bool {
        !matches!(self, TriggerOutcome::Unconfirmed)
    }
}

/// Why a page was abandoned for the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    LoadFailed,
    Blank,
    ProbeFailed,
}

/// Where the fallback URL was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackVia {
    Alternate(PathBuf),
    DefaultBrowser,
}

/// Terminal state of one page verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    /// The page showed content and stays open for the operator.
    Kept { error_text: Option<String> },
    /// The page was closed and the fallback opened once.
    FellBack { reason: FallbackReason, via: FallbackVia },
    /// The operator closed the surface before a decision was made.
    ClosedByOperator,
}

/// How to start a job from [`Workflow::launch`].
pub enum LaunchMode<D> {
    /// POST the start request, confirm it, then open the landing page.
    Direct,
    /// Navigate the surface to the start URL and verify the resulting page.
    ViaPage(D),
}

/// What a launch did, for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchReport {
    pub job: String,
    pub landing_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageOutcome>,
}

/// Label of a job page surface, with any detected error appended.
pub fn page_label(target: &str, error: Option<&str>) -> String {
    match error {
        Some(error) => format!("{} - {} - Error: {}", LABEL_PREFIX, target, error),
        None => format!("{} - {}", LABEL_PREFIX, target),
    }
}

/// Drives job starts against a CI server
#[derive(Clone)]
pub struct Workflow<C, B, N> {
    ci: C,
    browser: B,
    notifier: N,
    token: String,
    timing: WorkflowTiming,
}

impl<C, B, N> Workflow<C, B, N>
where
    C: CiServer,
    B: BrowserLauncher,
    N: OperatorNotifier,
{
    /// `token` is the fixed build-trigger token.
    pub fn new(ci: C, browser: B, notifier: N, token: impl Into<String>) -> Self {
        Self { ci, browser, notifier, token: token.into(), timing: WorkflowTiming::default() }
    }

    pub fn with_timing(mut self, timing: WorkflowTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn ci(&self) -> &C {
        &self.ci
    }

    pub fn timing(&self) -> &WorkflowTiming {
        &self.timing
    }

    /// Absolute URL that starts `request` when fetched.
    pub fn trigger_url(&self, request: &JobTriggerRequest) -> String {
        self.ci.absolute(&request.build_path(&self.token))
    }

    /// Absolute URL of the job page the operator lands on.
    pub fn landing_url(&self, request: &JobTriggerRequest) -> String {
        self.ci.absolute(request.landing_path())
    }

    /// Start a job, resending up to `max_resends` times until the server
    /// answers `201 Created` or the job is seen running.
    ///
    /// Transport failures of a start request abort immediately.
    pub async fn trigger(
        &self,
        request: &JobTriggerRequest,
    ) -> Result<TriggerOutcome, WorkflowError> {
        let path = request.build_path(&self.token);
        let job = request.job();

        let status = self.ci.start_build(&path).await?;
        tracing::info!(job, status, retry = request.is_retry(), "job start sent");
        if status == CREATED {
            return Ok(TriggerOutcome::Created);
        }

        for attempt in 1..=self.timing.max_resends {
            sleep(self.timing.trigger_delay).await;

            if self.is_job_running(job).await {
                tracing::info!(job, attempt, "job confirmed running");
                return Ok(TriggerOutcome::ConfirmedRunning { attempt });
            }

            let status = self.ci.start_build(&path).await?;
            tracing::info!(job, attempt, status, "job start resent");
            if status == CREATED {
                return Ok(TriggerOutcome::ResentCreated { attempt });
            }
        }

        tracing::warn!(job, resends = self.timing.max_resends, "job start not confirmed");
        Ok(TriggerOutcome::Unconfirmed)
    }

    /// Whether the job is building, sampled after a settle delay.
    ///
    /// Advisory: request failures count as "not running".
    pub async fn is_job_running(&self, job: &str) -> bool {
        sleep(self.timing.poll_settle).await;

        for attempt in 0..=self.timing.poll_extra_attempts {
            if attempt > 0 {
                sleep(self.timing.poll_interval).await;
            }
            match self.ci.job_status(job).await {
                Ok(snapshot) if snapshot.is_running() => return true,
                Ok(snapshot) => {
                    tracing::debug!(job, attempt, color = ?snapshot.color, "job not running")
                }
                Err(e) => tracing::warn!(job, attempt, error = %e, "job status check failed"),
            }
        }
        false
    }

    /// Load `target` in `surface` and decide whether to keep it or fall back
    /// to `fallback` in an external browser.
    ///
    /// The fallback fires at most once per call and the load is never retried.
    pub async fn verify_page<D: DisplaySurface>(
        &self,
        surface: &D,
        target: &str,
        fallback: &str,
    ) -> Result<PageOutcome, WorkflowError> {
        match surface.load(target).await {
            Ok(()) => {}
            Err(DisplayError::Closed) => return Ok(PageOutcome::ClosedByOperator),
            Err(e) => {
                tracing::warn!(url = target, error = %e, "page failed to load");
                let message = load_message(&e);
                return self
                    .show_error_then_fallback(
                        surface,
                        target,
                        fallback,
                        FallbackReason::LoadFailed,
                        &message,
                    )
                    .await;
            }
        }

        let loaded_at = Instant::now();
        for offset in self.timing.readiness_schedule() {
            sleep_until(loaded_at + offset).await;
            if !surface.is_open() {
                return Ok(PageOutcome::ClosedByOperator);
            }

            let probe = match surface.probe().await {
                Ok(probe) => probe,
                Err(DisplayError::Closed) => return Ok(PageOutcome::ClosedByOperator),
                Err(e) => {
                    tracing::warn!(url = target, error = %e, "page probe failed");
                    let message = e.to_string();
                    return self
                        .show_error_then_fallback(
                            surface,
                            target,
                            fallback,
                            FallbackReason::ProbeFailed,
                            &message,
                        )
                        .await;
                }
            };
            if !surface.is_open() {
                return Ok(PageOutcome::ClosedByOperator);
            }

            if probe.has_text {
                surface.set_label(&page_label(target, probe.error_text.as_deref())).await;
                tracing::info!(url = target, error = ?probe.error_text, "page kept open");
                return Ok(PageOutcome::Kept { error_text: probe.error_text });
            }
            tracing::debug!(url = target, offset_ms = offset.as_millis() as u64, "page still blank");
        }

        tracing::warn!(url = target, "page is blank, falling back");
        surface.close().await;
        let via = self.open_fallback(fallback).await?;
        Ok(PageOutcome::FellBack { reason: FallbackReason::Blank, via })
    }

    /// Start a job and bring the operator to it.
    pub async fn launch<D: DisplaySurface>(
        &self,
        request: &JobTriggerRequest,
        mode: LaunchMode<D>,
    ) -> Result<LaunchReport, WorkflowError> {
        let landing_url = self.landing_url(request);
        let mut report = LaunchReport {
            job: request.job().to_string(),
            landing_url: landing_url.clone(),
            trigger: None,
            page: None,
        };

        match mode {
            LaunchMode::Direct => {
                let outcome = self.trigger(request).await?;
                if !outcome.is_confirmed() {
                    tracing::warn!(job = request.job(), "opening job page without confirmation");
                }
                self.browser.open_default(&landing_url).await?;
                report.trigger = Some(outcome);
            }
            LaunchMode::ViaPage(surface) => {
                let target = self.trigger_url(request);
                report.page = Some(self.verify_page(&surface, &target, &landing_url).await?);
            }
        }

        let title = if request.is_retry() { "Rerun started" } else { "Job started" };
        self.notify(Notice::info(title, format!("{} opened", request.job()))).await;
        Ok(report)
    }

    /// Start the stats job and open its page.
    pub async fn post_nightly_stats(&self, stats_job: &str) -> Result<u16, WorkflowError> {
        let path = format!("/job/{}/build?token={}", stats_job, encode_component(&self.token));
        let status = self.ci.start_build(&path).await?;
        if status == CREATED {
            tracing::info!(job = stats_job, "stats job started");
        } else {
            tracing::warn!(job = stats_job, status, "stats job start not confirmed");
        }
        self.browser.open_default(&self.ci.job_url(stats_job)).await?;
        Ok(status)
    }

    async fn show_error_then_fallback<D: DisplaySurface>(
        &self,
        surface: &D,
        target: &str,
        fallback: &str,
        reason: FallbackReason,
        message: &str,
    ) -> Result<PageOutcome, WorkflowError> {
        if surface.is_open() {
            surface.set_label(&page_label(target, Some(message))).await;
            sleep(self.timing.error_linger).await;
            surface.close().await;
        }
        self.browser.open_default(fallback).await?;
        Ok(PageOutcome::FellBack { reason, via: FallbackVia::DefaultBrowser })
    }

    /// Open `url` in an installed alternate browser, else the default one.
    async fn open_fallback(&self, url: &str) -> Result<FallbackVia, WorkflowError> {
        if let Some(path) = self.browser.locate_alternate() {
            match self.browser.open_with(&path, url).await {
                Ok(()) => return Ok(FallbackVia::Alternate(path)),
                Err(e) => tracing::warn!(browser = %path.display(), error = %e, "alternate browser failed"),
            }
        }
        self.browser.open_default(url).await?;
        Ok(FallbackVia::DefaultBrowser)
    }

    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.notifier.notify(notice).await {
            tracing::warn!(error = %e, "notification failed");
        }
    }
}

fn load_message(error: &DisplayError) -> String {
    match error {
        DisplayError::LoadFailed { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
