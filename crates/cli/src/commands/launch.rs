// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nightly run`, `rerun` and `maintenance`

use anyhow::Result;
use clap::Args;
use indexmap::IndexMap;
use ns_adapters::HttpPageSurface;
use ns_core::JobTriggerRequest;
use ns_engine::{
    FallbackReason, FallbackVia, LaunchMode, LaunchReport, PageOutcome, TriggerOutcome,
};
use serde::Serialize;

use super::RunDate;
use crate::context::{Context, JobWorkflow};
use crate::output::{self, OutputFormat};

#[derive(Args, Clone, Copy, Debug, Default)]
pub struct LaunchFlags {
    /// Load the start URL as a page and verify it, falling back to a browser
    #[arg(long)]
    pub via_page: bool,
    /// Print the start and landing URLs without contacting the CI server
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub branch: String,
    #[arg(long)]
    pub env: String,
    #[arg(long)]
    pub jira: Option<String>,
    #[arg(long)]
    pub browser: Option<String>,
    /// Space-separated test names
    #[arg(long)]
    pub tests: Option<String>,
    #[command(flatten)]
    pub flags: LaunchFlags,
}

#[derive(Args)]
pub struct RerunArgs {
    #[command(flatten)]
    pub run: RunDate,
    /// Failed test ids, all from one project, environment and build
    #[arg(required = true)]
    pub ids: Vec<i64>,
    /// Jira id [default: the one the failed build ran with]
    #[arg(long)]
    pub jira: Option<String>,
    #[command(flatten)]
    pub flags: LaunchFlags,
}

#[derive(Args)]
pub struct MaintenanceArgs {
    #[arg(long)]
    pub env: String,
    #[command(flatten)]
    pub flags: LaunchFlags,
}

/// What a dry run would send
#[derive(Debug, Serialize)]
pub struct DryRun {
    pub job: String,
    pub trigger_url: String,
    pub landing_url: String,
    pub params: IndexMap<String, String>,
}

impl DryRun {
    pub fn plan(workflow: &JobWorkflow, request: &JobTriggerRequest) -> Self {
        Self {
            job: request.job().to_string(),
            trigger_url: workflow.trigger_url(request),
            landing_url: workflow.landing_url(request),
            params: request.params().clone(),
        }
    }

    pub fn text(&self) -> String {
        format!("trigger: {}\nlanding: {}\n", self.trigger_url, self.landing_url)
    }
}

pub async fn handle_run(args: RunArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let request = JobTriggerRequest::run_job(
        &args.project,
        &args.branch,
        &args.env,
        args.jira.as_deref(),
        args.browser.as_deref(),
        args.tests.as_deref(),
    )?;
    launch(ctx, &request, args.flags, format).await
}

/// Rerun selected failures against the build they failed in.
pub async fn handle_rerun(args: RerunArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let selection = ctx.dashboard()?.select_failed(ctx.run_date(args.run.date), &args.ids).await?;

    let jira = match (args.jira, selection.first()) {
        (Some(jira), _) => jira,
        (None, Some(first)) if !args.flags.dry_run => {
            ctx.queries()?.jira_id_for_build(&first.project, first.build_no).await
        }
        (None, _) => String::new(),
    };

    let request = JobTriggerRequest::rerun(&selection, Some(&jira))?;
    launch(ctx, &request, args.flags, format).await
}

pub async fn handle_maintenance(args: MaintenanceArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let request = JobTriggerRequest::maintenance(&ctx.config.maintenance_job, &args.env)?;
    launch(ctx, &request, args.flags, format).await
}

async fn launch(
    ctx: &Context,
    request: &JobTriggerRequest,
    flags: LaunchFlags,
    format: OutputFormat,
) -> Result<()> {
    let workflow = ctx.workflow()?;
    if flags.dry_run {
        return output::emit(format, &DryRun::plan(&workflow, request), DryRun::text);
    }

    let report = if flags.via_page {
        workflow.launch(request, LaunchMode::ViaPage(ctx.page_surface()?)).await?
    } else {
        workflow.launch(request, LaunchMode::<HttpPageSurface>::Direct).await?
    };
    output::emit(format, &report, launch_text)
}

pub fn launch_text(report: &LaunchReport) -> String {
    let mut out = format!("{}: {}\n", report.job, report.landing_url);
    if let Some(trigger) = &report.trigger {
        let line = match trigger {
            TriggerOutcome::Created => "started".to_string(),
            TriggerOutcome::ConfirmedRunning { attempt } => {
                format!("started (seen running before resend {})", attempt)
            }
            TriggerOutcome::ResentCreated { attempt } => format!("started on resend {}", attempt),
            TriggerOutcome::Unconfirmed => "start not confirmed; check the job page".to_string(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    if let Some(page) = &report.page {
        let line = match page {
            PageOutcome::Kept { error_text: None } => "page loaded".to_string(),
            PageOutcome::Kept { error_text: Some(error) } => format!("page loaded with error: {}", error),
            PageOutcome::FellBack { reason, via } => {
                let via = match via {
                    FallbackVia::Alternate(path) => path.display().to_string(),
                    FallbackVia::DefaultBrowser => "the default browser".to_string(),
                };
                format!("page {}; opened the job page in {}", fallback_reason(*reason), via)
            }
            PageOutcome::ClosedByOperator => "page closed".to_string(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn fallback_reason(reason: FallbackReason) -> &'static str {
    match reason {
        FallbackReason::LoadFailed => "failed to load",
        FallbackReason::Blank => "stayed blank",
        FallbackReason::ProbeFailed => "could not be inspected",
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
