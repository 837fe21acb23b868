// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nightly projects`, `stats`, `counts` and `post-stats`

use anyhow::Result;
use clap::Args;
use ns_engine::{CountDrift, CREATED};
use serde::Serialize;

use super::RunDate;
use crate::context::Context;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ProjectsArgs {
    /// Only `ui` or `api` projects
    #[arg(long)]
    pub automation_type: Option<String>,
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub run: RunDate,
}

#[derive(Args)]
pub struct CountsArgs {
    #[command(flatten)]
    pub run: RunDate,
}

pub async fn handle_projects(args: ProjectsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let projects = ctx.dashboard()?.projects(args.automation_type.as_deref()).await?;
    output::emit(format, &projects, |p| p.join("\n"))
}

/// Print the nightly status message for pasting into chat.
pub async fn handle_stats(args: StatsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let dashboard = ctx.dashboard()?;
    let report = dashboard.stats_report(ctx.run_date(args.run.date), &ctx.config.jenkins_url).await?;
    output::emit(format, &report, |r| r.text.clone())
}

pub async fn handle_counts(args: CountsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let drift = ctx.dashboard()?.count_report(ctx.run_date(args.run.date)).await?;
    output::emit(format, &drift, CountDrift::text)
}

#[derive(Debug, Serialize)]
struct PostedStats<'a> {
    job: &'a str,
    status: u16,
    started: bool,
}

pub async fn handle_post_stats(ctx: &Context, format: OutputFormat) -> Result<()> {
    let job = ctx.config.stats_job.as_str();
    let status = ctx.workflow()?.post_nightly_stats(job).await?;
    let posted = PostedStats { job, status, started: status == CREATED };
    output::emit(format, &posted, post_stats_text)
}

fn post_stats_text(posted: &PostedStats<'_>) -> String {
    if posted.started {
        format!("{} started", posted.job)
    } else {
        format!("{} start not confirmed (HTTP {})", posted.job, posted.status)
    }
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
