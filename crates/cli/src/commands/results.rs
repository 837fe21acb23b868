// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nightly failed`, `details`, `open` and `screenshot`

use anyhow::Result;
use clap::{Args, ValueEnum};
use ns_adapters::BrowserLauncher;
use ns_core::{DiscountState, FailedTest, FailedTestFilter, TestDetails};
use ns_engine::FailedView;
use serde::Serialize;

use super::RunDate;
use crate::color;
use crate::context::Context;
use crate::exit_error::{ExitError, FAILURE};
use crate::output::{self, table, truncate, OutputFormat};

const ERROR_COLUMN_CHARS: usize = 60;

#[derive(Args)]
pub struct FailedArgs {
    #[command(flatten)]
    pub run: RunDate,
    #[arg(long)]
    pub env: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    /// `ui` or `api`
    #[arg(long)]
    pub automation_type: Option<String>,
    #[arg(long)]
    pub browser: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long, value_enum, default_value_t = DiscountArg::All)]
    pub discounted: DiscountArg,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum DiscountArg {
    All,
    Yes,
    No,
}

impl From<DiscountArg> for DiscountState {
    fn from(arg: DiscountArg) -> Self {
        match arg {
            DiscountArg::All => DiscountState::All,
            DiscountArg::Yes => DiscountState::Discounted,
            DiscountArg::No => DiscountState::NotDiscounted,
        }
    }
}

impl FailedArgs {
    pub fn filter(&self) -> FailedTestFilter {
        FailedTestFilter {
            env: self.env.clone(),
            project: self.project.clone(),
            automation_type: self.automation_type.clone(),
            browser: self.browser.clone(),
            owner: self.owner.clone(),
            discounted: self.discounted.into(),
            utc_date: None,
        }
    }
}

#[derive(Args)]
pub struct DetailsArgs {
    /// Test result id
    pub id: i64,
}

#[derive(Args)]
pub struct OpenArgs {
    #[command(flatten)]
    pub run: RunDate,
    /// Failed test ids
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

#[derive(Args)]
pub struct ScreenshotArgs {
    #[command(flatten)]
    pub run: RunDate,
    /// Failed test id
    pub id: i64,
    /// Open the screenshot in the default browser
    #[arg(long)]
    pub open: bool,
}

pub async fn handle_failed(args: FailedArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let dashboard = ctx.dashboard()?;
    let view = dashboard.failed_view(ctx.run_date(args.run.date), &args.filter()).await?;
    output::emit(format, &view, failed_view_text)
}

pub fn failed_view_text(view: &FailedView) -> String {
    if view.tests.is_empty() {
        return "No failed tests".to_string();
    }
    let rows: Vec<Vec<String>> = view.tests.iter().map(failed_row).collect();
    let mut out = table(&["ID", "ENV", "PROJECT", "BUILD", "TEST", "OWNER", "DISCOUNT", "ERROR"], &rows);
    out.push_str(&color::muted(&format!(
        "{} displayed, {} without an owner",
        view.counts.displayed, view.counts.unowned
    )));
    out.push('\n');
    out
}

fn failed_row(test: &FailedTest) -> Vec<String> {
    let mut name = test.test_name.clone();
    if test.rerun {
        name.push_str(" (rerun)");
    }
    vec![
        test.id.to_string(),
        test.env.clone(),
        test.project.clone(),
        test.build_no.to_string(),
        name,
        test.owner.clone(),
        test.discount.label().to_string(),
        truncate(&test.error, ERROR_COLUMN_CHARS),
    ]
}

pub async fn handle_details(args: DetailsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let details = ctx.dashboard()?.test_details(args.id).await?;
    output::emit(format, &details, details_text)
}

pub fn details_text(details: &TestDetails) -> String {
    let mut fields = vec![
        ("Test", details.test_name.clone()),
        ("Project", details.project.clone()),
        ("Environment", details.env.clone()),
        ("Build", details.build_no.to_string()),
        ("Result", details.result.clone()),
        ("Type", format!("{} / {}", details.automation_type, details.log_type)),
        ("Browser", details.browser.clone()),
        ("Machine", details.machine_name.clone()),
        ("App version", details.app_version.clone()),
        ("Rerun", if details.rerun { "yes" } else { "no" }.to_string()),
        ("Created", details.created_at.to_string()),
    ];
    if let Some(run_time) = details.run_time {
        fields.push(("Run time", format!("{:.1}s", run_time)));
    }
    if details.discount.is_discounted() {
        fields.push(("Discount", format!("{} - {}", details.discount.label(), details.discount_reason)));
    }
    if let Some(modified) = details.modified_at {
        fields.push(("Modified", modified.to_string()));
    }

    let mut out = String::new();
    for (name, value) in fields {
        out.push_str(&format!("{:<12} {}\n", format!("{}:", name), value));
    }
    out.push_str(&format!("\n{}\n{}\n", color::header("Error"), details.error));
    if !details.stack_trace.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", color::header("Stack trace"), details.stack_trace));
    }
    out
}

#[derive(Debug, Serialize)]
struct Opened {
    id: i64,
    url: String,
}

/// Open the build page each selected failure ran in.
pub async fn handle_open(args: OpenArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let selection = ctx.dashboard()?.select_failed(ctx.run_date(args.run.date), &args.ids).await?;
    let queries = ctx.queries()?;
    let browser = ctx.browser();

    let mut opened = Vec::new();
    for test in &selection {
        let url = queries.build_url(&test.project, test.build_no);
        browser.open_default(&url).await?;
        tracing::info!(id = test.id, %url, "build page opened");
        opened.push(Opened { id: test.id, url });
    }
    output::emit(format, &opened, |opened| {
        opened.iter().map(|o| format!("Opened {}", o.url)).collect::<Vec<_>>().join("\n")
    })
}

#[derive(Debug, Serialize)]
struct Screenshot {
    test_name: String,
    url: String,
}

pub async fn handle_screenshot(args: ScreenshotArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let selection = ctx.dashboard()?.select_failed(ctx.run_date(args.run.date), &[args.id]).await?;
    let Some(test) = selection.into_iter().next() else {
        return Err(ExitError::new(FAILURE, format!("Failed test {} not found", args.id)).into());
    };

    let queries = ctx.queries()?;
    let Some(url) = queries.screenshot_url(&test.test_name, &test.project, test.build_no).await? else {
        return Err(ExitError::new(
            FAILURE,
            format!("No screenshot found for {} in {} #{}", test.test_name, test.project, test.build_no),
        )
        .into());
    };

    if args.open {
        ctx.browser().open_default(&url).await?;
    }
    output::emit(format, &Screenshot { test_name: test.test_name, url }, |s| s.url.clone())
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
