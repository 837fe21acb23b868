// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nightly discount`, `discounts` and `copy-discounts`

use anyhow::Result;
use clap::Args;
use ns_core::{Discount, DiscountedTest, CLEAR_DISCOUNT};
use ns_engine::{CopyReport, DEFAULT_DAYS_BACK};
use serde::Serialize;

use super::RunDate;
use crate::context::Context;
use crate::output::{self, table, truncate, OutputFormat};

const ERROR_COLUMN_CHARS: usize = 50;

#[derive(Args)]
pub struct DiscountArgs {
    /// Failed test ids
    pub ids: Vec<i64>,
    /// Discount label, e.g. "Jenkins", or "Clear Discount"
    #[arg(long, default_value = "")]
    pub code: String,
    /// Why the failures do not count
    #[arg(long, default_value = "")]
    pub reason: String,
    /// Clear the discount instead of setting one
    #[arg(long, conflicts_with_all = ["code", "reason"])]
    pub clear: bool,
}

#[derive(Args)]
pub struct DiscountsArgs {
    #[command(flatten)]
    pub run: RunDate,
    /// List an earlier run's discounts instead of this run's
    #[arg(long)]
    pub recent: bool,
    /// How far back `--recent` looks
    #[arg(long, default_value_t = DEFAULT_DAYS_BACK, requires = "recent")]
    pub days_back: i64,
}

#[derive(Args)]
pub struct CopyDiscountsArgs {
    #[command(flatten)]
    pub run: RunDate,
    /// How far back the source discounts are read
    #[arg(long, default_value_t = DEFAULT_DAYS_BACK)]
    pub days_back: i64,
    /// Copy even when the new failure's error differs
    #[arg(long)]
    pub force: bool,
    /// Source discount ids [default: all listed by `discounts --recent`]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
struct Discounted<'a> {
    ids: &'a [i64],
    message: &'a str,
}

pub async fn handle_discount(args: DiscountArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let code = if args.clear { CLEAR_DISCOUNT } else { args.code.as_str() };
    let message = ctx.dashboard()?.discount(&args.ids, code, &args.reason).await?;
    output::emit(format, &Discounted { ids: &args.ids, message }, |d| d.message.to_string())
}

pub async fn handle_discounts(args: DiscountsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let dashboard = ctx.dashboard()?;
    let date = ctx.run_date(args.run.date);
    let discounts = if args.recent {
        dashboard.recent_discounts(date, args.days_back).await?
    } else {
        dashboard.yesterdays_discounts(date).await?
    };
    output::emit(format, &discounts, |d| discounts_text(d))
}

pub fn discounts_text(discounts: &[DiscountedTest]) -> String {
    if discounts.is_empty() {
        return "No discounted tests".to_string();
    }
    let rows: Vec<Vec<String>> = discounts
        .iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.env.clone(),
                d.project.clone(),
                d.build_no.to_string(),
                d.test_name.clone(),
                d.discount.label().to_string(),
                d.discount_reason.clone(),
                truncate(&d.error, ERROR_COLUMN_CHARS),
            ]
        })
        .collect();
    table(&["ID", "ENV", "PROJECT", "BUILD", "TEST", "DISCOUNT", "REASON", "ERROR"], &rows)
}

/// Copy earlier discounts onto the same tests failing again in this run.
pub async fn handle_copy(args: CopyDiscountsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let dashboard = ctx.dashboard()?;
    let date = ctx.run_date(args.run.date);
    let recent = dashboard.recent_discounts(date, args.days_back).await?;
    let sources = select_sources(recent, &args.ids);

    let report = dashboard.copy_discounts(date, &sources, args.force).await?;
    output::emit(format, &report, copy_report_text)
}

/// `ids` in the order given, or every discounted source when empty.
///
/// Ids not among `recent` are skipped with a warning.
pub fn select_sources(recent: Vec<DiscountedTest>, ids: &[i64]) -> Vec<DiscountedTest> {
    if ids.is_empty() {
        return recent.into_iter().filter(|d| d.discount != Discount::None).collect();
    }
    ids.iter()
        .filter_map(|id| {
            let found = recent.iter().find(|d| d.id == *id).cloned();
            if found.is_none() {
                tracing::warn!(id, "not among recent discounts, skipped");
            }
            found
        })
        .collect()
}

pub fn copy_report_text(report: &CopyReport) -> String {
    let mut out = format!("Copied {} discount(s)\n", report.copied.len());
    for (source, target) in &report.copied {
        out.push_str(&format!("  {} -> {}\n", source, target));
    }
    if !report.mismatched.is_empty() {
        out.push_str(&format!(
            "Skipped {} with a different error (use --force to copy anyway)\n",
            report.mismatched.len()
        ));
        for (source, target) in &report.mismatched {
            out.push_str(&format!("  {} -> {}\n", source, target));
        }
    }
    if !report.unmatched.is_empty() {
        let ids: Vec<String> = report.unmatched.iter().map(i64::to_string).collect();
        out.push_str(&format!("No newer failure for {}\n", ids.join(", ")));
    }
    out
}

#[cfg(test)]
#[path = "discounts_tests.rs"]
mod tests;
