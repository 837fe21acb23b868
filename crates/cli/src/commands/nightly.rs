// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nightly nightly-reruns`

use anyhow::Result;
use clap::Args;
use ns_engine::NightlyReruns;

use super::RunDate;
use crate::color;
use crate::context::Context;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct NightlyRerunsArgs {
    #[command(flatten)]
    pub run: RunDate,
}

/// List the failed builds the last nightly left behind.
pub async fn handle(args: NightlyRerunsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let reruns = ctx
        .queries()?
        .nightly_reruns(&ctx.config.nightly_job, ctx.run_date(args.run.date))
        .await?;
    output::emit(format, &reruns, reruns_text)
}

pub fn reruns_text(reruns: &NightlyReruns) -> String {
    match reruns {
        NightlyReruns::Stale { message } => message.clone(),
        NightlyReruns::Jobs { failed } if failed.is_empty() => "Nothing to rerun".to_string(),
        NightlyReruns::Jobs { failed } => {
            let mut out = String::new();
            for job in failed {
                out.push_str(&color::header(&job.job_name));
                out.push('\n');
                for url in &job.failed_builds {
                    out.push_str(&format!("  {}\n", url));
                }
            }
            out
        }
    }
}

#[cfg(test)]
#[path = "nightly_tests.rs"]
mod tests;
