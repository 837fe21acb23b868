// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nightly: the nightly test-results dashboard on the command line

mod color;
mod commands;
mod config;
mod context;
mod env;
mod exit_error;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{admin, discounts, launch, nightly, reports, results};
use crate::config::Config;
use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "nightly",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Nightly test results and CI job launcher",
    styles = color::styles()
)]
struct Cli {
    /// Config file [default: $NIGHTLY_CONFIG, then <config dir>/nightly/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List failed tests of a run
    Failed(results::FailedArgs),
    /// Show one test result in full
    Details(results::DetailsArgs),
    /// Discount failed tests, or clear their discount
    Discount(discounts::DiscountArgs),
    /// List discounted tests of a run, or of an earlier run with --recent
    Discounts(discounts::DiscountsArgs),
    /// Copy earlier discounts onto the same failures in a newer build
    CopyDiscounts(discounts::CopyDiscountsArgs),
    /// List project names
    Projects(reports::ProjectsArgs),
    /// Print the nightly status message
    Stats(reports::StatsArgs),
    /// Compare executed test counts with their baselines
    Counts(reports::CountsArgs),
    /// Start a project job
    Run(launch::RunArgs),
    /// Rerun failed tests against the build they failed in
    Rerun(launch::RerunArgs),
    /// Start the maintenance job for an environment
    Maintenance(launch::MaintenanceArgs),
    /// Open the build pages of failed tests
    Open(results::OpenArgs),
    /// Find the failure screenshot of a test
    Screenshot(results::ScreenshotArgs),
    /// List failed builds left by the last nightly
    NightlyReruns(nightly::NightlyRerunsArgs),
    /// Start the stats job and open its page
    PostStats,
    /// Drop the result store connection and reconnect
    ResetDb(admin::ResetDbArgs),
    /// Show the operator identity and configured endpoints
    Whoami,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()).context("loading config") {
        Ok(config) => config,
        Err(e) => exit(ExitError::from_anyhow(e)),
    };
    let _log_guard = logging::init(cli.verbose, config.log_dir.as_deref());

    if let Err(e) = run(cli.command, Context::new(config), cli.format).await {
        let exit_error = ExitError::from_anyhow(e);
        tracing::error!(code = exit_error.code, "{}", exit_error.message);
        exit(exit_error);
    }
}

fn exit(err: ExitError) -> ! {
    if !err.message.is_empty() {
        eprintln!("error: {}", err.message);
    }
    std::process::exit(err.code)
}

async fn run(command: Commands, ctx: Context, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Failed(args) => results::handle_failed(args, &ctx, format).await,
        Commands::Details(args) => results::handle_details(args, &ctx, format).await,
        Commands::Discount(args) => discounts::handle_discount(args, &ctx, format).await,
        Commands::Discounts(args) => discounts::handle_discounts(args, &ctx, format).await,
        Commands::CopyDiscounts(args) => discounts::handle_copy(args, &ctx, format).await,
        Commands::Projects(args) => reports::handle_projects(args, &ctx, format).await,
        Commands::Stats(args) => reports::handle_stats(args, &ctx, format).await,
        Commands::Counts(args) => reports::handle_counts(args, &ctx, format).await,
        Commands::Run(args) => launch::handle_run(args, &ctx, format).await,
        Commands::Rerun(args) => launch::handle_rerun(args, &ctx, format).await,
        Commands::Maintenance(args) => launch::handle_maintenance(args, &ctx, format).await,
        Commands::Open(args) => results::handle_open(args, &ctx, format).await,
        Commands::Screenshot(args) => results::handle_screenshot(args, &ctx, format).await,
        Commands::NightlyReruns(args) => nightly::handle(args, &ctx, format).await,
        Commands::PostStats => reports::handle_post_stats(&ctx, format).await,
        Commands::ResetDb(args) => admin::handle_reset_db(args, &ctx, format).await,
        Commands::Whoami => admin::handle_whoami(&ctx, format),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
