// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nightly reset-db` and `whoami`

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::context::Context;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ResetDbArgs {
    /// Also apply the bundled schema migrations
    #[arg(long)]
    pub migrate: bool,
}

#[derive(Debug, Serialize)]
struct ResetOutcome {
    reset: bool,
    migrated: bool,
}

/// Drop the store connection and prove a fresh one works.
pub async fn handle_reset_db(args: ResetDbArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let store = ctx.store()?;
    if args.migrate {
        store.migrate().await?;
    }
    let dashboard = ctx.dashboard_over(store);
    dashboard.reset().await?;
    let projects = dashboard.projects(None).await?;
    tracing::info!(projects = projects.len(), "result store reachable after reset");
    let outcome = ResetOutcome { reset: true, migrated: args.migrate };
    output::emit(format, &outcome, reset_text)
}

fn reset_text(outcome: &ResetOutcome) -> String {
    if outcome.migrated {
        "Result store migrated and connection reset".to_string()
    } else {
        "Result store connection reset".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct Identity<'a> {
    pub operator: &'a str,
    pub jenkins_url: &'a str,
    pub api_token_set: bool,
    pub database_configured: bool,
}

impl<'a> Identity<'a> {
    pub fn of(ctx: &'a Context) -> Self {
        let config = &ctx.config;
        Self {
            operator: &config.operator,
            jenkins_url: &config.jenkins_url,
            api_token_set: !config.api_token.is_empty(),
            database_configured: config.database_url.is_some(),
        }
    }

    pub fn text(&self) -> String {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        format!(
            "operator:     {}\njenkins:      {}\napi token:    {}\nresult store: {}\n",
            self.operator,
            self.jenkins_url,
            yes_no(self.api_token_set),
            if self.database_configured { "configured" } else { "not configured" },
        )
    }
}

/// Who discounts and job starts are recorded as.
pub fn handle_whoami(ctx: &Context, format: OutputFormat) -> Result<()> {
    output::emit(format, &Identity::of(ctx), Identity::text)
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
