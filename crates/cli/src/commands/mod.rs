// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod admin;
pub mod discounts;
pub mod launch;
pub mod nightly;
pub mod reports;
pub mod results;

use chrono::NaiveDate;
use clap::Args;

/// The run an operator is looking at
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct RunDate {
    /// Run date as picked on the dashboard [default: yesterday, Friday on Mondays]
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}
