// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rows read from the result store.

use crate::discount::Discount;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Owner placeholder used when a project has no assigned owner.
pub const NO_OWNER: &str = "N/A";

/// A failed, skipped, timed-out or not-executed test from a nightly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedTest {
    pub id: i64,
    pub build_no: i64,
    pub automation_type: String,
    pub env: String,
    pub project: String,
    pub test_name: String,
    pub rerun: bool,
    pub error: String,
    pub stack_trace: String,
    pub discount: Discount,
    pub discount_reason: String,
    pub browser: String,
    pub owner: String,
    pub created_at: NaiveDateTime,
}

impl FailedTest {
    pub fn is_ui(&self) -> bool {
        self.automation_type.eq_ignore_ascii_case("ui")
    }
}

/// A discounted failure, as listed for copying discounts forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedTest {
    pub id: i64,
    pub automation_type: String,
    pub env: String,
    pub project: String,
    pub test_name: String,
    pub error: String,
    pub discount: Discount,
    pub discount_reason: String,
    pub build_no: i64,
    pub created_at: NaiveDateTime,
}

/// Full detail of one result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDetails {
    pub test_name: String,
    pub project: String,
    pub error: String,
    pub stack_trace: String,
    pub env: String,
    pub machine_name: String,
    pub app_version: String,
    pub result: String,
    pub run_time: Option<f64>,
    pub rerun: bool,
    pub automation_type: String,
    pub log_type: String,
    pub browser: String,
    pub discount: Discount,
    pub discount_reason: String,
    pub created_at: NaiveDateTime,
    pub modified_at: Option<NaiveDateTime>,
    pub build_no: i64,
}

/// A failure row used to build per-project status statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRow {
    pub project: String,
    pub test_name: String,
    pub env: String,
    pub automation_type: String,
    pub discount: Discount,
    pub discount_reason: String,
    pub rerun: bool,
    pub owner: String,
}

/// Executed and failed (undiscounted) totals per environment class and
/// automation type, for one run window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub ui_test: i64,
    pub api_test: i64,
    pub ui_prod: i64,
    pub api_prod: i64,
    pub ui_test_failed: i64,
    pub api_test_failed: i64,
    pub ui_prod_failed: i64,
    pub api_prod_failed: i64,
}

/// Expected test count for a project/environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBaseline {
    pub project: String,
    pub env: String,
    pub expected: i64,
}

/// Executed test count for a project/environment in one run window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountActual {
    pub project: String,
    pub env: String,
    pub actual: i64,
}

/// Environments counted as "test" in statistics.
pub fn is_test_env(env: &str) -> bool {
    matches!(env, "TEST" | "BETA")
}

/// Environments counted as "production" in statistics.
pub fn is_prod_env(env: &str) -> bool {
    matches!(env, "PROD" | "LIVE")
}
