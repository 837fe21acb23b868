// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::discount::Discount;
use crate::record::{DiscountedTest, FailedTest, FailureRow};
use chrono::{NaiveDate, NaiveDateTime};

/// Default creation timestamp for fixture records: 2025-11-20 03:15 UTC.
pub fn fixture_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 20)
        .and_then(|d| d.and_hms_opt(3, 15, 0))
        .unwrap_or_default()
}

/// A UI failure with empty error text and no discount.
pub fn failed_test(id: i64, project: &str, env: &str, build_no: i64, test_name: &str) -> FailedTest {
    FailedTest {
        id,
        build_no,
        automation_type: "ui".to_string(),
        env: env.to_string(),
        project: project.to_string(),
        test_name: test_name.to_string(),
        rerun: false,
        error: String::new(),
        stack_trace: String::new(),
        discount: Discount::None,
        discount_reason: String::new(),
        browser: String::new(),
        owner: String::new(),
        created_at: fixture_time(),
    }
}

/// A discounted failure matching [`failed_test`]'s shape.
pub fn discounted_test(
    id: i64,
    project: &str,
    env: &str,
    build_no: i64,
    test_name: &str,
    discount: Discount,
    reason: &str,
) -> DiscountedTest {
    DiscountedTest {
        id,
        automation_type: "ui".to_string(),
        env: env.to_string(),
        project: project.to_string(),
        test_name: test_name.to_string(),
        error: String::new(),
        discount,
        discount_reason: reason.to_string(),
        build_no,
        created_at: fixture_time(),
    }
}

/// A stats row for `project` in `env`.
pub fn failure_row(project: &str, env: &str, owner: &str) -> FailureRow {
    FailureRow {
        project: project.to_string(),
        test_name: "test".to_string(),
        env: env.to_string(),
        automation_type: crate::project::automation_type_for_project(project).to_string(),
        discount: Discount::None,
        discount_reason: String::new(),
        rerun: false,
        owner: owner.to_string(),
    }
}
