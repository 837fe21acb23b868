// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`ResultStore`] with the same query semantics as Postgres.

use crate::store::{filter_value, COUNTED_FAILURES, FAILED_RESULTS, LOG_COUNT, LOG_NIGHTLY};
use crate::{ResultStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use ns_core::{
    is_prod_env, is_test_env, CountActual, CountBaseline, Discount, DiscountUpdate,
    DiscountedTest, FailedTest, FailureRow, RunTotals, RunWindow, TestDetails, ANY,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One stored result row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
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
    pub machine_name: String,
    pub app_version: String,
    pub result: String,
    pub run_time: Option<f64>,
    pub log_type: String,
    pub created_at: NaiveDateTime,
    pub modified_at: Option<NaiveDateTime>,
    pub modified_by: Option<String>,
}

impl StoredResult {
    /// A nightly result; the id is assigned on insert.
    pub fn nightly(project: &str, env: &str, test_name: &str, result: &str) -> Self {
        Self {
            id: 0,
            build_no: 1,
            automation_type: ns_core::automation_type_for_project(project).to_string(),
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
            machine_name: String::new(),
            app_version: String::new(),
            result: result.to_string(),
            run_time: None,
            log_type: LOG_NIGHTLY.to_string(),
            created_at: NaiveDateTime::default(),
            modified_at: None,
            modified_by: None,
        }
    }

    /// An expected-count record.
    pub fn count(project: &str, env: &str, expected: i64) -> Self {
        Self {
            log_type: LOG_COUNT.to_string(),
            run_time: Some(expected as f64),
            ..Self::nightly(project, env, "", "")
        }
    }

    pub fn at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn build(mut self, build_no: i64) -> Self {
        self.build_no = build_no;
        self
    }

    pub fn browser(mut self, browser: &str) -> Self {
        self.browser = browser.to_string();
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    pub fn error(mut self, error: &str) -> Self {
        self.error = error.to_string();
        self
    }

    pub fn automation_type(mut self, automation_type: &str) -> Self {
        self.automation_type = automation_type.to_string();
        self
    }

    pub fn log_type(mut self, log_type: &str) -> Self {
        self.log_type = log_type.to_string();
        self
    }

    pub fn discounted(mut self, discount: Discount, reason: &str) -> Self {
        self.discount = discount;
        self.discount_reason = reason.to_string();
        self
    }

    fn is_nightly(&self) -> bool {
        self.log_type == LOG_NIGHTLY
    }

    fn to_discounted(&self) -> DiscountedTest {
        DiscountedTest {
            id: self.id,
            automation_type: self.automation_type.clone(),
            env: self.env.clone(),
            project: self.project.clone(),
            test_name: self.test_name.clone(),
            error: self.error.clone(),
            discount: self.discount,
            discount_reason: self.discount_reason.clone(),
            build_no: self.build_no,
            created_at: self.created_at,
        }
    }
}

struct MemoryState {
    rows: Vec<StoredResult>,
    next_id: i64,
    unreachable: bool,
    resets: usize,
}

/// Result store over in-memory rows
#[derive(Clone)]
pub struct MemoryResultStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryResultStore {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                rows: Vec::new(),
                next_id: 1,
                unreachable: false,
                resets: 0,
            })),
        }
    }
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, returning its assigned id.
    pub fn insert(&self, mut row: StoredResult) -> i64 {
        let mut inner = self.inner.lock();
        row.id = inner.next_id;
        inner.next_id += 1;
        let id = row.id;
        inner.rows.push(row);
        id
    }

    pub fn row(&self, id: i64) -> Option<StoredResult> {
        self.inner.lock().rows.iter().find(|r| r.id == id).cloned()
    }

    /// Make every operation fail as if the server were unreachable.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unreachable = unreachable;
    }

    pub fn reset_count(&self) -> usize {
        self.inner.lock().resets
    }

    fn read<T>(&self, f: impl FnOnce(&[StoredResult]) -> T) -> Result<T, StoreError> {
        let inner = self.inner.lock();
        if inner.unreachable {
            return Err(unreachable_error());
        }
        Ok(f(&inner.rows))
    }
}

fn unreachable_error() -> StoreError {
    StoreError::Connectivity("connection refused".to_string())
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn failed_tests(
        &self,
        window: RunWindow,
        browser: Option<&str>,
    ) -> Result<Vec<FailedTest>, StoreError> {
        let browser = filter_value(browser);
        self.read(|rows| {
            rows.iter()
                .filter(|r| r.is_nightly() && FAILED_RESULTS.contains(&r.result.as_str()))
                .filter(|r| window.contains(r.created_at))
                .filter(|r| browser.map_or(true, |b| r.browser == b))
                .map(|r| FailedTest {
                    id: r.id,
                    build_no: r.build_no,
                    automation_type: r.automation_type.clone(),
                    env: r.env.clone(),
                    project: r.project.clone(),
                    test_name: r.test_name.clone(),
                    rerun: r.rerun,
                    error: r.error.clone(),
                    stack_trace: r.stack_trace.clone(),
                    discount: r.discount,
                    discount_reason: r.discount_reason.clone(),
                    browser: r.browser.clone(),
                    owner: r.owner.clone(),
                    created_at: r.created_at,
                })
                .collect()
        })
    }

    async fn discounted_failures(&self, window: RunWindow) -> Result<Vec<DiscountedTest>, StoreError> {
        self.read(|rows| {
            rows.iter()
                .filter(|r| r.is_nightly() && r.result == "Failed" && r.discount.is_discounted())
                .filter(|r| window.contains(r.created_at))
                .map(StoredResult::to_discounted)
                .collect()
        })
    }

    async fn recent_discounts(&self, window: RunWindow) -> Result<Vec<DiscountedTest>, StoreError> {
        self.read(|rows| {
            rows.iter()
                .filter(|r| r.result != "Passed" && r.discount.is_discounted())
                .filter(|r| window.contains(r.created_at))
                .map(StoredResult::to_discounted)
                .collect()
        })
    }

    async fn set_discount(
        &self,
        id: i64,
        update: &DiscountUpdate,
        operator: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.unreachable {
            return Err(unreachable_error());
        }
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { what: "test result", id })?;
        row.discount = update.discount;
        row.discount_reason = update.reason.clone();
        row.modified_by = Some(operator.to_string());
        row.modified_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn project_names(&self, automation_type: Option<&str>) -> Result<Vec<String>, StoreError> {
        let automation_type = filter_value(automation_type).map(str::to_lowercase);
        self.read(|rows| {
            let mut names: Vec<String> = rows
                .iter()
                .filter(|r| r.log_type == LOG_COUNT)
                .filter(|r| automation_type.as_deref().map_or(true, |t| r.automation_type == t))
                .map(|r| r.project.clone())
                .collect();
            names.sort();
            names.dedup();
            std::iter::once(ANY.to_string()).chain(names).collect()
        })
    }

    async fn failure_rows(
        &self,
        window: RunWindow,
        discounted: bool,
    ) -> Result<Vec<FailureRow>, StoreError> {
        self.read(|rows| {
            rows.iter()
                .filter(|r| r.is_nightly() && COUNTED_FAILURES.contains(&r.result.as_str()))
                .filter(|r| window.contains(r.created_at))
                .filter(|r| r.discount.is_discounted() == discounted)
                .map(|r| FailureRow {
                    project: r.project.clone(),
                    test_name: r.test_name.clone(),
                    env: r.env.clone(),
                    automation_type: r.automation_type.clone(),
                    discount: r.discount,
                    discount_reason: r.discount_reason.clone(),
                    rerun: r.rerun,
                    owner: r.owner.clone(),
                })
                .collect()
        })
    }

    async fn run_totals(&self, window: RunWindow) -> Result<RunTotals, StoreError> {
        self.read(|rows| {
            let mut totals = RunTotals::default();
            for r in rows.iter().filter(|r| r.is_nightly() && window.contains(r.created_at)) {
                let ui = r.automation_type == "ui";
                let api = r.automation_type == "api";
                match (is_test_env(&r.env), is_prod_env(&r.env)) {
                    (true, _) if ui => totals.ui_test += 1,
                    (true, _) if api => totals.api_test += 1,
                    (_, true) if ui => totals.ui_prod += 1,
                    (_, true) if api => totals.api_prod += 1,
                    _ => {}
                }
                let failed = COUNTED_FAILURES.contains(&r.result.as_str())
                    && !r.discount.is_discounted();
                if !failed {
                    continue;
                }
                match r.env.as_str() {
                    "TEST" if ui => totals.ui_test_failed += 1,
                    "TEST" if api => totals.api_test_failed += 1,
                    "PROD" if ui => totals.ui_prod_failed += 1,
                    "PROD" if api => totals.api_prod_failed += 1,
                    _ => {}
                }
            }
            totals
        })
    }

    async fn count_baselines(&self) -> Result<Vec<CountBaseline>, StoreError> {
        self.read(|rows| {
            let mut baselines: Vec<CountBaseline> = rows
                .iter()
                .filter(|r| r.log_type == LOG_COUNT)
                .map(|r| CountBaseline {
                    project: r.project.clone(),
                    env: r.env.clone(),
                    expected: r.run_time.unwrap_or(0.0) as i64,
                })
                .collect();
            baselines.sort_by(|a, b| (&a.project, &a.env).cmp(&(&b.project, &b.env)));
            baselines
        })
    }

    async fn count_actuals(&self, window: RunWindow) -> Result<Vec<CountActual>, StoreError> {
        self.read(|rows| {
            let mut counts: BTreeMap<(String, String), i64> = BTreeMap::new();
            for r in rows.iter().filter(|r| r.is_nightly() && window.contains(r.created_at)) {
                *counts.entry((r.project.clone(), r.env.clone())).or_default() += 1;
            }
            counts
                .into_iter()
                .map(|((project, env), actual)| CountActual { project, env, actual })
                .collect()
        })
    }

    async fn test_details(&self, id: i64) -> Result<TestDetails, StoreError> {
        let row = self.read(|rows| rows.iter().find(|r| r.id == id).cloned())?;
        let r = row.ok_or(StoreError::NotFound { what: "test result", id })?;
        Ok(TestDetails {
            test_name: r.test_name,
            project: r.project,
            error: r.error,
            stack_trace: r.stack_trace,
            env: r.env,
            machine_name: r.machine_name,
            app_version: r.app_version,
            result: r.result,
            run_time: r.run_time,
            rerun: r.rerun,
            automation_type: r.automation_type,
            log_type: r.log_type,
            browser: r.browser,
            discount: r.discount,
            discount_reason: r.discount_reason,
            created_at: r.created_at,
            modified_at: r.modified_at,
            build_no: r.build_no,
        })
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.resets += 1;
        inner.unreachable = false;
        tracing::info!("memory store reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
