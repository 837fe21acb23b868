// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard services over the result store.
//!
//! Every date taken here is the run date an operator picks; records of that
//! run carry UTC timestamps on the following day.

use crate::error::WorkflowError;
use crate::report::{group_failures, status_text, CountDrift, Percentages, ProjectStats};
use chrono::NaiveDate;
use ns_core::{
    recent_discount_date, selected_to_utc_date, Clock, DiscountUpdate, DiscountedTest,
    FailedTest, FailedTestFilter, FailureCounts, RunWindow, TestDetails, CLEAR_DISCOUNT,
};
use ns_storage::{ResultStore, StoreError};
use serde::Serialize;

/// Leading characters of a source error that must reappear when copying a
/// discount forward.
pub const ERROR_PREFIX_CHARS: usize = 185;

/// Default look-back for recent discounts
pub const DEFAULT_DAYS_BACK: i64 = 4;

/// Filtered failures with their summary counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedView {
    pub tests: Vec<FailedTest>,
    pub counts: FailureCounts,
}

/// What copying discounts forward did, by source record id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// `(source id, discounted test id)`
    pub copied: Vec<(i64, i64)>,
    /// A newer failure exists but its error differs; pass `force` to copy.
    pub mismatched: Vec<(i64, i64)>,
    /// No newer failure of the same test.
    pub unmatched: Vec<i64>,
}

/// Status report parts and the rendered text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub percentages: Percentages,
    pub failing: Vec<ProjectStats>,
    pub discounted: Vec<ProjectStats>,
    pub text: String,
}

/// Reads and annotates results for one operator
#[derive(Clone)]
pub struct Dashboard<S, K> {
    store: S,
    clock: K,
    operator: String,
}

impl<S, K> Dashboard<S, K>
where
    S: ResultStore,
    K: Clock,
{
    pub fn new(store: S, clock: K, operator: impl Into<String>) -> Self {
        Self { store, clock, operator: operator.into() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Query window of the run picked as `selected`.
    pub fn run_window(&self, selected: NaiveDate) -> RunWindow {
        RunWindow::for_date(selected_to_utc_date(selected), self.clock.today())
    }

    /// All failures of a run, unfiltered except by browser.
    pub async fn failed_tests(
        &self,
        selected: NaiveDate,
        browser: Option<&str>,
    ) -> Result<Vec<FailedTest>, WorkflowError> {
        Ok(self.store.failed_tests(self.run_window(selected), browser).await?)
    }

    /// Failures of a run narrowed by `filter`, keeping only records stamped
    /// on the run's UTC date.
    pub async fn failed_view(
        &self,
        selected: NaiveDate,
        filter: &FailedTestFilter,
    ) -> Result<FailedView, WorkflowError> {
        let all = self.failed_tests(selected, filter.browser.as_deref()).await?;
        let filter = FailedTestFilter { utc_date: Some(selected_to_utc_date(selected)), ..filter.clone() };
        let tests: Vec<FailedTest> = filter.apply(&all).into_iter().cloned().collect();
        let counts = FailureCounts::of(&tests.iter().collect::<Vec<_>>());
        Ok(FailedView { tests, counts })
    }

    /// Failures of a run with the given ids, in the order given.
    pub async fn select_failed(
        &self,
        selected: NaiveDate,
        ids: &[i64],
    ) -> Result<Vec<FailedTest>, WorkflowError> {
        if ids.is_empty() {
            return Err(WorkflowError::Validation("No tests selected".to_string()));
        }
        let all = self.failed_tests(selected, None).await?;
        ids.iter()
            .map(|id| {
                all.iter()
                    .find(|t| t.id == *id)
                    .cloned()
                    .ok_or(WorkflowError::Store(StoreError::NotFound { what: "failed test", id: *id }))
            })
            .collect()
    }

    /// Write one discount to each of `ids`.
    ///
    /// Returns the message shown to the operator.
    pub async fn discount(
        &self,
        ids: &[i64],
        code: &str,
        reason: &str,
    ) -> Result<&'static str, WorkflowError> {
        if ids.is_empty() {
            return Err(WorkflowError::Validation("No tests selected".to_string()));
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(WorkflowError::Validation("The Discount Code is not selected".to_string()));
        }
        let clearing = code == CLEAR_DISCOUNT;
        if reason.trim().is_empty() && !clearing {
            return Err(WorkflowError::Validation("The Discount Reason is not set".to_string()));
        }
        let update = DiscountUpdate::new(code, reason);
        if !update.discount.is_discounted() && !clearing && code != "0" {
            return Err(WorkflowError::Validation(format!("Unknown discount code: {}", code)));
        }

        for id in ids {
            self.store.set_discount(*id, &update, &self.operator).await?;
            tracing::info!(id, discount = %update.discount, operator = %self.operator, "discount written");
        }
        Ok(if update.discount.is_discounted() { "Test(s) discounted" } else { "Discount cleared" })
    }

    /// Discounted nightly failures of the run picked as `selected`.
    pub async fn yesterdays_discounts(
        &self,
        selected: NaiveDate,
    ) -> Result<Vec<DiscountedTest>, WorkflowError> {
        Ok(self.store.discounted_failures(self.run_window(selected)).await?)
    }

    /// Discounted results of an earlier run, `days_back` days before the one
    /// picked (weekends land on Friday).
    pub async fn recent_discounts(
        &self,
        selected: NaiveDate,
        days_back: i64,
    ) -> Result<Vec<DiscountedTest>, WorkflowError> {
        let target = recent_discount_date(selected_to_utc_date(selected), days_back);
        let window = RunWindow::for_date(target, self.clock.today());
        Ok(self.store.recent_discounts(window).await?)
    }

    /// Copy discounts from `sources` onto the same tests failing in a newer
    /// build of the run picked as `selected`.
    ///
    /// A copy needs the new error to contain the first 185 characters of the
    /// source error, unless `force` is set.
    pub async fn copy_discounts(
        &self,
        selected: NaiveDate,
        sources: &[DiscountedTest],
        force: bool,
    ) -> Result<CopyReport, WorkflowError> {
        if sources.is_empty() {
            return Err(WorkflowError::Validation("No tests selected".to_string()));
        }
        let current = self.failed_tests(selected, None).await?;
        let mut report = CopyReport::default();

        for source in sources {
            let Some(target) = current.iter().find(|t| {
                t.test_name == source.test_name
                    && t.env == source.env
                    && t.project == source.project
                    && t.build_no > source.build_no
            }) else {
                report.unmatched.push(source.id);
                continue;
            };

            let prefix: String = source.error.chars().take(ERROR_PREFIX_CHARS).collect();
            if !target.error.contains(&prefix) && !force {
                tracing::info!(source = source.id, target = target.id, "error differs, not copying");
                report.mismatched.push((source.id, target.id));
                continue;
            }

            let update = DiscountUpdate::new(source.discount.label(), &source.discount_reason);
            self.store.set_discount(target.id, &update, &self.operator).await?;
            report.copied.push((source.id, target.id));
        }
        Ok(report)
    }

    /// Project names for the run form, `--` first.
    pub async fn projects(&self, automation_type: Option<&str>) -> Result<Vec<String>, WorkflowError> {
        Ok(self.store.project_names(automation_type).await?)
    }

    /// The nightly status message for the run picked as `selected`.
    pub async fn stats_report(
        &self,
        selected: NaiveDate,
        base_url: &str,
    ) -> Result<StatsReport, WorkflowError> {
        let window = self.run_window(selected);
        let totals = self.store.run_totals(window).await?;
        let failing = group_failures(&self.store.failure_rows(window, false).await?);
        let discounted = group_failures(&self.store.failure_rows(window, true).await?);

        let percentages = Percentages::from_totals(&totals);
        let text = status_text(&percentages, &failing, &discounted, base_url);
        Ok(StatsReport { percentages, failing, discounted, text })
    }

    /// Executed counts of the run compared with their baselines.
    pub async fn count_report(&self, selected: NaiveDate) -> Result<CountDrift, WorkflowError> {
        let baselines = self.store.count_baselines().await?;
        let actuals = self.store.count_actuals(self.run_window(selected)).await?;
        Ok(CountDrift::compare(&baselines, &actuals))
    }

    pub async fn test_details(&self, id: i64) -> Result<TestDetails, WorkflowError> {
        Ok(self.store.test_details(id).await?)
    }

    /// Drop the store connection and reconnect.
    pub async fn reset(&self) -> Result<(), WorkflowError> {
        self.store.reset().await?;
        tracing::info!("result store connection reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
