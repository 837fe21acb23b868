// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::StoreError;
use async_trait::async_trait;
use ns_core::{
    CountActual, CountBaseline, DiscountUpdate, DiscountedTest, FailedTest, FailureRow, RunTotals,
    RunWindow, TestDetails,
};

/// Log type of nightly test rows
pub const LOG_NIGHTLY: &str = "Nightly";

/// Log type of expected-count rows
pub const LOG_COUNT: &str = "Count";

/// Results listed as failures on the dashboard
pub const FAILED_RESULTS: &[&str] = &["Failed", "Skipped", "NotExecuted", "Timeout"];

/// Results counted against the pass rate
pub const COUNTED_FAILURES: &[&str] = &["Failed", "Skipped"];

/// Read and annotate test-run records.
///
/// Windows are exclusive on both ends. Filters given as `None` or `"--"`
/// match everything.
#[async_trait]
pub trait ResultStore: Clone + Send + Sync + 'static {
    /// Nightly failures (failed, skipped, not executed, timed out) ordered by id.
    async fn failed_tests(
        &self,
        window: RunWindow,
        browser: Option<&str>,
    ) -> Result<Vec<FailedTest>, StoreError>;

    /// Nightly `Failed` results carrying a discount.
    async fn discounted_failures(&self, window: RunWindow) -> Result<Vec<DiscountedTest>, StoreError>;

    /// Any non-passed result carrying a discount, nightly or not.
    async fn recent_discounts(&self, window: RunWindow) -> Result<Vec<DiscountedTest>, StoreError>;

    /// Write a discount annotation, recording who made it.
    async fn set_discount(
        &self,
        id: i64,
        update: &DiscountUpdate,
        operator: &str,
    ) -> Result<(), StoreError>;

    /// Distinct project names from count records, sorted, with `--` first.
    async fn project_names(&self, automation_type: Option<&str>) -> Result<Vec<String>, StoreError>;

    /// Counted failures, either the discounted or the undiscounted ones.
    async fn failure_rows(
        &self,
        window: RunWindow,
        discounted: bool,
    ) -> Result<Vec<FailureRow>, StoreError>;

    async fn run_totals(&self, window: RunWindow) -> Result<RunTotals, StoreError>;

    /// Expected counts, ordered by project then env.
    async fn count_baselines(&self) -> Result<Vec<CountBaseline>, StoreError>;

    /// Executed counts per project and env, ordered by project then env.
    async fn count_actuals(&self, window: RunWindow) -> Result<Vec<CountActual>, StoreError>;

    async fn test_details(&self, id: i64) -> Result<TestDetails, StoreError>;

    /// Discard and rebuild the underlying connection.
    async fn reset(&self) -> Result<(), StoreError>;
}

/// `None` for the match-anything filter value.
pub(crate) fn filter_value(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ns_core::ANY)
}
