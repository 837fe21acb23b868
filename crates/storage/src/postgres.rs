// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Postgres implementation of [`ResultStore`] over the `automation_results` table.

use crate::store::{filter_value, COUNTED_FAILURES, FAILED_RESULTS, LOG_COUNT, LOG_NIGHTLY};
use crate::{ConnectionManager, ResultStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use ns_core::{
    CountActual, CountBaseline, Discount, DiscountUpdate, DiscountedTest, FailedTest, FailureRow,
    RunTotals, RunWindow, TestDetails, ANY,
};
use sqlx::migrate::Migrator;
use sqlx::FromRow;
use std::sync::Arc;

/// Schema migrations shipped with the crate
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, FromRow)]
struct FailedTestRow {
    id: i64,
    build_number: i64,
    automation_type: String,
    env: String,
    project_name: String,
    test_name: String,
    rerun: bool,
    error_msg: Option<String>,
    stack_trace: Option<String>,
    discount: i32,
    discount_reason: Option<String>,
    browser: Option<String>,
    project_owner: Option<String>,
    create_date_utc: NaiveDateTime,
}

impl From<FailedTestRow> for FailedTest {
    fn from(row: FailedTestRow) -> Self {
        FailedTest {
            id: row.id,
            build_no: row.build_number,
            automation_type: row.automation_type,
            env: row.env,
            project: row.project_name,
            test_name: row.test_name,
            rerun: row.rerun,
            error: row.error_msg.unwrap_or_default(),
            stack_trace: row.stack_trace.unwrap_or_default(),
            discount: Discount::from_code(row.discount),
            discount_reason: row.discount_reason.unwrap_or_default(),
            browser: row.browser.unwrap_or_default(),
            owner: row.project_owner.unwrap_or_default(),
            created_at: row.create_date_utc,
        }
    }
}

#[derive(Debug, FromRow)]
struct DiscountedRow {
    id: i64,
    automation_type: String,
    env: String,
    project_name: String,
    test_name: String,
    error_msg: Option<String>,
    discount: i32,
    discount_reason: Option<String>,
    build_number: i64,
    create_date_utc: NaiveDateTime,
}

impl From<DiscountedRow> for DiscountedTest {
    fn from(row: DiscountedRow) -> Self {
        DiscountedTest {
            id: row.id,
            automation_type: row.automation_type,
            env: row.env,
            project: row.project_name,
            test_name: row.test_name,
            error: row.error_msg.unwrap_or_default(),
            discount: Discount::from_code(row.discount),
            discount_reason: row.discount_reason.unwrap_or_default(),
            build_no: row.build_number,
            created_at: row.create_date_utc,
        }
    }
}

#[derive(Debug, FromRow)]
struct FailureRowRecord {
    project_name: String,
    test_name: String,
    env: String,
    automation_type: String,
    discount: i32,
    discount_reason: Option<String>,
    rerun: bool,
    project_owner: Option<String>,
}

#[derive(Debug, FromRow)]
struct DetailsRow {
    test_name: String,
    project_name: String,
    error_msg: Option<String>,
    stack_trace: Option<String>,
    env: String,
    machine_name: Option<String>,
    app_version: Option<String>,
    test_result: String,
    test_run_time: Option<f64>,
    rerun: bool,
    automation_type: String,
    log_type: String,
    browser: Option<String>,
    discount: i32,
    discount_reason: Option<String>,
    create_date_utc: NaiveDateTime,
    modify_date_utc: Option<NaiveDateTime>,
    build_number: i64,
}

#[derive(Debug, FromRow)]
struct TotalsRow {
    ui_test: i64,
    api_test: i64,
    ui_prod: i64,
    api_prod: i64,
}

#[derive(Debug, FromRow)]
struct FailedTotalsRow {
    ui_test_failed: i64,
    api_test_failed: i64,
    ui_prod_failed: i64,
    api_prod_failed: i64,
}

#[derive(Debug, FromRow)]
struct CountRow {
    project_name: String,
    env: String,
    test_count: i64,
}

const DISCOUNTED_COLUMNS: &str = "id, automation_type, env, project_name, test_name, error_msg, \
     discount, discount_reason, build_number, create_date_utc";

/// Result store backed by Postgres
#[derive(Clone)]
pub struct PgResultStore {
    connections: Arc<ConnectionManager>,
}

impl PgResultStore {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    pub fn connect_lazy(database_url: &str) -> Self {
        Self::new(Arc::new(ConnectionManager::new(database_url)))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let pool = self.connections.acquire().await?;
        MIGRATOR.run(&pool).await.map_err(|e| StoreError::Query(e.to_string()))?;
        tracing::info!("result store migrations applied");
        Ok(())
    }

    /// Run `op` on a healthy pool, dropping the pool when the failure means
    /// the connection itself is gone.
    async fn with_pool<T, F, Fut>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(sqlx::PgPool) -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, sqlx::Error>> + Send,
        T: Send,
    {
        let pool = self.connections.acquire().await?;
        match op(pool).await {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = StoreError::from(e);
                if err.is_connectivity() {
                    self.connections.invalidate().await;
                }
                Err(err)
            }
        }
    }
}

fn results_list(results: &[&str]) -> Vec<String> {
    results.iter().map(|r| r.to_string()).collect()
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn failed_tests(
        &self,
        window: RunWindow,
        browser: Option<&str>,
    ) -> Result<Vec<FailedTest>, StoreError> {
        let browser = filter_value(browser).map(String::from);
        let rows = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, FailedTestRow>(
                    "SELECT id, build_number, automation_type, env, project_name, test_name, rerun, \
                            error_msg, stack_trace, discount, discount_reason, browser, project_owner, \
                            create_date_utc \
                     FROM automation_results \
                     WHERE log_type = $1 \
                       AND test_result = ANY($2) \
                       AND create_date_utc > $3 AND create_date_utc < $4 \
                       AND ($5::text IS NULL OR browser = $5) \
                     ORDER BY id",
                )
                .bind(LOG_NIGHTLY)
                .bind(results_list(FAILED_RESULTS))
                .bind(window.start)
                .bind(window.end)
                .bind(browser)
                .fetch_all(&pool)
                .await
            })
            .await?;
        tracing::debug!(count = rows.len(), "loaded failed tests");
        Ok(rows.into_iter().map(FailedTest::from).collect())
    }

    async fn discounted_failures(&self, window: RunWindow) -> Result<Vec<DiscountedTest>, StoreError> {
        let sql = format!(
            "SELECT {} FROM automation_results \
             WHERE test_result = 'Failed' AND log_type = $1 AND discount > 0 \
               AND create_date_utc > $2 AND create_date_utc < $3 \
             ORDER BY id",
            DISCOUNTED_COLUMNS
        );
        let rows = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, DiscountedRow>(&sql)
                    .bind(LOG_NIGHTLY)
                    .bind(window.start)
                    .bind(window.end)
                    .fetch_all(&pool)
                    .await
            })
            .await?;
        Ok(rows.into_iter().map(DiscountedTest::from).collect())
    }

    async fn recent_discounts(&self, window: RunWindow) -> Result<Vec<DiscountedTest>, StoreError> {
        let sql = format!(
            "SELECT {} FROM automation_results \
             WHERE create_date_utc > $1 AND create_date_utc < $2 \
               AND test_result <> 'Passed' AND discount > 0 \
             ORDER BY id",
            DISCOUNTED_COLUMNS
        );
        let rows = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, DiscountedRow>(&sql)
                    .bind(window.start)
                    .bind(window.end)
                    .fetch_all(&pool)
                    .await
            })
            .await?;
        Ok(rows.into_iter().map(DiscountedTest::from).collect())
    }

    async fn set_discount(
        &self,
        id: i64,
        update: &DiscountUpdate,
        operator: &str,
    ) -> Result<(), StoreError> {
        let code = update.discount.code();
        let reason = update.reason.clone();
        let operator = operator.to_string();
        let result = self
            .with_pool(|pool| async move {
                sqlx::query(
                    "UPDATE automation_results \
                     SET discount = $1, discount_reason = $2, modify_by = $3, \
                         modify_date_utc = (now() AT TIME ZONE 'utc') \
                     WHERE id = $4",
                )
                .bind(code)
                .bind(reason)
                .bind(operator)
                .bind(id)
                .execute(&pool)
                .await
            })
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { what: "test result", id });
        }
        tracing::info!(id, discount = code, "discount updated");
        Ok(())
    }

    async fn project_names(&self, automation_type: Option<&str>) -> Result<Vec<String>, StoreError> {
        let automation_type = filter_value(automation_type).map(str::to_lowercase);
        let names: Vec<String> = self
            .with_pool(|pool| async move {
                sqlx::query_scalar::<_, String>(
                    "SELECT DISTINCT project_name FROM automation_results \
                     WHERE log_type = $1 AND ($2::text IS NULL OR automation_type = $2) \
                     ORDER BY project_name",
                )
                .bind(LOG_COUNT)
                .bind(automation_type)
                .fetch_all(&pool)
                .await
            })
            .await?;
        Ok(std::iter::once(ANY.to_string()).chain(names).collect())
    }

    async fn failure_rows(
        &self,
        window: RunWindow,
        discounted: bool,
    ) -> Result<Vec<FailureRow>, StoreError> {
        let rows = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, FailureRowRecord>(
                    "SELECT project_name, test_name, env, automation_type, discount, discount_reason, \
                            rerun, project_owner \
                     FROM automation_results \
                     WHERE log_type = $1 AND test_result = ANY($2) \
                       AND create_date_utc > $3 AND create_date_utc < $4 \
                       AND (discount > 0) = $5 \
                     ORDER BY id",
                )
                .bind(LOG_NIGHTLY)
                .bind(results_list(COUNTED_FAILURES))
                .bind(window.start)
                .bind(window.end)
                .bind(discounted)
                .fetch_all(&pool)
                .await
            })
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| FailureRow {
                project: r.project_name,
                test_name: r.test_name,
                env: r.env,
                automation_type: r.automation_type,
                discount: Discount::from_code(r.discount),
                discount_reason: r.discount_reason.unwrap_or_default(),
                rerun: r.rerun,
                owner: r.project_owner.unwrap_or_default(),
            })
            .collect())
    }

    async fn run_totals(&self, window: RunWindow) -> Result<RunTotals, StoreError> {
        let (totals, failed) = self
            .with_pool(|pool| async move {
                let totals = sqlx::query_as::<_, TotalsRow>(
                    "SELECT \
                       COUNT(*) FILTER (WHERE env IN ('TEST', 'BETA') AND automation_type = 'ui') AS ui_test, \
                       COUNT(*) FILTER (WHERE env IN ('TEST', 'BETA') AND automation_type = 'api') AS api_test, \
                       COUNT(*) FILTER (WHERE env IN ('PROD', 'LIVE') AND automation_type = 'ui') AS ui_prod, \
                       COUNT(*) FILTER (WHERE env IN ('PROD', 'LIVE') AND automation_type = 'api') AS api_prod \
                     FROM automation_results \
                     WHERE log_type = $1 AND create_date_utc > $2 AND create_date_utc < $3",
                )
                .bind(LOG_NIGHTLY)
                .bind(window.start)
                .bind(window.end)
                .fetch_one(&pool)
                .await?;
                let failed = sqlx::query_as::<_, FailedTotalsRow>(
                    "SELECT \
                       COUNT(*) FILTER (WHERE env = 'TEST' AND automation_type = 'ui' AND discount = 0) AS ui_test_failed, \
                       COUNT(*) FILTER (WHERE env = 'TEST' AND automation_type = 'api' AND discount = 0) AS api_test_failed, \
                       COUNT(*) FILTER (WHERE env = 'PROD' AND automation_type = 'ui' AND discount = 0) AS ui_prod_failed, \
                       COUNT(*) FILTER (WHERE env = 'PROD' AND automation_type = 'api' AND discount = 0) AS api_prod_failed \
                     FROM automation_results \
                     WHERE log_type = $1 AND test_result = ANY($2) \
                       AND create_date_utc > $3 AND create_date_utc < $4",
                )
                .bind(LOG_NIGHTLY)
                .bind(results_list(COUNTED_FAILURES))
                .bind(window.start)
                .bind(window.end)
                .fetch_one(&pool)
                .await?;
                Ok((totals, failed))
            })
            .await?;
        Ok(RunTotals {
            ui_test: totals.ui_test,
            api_test: totals.api_test,
            ui_prod: totals.ui_prod,
            api_prod: totals.api_prod,
            ui_test_failed: failed.ui_test_failed,
            api_test_failed: failed.api_test_failed,
            ui_prod_failed: failed.ui_prod_failed,
            api_prod_failed: failed.api_prod_failed,
        })
    }

    async fn count_baselines(&self) -> Result<Vec<CountBaseline>, StoreError> {
        let rows = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, CountRow>(
                    "SELECT project_name, env, COALESCE(test_run_time, 0)::bigint AS test_count \
                     FROM automation_results WHERE log_type = $1 \
                     ORDER BY project_name, env",
                )
                .bind(LOG_COUNT)
                .fetch_all(&pool)
                .await
            })
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| CountBaseline { project: r.project_name, env: r.env, expected: r.test_count })
            .collect())
    }

    async fn count_actuals(&self, window: RunWindow) -> Result<Vec<CountActual>, StoreError> {
        let rows = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, CountRow>(
                    "SELECT project_name, env, COUNT(test_name) AS test_count \
                     FROM automation_results \
                     WHERE log_type = $1 AND create_date_utc > $2 AND create_date_utc < $3 \
                     GROUP BY project_name, env \
                     ORDER BY project_name, env",
                )
                .bind(LOG_NIGHTLY)
                .bind(window.start)
                .bind(window.end)
                .fetch_all(&pool)
                .await
            })
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| CountActual { project: r.project_name, env: r.env, actual: r.test_count })
            .collect())
    }

    async fn test_details(&self, id: i64) -> Result<TestDetails, StoreError> {
        let row = self
            .with_pool(|pool| async move {
                sqlx::query_as::<_, DetailsRow>(
                    "SELECT test_name, project_name, error_msg, stack_trace, env, machine_name, \
                            app_version, test_result, test_run_time, rerun, automation_type, log_type, \
                            browser, discount, discount_reason, create_date_utc, modify_date_utc, \
                            build_number \
                     FROM automation_results WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&pool)
                .await
            })
            .await?
            .ok_or(StoreError::NotFound { what: "test result", id })?;
        Ok(TestDetails {
            test_name: row.test_name,
            project: row.project_name,
            error: row.error_msg.unwrap_or_default(),
            stack_trace: row.stack_trace.unwrap_or_default(),
            env: row.env,
            machine_name: row.machine_name.unwrap_or_default(),
            app_version: row.app_version.unwrap_or_default(),
            result: row.test_result,
            run_time: row.test_run_time,
            rerun: row.rerun,
            automation_type: row.automation_type,
            log_type: row.log_type,
            browser: row.browser.unwrap_or_default(),
            discount: Discount::from_code(row.discount),
            discount_reason: row.discount_reason.unwrap_or_default(),
            created_at: row.create_date_utc,
            modified_at: row.modify_date_utc,
            build_no: row.build_number,
        })
    }

    async fn reset(&self) -> Result<(), StoreError> {
        self.connections.reset().await
    }
}
