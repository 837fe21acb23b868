// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle for the Postgres result store.

use crate::StoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::Mutex;

/// Pool sizing and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Owns the connection pool.
///
/// `acquire` connects lazily and health-checks a reused pool with
/// `SELECT 1`, dropping it when the check fails. Concurrent callers wait on
/// one connect attempt instead of racing their own.
pub struct ConnectionManager {
    url: String,
    settings: PoolSettings,
    pool: Mutex<Option<PgPool>>,
}

impl ConnectionManager {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_settings(url, PoolSettings::default())
    }

    pub fn with_settings(url: impl Into<String>, settings: PoolSettings) -> Self {
        Self { url: url.into(), settings, pool: Mutex::new(None) }
    }

    /// A healthy pool, connecting if needed.
    pub async fn acquire(&self) -> Result<PgPool, StoreError> {
        let mut slot = self.pool.lock().await;
        if let Some(pool) = slot.as_ref() {
            match health_check(pool).await {
                Ok(()) => return Ok(pool.clone()),
                Err(e) => {
                    tracing::warn!(error = %e, "pool health check failed, reconnecting");
                    pool.close().await;
                    *slot = None;
                }
            }
        }
        let pool = self.connect().await?;
        *slot = Some(pool.clone());
        Ok(pool)
    }

    /// Discard the current pool and connect afresh.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let mut slot = self.pool.lock().await;
        if let Some(pool) = slot.take() {
            tracing::info!("closing result store pool");
            pool.close().await;
        }
        let pool = self.connect().await?;
        *slot = Some(pool);
        Ok(())
    }

    /// Drop the pool without reconnecting; the next `acquire` connects.
    pub async fn invalidate(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.pool.lock().await.as_ref().is_some_and(|p| !p.is_closed())
    }

    async fn connect(&self) -> Result<PgPool, StoreError> {
        tracing::info!("connecting to result store");
        let pool = PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .min_connections(0)
            .acquire_timeout(self.settings.acquire_timeout)
            .idle_timeout(self.settings.idle_timeout)
            .connect(&self.url)
            .await
            .map_err(|e| {
                let err = StoreError::from(e);
                tracing::error!(error = %err, "result store connection failed");
                err
            })?;
        tracing::info!("result store connection established");
        Ok(pool)
    }
}

async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await.map(drop)
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
