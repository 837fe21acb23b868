// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Postgres SQLSTATEs for rejected credentials
const AUTH_SQLSTATES: &[&str] = &["28000", "28P01"];

/// Errors from result store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(
        "cannot reach the result store: {0}\n\
         Check network connectivity, the VPN connection, firewall settings \
         and the database server status"
    )]
    Connectivity(String),
    #[error(
        "result store authentication failed: {0}\n\
         Check the database password and that the user has the required permissions"
    )]
    Authentication(String),
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },
    #[error("result store query failed: {0}")]
    Query(String),
    #[error("result store is not configured: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether the failure blocks every store operation until the connection
    /// is rebuilt.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connectivity(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connectivity(err.to_string()),
            sqlx::Error::Configuration(_) => StoreError::Config(err.to_string()),
            sqlx::Error::Database(db) => {
                let auth = db.code().is_some_and(|code| AUTH_SQLSTATES.iter().any(|s| *s == code));
                if auth {
                    StoreError::Authentication(db.message().to_string())
                } else {
                    StoreError::Query(err.to_string())
                }
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
