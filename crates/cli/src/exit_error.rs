// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use crate::config::ConfigError;
use ns_core::RequestError;
use ns_engine::WorkflowError;
use ns_storage::StoreError;
use std::fmt;

/// Any failure not classified below
pub const FAILURE: i32 = 1;
/// Bad arguments or configuration
pub const USAGE: i32 = 2;
/// The result store could not be reached
pub const STORE_UNREACHABLE: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }

    /// Classify a command failure into an exit code and operator message.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ExitError>() {
            Ok(exit) => return exit,
            Err(err) => err,
        };
        for cause in err.chain() {
            let store = cause
                .downcast_ref::<WorkflowError>()
                .and_then(|e| match e {
                    WorkflowError::Store(store) => Some(store),
                    _ => None,
                })
                .or_else(|| cause.downcast_ref::<StoreError>());
            if let Some(store) = store.filter(|s| s.is_connectivity()) {
                return Self::new(STORE_UNREACHABLE, store_banner(store));
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return Self::new(USAGE, format!("{:#}", err));
            }
            if let Some(WorkflowError::Validation(_) | WorkflowError::Request(_)) =
                cause.downcast_ref::<WorkflowError>()
            {
                return Self::new(USAGE, cause.to_string());
            }
            if cause.downcast_ref::<RequestError>().is_some() {
                return Self::new(USAGE, cause.to_string());
            }
        }
        Self::new(FAILURE, format!("{:#}", err))
    }
}

/// Persistent banner shown when the store is unreachable
pub fn store_banner(err: &StoreError) -> String {
    format!(
        "*** Result store unavailable ***\n{}\nRun `nightly reset-db` to reconnect once the network is back.",
        err
    )
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
