// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ns_adapters::{BrowserError, CiError};
use ns_core::RequestError;
use ns_storage::StoreError;
use thiserror::Error;

/// Errors surfaced by the workflow and dashboard services
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Ci(#[from] CiError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not open browser: {0}")]
    Browser(#[from] BrowserError),
    #[error("{0}")]
    Validation(String),
}

impl WorkflowError {
    /// Whether the result store could not be reached.
    pub fn is_store_connectivity(&self) -> bool {
        matches!(self, WorkflowError::Store(e) if e.is_connectivity())
    }
}
