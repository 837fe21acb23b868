// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display surface adapter: somewhere a job page is loaded, inspected and
//! labelled for the operator.

mod http;
mod probe;

pub use http::HttpPageSurface;
pub use probe::probe_html;

use async_trait::async_trait;
use ns_core::PageProbeResult;
use thiserror::Error;

/// Errors from display surface operations
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to load {url}: {message}")]
    LoadFailed { url: String, message: String },
    #[error("page inspection failed: {0}")]
    ProbeFailed(String),
    #[error("display surface is closed")]
    Closed,
}

/// A surface that shows one page to the operator.
///
/// Each instance is owned by a single workflow invocation until closed.
/// The operator may close it at any time, so callers check [`is_open`]
/// before acting on it.
///
/// [`is_open`]: DisplaySurface::is_open
#[async_trait]
pub trait DisplaySurface: Clone + Send + Sync + 'static {
    /// Navigate to `url`. Resolves once the page has finished loading.
    async fn load(&self, url: &str) -> Result<(), DisplayError>;

    /// Inspect the loaded page's rendered content.
    async fn probe(&self) -> Result<PageProbeResult, DisplayError>;

    /// Replace the visible label (window title).
    async fn set_label(&self, text: &str);

    /// Close the surface. Closing twice is a no-op.
    async fn close(&self);

    fn is_open(&self) -> bool;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{DisplayCall, FakeDisplaySurface};
