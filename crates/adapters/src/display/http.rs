// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Headless display surface: fetches the page over HTTP and probes the HTML.

use super::{probe_html, DisplayError, DisplaySurface};
use async_trait::async_trait;
use ns_core::PageProbeResult;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const LOAD_TIMEOUT: Duration = Duration::from_secs(15);

struct LoadedPage {
    url: String,
    status: u16,
    body: Result<String, String>,
}

struct PageState {
    open: bool,
    label: String,
    page: Option<LoadedPage>,
}

/// Display surface backed by a plain HTTP fetch.
///
/// The body fetched by [`load`](DisplaySurface::load) is kept and every
/// probe inspects that copy: loading a trigger URL starts a job, so the page
/// is never fetched twice. Any HTTP status renders as a page; only transport
/// failures are load failures.
#[derive(Clone)]
pub struct HttpPageSurface {
    http: reqwest::Client,
    operator: String,
    api_token: String,
    state: Arc<Mutex<PageState>>,
}

impl HttpPageSurface {
    pub fn new(operator: impl Into<String>, api_token: impl Into<String>) -> Result<Self, DisplayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nightly/", env!("CARGO_PKG_VERSION")))
            .timeout(LOAD_TIMEOUT)
            .build()
            .map_err(|e| DisplayError::LoadFailed { url: String::new(), message: e.to_string() })?;
        Ok(Self {
            http,
            operator: operator.into(),
            api_token: api_token.into(),
            state: Arc::new(Mutex::new(PageState {
                open: true,
                label: "Jenkins Job".to_string(),
                page: None,
            })),
        })
    }

    /// Current visible label
    pub fn label(&self) -> String {
        self.state.lock().label.clone()
    }

    /// HTTP status of the last successful load
    pub fn status(&self) -> Option<u16> {
        self.state.lock().page.as_ref().map(|p| p.status)
    }
}

#[async_trait]
impl DisplaySurface for HttpPageSurface {
    async fn load(&self, url: &str) -> Result<(), DisplayError> {
        if !self.is_open() {
            return Err(DisplayError::Closed);
        }
        tracing::debug!(%url, "loading page");
        let response = self
            .http
            .get(url)
            .basic_auth(&self.operator, Some(&self.api_token))
            .send()
            .await
            .map_err(|e| DisplayError::LoadFailed { url: url.to_string(), message: e.to_string() })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string());
        tracing::debug!(%url, status, "page loaded");
        self.state.lock().page = Some(LoadedPage { url: url.to_string(), status, body });
        Ok(())
    }

    async fn probe(&self) -> Result<PageProbeResult, DisplayError> {
        let state = self.state.lock();
        if !state.open {
            return Err(DisplayError::Closed);
        }
        let Some(page) = state.page.as_ref() else {
            return Err(DisplayError::ProbeFailed("no page loaded".to_string()));
        };
        match &page.body {
            Ok(html) => Ok(probe_html(html)),
            Err(e) => {
                Err(DisplayError::ProbeFailed(format!("unreadable body from {}: {}", page.url, e)))
            }
        }
    }

    async fn set_label(&self, text: &str) {
        let mut state = self.state.lock();
        if state.open {
            tracing::info!(label = %text, "display label");
            state.label = text.to_string();
        }
    }

    async fn close(&self) {
        let mut state = self.state.lock();
        if state.open {
            state.open = false;
            state.page = None;
            tracing::debug!("display closed");
        }
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
