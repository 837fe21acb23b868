// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DisplayError, DisplaySurface};
use async_trait::async_trait;
use ns_core::PageProbeResult;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::time::Instant;

/// Recorded display call
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Load { url: String },
    Probe { at: Instant },
    SetLabel { text: String },
    Close,
}

struct FakeDisplayState {
    calls: Vec<DisplayCall>,
    open: bool,
    label: String,
    load_error: Option<String>,
    probes: VecDeque<Result<PageProbeResult, String>>,
    default_probe: PageProbeResult,
    close_after_probes: Option<usize>,
}

/// Fake display surface for testing
///
/// Probe results are consumed in order; once exhausted the default (a page
/// with text) is returned.
#[derive(Clone)]
pub struct FakeDisplaySurface {
    inner: Arc<Mutex<FakeDisplayState>>,
}

impl Default for FakeDisplaySurface {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeDisplayState {
                calls: Vec::new(),
                open: true,
                label: String::new(),
                load_error: None,
                probes: VecDeque::new(),
                default_probe: PageProbeResult::with_text(None),
                close_after_probes: None,
            })),
        }
    }
}

impl FakeDisplaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next load fail with `message`.
    pub fn fail_load(&self, message: &str) {
        self.inner.lock().load_error = Some(message.to_string());
    }

    pub fn push_probe(&self, result: PageProbeResult) {
        self.inner.lock().probes.push_back(Ok(result));
    }

    pub fn push_probe_failure(&self, message: &str) {
        self.inner.lock().probes.push_back(Err(message.to_string()));
    }

    pub fn set_default_probe(&self, result: PageProbeResult) {
        self.inner.lock().default_probe = result;
    }

    /// Simulate the operator closing the surface after `count` probes.
    pub fn close_after_probes(&self, count: usize) {
        self.inner.lock().close_after_probes = Some(count);
    }

    /// Simulate the operator closing the surface.
    pub fn close_externally(&self) {
        self.inner.lock().open = false;
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.inner.lock().calls.clone()
    }

    pub fn label(&self) -> String {
        self.inner.lock().label.clone()
    }

    pub fn probe_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::Probe { at } => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == DisplayCall::Close).count()
    }
}

#[async_trait]
impl DisplaySurface for FakeDisplaySurface {
    async fn load(&self, url: &str) -> Result<(), DisplayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DisplayCall::Load { url: url.to_string() });
        match inner.load_error.take() {
            Some(message) => Err(DisplayError::LoadFailed { url: url.to_string(), message }),
            None => Ok(()),
        }
    }

    async fn probe(&self) -> Result<PageProbeResult, DisplayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DisplayCall::Probe { at: Instant::now() });
        if let Some(remaining) = inner.close_after_probes.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                inner.open = false;
            }
        }
        let default = inner.default_probe.clone();
        match inner.probes.pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(DisplayError::ProbeFailed(message)),
            None => Ok(default),
        }
    }

    async fn set_label(&self, text: &str) {
        let mut inner = self.inner.lock();
        inner.calls.push(DisplayCall::SetLabel { text: text.to_string() });
        inner.label = text.to_string();
    }

    async fn close(&self) {
        let mut inner = self.inner.lock();
        inner.calls.push(DisplayCall::Close);
        inner.open = false;
    }

    fn is_open(&self) -> bool {
        self.inner.lock().open
    }
}
