// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator notifications: trigger results, fallbacks and store banners.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the operator.
///
/// `persistent` notices stay visible until dismissed (store connectivity
/// banners); others are transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub persistent: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), message: message.into(), persistent: false }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, ..Self::info(title, message) }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, ..Self::info(title, message) }
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// Adapter for telling the operator what happened
#[async_trait]
pub trait OperatorNotifier: Clone + Send + Sync + 'static {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS the first notification runs an AppleScript bundle lookup that
/// blocks forever without Automation permissions, so the bundle identifier
/// is pre-set at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl OperatorNotifier for DesktopNotifier {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
        // Notification::show() is synchronous on some platforms
        tokio::task::spawn_blocking(move || {
            let mut notification = notify_rust::Notification::new();
            notification.summary(&notice.title).body(&notice.message);
            if notice.persistent {
                notification.timeout(notify_rust::Timeout::Never);
            }
            match notification.show() {
                Ok(_) => tracing::debug!(title = %notice.title, "desktop notification sent"),
                Err(e) => {
                    tracing::warn!(title = %notice.title, error = %e, "desktop notification failed")
                }
            }
        });
        Ok(())
    }
}

/// Notifier that only logs; used when desktop notifications are off.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl OperatorNotifier for LogNotifier {
    async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
        let Notice { level, title, message, persistent } = notice;
        match level {
            NoticeLevel::Info => tracing::info!(%title, persistent, "{}", message),
            NoticeLevel::Warning => tracing::warn!(%title, persistent, "{}", message),
            NoticeLevel::Error => tracing::error!(%title, persistent, "{}", message),
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Notice, NotifyError, OperatorNotifier};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake notifier for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifier {
        notices: Arc<Mutex<Vec<Notice>>>,
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded notices
        pub fn notices(&self) -> Vec<Notice> {
            self.notices.lock().clone()
        }
    }

    #[async_trait]
    impl OperatorNotifier for FakeNotifier {
        async fn notify(&self, notice: Notice) -> Result<(), NotifyError> {
            self.notices.lock().push(notice);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifier;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
