// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External browser adapter: the fallback when a job page cannot be shown.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Errors from browser launches
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },
    #[error("{program} exited with status {code}")]
    Exit { program: String, code: i32 },
}

/// Adapter for opening URLs outside the dashboard
#[async_trait]
pub trait BrowserLauncher: Clone + Send + Sync + 'static {
    /// Open `url` in the operator's default browser.
    async fn open_default(&self, url: &str) -> Result<(), BrowserError>;

    /// Open `url` with a specific browser executable.
    async fn open_with(&self, browser: &Path, url: &str) -> Result<(), BrowserError>;

    /// First installed alternate browser, if any.
    fn locate_alternate(&self) -> Option<PathBuf>;
}

/// Well-known Chrome install locations for the current platform.
pub fn default_alternate_browsers() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if cfg!(windows) {
        paths.push(PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"));
        paths.push(PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"));
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            paths.push(PathBuf::from(local).join(r"Google\Chrome\Application\chrome.exe"));
        }
    } else if cfg!(target_os = "macos") {
        paths.push(PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"));
    } else {
        paths.push(PathBuf::from("/usr/bin/google-chrome"));
        paths.push(PathBuf::from("/usr/bin/google-chrome-stable"));
        paths.push(PathBuf::from("/usr/bin/chromium"));
    }
    paths
}

/// Launches browsers as detached OS processes.
#[derive(Clone, Debug)]
pub struct SystemBrowser {
    alternates: Vec<PathBuf>,
}

impl Default for SystemBrowser {
    fn default() -> Self {
        Self::new(default_alternate_browsers())
    }
}

impl SystemBrowser {
    pub fn new(alternates: Vec<PathBuf>) -> Self {
        Self { alternates }
    }

    fn opener(url: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            // Empty title argument so `start` does not treat the URL as one
            cmd.args(["/C", "start", ""]).arg(url);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

#[async_trait]
impl BrowserLauncher for SystemBrowser {
    async fn open_default(&self, url: &str) -> Result<(), BrowserError> {
        let mut cmd = Self::opener(url);
        let program = format!("{:?}", cmd.as_std().get_program());
        tracing::info!(%url, "opening in default browser");
        let status = cmd
            .status()
            .await
            .map_err(|e| BrowserError::Launch { program: program.clone(), message: e.to_string() })?;
        if !status.success() {
            return Err(BrowserError::Exit { program, code: status.code().unwrap_or(-1) });
        }
        Ok(())
    }

    async fn open_with(&self, browser: &Path, url: &str) -> Result<(), BrowserError> {
        tracing::info!(%url, browser = %browser.display(), "opening in alternate browser");
        // The browser keeps running after the dashboard moves on
        Command::new(browser).arg(url).spawn().map(drop).map_err(|e| BrowserError::Launch {
            program: browser.display().to_string(),
            message: e.to_string(),
        })
    }

    fn locate_alternate(&self) -> Option<PathBuf> {
        self.alternates.iter().find(|p| p.is_file()).cloned()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BrowserError, BrowserLauncher};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded browser launch
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum BrowserCall {
        Default { url: String },
        With { browser: PathBuf, url: String },
    }

    struct FakeBrowserState {
        calls: Vec<BrowserCall>,
        alternate: Option<PathBuf>,
        fail_alternate: bool,
    }

    /// Fake browser launcher for testing
    #[derive(Clone)]
    pub struct FakeBrowser {
        inner: Arc<Mutex<FakeBrowserState>>,
    }

    impl Default for FakeBrowser {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeBrowserState {
                    calls: Vec::new(),
                    alternate: None,
                    fail_alternate: false,
                })),
            }
        }
    }

    impl FakeBrowser {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pretend an alternate browser is installed at `path`.
        pub fn with_alternate(self, path: impl Into<PathBuf>) -> Self {
            self.inner.lock().alternate = Some(path.into());
            self
        }

        /// Make launches of the alternate browser fail.
        pub fn fail_alternate(&self) {
            self.inner.lock().fail_alternate = true;
        }

        pub fn calls(&self) -> Vec<BrowserCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl BrowserLauncher for FakeBrowser {
        async fn open_default(&self, url: &str) -> Result<(), BrowserError> {
            self.inner.lock().calls.push(BrowserCall::Default { url: url.to_string() });
            Ok(())
        }

        async fn open_with(&self, browser: &Path, url: &str) -> Result<(), BrowserError> {
            let mut inner = self.inner.lock();
            inner
                .calls
                .push(BrowserCall::With { browser: browser.to_path_buf(), url: url.to_string() });
            if inner.fail_alternate {
                return Err(BrowserError::Launch {
                    program: browser.display().to_string(),
                    message: "not executable".to_string(),
                });
            }
            Ok(())
        }

        fn locate_alternate(&self) -> Option<PathBuf> {
            self.inner.lock().alternate.clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{BrowserCall, FakeBrowser};

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
