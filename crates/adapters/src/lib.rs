// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ns-adapters: CI server, display surface, browser and notification adapters

pub mod browser;
pub mod ci;
pub mod display;
pub mod notify;

pub use browser::{default_alternate_browsers, BrowserError, BrowserLauncher, SystemBrowser};
pub use ci::{
    Artifact, BuildAction, BuildDescriptor, BuildParameter, CiError, CiServer, JenkinsClient,
    JobDescriptor, NestedBuild, SubBuild,
};
pub use display::{probe_html, DisplayError, DisplaySurface, HttpPageSurface};
pub use notify::{DesktopNotifier, LogNotifier, Notice, NoticeLevel, NotifyError, OperatorNotifier};

#[cfg(any(test, feature = "test-support"))]
pub use browser::{BrowserCall, FakeBrowser};
#[cfg(any(test, feature = "test-support"))]
pub use ci::{CiCall, FakeCiServer};
#[cfg(any(test, feature = "test-support"))]
pub use display::{DisplayCall, FakeDisplaySurface};
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
