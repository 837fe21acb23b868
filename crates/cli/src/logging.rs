// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log subscriber setup: stderr always, a daily file when configured.

use crate::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for the number of `--verbose` flags
pub fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Filter directives: NIGHTLY_LOG > RUST_LOG > the verbosity default.
pub fn directives(verbose: u8) -> String {
    env::log_filter().unwrap_or_else(|| default_directives(verbose).to_string())
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit so buffered file lines flush.
pub fn init(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(directives(verbose))
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let mut file_error = None;
    let (file_layer, guard) = match log_dir.map(daily_appender) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        Some(Err(e)) => {
            file_error = Some(e);
            (None, None)
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!(dir = ?log_dir, error = %e, "file logging disabled");
    }
    guard
}

fn daily_appender(dir: &Path) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("nightly")
        .filename_suffix("log")
        .build(dir)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
