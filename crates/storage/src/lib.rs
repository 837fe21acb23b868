// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ns-storage: result store access for the nightly dashboard

mod error;
mod pool;
mod postgres;
mod store;

#[cfg(any(test, feature = "test-support"))]
mod memory;

pub use error::StoreError;
pub use pool::{ConnectionManager, PoolSettings};
pub use postgres::{PgResultStore, MIGRATOR};
pub use store::{ResultStore, COUNTED_FAILURES, FAILED_RESULTS, LOG_COUNT, LOG_NIGHTLY};

#[cfg(any(test, feature = "test-support"))]
pub use memory::{MemoryResultStore, StoredResult};
