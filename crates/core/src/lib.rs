// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ns-core: domain types for the nightly test-results dashboard

pub mod clock;
pub mod dates;
pub mod discount;
pub mod filter;
pub mod project;
pub mod record;
pub mod status;
pub mod trigger;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use dates::{default_run_date, recent_discount_date, selected_to_utc_date, RunWindow};
pub use discount::{Discount, DiscountUpdate, CLEAR_DISCOUNT};
pub use filter::{DiscountState, FailedTestFilter, FailureCounts};
pub use project::{automation_type_for_project, stats_app_name};
pub use record::{
    is_prod_env, is_test_env, CountActual, CountBaseline, DiscountedTest, FailedTest, FailureRow,
    RunTotals, TestDetails, NO_OWNER,
};
pub use status::{JobStatusSnapshot, PageProbeResult};
pub use trigger::{encode_component, test_list_param, JobTriggerRequest, RequestError, ANY};
