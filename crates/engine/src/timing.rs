// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delays and bounds of the trigger workflow

use std::time::Duration;

/// Fixed waits and attempt bounds used by [`crate::Workflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTiming {
    /// Wait before each retry iteration of a job start
    pub trigger_delay: Duration,
    /// Retry iterations after a start that was not `201 Created`
    pub max_resends: u32,
    /// Wait before the first running-job check
    pub poll_settle: Duration,
    /// Wait between running-job checks
    pub poll_interval: Duration,
    /// Checks after the first one
    pub poll_extra_attempts: u32,
    /// How long a load error stays visible before the fallback
    pub error_linger: Duration,
    /// First readiness probe delay; doubles on each empty probe
    pub ready_initial: Duration,
    /// Total readiness budget after load
    pub ready_max: Duration,
}

impl Default for WorkflowTiming {
    fn default() -> Self {
        Self {
            trigger_delay: Duration::from_secs(10),
            max_resends: 5,
            poll_settle: Duration::from_secs(10),
            poll_interval: Duration::from_millis(1500),
            poll_extra_attempts: 3,
            error_linger: Duration::from_secs(2),
            ready_initial: Duration::from_millis(250),
            ready_max: Duration::from_secs(2),
        }
    }
}

impl WorkflowTiming {
    /// Probe offsets from load completion: doubling from `ready_initial`,
    /// capped so the last probe lands exactly at `ready_max`.
    pub fn readiness_schedule(&self) -> Vec<Duration> {
        let mut schedule = Vec::new();
        let mut elapsed = Duration::ZERO;
        let mut step = self.ready_initial.max(Duration::from_millis(1));
        while elapsed < self.ready_max {
            let remaining = self.ready_max - elapsed;
            elapsed += step.min(remaining);
            schedule.push(elapsed);
            step *= 2;
        }
        if schedule.is_empty() {
            schedule.push(Duration::ZERO);
        }
        schedule
    }
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
