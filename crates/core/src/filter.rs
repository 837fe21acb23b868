// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side filtering of loaded failures.

use crate::record::{FailedTest, NO_OWNER};
use crate::trigger::ANY;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which failures to keep by discount state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountState {
    #[default]
    All,
    Discounted,
    NotDiscounted,
}

/// Filter over a loaded set of failures. `None` fields (or `--`) match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTestFilter {
    pub env: Option<String>,
    pub project: Option<String>,
    pub automation_type: Option<String>,
    pub browser: Option<String>,
    pub owner: Option<String>,
    pub discounted: DiscountState,
    /// Keep only records created on this UTC date.
    pub utc_date: Option<NaiveDate>,
}

impl FailedTestFilter {
    pub fn matches(&self, test: &FailedTest) -> bool {
        if let Some(date) = self.utc_date {
            if test.created_at.date() != date {
                return false;
            }
        }
        if !selected(&self.env, |env| test.env == env) {
            return false;
        }
        if !selected(&self.project, |project| test.project == project) {
            return false;
        }
        if !selected(&self.automation_type, |t| test.automation_type.eq_ignore_ascii_case(t)) {
            return false;
        }
        if !selected(&self.browser, |browser| test.browser == browser) {
            return false;
        }
        if !selected(&self.owner, |owner| test.owner == owner) {
            return false;
        }
        match self.discounted {
            DiscountState::All => true,
            DiscountState::Discounted => test.discount.is_discounted(),
            DiscountState::NotDiscounted => !test.discount.is_discounted(),
        }
    }

    /// Keep matching failures in their original order.
    pub fn apply<'a>(&self, tests: &'a [FailedTest]) -> Vec<&'a FailedTest> {
        tests.iter().filter(|t| self.matches(t)).collect()
    }
}

fn selected(value: &Option<String>, check: impl FnOnce(&str) -> bool) -> bool {
    match value.as_deref() {
        None | Some(ANY) => true,
        Some(v) => check(v),
    }
}

/// Summary counts shown alongside a filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    pub displayed: usize,
    pub unowned: usize,
}

impl FailureCounts {
    pub fn of(tests: &[&FailedTest]) -> Self {
        Self {
            displayed: tests.len(),
            unowned: tests.iter().filter(|t| t.owner == NO_OWNER).count(),
        }
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
