// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discount codes: the reasons a failure is marked known or ignorable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label accepted from operators to remove an existing discount.
pub const CLEAR_DISCOUNT: &str = "Clear Discount";

/// Discount reason code as stored in the result store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discount {
    #[default]
    None,
    ExternalTeam,
    CrmDevOps,
    BugFoundByAutomation,
    CodeChange,
    AutomationTesting,
    Accident,
    Jenkins,
    Holiday,
    Deploy,
}

impl Discount {
    pub const ALL: [Discount; 10] = [
        Discount::None,
        Discount::ExternalTeam,
        Discount::CrmDevOps,
        Discount::BugFoundByAutomation,
        Discount::CodeChange,
        Discount::AutomationTesting,
        Discount::Accident,
        Discount::Jenkins,
        Discount::Holiday,
        Discount::Deploy,
    ];

    /// Numeric code persisted in the `discount` column.
    pub fn code(self) -> i32 {
        match self {
            Discount::None => 0,
            Discount::ExternalTeam => 1,
            Discount::CrmDevOps => 2,
            Discount::BugFoundByAutomation => 3,
            Discount::CodeChange => 4,
            Discount::AutomationTesting => 5,
            Discount::Accident => 6,
            Discount::Jenkins => 7,
            Discount::Holiday => 8,
            Discount::Deploy => 9,
        }
    }

    /// Unknown codes read back as `None`.
    pub fn from_code(code: i32) -> Self {
        Self::ALL.into_iter().find(|d| d.code() == code).unwrap_or_default()
    }

    /// Human-readable label; empty for `None`.
    pub fn label(self) -> &'static str {
        match self {
            Discount::None => "",
            Discount::ExternalTeam => "External Team",
            Discount::CrmDevOps => "CRM DevOps",
            Discount::BugFoundByAutomation => "Bug Found By Automation",
            Discount::CodeChange => "Code Change",
            Discount::AutomationTesting => "Automation Testing",
            Discount::Accident => "Accident",
            Discount::Jenkins => "Jenkins",
            Discount::Holiday => "Holiday",
            Discount::Deploy => "Deploy",
        }
    }

    /// Parse an operator-supplied label.
    ///
    /// Accepts the labels above, [`CLEAR_DISCOUNT`], or a bare numeric code.
    /// Anything else maps to `None`.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input == CLEAR_DISCOUNT {
            return Discount::None;
        }
        if let Some(d) = Self::ALL.into_iter().find(|d| *d != Discount::None && d.label() == input)
        {
            return d;
        }
        input.parse::<i32>().map(Self::from_code).unwrap_or_default()
    }

    pub fn is_discounted(self) -> bool {
        self != Discount::None
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single-record discount annotation ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountUpdate {
    pub discount: Discount,
    pub reason: String,
}

impl DiscountUpdate {
    /// Build an update from an operator label and free-text reason.
    ///
    /// Clearing a discount always clears the reason.
    pub fn new(label: &str, reason: &str) -> Self {
        let discount = Discount::parse(label);
        let reason = if discount.is_discounted() { reason.to_string() } else { String::new() };
        Self { discount, reason }
    }
}

#[cfg(test)]
#[path = "discount_tests.rs"]
mod tests;
