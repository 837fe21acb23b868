// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status and count report text

use ns_core::{
    automation_type_for_project, is_prod_env, is_test_env, stats_app_name, CountActual,
    CountBaseline, FailureRow, RunTotals, NO_OWNER,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Pass rate as a rounded percentage; 100 when nothing ran.
pub fn pass_rate(total: i64, failed: i64) -> i64 {
    if total > 0 {
        ((total - failed) as f64 / total as f64 * 100.0).round() as i64
    } else {
        100
    }
}

/// Pass rates per environment class and automation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Percentages {
    pub test_ui: i64,
    pub test_api: i64,
    pub prod_ui: i64,
    pub prod_api: i64,
}

impl Percentages {
    pub fn from_totals(totals: &RunTotals) -> Self {
        Self {
            test_ui: pass_rate(totals.ui_test, totals.ui_test_failed),
            test_api: pass_rate(totals.api_test, totals.api_test_failed),
            prod_ui: pass_rate(totals.ui_prod, totals.ui_prod_failed),
            prod_api: pass_rate(totals.api_prod, totals.api_prod_failed),
        }
    }

    /// `TEST UI PROD API 90% TEST API 95% PROD UI 100%`: equal rates share one
    /// entry, lowest first.
    pub fn headline(&self) -> String {
        let labelled = [
            ("TEST UI", self.test_ui),
            ("TEST API", self.test_api),
            ("PROD UI", self.prod_ui),
            ("PROD API", self.prod_api),
        ];
        let mut values: Vec<i64> = labelled.iter().map(|(_, v)| *v).collect();
        values.sort_unstable();
        values.dedup();

        values
            .iter()
            .map(|value| {
                let labels: Vec<&str> =
                    labelled.iter().filter(|(_, v)| v == value).map(|(l, _)| *l).collect();
                format!("{} {}%", labels.join(" "), value)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Failure counts of one project in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub project: String,
    pub automation_type: &'static str,
    pub test_count: usize,
    pub prod_count: usize,
    /// Distinct reasons in first-seen order
    pub discount_reasons: Vec<String>,
    pub owner: String,
}

impl ProjectStats {
    /// First letter of the owner, or `N/A`.
    pub fn owner_initial(&self) -> String {
        match self.owner.chars().next() {
            Some(c) if self.owner != NO_OWNER => c.to_string(),
            _ => NO_OWNER.to_string(),
        }
    }

    /// One report line, or `None` when no failure is in a counted env.
    pub fn line(&self, base_url: &str) -> Option<String> {
        let link = format!("[{}]({}/job/{})", stats_app_name(&self.project), base_url, self.project);
        let owner = self.owner_initial();
        let mut line = match (self.prod_count, self.test_count) {
            (0, 0) => return None,
            (prod, 0) => format!("(PROD) {} ({}) ({})", link, prod, owner),
            (0, test) => format!("(TEST) {} ({}) ({})", link, test, owner),
            (prod, test) => format!("(PROD/TEST) {} ({}/{}) ({})", link, prod, test, owner),
        };
        if !self.discount_reasons.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.discount_reasons.join(", "));
        }
        Some(line)
    }
}

/// Group failure rows by project. The owner comes from the first row seen.
pub fn group_failures(rows: &[FailureRow]) -> Vec<ProjectStats> {
    let mut grouped: BTreeMap<&str, ProjectStats> = BTreeMap::new();
    for row in rows {
        let stats = grouped.entry(row.project.as_str()).or_insert_with(|| ProjectStats {
            project: row.project.clone(),
            automation_type: automation_type_for_project(&row.project),
            test_count: 0,
            prod_count: 0,
            discount_reasons: Vec::new(),
            owner: if row.owner.is_empty() { NO_OWNER.to_string() } else { row.owner.clone() },
        });

        if is_test_env(&row.env) {
            stats.test_count += 1;
        } else if is_prod_env(&row.env) {
            stats.prod_count += 1;
        }
        if !row.discount_reason.is_empty() && !stats.discount_reasons.contains(&row.discount_reason) {
            stats.discount_reasons.push(row.discount_reason.clone());
        }
    }
    grouped.into_values().collect()
}

/// The nightly status message.
pub fn status_text(
    percentages: &Percentages,
    failing: &[ProjectStats],
    discounted: &[ProjectStats],
    base_url: &str,
) -> String {
    let mut out = format!("*{}*\n\n", percentages.headline());
    push_sections(&mut out, failing, base_url);
    if !discounted.is_empty() {
        out.push_str("\n*Discounted:*\n");
        push_sections(&mut out, discounted, base_url);
    }
    out
}

fn push_sections(out: &mut String, stats: &[ProjectStats], base_url: &str) {
    let mut ui = Vec::new();
    let mut api = Vec::new();
    for stat in stats {
        let Some(line) = stat.line(base_url) else { continue };
        if stat.automation_type == "ui" {
            ui.push(line);
        } else {
            api.push(line);
        }
    }
    ui.sort();
    api.sort();

    for (title, lines) in [("UI", ui), ("API", api)] {
        if !lines.is_empty() {
            out.push_str(&format!("*{}*\n{}\n", title, lines.join("\n")));
        }
    }
}

/// One project/env whose executed count differs from its baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountMismatch {
    pub env: String,
    pub project: String,
    /// `None` when the project/env has no baseline
    pub expected: Option<i64>,
    pub actual: i64,
}

impl fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}\nExpected: ", self.env, self.project)?;
        match self.expected {
            Some(expected) => write!(f, "{}", expected)?,
            None => f.write_str("NONE")?,
        }
        writeln!(f, " Actual: {}", self.actual)
    }
}

/// Baselines compared with what actually ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountDrift {
    pub under: Vec<CountMismatch>,
    pub over: Vec<CountMismatch>,
}

impl CountDrift {
    /// Compare baselines with actual counts. Zero baselines are ignored.
    pub fn compare(baselines: &[CountBaseline], actuals: &[CountActual]) -> Self {
        let mut drift = Self::default();
        let actual_of = |project: &str, env: &str| {
            actuals.iter().find(|a| a.project == project && a.env == env).map(|a| a.actual)
        };

        for baseline in baselines.iter().filter(|b| b.expected != 0) {
            let actual = actual_of(&baseline.project, &baseline.env);
            let mismatch = CountMismatch {
                env: baseline.env.clone(),
                project: baseline.project.clone(),
                expected: Some(baseline.expected),
                actual: actual.unwrap_or(0),
            };
            match actual {
                None => drift.under.push(mismatch),
                Some(a) if a == baseline.expected => {}
                Some(a) if baseline.expected < a => drift.over.push(mismatch),
                Some(_) => drift.under.push(mismatch),
            }
        }

        for actual in actuals {
            let known = baselines.iter().any(|b| b.project == actual.project && b.env == actual.env);
            if !known {
                drift.over.push(CountMismatch {
                    env: actual.env.clone(),
                    project: actual.project.clone(),
                    expected: None,
                    actual: actual.actual,
                });
            }
        }
        drift
    }

    pub fn is_accurate(&self) -> bool {
        self.under.is_empty() && self.over.is_empty()
    }

    pub fn text(&self) -> String {
        if self.is_accurate() {
            return "All counts are accurate".to_string();
        }
        let mut out = String::new();
        for (title, entries) in [("CURRENT UNDER COUNTS", &self.under), ("CURRENT OVER COUNTS", &self.over)] {
            if !entries.is_empty() {
                out.push_str(title);
                out.push('\n');
                for entry in entries {
                    out.push_str(&entry.to_string());
                }
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
