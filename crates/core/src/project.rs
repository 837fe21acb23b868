// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Naming conventions of test projects.

/// Infer the automation type (`ui` or `api`) of a project from its name.
pub fn automation_type_for_project(project: &str) -> &'static str {
    let name = project.to_lowercase();
    let has = |s: &str| name.contains(s);

    if has("legacy") && !has("tasks") {
        return "ui";
    }
    if has("shopper-drawer") {
        return "ui";
    }
    if has("services") || has("ecomm-events") || has("api-uui-shell") {
        return "api";
    }
    if has("profile-sync") || has("transcript-viewer") || has("ui") || has("wtf") {
        return "ui";
    }
    if has("api") {
        return "api";
    }
    "ui"
}

/// Short display name of a project for status reports.
///
/// `qe-crm-ui-order-history-v2` becomes `Order History`,
/// `qe-crm-api-ivr-dotnet` becomes `Ivr`.
pub fn stats_app_name(project: &str) -> String {
    let mut name = project;
    if project.contains("-ui-") && project != "qe-crm-ui-shell" {
        if let Some((_, rest)) = project.split_once("-ui-") {
            name = rest.strip_suffix("-v2").unwrap_or(rest);
        }
    } else if project.contains("api") {
        if let Some((_, rest)) = project.split_once("-api-") {
            name = rest;
        }
    }

    let name = name.replacen("-dotnet", "", 1);
    name.split('-').map(title_case).collect::<Vec<_>>().join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
