// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn table_aligns_columns() {
    std::env::set_var("NO_COLOR", "1");
    let rows = vec![
        vec!["1".to_string(), "qe-crm-ui-tasks-v2".to_string(), "opensTask".to_string()],
        vec!["12".to_string(), "qe-crm-api".to_string(), "routes".to_string()],
    ];

    let text = table(&["ID", "PROJECT", "TEST"], &rows);

    assert_eq!(
        text,
        "ID  PROJECT             TEST\n\
         1   qe-crm-ui-tasks-v2  opensTask\n\
         12  qe-crm-api          routes\n"
    );
}

#[test]
#[serial]
fn table_without_rows_is_just_the_header() {
    std::env::set_var("NO_COLOR", "1");
    assert_eq!(table(&["ID", "TEST"], &[]), "ID  TEST\n");
}

#[yare::parameterized(
    short     = { "Element not found", 40, "Element not found" },
    exact     = { "abcdef", 6, "abcdef" },
    cut       = { "Timeout waiting for grid node", 10, "Timeout..." },
    multiline = { "line one\nline two", 40, "line one line two" },
)]
fn truncation(text: &str, max: usize, expected: &str) {
    assert_eq!(truncate(text, max), expected);
}

#[test]
fn emit_json_serializes() {
    let result = emit(OutputFormat::Json, &vec!["a", "b"], |_| unreachable!());
    assert!(result.is_ok());
}

#[test]
fn emit_text_renders() {
    let result = emit(OutputFormat::Text, &3, |n| format!("{} tests", n));
    assert!(result.is_ok());
}
