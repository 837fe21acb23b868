// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content sniffing for freshly loaded job pages.

use ns_core::PageProbeResult;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text commonly carries an error message, in priority order
const ERROR_SELECTORS: &[&str] = &[
    "h1",
    "h2",
    ".error",
    ".alert",
    ".alert-danger",
    "[class*=\"error\"]",
    "[class*=\"Error\"]",
    "[id*=\"error\"]",
];

const ERROR_KEYWORDS: &[&str] = &["error", "failed", "exception", "not found"];

/// Elements never rendered as text
const HIDDEN: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Fragments at or above this length are page content, not error messages
const MAX_FRAGMENT_CHARS: usize = 200;

/// Only short pages are sniffed for keywords
const SHORT_PAGE_CHARS: usize = 500;

const KEYWORD_FRAGMENT_CHARS: usize = 100;

/// Inspect an HTML document the way an operator would glance at it.
///
/// `has_text` is true when the body renders any visible text. When it does,
/// the first short non-empty text among [`ERROR_SELECTORS`] becomes the
/// error fragment; failing that, a short page mentioning an error keyword
/// yields its first 100 characters.
pub fn probe_html(html: &str) -> PageProbeResult {
    let document = Html::parse_document(html);
    let body_text = match Selector::parse("body") {
        Ok(selector) => {
            document.select(&selector).next().map(visible_text).unwrap_or_default()
        }
        Err(_) => String::new(),
    };

    if body_text.is_empty() {
        return PageProbeResult::blank();
    }

    let error_text = selector_fragment(&document).or_else(|| keyword_fragment(&body_text));
    PageProbeResult::with_text(error_text)
}

fn selector_fragment(document: &Html) -> Option<String> {
    for raw in ERROR_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = visible_text(element);
            if !text.is_empty() && text.chars().count() < MAX_FRAGMENT_CHARS {
                return Some(text);
            }
        }
    }
    None
}

fn keyword_fragment(body_text: &str) -> Option<String> {
    if body_text.chars().count() >= SHORT_PAGE_CHARS {
        return None;
    }
    let lower = body_text.to_lowercase();
    if !ERROR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }
    let fragment: String = body_text.chars().take(KEYWORD_FRAGMENT_CHARS).collect();
    Some(fragment.trim().to_string())
}

/// Rendered text of an element with whitespace collapsed.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .any(|a| a.value().as_element().is_some_and(|e| HIDDEN.contains(&e.name())));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
