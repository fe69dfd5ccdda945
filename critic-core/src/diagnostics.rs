//! Maps free-form syntax-check output to line-anchored diagnostics.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Diagnostic, Severity};

static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)line (\d+)").expect("valid line number pattern"));

/// Converts raw checker messages into diagnostics, preserving order and count.
///
/// The first `line <digits>` occurrence (case-insensitive) anchors a message. Messages
/// without one, or whose number is zero or does not fit a `u32`, fall back to their
/// 1-based position in the input.
pub fn map<S: AsRef<str>>(raw_messages: &[S]) -> Vec<Diagnostic> {
    raw_messages
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let raw = raw.as_ref();
            let fallback = u32::try_from(i + 1).unwrap_or(u32::MAX);
            Diagnostic {
                raw_message: raw.to_owned(),
                line: extract_line(raw).unwrap_or(fallback),
                severity: Severity::Error,
            }
        })
        .collect()
}

fn extract_line(message: &str) -> Option<u32> {
    let caps = LINE_NUMBER.captures(message)?;
    let line: u32 = caps.get(1)?.as_str().parse().ok()?;
    (line > 0).then_some(line)
}
