use chrono::{DateTime, Local};
use std::fmt::Write;

/// Date pattern used when a vault does not configure one.
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DD";

/// Obsidian (Moment.js) date tokens and their strftime equivalents.
///
/// Longer tokens are listed before their prefixes; [`translate`] relies on
/// this order to match the longest token at each position.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("ww", "%U"),
    ("D", "%-d"),
    ("w", "%W"),
];

/// Translates an Obsidian date pattern into a chrono format string.
///
/// The pattern is read left to right in a single pass; at each position the
/// longest matching token is replaced, so `YYYY` never turns into two `YY`.
/// Everything else is copied through, with `%` escaped.
pub fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        for (token, strftime) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(strftime);
                rest = tail;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }

    out
}

/// Formats `now` with an Obsidian date pattern.
pub fn format_date(pattern: &str, now: &DateTime<Local>) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(&translate(pattern))).is_err() {
        tracing::warn!("unusable date format {pattern:?}, falling back to {DEFAULT_FORMAT}");
        out = now.format("%Y-%m-%d").to_string();
    }
    out
}
