//! Value parser
//!
//! Extracts a numeric range, a unit, and a context qualifier from the
//! free-text value strings of the JSON release, e.g.
//! `"0.12-0.3 mM {NAD+}"` -> `(0.12, 0.3, "mM", "NAD+")`.
//!
//! Parsing never fails: missing structure is reported as `None`.

use crate::json::payload::{is_truthy, text_of};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Payload fields consulted, in order, when a value has no inline context
pub const CONTEXT_FIELDS: [&str; 4] = ["organism", "substrate", "ligand", "tissue"];

#[allow(clippy::expect_used)]
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("number pattern compiles")
});

#[allow(clippy::expect_used)]
static TRAILING_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<body>.*?)(?:\s*\{(?P<context>[^}]*)\})?$")
        .expect("context pattern compiles")
});

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Structured view of a value string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedValue {
    /// First number in the value
    pub low: Option<f64>,
    /// Last number in the value; equals `low` when there is only one.
    /// Not reordered: a reversed range gives `low > high`.
    pub high: Option<f64>,
    pub unit: Option<String>,
    pub context: Option<String>,
}

impl ParsedValue {
    /// Fill a missing context from the first truthy [`CONTEXT_FIELDS`] entry
    pub fn with_fallback_context(mut self, payload: &Map<String, Value>) -> Self {
        if self.context.is_none() {
            self.context = CONTEXT_FIELDS
                .iter()
                .filter_map(|key| payload.get(*key))
                .find(|value| is_truthy(value))
                .map(text_of);
        }
        self
    }
}

/// Parse a free-text value string
pub fn parse_value(value: &str) -> ParsedValue {
    let value = value.trim();

    let (body, context) = match TRAILING_CONTEXT.captures(value) {
        Some(caps) => (
            caps.name("body").map_or(value, |m| m.as_str()).trim(),
            caps.name("context")
                .map(|m| m.as_str().trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        ),
        None => (value, None),
    };

    let matches: Vec<regex::Match<'_>> = NUMBER.find_iter(body).collect();
    if matches.is_empty() {
        return ParsedValue {
            context,
            ..ParsedValue::default()
        };
    }

    let numbers: Vec<f64> = matches
        .iter()
        .filter_map(|m| parse_number(body, m))
        .collect();

    let stripped = NUMBER.replace_all(body, "").replace('-', " ");
    let unit = WHITESPACE.replace_all(&stripped, " ").trim().to_string();

    ParsedValue {
        low: numbers.first().copied(),
        high: numbers.last().copied(),
        unit: (!unit.is_empty()).then_some(unit),
        context,
    }
}

/// Parse one numeric match. A sign glued to a preceding digit is a range
/// separator (`1.5-2.0`), not part of the number.
fn parse_number(body: &str, m: &regex::Match<'_>) -> Option<f64> {
    let text = m.as_str();
    let follows_digit = body[..m.start()]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '.');

    let text = if follows_digit && text.starts_with(['-', '+']) {
        &text[1..]
    } else {
        text
    };

    text.parse::<f64>().ok().filter(|n| n.is_finite())
}
