//! Result Row Module
//! Wire-level rows and the typed parsing boundary that turns them into `ResultRow`s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row exactly as delivered by the results endpoint.
///
/// Every field stays an untyped JSON value; missing fields read as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResultRow {
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default)]
    pub load: Value,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub response_time_ms: Value,
    #[serde(default)]
    pub redirected: Value,
}

impl RawResultRow {
    /// Build a row from the five text cells of a results CSV line.
    pub fn from_text(
        timestamp: &str,
        load: &str,
        result: &str,
        response_time_ms: &str,
        redirected: &str,
    ) -> Self {
        Self {
            timestamp: Value::String(timestamp.to_string()),
            load: Value::String(load.to_string()),
            result: Value::String(result.to_string()),
            response_time_ms: Value::String(response_time_ms.to_string()),
            redirected: Value::String(redirected.to_string()),
        }
    }
}

/// Outcome label of a simulated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Fail,
    /// Any other label; excluded from the success/fail counts.
    Other(String),
}

impl Outcome {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if s == "success" => Outcome::Success,
            Value::String(s) if s == "fail" => Outcome::Fail,
            other => Outcome::Other(label_text(other)),
        }
    }
}

/// A validated result row.
///
/// `None` in a numeric field is the non-numeric placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub timestamp: String,
    pub load: Option<i64>,
    pub outcome: Outcome,
    pub response_time_ms: Option<i64>,
    pub redirected: bool,
}

impl ResultRow {
    /// Convert a raw row. Never fails: unparsable numbers become placeholders.
    pub fn from_raw(raw: &RawResultRow) -> Self {
        Self {
            timestamp: label_text(&raw.timestamp),
            load: parse_int_value(&raw.load),
            outcome: Outcome::from_value(&raw.result),
            response_time_ms: parse_int_value(&raw.response_time_ms),
            // Only the exact empty string means "not redirected".
            redirected: !matches!(&raw.redirected, Value::String(s) if s.is_empty()),
        }
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_int_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_decimal_prefix(s),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    }
}

/// Parse the leading decimal integer of `text`.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit. Returns `None` when no digit is found or the value overflows.
pub fn parse_decimal_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let digit = i64::from(b - b'0');
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }
    Some(value)
}
