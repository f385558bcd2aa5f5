//! # Scalar Coercions
//!
//! Lenient conversions applied by the built-in type handlers when a node is
//! not in strict mode. Each coercion is total: a value it cannot convert is
//! either mapped to NaN (numeric) or returned unchanged, so the type check
//! that follows rejects it and the original input survives in the output.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::value::{iso8601, Value};

/// Numeric coercion.
///
/// - numbers pass through;
/// - strings are trimmed; empty means 0; decimal, exponent and `0x`/`0o`/`0b`
///   forms are accepted; anything else is NaN;
/// - booleans map to 1/0;
/// - dates map to epoch milliseconds;
/// - null maps to 0;
/// - everything else is NaN.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::String(s) => parse_number(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Date(d) => d.timestamp_millis() as f64,
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts "inf" and "nan" spellings that are not numeric literals.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a number for string coercion: integral values without a
/// fraction, everything else in shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// String coercion for scalars. Arrays, objects, functions and null are
/// returned unchanged.
pub fn to_string(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(format_number(n)),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Date(d) => Value::String(iso8601(&d)),
        other => other,
    }
}

/// Boolean coercion: `true`/`"true"` and `false`/`"false"` normalize to a
/// boolean, anything else passes through.
pub fn to_boolean(value: Value) -> Value {
    match value {
        Value::String(ref s) if s == "true" => Value::Bool(true),
        Value::String(ref s) if s == "false" => Value::Bool(false),
        other => other,
    }
}

/// Date coercion. Strings are read as RFC 3339, as a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` in UTC, or as a bare `YYYY-MM-DD` at
/// midnight UTC. Finite numbers are epoch milliseconds. Anything else is
/// returned unchanged.
pub fn to_date(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_date(&s) {
            Some(date) => Value::Date(date),
            None => Value::String(s),
        },
        Value::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(n as i64)
            .map(Value::Date)
            .unwrap_or(Value::Number(n)),
        other => other,
    }
}

/// Parse a date string in one of the accepted layouts.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Position of a value on the number line, used by ordering checks.
///
/// When the value being checked is a date, a bound given as a string is
/// read as a date so `min: "2024-01-01"` works against date fields.
pub fn ordinal(value: &Value, relative_to: &Value) -> f64 {
    match (value, relative_to) {
        (Value::String(s), Value::Date(_)) => parse_date(s)
            .map(|d| d.timestamp_millis() as f64)
            .unwrap_or_else(|| to_number(value)),
        _ => to_number(value),
    }
}
