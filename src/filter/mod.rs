//! Input filtering for untyped request data.
//!
//! Both filters take a raw JSON value and return either the accepted value or
//! the caller's default. Out-of-range input is rejected, never truncated.

use serde_json::Value;

/// Accept a string whose length in characters lies in `[min, max]`.
///
/// Numbers are accepted in their textual form. Anything else, including
/// strings outside the bounds, yields `default`.
pub fn string(value: &Value, default: Option<&str>, min: usize, max: usize) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return default.map(str::to_string),
    };

    let len = text.chars().count();
    if len >= min && len <= max {
        Some(text)
    } else {
        default.map(str::to_string)
    }
}

/// Accept an integer in `[min, max]`.
///
/// Integers and strings holding a base-10 integer are accepted; fractional
/// numbers, booleans and everything else yield `default`.
pub fn number(value: &Value, default: Option<i64>, min: i64, max: i64) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n >= min && n <= max => Some(n),
        _ => default,
    }
}
