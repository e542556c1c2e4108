//! Normalization of raw response payloads into canonical record shape.
//!
//! The service returns inconsistently-cased keys (`TitleLong`, `book_id`,
//! `ISBNList`) and string-typed values (`"1664"`, `""`). This module
//! converts a raw payload tree into the canonical form the rest of the
//! crate works against:
//!
//! - keys become lowercase `snake_case` (see [`crate::inflect::underscore`]);
//! - string values are trimmed; blank strings become `Null`;
//! - strings of digits with no leading zero become integers, preserving
//!   leading-zero identifiers (ISBNs, zip-like codes) as strings;
//! - objects and arrays recurse element-wise.
//!
//! Normalization is total, deterministic, and idempotent:
//! `normalize_tree(normalize_tree(x)) == normalize_tree(x)`.
//!
//! A field that is blank in the source and a field that is wholly absent
//! are indistinguishable after normalization: both read back as `Null`.
//! Callers rely on this for nil-safe access (see [`crate::record::Record`]).

use crate::inflect;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    // All digits, first digit non-zero. Leading-zero strings stay strings.
    static ref INTEGER_STRING: Regex = Regex::new(r"^[1-9]\d*$").unwrap();
}

/// Normalize a raw key into its canonical `snake_case` form.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    inflect::underscore(key)
}

/// Normalize a raw string value.
///
/// Trims surrounding whitespace, converts blank strings to `Null`, and
/// converts non-leading-zero digit strings to integers. Everything else is
/// kept as a string.
#[must_use]
pub fn normalize_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if INTEGER_STRING.is_match(trimmed) {
        // Digit strings too long for i64 stay strings.
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    Value::String(trimmed.to_string())
}

/// Recursively normalize a payload tree.
///
/// The payload is always a finite tree, so the recursion terminates.
///
/// # Examples
///
/// ```
/// use isbndb::normalize::normalize_tree;
/// use serde_json::json;
///
/// let raw = json!({"TitleLong": "  A Title  ", "Details": {"PageCount": "32"}});
/// let normalized = normalize_tree(&raw);
/// assert_eq!(normalized, json!({"title_long": "A Title", "details": {"page_count": 32}}));
/// ```
#[must_use]
pub fn normalize_tree(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut normalized = Map::new();
            for (key, val) in map {
                normalized.insert(normalize_key(key), normalize_tree(val));
            }
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_tree).collect()),
        Value::String(s) => normalize_value(s),
        other => other.clone(),
    }
}
