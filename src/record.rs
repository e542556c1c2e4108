//! Nil-safe access to a single normalized record.
//!
//! The shape of a record varies per collection and per API version, so
//! [`Record`] does not model fields statically. It wraps the normalized
//! mapping produced by [`crate::normalize`] and guarantees that reading any
//! field, present or not, succeeds: absent fields read back as
//! [`Value::Null`], never as an error. Callers check for null instead of
//! checking for existence first.

use crate::normalize::{self, normalize_key};
use serde_json::{Map, Value};
use std::fmt;

/// One normalized record from a result page.
///
/// Field lookup is keyed by the canonical `snake_case` name, and the lookup
/// itself is casing-insensitive: `get("TitleLong")` and `get("title_long")`
/// read the same field.
///
/// # Examples
///
/// ```
/// use isbndb::Record;
/// use serde_json::json;
///
/// let record = Record::from_raw(&json!({
///     "book_id": "hello_gorgeous",
///     "TitleLong": "Hello gorgeous: a guide to style",
/// }));
/// assert_eq!(record.get_str("title_long"), Some("Hello gorgeous: a guide to style"));
/// assert!(record.get("no_such_field").is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

static NULL: Value = Value::Null;

impl Record {
    /// Wrap an already-normalized field mapping verbatim.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Record { fields }
    }

    /// Normalize a raw payload subtree and wrap the result.
    ///
    /// Non-object input yields an empty record.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        match normalize::normalize_tree(raw) {
            Value::Object(fields) => Record { fields },
            _ => Record { fields: Map::new() },
        }
    }

    /// Look up a field by name.
    ///
    /// The name is canonicalized before lookup, so any casing accepted by
    /// the normalizer works. Absent fields return [`Value::Null`].
    #[must_use]
    pub fn get(&self, name: &str) -> &Value {
        self.fields.get(&normalize_key(name)).unwrap_or(&NULL)
    }

    /// Look up a field and return it as a string slice, if it is one.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    /// Look up a field and return it as an integer, if it is one.
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).as_i64()
    }

    /// Look up a nested sub-record (e.g. the `details` node of a book).
    ///
    /// Returns `None` if the field is absent or not an object.
    #[must_use]
    pub fn sub_record(&self, name: &str) -> Option<Record> {
        match self.get(name) {
            Value::Object(fields) => Some(Record { fields: fields.clone() }),
            _ => None,
        }
    }

    /// Look up a field holding a sequence of sub-records.
    ///
    /// A single nested object is returned as a one-element list; an absent
    /// or scalar field returns an empty list.
    #[must_use]
    pub fn sub_records(&self, name: &str) -> Vec<Record> {
        match self.get(name) {
            Value::Object(fields) => vec![Record { fields: fields.clone() }],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(fields) => Some(Record { fields: fields.clone() }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// `true` if the named field is absent or normalized to null.
    #[must_use]
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).is_null()
    }

    /// Canonical names of all top-level fields, in stored order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({} fields)", self.fields.len())
    }
}
