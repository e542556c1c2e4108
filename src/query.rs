//! Query model: collection, ordered conditions, result sections, page.
//!
//! A [`Query`] is immutable once built. Condition order matters: the wire
//! format addresses conditions positionally (`index1/value1`,
//! `index2/value2`, ...), so conditions are kept in insertion order and are
//! never re-sorted. Page navigation produces a new `Query` differing only
//! in its page number.

use crate::error::{IsbndbError, Result};
use crate::transport::Request;
use indexmap::IndexMap;

/// Collection queried when the caller does not name one.
pub const DEFAULT_COLLECTION: &str = "books";

/// Result section requested when the caller does not name any.
pub const DEFAULT_RESULTS: &str = "details";

/// An immutable description of one search against the service.
///
/// Built with a consuming builder, in the order the conditions should
/// appear on the wire:
///
/// ```
/// use isbndb::Query;
///
/// let query = Query::new("books")
///     .condition("title", "hello")
///     .condition("author", "medearis");
/// assert_eq!(query.condition_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    collection: String,
    conditions: IndexMap<String, String>,
    results: Vec<String>,
    page: u64,
}

impl Query {
    /// Start a query against the given collection with the default result
    /// section (`details`) and page 1.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Query {
            collection: collection.into(),
            conditions: IndexMap::new(),
            results: vec![DEFAULT_RESULTS.to_string()],
            page: 1,
        }
    }

    /// Start a query against the default collection (`books`).
    #[must_use]
    pub fn books() -> Self {
        Query::new(DEFAULT_COLLECTION)
    }

    /// Append an equality condition. Field and value are trimmed.
    ///
    /// Conditions keep their insertion order; repeating a field updates its
    /// value without changing its position.
    #[must_use]
    pub fn condition(mut self, field: &str, value: &str) -> Self {
        self.conditions
            .insert(field.trim().to_string(), value.trim().to_string());
        self
    }

    /// Replace the requested result sections.
    #[must_use]
    pub fn results<I, S>(mut self, results: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results = results.into_iter().map(Into::into).collect();
        self
    }

    /// Set the requested page (1-based).
    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// A copy of this query pointed at a different page.
    #[must_use]
    pub fn with_page(&self, page: u64) -> Self {
        let mut copy = self.clone();
        copy.page = page;
        copy
    }

    /// The collection name this query targets.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The 1-based page this query requests.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.page
    }

    /// The requested result sections.
    #[must_use]
    pub fn result_sections(&self) -> &[String] {
        &self.results
    }

    /// The conditions in wire order.
    pub fn condition_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of conditions.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Fail fast if the query has no conditions.
    ///
    /// # Errors
    ///
    /// Returns [`IsbndbError::InvalidQuery`] when no conditions were given.
    pub fn validate(&self) -> Result<()> {
        if self.conditions.is_empty() {
            return Err(IsbndbError::InvalidQuery(
                "no conditions specified; at least one field/value pair is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Render this query as a request descriptor carrying the given access
    /// key. Conditions are assigned positional indices 1..N in their stored
    /// order.
    #[must_use]
    pub fn to_request(&self, access_key: &str) -> Request {
        Request {
            collection: self.collection.clone(),
            access_key: access_key.to_string(),
            results: self.results.clone(),
            conditions: self
                .conditions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            page: self.page,
        }
    }
}
