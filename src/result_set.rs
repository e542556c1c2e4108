//! Paginated, ordered view over one page of decoded results.
//!
//! A [`ResultSet`] owns the records of a single response page plus the
//! query that produced it. Page navigation is stateless: a set for page N
//! holds no reference to its neighbors, and every navigation call issues a
//! fresh request through the client (including its access-key rotation),
//! constructing a brand-new `ResultSet`.

use crate::client::Client;
use crate::error::{IsbndbError, Result};
use crate::inflect;
use crate::query::Query;
use crate::record::Record;
use crate::transport::Transport;
use serde_json::Value;
use std::cell::OnceCell;
use std::fmt;
use std::ops::Index;

/// One page of records decoded from a response payload.
///
/// ```ignore
/// use isbndb::{AccessKeySet, Client, HttpTransport};
///
/// let mut client = Client::new(HttpTransport::new(), AccessKeySet::new(["ABC123"]));
/// let page = client.find("books", [("title", "hello")])?;
/// for record in &page {
///     println!("{:?}", record.get_str("title"));
/// }
/// if let Some(next) = page.next_page(&mut client)? {
///     println!("page 2 has {} records", next.size());
/// }
/// # Ok::<(), isbndb::IsbndbError>(())
/// ```
#[derive(Debug)]
pub struct ResultSet {
    query: Query,
    records: Vec<Record>,
    total_results: u64,
    page_size: u64,
    total_pages: OnceCell<u64>,
}

impl ResultSet {
    /// Decode a response payload fetched for the given query.
    ///
    /// Detects error payloads, locates the `<Collection>List` /
    /// `<Collection>Data` nodes for the query's collection, normalizes each
    /// raw record, and reads the pagination attributes.
    ///
    /// # Errors
    ///
    /// - [`IsbndbError::Authorization`] if the payload carries an
    ///   `ErrorMessage` node (the service answers identically for an
    ///   overloaded key and an invalid one).
    /// - [`IsbndbError::MalformedResponse`] if the envelope or list node is
    ///   missing entirely.
    pub fn from_payload(query: Query, payload: &Value) -> Result<ResultSet> {
        let envelope = payload.get("ISBNdb").ok_or_else(|| {
            IsbndbError::MalformedResponse("missing ISBNdb envelope".to_string())
        })?;

        if let Some(error) = envelope.get("ErrorMessage") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(IsbndbError::Authorization(message));
        }

        let name = inflect::envelope_name(query.collection());
        let list_key = format!("{name}List");
        let list = envelope.get(&list_key).ok_or_else(|| {
            IsbndbError::MalformedResponse(format!(
                "missing {list_key} node for collection '{}'",
                query.collection()
            ))
        })?;

        // A one-match response (e.g. an ISBN exact hit) arrives as a single
        // object instead of an array.
        let data_key = format!("{name}Data");
        let records = match list.get(&data_key) {
            Some(Value::Array(items)) => items.iter().map(Record::from_raw).collect(),
            Some(single @ Value::Object(_)) => vec![Record::from_raw(single)],
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(IsbndbError::MalformedResponse(format!(
                    "{data_key} is neither a record nor a list: {other}"
                )))
            }
        };

        Ok(ResultSet {
            query,
            records,
            total_results: read_count(list, "total_results"),
            page_size: read_count(list, "page_size"),
            total_pages: OnceCell::new(),
        })
    }

    /// Number of records on this page.
    #[must_use]
    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// `true` if this page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records of this page, in response order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Iterate over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The query that produced this page.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The 1-based page number of this set.
    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.query.page_number()
    }

    /// Total matching records across all pages, as reported by the service.
    #[must_use]
    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Records per page, as reported by the service.
    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Total number of pages: `ceil(total_results / page_size)`.
    ///
    /// Computed on first use and cached. Zero when the service reported no
    /// pagination metadata.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        *self.total_pages.get_or_init(|| {
            if self.page_size == 0 {
                0
            } else {
                (self.total_results + self.page_size - 1) / self.page_size
            }
        })
    }

    /// Fetch an arbitrary page of this result set.
    ///
    /// Returns `Ok(None)` for any page outside `1..=total_pages()`; a valid
    /// page issues a new request through the client, access-key rotation
    /// included, and decodes a brand-new `ResultSet`.
    ///
    /// # Errors
    ///
    /// Propagates any error from dispatching the new request.
    pub fn go_to_page<T: Transport>(
        &self,
        client: &mut Client<T>,
        page: i64,
    ) -> Result<Option<ResultSet>> {
        let Ok(page) = u64::try_from(page) else {
            return Ok(None);
        };
        if page < 1 || page > self.total_pages() {
            return Ok(None);
        }
        client.dispatch(self.query.with_page(page)).map(Some)
    }

    /// Fetch the page after this one, or `Ok(None)` at the last page.
    ///
    /// # Errors
    ///
    /// Propagates any error from dispatching the new request.
    pub fn next_page<T: Transport>(&self, client: &mut Client<T>) -> Result<Option<ResultSet>> {
        let current = i64::try_from(self.current_page()).unwrap_or(i64::MAX);
        self.go_to_page(client, current.saturating_add(1))
    }

    /// Fetch the page before this one, or `Ok(None)` at the first page.
    ///
    /// # Errors
    ///
    /// Propagates any error from dispatching the new request.
    pub fn prev_page<T: Transport>(&self, client: &mut Client<T>) -> Result<Option<ResultSet>> {
        let current = i64::try_from(self.current_page()).unwrap_or(i64::MAX);
        self.go_to_page(client, current.saturating_sub(1))
    }
}

// Two pages are equal iff their record sequences are equal (order-sensitive;
// equal size follows).
impl PartialEq for ResultSet {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for ResultSet {}

impl Index<usize> for ResultSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ResultSet<{}> page {} ({} records)",
            self.query.collection(),
            self.current_page(),
            self.records.len()
        )
    }
}

/// Pagination attributes arrive as strings (`"1664"`); accept either a
/// string or an already-numeric value, defaulting to zero.
fn read_count(list: &Value, key: &str) -> u64 {
    match list.get(key) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}
