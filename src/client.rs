//! The query engine: builds requests, dispatches them, rotates keys.
//!
//! [`Client`] owns an [`AccessKeySet`] and a [`Transport`]. Each `find`
//! call builds a deterministic request from its conditions and dispatches
//! it. When the service rejects the key in use, the client advances
//! through the key set and re-issues the identical query until one key
//! succeeds or the set is exhausted. The cursor stays wherever the loop ended, so later
//! calls resume from the key that last worked instead of restarting at the
//! front.

use crate::access_key::AccessKeySet;
use crate::error::{IsbndbError, Result};
use crate::finder::FinderCall;
use crate::query::Query;
use crate::result_set::ResultSet;
use crate::transport::{Request, Transport};
use indexmap::IndexMap;
use serde_json::Value;

/// Client for the ISBNdb query API.
///
/// Single-threaded by design: rotation state is instance-owned and every
/// retry loop runs synchronously. Wrap the client in a mutex if several
/// threads must share one instance.
///
/// ```ignore
/// use isbndb::{AccessKeySet, Client, HttpTransport};
///
/// let mut client = Client::new(
///     HttpTransport::new(),
///     AccessKeySet::new(["ABC123", "DEF456"]),
/// );
/// let page = client.find("books", [("title", "amazing")])?;
/// println!("{} of {} results", page.size(), page.total_results());
/// # Ok::<(), isbndb::IsbndbError>(())
/// ```
#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: T,
    access_keys: AccessKeySet,
}

impl<T: Transport> Client<T> {
    /// Create a client from a transport and an ordered set of access keys.
    pub fn new(transport: T, access_keys: AccessKeySet) -> Self {
        Client {
            transport,
            access_keys,
        }
    }

    /// The access-key set, for inspection.
    #[must_use]
    pub fn access_keys(&self) -> &AccessKeySet {
        &self.access_keys
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the key set, for manual rotation management
    /// (`advance`, `use_key`, `remove_key`).
    pub fn access_keys_mut(&mut self) -> &mut AccessKeySet {
        &mut self.access_keys
    }

    /// Search a collection with ordered equality conditions.
    ///
    /// Conditions are assigned positions 1..N in iteration order, which
    /// fixes their `indexN`/`valueN` placement on the wire; they are never
    /// re-sorted.
    ///
    /// # Errors
    ///
    /// - [`IsbndbError::InvalidQuery`] when `conditions` is empty.
    /// - [`IsbndbError::Authorization`] once every key has been rejected.
    /// - [`IsbndbError::MalformedResponse`] / [`IsbndbError::Transport`]
    ///   surfaced unretried from decoding and I/O.
    pub fn find<'a, I>(&mut self, collection: &str, conditions: I) -> Result<ResultSet>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Query::new(collection);
        for (field, value) in conditions {
            query = query.condition(field, value);
        }
        self.find_query(&query)
    }

    /// Run a pre-built [`Query`].
    ///
    /// # Errors
    ///
    /// Same as [`Client::find`].
    pub fn find_query(&mut self, query: &Query) -> Result<ResultSet> {
        query.validate()?;
        self.dispatch(query.clone())
    }

    /// Run a convention-based finder call such as
    /// `find_books_by_title_and_author`, with values paired positionally.
    ///
    /// # Errors
    ///
    /// - [`IsbndbError::UnrecognizedFinder`] when the name does not match
    ///   the finder grammar at all.
    /// - [`IsbndbError::InvalidQuery`] when the argument count does not
    ///   match the named fields.
    /// - Otherwise as [`Client::find`].
    pub fn finder(&mut self, name: &str, args: &[&str]) -> Result<ResultSet> {
        let call = FinderCall::parse(name)
            .ok_or_else(|| IsbndbError::UnrecognizedFinder(name.to_string()))?;
        let query = call.into_query(args)?;
        self.dispatch(query)
    }

    /// Usage counters for the current access key.
    ///
    /// Issues a fixed query against the reserved `keystats` result section.
    /// Note that this call itself counts against the key's quota. The
    /// `access_key` attribute echoed by the service is dropped from the
    /// returned mapping.
    ///
    /// # Errors
    ///
    /// - [`IsbndbError::Authorization`] when no key is available or the
    ///   service rejects the current one (not retried: the stats are
    ///   per-key, so rotating would answer a different question).
    /// - [`IsbndbError::MalformedResponse`] when the envelope is missing.
    pub fn keystats(&mut self) -> Result<IndexMap<String, i64>> {
        let Some(key) = self.access_keys.current() else {
            return Err(IsbndbError::Authorization(
                "no access key available".to_string(),
            ));
        };
        let request = Request {
            collection: "books".to_string(),
            access_key: key.to_string(),
            results: vec!["keystats".to_string()],
            conditions: Vec::new(),
            page: 1,
        };
        let payload = self.transport.execute(&request)?;
        let envelope = payload.get("ISBNdb").ok_or_else(|| {
            IsbndbError::MalformedResponse("missing ISBNdb envelope".to_string())
        })?;
        if envelope.get("ErrorMessage").is_some() {
            return Err(IsbndbError::Authorization(
                "key stats request rejected".to_string(),
            ));
        }

        let mut stats = IndexMap::new();
        if let Some(Value::Object(counters)) = envelope.get("KeyStats") {
            for (name, value) in counters {
                if name == "access_key" {
                    continue;
                }
                let count = match value {
                    Value::String(s) => s.trim().parse().unwrap_or(0),
                    Value::Number(n) => n.as_i64().unwrap_or(0),
                    _ => 0,
                };
                stats.insert(name.clone(), count);
            }
        }
        Ok(stats)
    }

    /// Dispatch a validated query, rotating access keys on rejection.
    ///
    /// Bounded: one attempt per remaining key, terminating when the cursor
    /// passes the end of the set. The cursor is left on the key that
    /// succeeded, or at exhaustion.
    pub(crate) fn dispatch(&mut self, query: Query) -> Result<ResultSet> {
        loop {
            let Some(key) = self.access_keys.current() else {
                return Err(IsbndbError::Authorization(format!(
                    "all {} access key(s) exhausted querying '{}'",
                    self.access_keys.size(),
                    query.collection()
                )));
            };
            let request = query.to_request(key);
            tracing::debug!(
                collection = request.collection.as_str(),
                page = request.page,
                conditions = request.conditions.len(),
                "dispatching query"
            );
            let payload = self.transport.execute(&request)?;
            match ResultSet::from_payload(query.clone(), &payload) {
                Err(err) if err.is_authorization() => {
                    tracing::warn!(
                        key_index = self.access_keys.current_index(),
                        "access key rejected, rotating to the next key"
                    );
                    self.access_keys.advance();
                }
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Scripted transport: serves canned payloads in order and records
    /// every request it sees.
    struct MockTransport {
        responses: RefCell<Vec<Result<Value>>>,
        requests: RefCell<Vec<Request>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<Value>>) -> Self {
            MockTransport {
                responses: RefCell::new(responses),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: &Request) -> Result<Value> {
            self.requests.borrow_mut().push(request.clone());
            let mut responses = self.responses.borrow_mut();
            assert!(!responses.is_empty(), "unexpected request: {request:?}");
            responses.remove(0)
        }
    }

    fn ok_payload() -> Value {
        json!({
            "ISBNdb": {
                "BookList": {
                    "total_results": "1",
                    "page_size": "10",
                    "BookData": {"book_id": "hello", "Title": "Hello"}
                }
            }
        })
    }

    fn error_payload() -> Value {
        json!({"ISBNdb": {"ErrorMessage": "Access key error"}})
    }

    fn client_with(
        responses: Vec<Result<Value>>,
        keys: &[&str],
    ) -> Client<MockTransport> {
        Client::new(
            MockTransport::new(responses),
            AccessKeySet::new(keys.iter().copied()),
        )
    }

    #[test]
    fn test_find_rejects_empty_conditions() {
        let mut client = client_with(vec![], &["ABC123"]);
        let err = client.find("books", []).unwrap_err();
        assert!(matches!(err, IsbndbError::InvalidQuery(_)));
        assert!(client.transport.seen().is_empty());
    }

    #[test]
    fn test_find_places_conditions_in_given_order() {
        let mut client = client_with(vec![Ok(ok_payload())], &["ABC123"]);
        client
            .find("books", [("title", "hello"), ("author", "kemp"), ("isbn", "1")])
            .unwrap();
        let requests = client.transport.seen();
        assert_eq!(
            requests[0].conditions,
            [
                ("title".to_string(), "hello".to_string()),
                ("author".to_string(), "kemp".to_string()),
                ("isbn".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn test_rotation_succeeds_on_kth_key() {
        // First two keys rejected, third succeeds.
        let mut client = client_with(
            vec![Ok(error_payload()), Ok(error_payload()), Ok(ok_payload())],
            &["K1", "K2", "K3"],
        );
        let set = client.find("books", [("title", "hello")]).unwrap();
        assert_eq!(set.size(), 1);
        // The cursor ends on the key that worked.
        assert_eq!(client.access_keys().current_index(), 2);
        assert_eq!(client.access_keys().current(), Some("K3"));
        // Each attempt used the key the cursor pointed at.
        let keys: Vec<String> = client
            .transport
            .seen()
            .into_iter()
            .map(|r| r.access_key)
            .collect();
        assert_eq!(keys, ["K1", "K2", "K3"]);
    }

    #[test]
    fn test_rotation_exhausts_all_keys() {
        let mut client = client_with(
            vec![Ok(error_payload()), Ok(error_payload())],
            &["K1", "K2"],
        );
        let err = client.find("books", [("title", "hello")]).unwrap_err();
        assert!(err.is_authorization());
        assert!(err.to_string().contains("books"));
        // Rotor is exhausted, not wrapped around.
        assert_eq!(client.access_keys().current(), None);
        assert_eq!(client.transport.seen().len(), 2);
    }

    #[test]
    fn test_later_calls_resume_from_current_key() {
        let mut client = client_with(
            vec![Ok(error_payload()), Ok(ok_payload()), Ok(ok_payload())],
            &["K1", "K2"],
        );
        client.find("books", [("title", "a")]).unwrap();
        assert_eq!(client.access_keys().current(), Some("K2"));
        // Second call starts straight at K2.
        client.find("books", [("title", "b")]).unwrap();
        let requests = client.transport.seen();
        assert_eq!(requests[2].access_key, "K2");
    }

    #[test]
    fn test_empty_key_set_fails_without_requests() {
        let mut client = client_with(vec![], &[]);
        let err = client.find("books", [("title", "hello")]).unwrap_err();
        assert!(err.is_authorization());
        assert!(client.transport.seen().is_empty());
    }

    #[test]
    fn test_malformed_response_is_not_retried() {
        let mut client = client_with(
            vec![Ok(json!({"unexpected": true}))],
            &["K1", "K2"],
        );
        let err = client.find("books", [("title", "hello")]).unwrap_err();
        assert!(matches!(err, IsbndbError::MalformedResponse(_)));
        // No rotation happened.
        assert_eq!(client.access_keys().current(), Some("K1"));
        assert_eq!(client.transport.seen().len(), 1);
    }

    #[test]
    fn test_transport_error_is_not_retried() {
        let mut client = client_with(
            vec![Err(IsbndbError::Transport("connection refused".to_string()))],
            &["K1", "K2"],
        );
        let err = client.find("books", [("title", "hello")]).unwrap_err();
        assert!(matches!(err, IsbndbError::Transport(_)));
        assert_eq!(client.access_keys().current(), Some("K1"));
    }

    #[test]
    fn test_finder_dispatches_parsed_call() {
        let mut client = client_with(vec![Ok(ok_payload())], &["ABC123"]);
        client.finder("find_book_by_isbn", &["1590543947"]).unwrap();
        let requests = client.transport.seen();
        assert_eq!(requests[0].collection, "books");
        assert_eq!(
            requests[0].conditions,
            [("isbn".to_string(), "1590543947".to_string())]
        );
    }

    #[test]
    fn test_finder_unrecognized_name() {
        let mut client = client_with(vec![], &["ABC123"]);
        let err = client.finder("destroy_all_books", &[]).unwrap_err();
        assert!(matches!(err, IsbndbError::UnrecognizedFinder(_)));
    }

    #[test]
    fn test_finder_arity_mismatch() {
        let mut client = client_with(vec![], &["ABC123"]);
        let err = client
            .finder("find_books_by_title_and_author", &["only-one"])
            .unwrap_err();
        assert!(matches!(err, IsbndbError::InvalidQuery(_)));
        assert!(client.transport.seen().is_empty());
    }

    #[test]
    fn test_keystats_parses_counters_and_drops_access_key() {
        let payload = json!({
            "ISBNdb": {
                "KeyStats": {
                    "access_key": "ABC123",
                    "requests": "156",
                    "granted": "150",
                    "limit": "0"
                }
            }
        });
        let mut client = client_with(vec![Ok(payload)], &["ABC123"]);
        let stats = client.keystats().unwrap();
        assert_eq!(stats.get("requests"), Some(&156));
        assert_eq!(stats.get("granted"), Some(&150));
        assert_eq!(stats.get("limit"), Some(&0));
        assert!(!stats.contains_key("access_key"));

        let requests = client.transport.seen();
        assert_eq!(requests[0].results, ["keystats".to_string()]);
        assert!(requests[0].conditions.is_empty());
    }

    #[test]
    fn test_keystats_with_no_keys() {
        let mut client = client_with(vec![], &[]);
        assert!(client.keystats().unwrap_err().is_authorization());
    }
}
