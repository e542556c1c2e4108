//! Transport contract and the optional blocking HTTP implementation.
//!
//! The client core only constructs a [`Request`] descriptor and consumes
//! the parsed payload tree that comes back; how the request travels is a
//! [`Transport`] concern. Tests swap in a scripted transport; production
//! code enables the `http` feature and uses [`HttpTransport`].

use crate::error::Result;
use serde_json::Value;
use url::form_urlencoded;

/// Everything a transport needs to execute one request.
///
/// Conditions are already positional: the pair at index `i` (0-based)
/// renders as `index{i+1}`/`value{i+1}` on the wire, in exactly the order
/// given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Plural collection name (`books`, `authors`, ...).
    pub collection: String,
    /// Access key in use for this attempt.
    pub access_key: String,
    /// Requested result sections, comma-joined on the wire.
    pub results: Vec<String>,
    /// Ordered field/value equality conditions.
    pub conditions: Vec<(String, String)>,
    /// 1-based page number; page 1 is implied and not sent.
    pub page: u64,
}

impl Request {
    /// Resource path for this request, e.g. `/books.xml`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}.xml", self.collection)
    }

    /// Deterministic, percent-encoded query string.
    ///
    /// Renders `access_key`, `results`, then `indexN`/`valueN` pairs in
    /// condition order, then `page_number` (only when the page is past the
    /// first).
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("access_key", &self.access_key);
        serializer.append_pair("results", &self.results.join(","));
        for (position, (field, value)) in self.conditions.iter().enumerate() {
            serializer.append_pair(&format!("index{}", position + 1), field);
            serializer.append_pair(&format!("value{}", position + 1), value);
        }
        if self.page > 1 {
            serializer.append_pair("page_number", &self.page.to_string());
        }
        serializer.finish()
    }
}

/// Executes a request descriptor and returns the parsed payload tree.
///
/// Implementations own all I/O concerns (connection handling, timeouts);
/// the client does not interpret transport failures beyond surfacing them
/// as [`crate::IsbndbError::Transport`].
pub trait Transport {
    /// Execute one request, returning the payload tree rooted at the
    /// service envelope (e.g. `{"ISBNdb": {...}}`).
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::IsbndbError::Transport`] for I/O
    /// failures and [`crate::IsbndbError::MalformedResponse`] when the body
    /// cannot be parsed at all.
    fn execute(&self, request: &Request) -> Result<Value>;
}

#[cfg(feature = "http")]
pub use self::http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::{Request, Transport};
    use crate::error::{IsbndbError, Result};
    use crate::xml;
    use serde_json::Value;

    /// Base URL of the production service.
    pub const DEFAULT_BASE_URL: &str = "http://isbndb.com/api";

    /// Blocking HTTP transport for the ISBNdb API.
    ///
    /// ```ignore
    /// use isbndb::{AccessKeySet, Client, HttpTransport};
    ///
    /// let mut client = Client::new(HttpTransport::new(), AccessKeySet::new(["ABC123"]));
    /// let page = client.find("books", [("title", "hello")])?;
    /// # Ok::<(), isbndb::IsbndbError>(())
    /// ```
    #[derive(Debug)]
    pub struct HttpTransport {
        base_url: String,
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        /// Transport against the production base URL.
        #[must_use]
        pub fn new() -> Self {
            Self::with_base_url(DEFAULT_BASE_URL)
        }

        /// Transport against a custom base URL (no trailing slash).
        #[must_use]
        pub fn with_base_url(base_url: impl Into<String>) -> Self {
            HttpTransport {
                base_url: base_url.into(),
                client: reqwest::blocking::Client::new(),
            }
        }
    }

    impl Default for HttpTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for HttpTransport {
        fn execute(&self, request: &Request) -> Result<Value> {
            let url = format!(
                "{}{}?{}",
                self.base_url,
                request.path(),
                request.query_string()
            );
            let body = self
                .client
                .get(&url)
                .header("Content-Type", "text/xml")
                .send()
                .map_err(|e| IsbndbError::Transport(e.to_string()))?
                .text()
                .map_err(|e| IsbndbError::Transport(e.to_string()))?;
            xml::parse_payload(&body)
        }
    }
}
