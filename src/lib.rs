#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # isbndb: ISBNdb API Client
//!
//! A Rust client library for the ISBNdb bibliographic lookup service,
//! which exposes collections (books, authors, subjects, categories,
//! publishers) over an HTTP+XML query interface.
//!
//! ## Quick Start
//!
//! ```ignore
//! use isbndb::{AccessKeySet, Client, HttpTransport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::new(
//!     HttpTransport::new(),
//!     AccessKeySet::new(["ABC123", "DEF456"]),
//! );
//!
//! let page = client.find("books", [("title", "amazing")])?;
//! for record in &page {
//!     println!("{:?} ({:?})", record.get_str("title"), record.get_str("isbn"));
//! }
//!
//! if let Some(next) = page.next_page(&mut client)? {
//!     println!("page 2 holds {} records", next.size());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Finder calls
//!
//! ```ignore
//! # use isbndb::{AccessKeySet, Client, HttpTransport};
//! # let mut client = Client::new(HttpTransport::new(), AccessKeySet::new(["ABC123"]));
//! // Equivalent to find("books", [("isbn", "9781590543948")])
//! let page = client.finder("find_book_by_isbn", &["9781590543948"])?;
//! # Ok::<(), isbndb::IsbndbError>(())
//! ```
//!
//! ## Access-key rotation
//!
//! The service rejects overloaded and invalid keys with the same payload.
//! When that happens, the client advances through its [`AccessKeySet`] and
//! re-issues the identical query, stopping at the first key that works or
//! when the set is exhausted. The cursor keeps its position across calls.
//!
//! ## Modules
//!
//! - [`client`] — query engine: request building, dispatch, key rotation
//! - [`query`] — immutable query model with ordered conditions
//! - [`result_set`] — one page of decoded records with stateless navigation
//! - [`record`] — nil-safe field access over a normalized record
//! - [`normalize`] — canonicalization of keys and string-typed values
//! - [`access_key`] — ordered key set with a rotation cursor
//! - [`finder`] — parser for `find_<collection>_by_<field>` call names
//! - [`transport`] — transport contract and the optional HTTP transport
//! - [`xml`] — XML response body to payload tree
//! - [`inflect`] — collection/field name inflection helpers
//! - [`error`] — error types and result type
//!
//! The HTTP transport (`HttpTransport`) is behind the `http` cargo feature;
//! the rest of the crate is transport-agnostic and works against any
//! [`Transport`] implementation.

pub mod access_key;
pub mod client;
pub mod error;
pub mod finder;
pub mod inflect;
pub mod normalize;
pub mod query;
pub mod record;
pub mod result_set;
pub mod transport;
pub mod xml;

pub use access_key::AccessKeySet;
pub use client::Client;
pub use error::{IsbndbError, Result};
pub use finder::FinderCall;
pub use query::{Query, DEFAULT_COLLECTION, DEFAULT_RESULTS};
pub use record::Record;
pub use result_set::ResultSet;
pub use transport::{Request, Transport};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
