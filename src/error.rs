//! Error types for ISBNdb client operations.
//!
//! This module provides the [`IsbndbError`] type for all client library
//! operations and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all ISBNdb client operations.
///
/// Represents the error conditions that can occur while building a query,
/// dispatching it, or interpreting the service's response.
#[derive(Error, Debug)]
pub enum IsbndbError {
    /// The caller-constructed query is structurally wrong (missing
    /// conditions, arity mismatch on a finder call). Never retried.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The service rejected the access key in use. The service returns the
    /// same payload for an overloaded key and an invalid one, so the two
    /// cases are indistinguishable at the protocol level.
    #[error("Access key rejected: {0}")]
    Authorization(String),

    /// The payload does not contain the expected envelope/list/data shape.
    /// Never retried: a retry cannot fix a shape mismatch.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A convenience call name does not match the
    /// `find_<collection>_by_<field>[_and_<field>...]` grammar at all.
    /// Distinct from [`IsbndbError::InvalidQuery`], which covers calls that
    /// match the grammar but are malformed (e.g. arity mismatch).
    #[error("Unrecognized finder: {0}")]
    UnrecognizedFinder(String),

    /// Failure in the underlying transport (connection, I/O). The client
    /// does not interpret these beyond surfacing them.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl IsbndbError {
    /// Returns `true` if this is an authorization failure, the one error
    /// kind recovered by access-key rotation.
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, IsbndbError::Authorization(_))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`IsbndbError`].
pub type Result<T> = std::result::Result<T, IsbndbError>;
