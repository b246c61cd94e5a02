//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Queries never fail; only
//! construction, explicit updates and single-item downloads do.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The configuration is unusable; see the config error below.
    #[display("invalid configuration")]
    Config,
    /// The remote source could not be set up.
    #[display("could not create catalog source")]
    Source,
    /// An update was requested for a realm that is not configured.
    #[display("unknown realm: {_0}")]
    UnknownRealm(#[error(not(source))] String),
    /// The requested item does not exist in the remote catalog.
    #[display("item not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The requested item exists (or might) but could not be fetched.
    #[display("could not fetch item {_0}")]
    Fetch(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
