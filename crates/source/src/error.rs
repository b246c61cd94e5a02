//! Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Paths are remote keys (`{realm}/items/...`), not local filesystem paths.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The remote path does not exist. Callers usually treat this as an
    /// empty result rather than a failure.
    #[display("not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Credentials were rejected.
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] String),
    /// The remote host is throttling us.
    #[display("rate limited (HTTP {status}): {path}")]
    RateLimited {
        status: u16,
        path: String,
    },
    /// Any other non-success HTTP status.
    #[display("unexpected HTTP {status}: {path}")]
    Status {
        status: u16,
        path: String,
    },
    /// The per-request timeout elapsed.
    #[display("request timed out: {_0}")]
    Timeout(#[error(not(source))] String),
    /// Connection-level failure.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// Path contains invalid characters or escapes the realm root.
    #[display("invalid path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    /// The response body was not the expected shape.
    #[display("could not decode response: {_0}")]
    Decode(#[error(not(source))] String),
    /// Backend-specific error
    #[display("backend error: {_0}")]
    BackendError(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` for the one failure that means "nothing there".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
