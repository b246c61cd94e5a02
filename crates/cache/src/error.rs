//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Callers treat every load failure the same way (no usable cache), the
/// distinction only matters for logging.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An artifact has never been written (or was deleted).
    #[display("cache artifact missing: {}", _0.display())]
    Missing(#[error(not(source))] PathBuf),
    /// An artifact exists but cannot be decoded.
    #[display("cache artifact corrupt: {}", _0.display())]
    Corrupt(#[error(not(source))] PathBuf),
    /// Underlying I/O error while reading or writing an artifact.
    #[display("I/O error: {_0}")]
    Io(IoError),
    #[display("could not serialize cache snapshot")]
    Serialize,
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
