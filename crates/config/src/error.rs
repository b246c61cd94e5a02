//! Config Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant means the catalog cannot be constructed: the user has to fix
/// their configuration before anything else happens.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Merging or deserializing the configuration layers failed.
    #[display("could not load configuration")]
    Load,
    /// The explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    FileNotFound(#[error(not(source))] PathBuf),
    /// The configuration file extension is not one of toml, yaml/yml or json.
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// The remote source mandates an access token but none was configured.
    #[display("an access token is required for repository {_0}")]
    MissingToken(#[error(not(source))] String),
    /// A value is present but unusable.
    #[display("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
    /// No platform directory could be determined and none was configured.
    #[display("could not determine a cache directory")]
    NoCacheDir,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
