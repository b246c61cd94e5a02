//! Error types for the [`crawl`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.
//! None of these end a crawl: they are carried by
//! [`CrawlEvent`](super::CrawlEvent)s and the crawl moves on.

use derive_more::{Display, Error};

/// A crawl error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a crawl failure.
///
/// ### Per-category
/// - [`ErrorKind::Listing`]
///
/// ### Per-item
/// - [`ErrorKind::Download`]
/// - [`ErrorKind::Extract`]
/// - [`ErrorKind::NotFound`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Listing a category (or one of its subdirectories) failed with
    /// something other than "not found".
    #[display("could not list {realm}:{category}")]
    Listing { realm: String, category: String },
    /// The item document could not be downloaded.
    #[display("could not download {_0}")]
    Download(#[error(not(source))] String),
    /// The item document does not exist (any more).
    #[display("item not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The document was downloaded but no record could be extracted.
    #[display("could not extract a record from {_0}")]
    Extract(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Only the kind itself is known here; the source error further down the
    /// tree decides whether a retry could actually help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Listing { .. } | Self::Download(_))
    }
}
