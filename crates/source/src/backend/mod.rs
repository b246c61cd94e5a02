//! Catalog source trait and implementations.
//!
//! This module defines the `CatalogSource` trait, a read-only view of a
//! remote item tree laid out as `{realm}/items/{category}/[{subdir}/]{id}.json`.

mod github;
mod limited;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::github::GithubSource;
pub use self::limited::LimitedSource;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockSource;
use crate::error::Result;
use crate::models::Entry;
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for remote catalog sources.
///
/// All paths are relative to the realm's item root (`{realm}/items/`) and are
/// validated with [`validate_path`](crate::validate_path) by every
/// implementation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use itemdb_source::{CatalogSource, error::Result};
///
/// async fn count_json_files(source: &dyn CatalogSource) -> Result<usize> {
///     let entries = source.list("ru", Path::new("weapon/pistol")).await?;
///     Ok(entries.iter().filter_map(|e| e.stem_if_extension("json")).count())
/// }
/// ```
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Name of the source, used for logging only.
    fn name(&self) -> &str;

    /// List the immediate children of `dir`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// directory does not exist; it is up to the caller to decide whether
    /// that is an error.
    async fn list(&self, realm: &str, dir: &Path) -> Result<Vec<Entry>>;

    /// Read the raw bytes of the document at `path`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, realm: &str, path: &Path) -> Result<Vec<u8>>;

    /// Reference to an item's icon asset.
    ///
    /// Must be a pure function of its arguments: the same item always maps to
    /// the same reference, whether it was crawled or loaded from cache.
    fn icon_ref(&self, realm: &str, category: &str, id: &str) -> String;
}
