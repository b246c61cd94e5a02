//! Remote catalog sources.
//!
//! A source is anything that can list the directories of a realm's item tree
//! and hand back the raw bytes of one item document. The real thing is a
//! source-control host ([`GithubSource`](backend::GithubSource)); tests use
//! the in-memory `MockSource` (feature `mock`). Every source is wrapped in a
//! [`LimitedSource`](backend::LimitedSource) before crawling so one semaphore
//! bounds all in-flight requests.

pub mod backend;
pub mod error;
mod models;
mod path;

pub use crate::backend::CatalogSource;
pub use crate::models::{Entry, EntryKind};
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type SourceHandle = Arc<dyn CatalogSource + Send + Sync>;
