//! Durable cache for the item search index.
//!
//! The cache is never the source of truth: the remote repository is. If the
//! cache is deleted, corrupt or expired, it is rebuilt by crawling.

pub mod error;
mod models;
mod store;

pub use crate::models::{Metadata, Snapshot, is_expired};
pub use crate::store::{CacheStore, INDEX_FILE, METADATA_FILE};
