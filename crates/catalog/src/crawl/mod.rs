//! Crawling a remote item catalog.
//!
//! The primary entry point is [`crawl`], which lists every configured
//! category of every requested realm through [`list_category`] and downloads
//! each discovered item through [`fetch_item`], streaming [`CrawlEvent`]s as
//! it goes. All remote requests go through the [`Crawler`]'s source, which is
//! expected to be a [`LimitedSource`](itemdb_source::backend::LimitedSource).

pub mod error;
mod item;
mod list;
mod stream;

pub use self::item::fetch_item;
pub use self::list::list_category;
pub use self::stream::{CrawlEvent, CrawlSummary, crawl};
use itemdb_extract::models::LanguagePolicy;
use itemdb_source::SourceHandle;
use std::collections::HashMap;

/// Everything a crawl needs besides the realms to crawl.
pub struct Crawler {
    pub source: SourceHandle,
    /// Category paths, e.g. `weapon/pistol`.
    pub categories: Vec<String>,
    /// Subdirectory names never descended into.
    pub service_dirs: Vec<String>,
    /// Language policy per realm name.
    pub policies: HashMap<String, LanguagePolicy>,
    /// Number of fetch workers; also the source's request limit.
    pub workers: usize,
    /// Fetch jobs that may wait for a worker before listers block.
    pub queue_capacity: usize,
}
impl Crawler {
    /// Language policy for `realm`. Realms without one use the default policy.
    pub fn policy(&self, realm: &str) -> LanguagePolicy {
        self.policies.get(realm).cloned().unwrap_or_default()
    }
}
