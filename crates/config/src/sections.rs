use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Where the catalog lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Repository identifier, `owner/name`.
    pub repository: String,
    pub branch: String,
    /// Base of the directory-listing API (`{api_base}/repos/{repository}/contents`).
    pub api_base: String,
    /// Base of the raw-content host (`{raw_base}/{repository}/{branch}`).
    pub raw_base: String,
    /// Sent as a bearer token to the listing API when present.
    pub token: Option<String>,
    /// Refuse to start without a token.
    pub require_token: bool,
    /// Timeout of each individual remote request.
    pub timeout_secs: u64,
    pub user_agent: String,
}
impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repository: "EXBO-Studio/stalcraft-database".to_string(),
            branch: "main".to_string(),
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            token: None,
            require_token: false,
            timeout_secs: 10,
            user_agent: concat!("itemdb/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
impl SourceConfig {
    /// Directory-listing endpoint for the repository root.
    pub fn listing_endpoint(&self) -> String {
        format!("{}/repos/{}/contents", self.api_base.trim_end_matches('/'), self.repository)
    }

    /// Raw-content endpoint for the configured branch.
    pub fn raw_endpoint(&self) -> String {
        format!("{}/{}/{}", self.raw_base.trim_end_matches('/'), self.repository, self.branch)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
            exn::bail!(ErrorKind::Invalid {
                field: "source.repository",
                reason: format!("expected `owner/name`, found `{}`", self.repository),
            });
        }
        if self.branch.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "source.branch",
                reason: "must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "source.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        let has_token = self.token.as_deref().is_some_and(|t| !t.trim().is_empty());
        if self.require_token && !has_token {
            exn::bail!(ErrorKind::MissingToken(self.repository.clone()));
        }
        Ok(())
    }
}

/// What to crawl, and how hard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Category paths below `{realm}/items/`, crawled in this order.
    pub categories: Vec<String>,
    /// Subdirectory names that are never descended into.
    pub service_dirs: Vec<String>,
    /// Global cap on in-flight remote requests for a whole crawl.
    pub max_concurrent_requests: usize,
    /// Capacity of the fetch job queue between listers and workers.
    pub queue_capacity: usize,
}
impl Default for CrawlConfig {
    fn default() -> Self {
        let categories = [
            "weapon/pistol",
            "weapon/submachine_gun",
            "weapon/assault_rifle",
            "weapon/sniper_rifle",
            "weapon/shotgun",
            "weapon/machine_gun",
            "equipment/outfit",
            "equipment/helmet",
            "equipment/backpack",
            "artifact",
            "consumable",
            "resource",
            "ammo",
        ];
        Self {
            categories: categories.into_iter().map(String::from).collect(),
            service_dirs: vec!["_variants".to_string(), "_deprecated".to_string()],
            max_concurrent_requests: 10,
            queue_capacity: 256,
        }
    }
}
impl CrawlConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "crawl.categories",
                reason: "at least one category must be configured".to_string(),
            });
        }
        for category in &self.categories {
            if !is_relative_normal(category) {
                exn::bail!(ErrorKind::Invalid {
                    field: "crawl.categories",
                    reason: format!("`{category}` is not a relative category path"),
                });
            }
        }
        if self.max_concurrent_requests == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "crawl.max_concurrent_requests",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.queue_capacity == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "crawl.queue_capacity",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Only plain, non-empty components: no `..`, no root, no `.`.
fn is_relative_normal(path: &str) -> bool {
    !path.is_empty() && Path::new(path).components().all(|c| matches!(c, Component::Normal(_)))
}

/// A realm and the language its display names are resolved in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmConfig {
    pub name: String,
    /// Primary language code (`ru`, `en`, ...).
    pub language: String,
}
impl RealmConfig {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// Durable cache location and freshness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Defaults to the platform cache directory.
    pub dir: Option<PathBuf>,
    /// Maximum age of a persisted index before a full re-crawl.
    pub ttl_hours: u64,
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self { dir: None, ttl_hours: 24 }
    }
}
impl CacheConfig {
    pub fn ttl(&self) -> time::Duration {
        // Clamped: `Duration::hours` panics on overflow.
        time::Duration::hours(i64::try_from(self.ttl_hours).unwrap_or(i64::MAX).min(i64::MAX / 3600))
    }
}
