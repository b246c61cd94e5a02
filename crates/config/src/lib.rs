//! Configuration loading and validation.
//!
//! Configuration is layered with [`figment`], later layers overriding earlier
//! ones:
//!
//! 1. Built-in defaults ([`Config::default`]),
//! 2. a configuration file (TOML, YAML or JSON, chosen by extension), either
//!    given explicitly or `itemdb.toml` in the platform configuration
//!    directory when it exists,
//! 3. environment variables prefixed with `ITEMDB_`, nested keys separated
//!    by a double underscore (`ITEMDB_CACHE__TTL_HOURS=6`).

pub mod error;
mod sections;

pub use crate::sections::{CacheConfig, CrawlConfig, RealmConfig, SourceConfig};
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "ITEMDB_";
pub const DEFAULT_FILE_NAME: &str = "itemdb.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub crawl: CrawlConfig,
    /// Realms to index, in the order they are crawled.
    pub realms: Vec<RealmConfig>,
    /// Language used when a realm's primary language has no usable name.
    pub fallback_language: String,
    pub cache: CacheConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            crawl: CrawlConfig::default(),
            realms: vec![RealmConfig::new("ru", "ru"), RealmConfig::new("global", "en")],
            fallback_language: "en".to_string(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration.
    ///
    /// An explicit `path` must exist; without one, the default file in the
    /// platform configuration directory is used only when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the layered [`Figment`] without extracting it.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        let file = match path {
            Some(explicit) => {
                if !explicit.is_file() {
                    exn::bail!(ErrorKind::FileNotFound(explicit.to_path_buf()));
                }
                Some(explicit.to_path_buf())
            },
            None => Self::default_file().filter(|f| f.is_file()),
        };
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Merging configuration file");
            figment = match file.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(&file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(&file)),
                Some("json") => figment.merge(Json::file(&file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Location of the implicit configuration file, if the platform has one.
    pub fn default_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(DEFAULT_FILE_NAME))
    }

    /// Reject configurations the catalog cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.realms.is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "realms",
                reason: "at least one realm must be configured".to_string(),
            });
        }
        for realm in &self.realms {
            if realm.name.trim().is_empty() || realm.name.contains('/') {
                exn::bail!(ErrorKind::Invalid {
                    field: "realms.name",
                    reason: format!("`{}` is not a usable realm name", realm.name),
                });
            }
        }
        self.crawl.validate()?;
        self.source.validate()?;
        if self.cache.ttl_hours == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "cache.ttl_hours",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Find the configuration of a realm by name.
    pub fn realm(&self, name: &str) -> Option<&RealmConfig> {
        self.realms.iter().find(|r| r.name == name)
    }

    pub fn realm_names(&self) -> Vec<String> {
        self.realms.iter().map(|r| r.name.clone()).collect()
    }

    /// The configured cache directory, or the platform cache directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache.dir {
            return Ok(dir.clone());
        }
        let dirs = project_dirs().ok_or_raise(|| ErrorKind::NoCacheDir)?;
        Ok(dirs.cache_dir().join("items"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "itemdb")
}
