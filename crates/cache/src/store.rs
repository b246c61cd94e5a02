//! Local filesystem store for cache artifacts.

use crate::error::{ErrorKind, Result};
use crate::models::{Metadata, Snapshot};
use exn::ResultExt;
use itemdb_extract::models::Record;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

pub const INDEX_FILE: &str = "search_index.json";
pub const METADATA_FILE: &str = "metadata.json";

/// The two cache artifacts inside one directory.
///
/// `search_index.json` maps realm names to their records and `metadata.json`
/// describes when that index was produced. Both are pretty-printed UTF-8
/// JSON. Every write goes to a temporary sibling first and is then renamed
/// into place, so readers only ever see a complete artifact.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// A store rooted at `dir`. Nothing is touched until the first operation;
    /// the directory is created on save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::Missing(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let bytes = fs::read(path).await.map_err(|e| Self::map_io_error(e, path))?;
        serde_json::from_slice(&bytes).or_raise(|| ErrorKind::Corrupt(path.to_path_buf()))
    }

    async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value).or_raise(|| ErrorKind::Serialize)?;
        let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("artifact");
        let temp = path.with_file_name(format!(".{file_name}.tmp"));
        fs::write(&temp, &bytes).await.map_err(|e| Self::map_io_error(e, &temp))?;
        if let Err(e) = fs::rename(&temp, path).await {
            // Leave nothing behind; the previous artifact is still intact.
            let _ = fs::remove_file(&temp).await;
            exn::bail!(Self::map_io_error(e, path));
        }
        Ok(())
    }

    /// Whether both artifacts are present. Says nothing about their contents.
    pub async fn exists(&self) -> bool {
        let index = fs::try_exists(self.index_path()).await.unwrap_or(false);
        index && fs::try_exists(self.metadata_path()).await.unwrap_or(false)
    }

    /// Read only `metadata.json`.
    pub async fn read_metadata(&self) -> Result<Metadata> {
        Self::read_json(&self.metadata_path()).await
    }

    /// Read both artifacts.
    ///
    /// Fails with [`Missing`](ErrorKind::Missing) if either artifact does not
    /// exist and [`Corrupt`](ErrorKind::Corrupt) if either cannot be decoded.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn load(&self) -> Result<Snapshot> {
        let metadata = self.read_metadata().await?;
        let realms: BTreeMap<String, Vec<Record>> = Self::read_json(&self.index_path()).await?;
        let total: usize = realms.values().map(Vec::len).sum();
        if total != metadata.total_items {
            tracing::warn!(
                recorded = metadata.total_items,
                actual = total,
                "Cache metadata item count does not match the index"
            );
        }
        tracing::debug!(realms = realms.len(), items = total, "Loaded cache snapshot");
        Ok(Snapshot { realms, metadata })
    }

    /// Write both artifacts, index first and metadata last.
    #[instrument(skip(self, snapshot), fields(dir = %self.dir.display(), items = snapshot.metadata.total_items))]
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| Self::map_io_error(e, &self.dir))?;
        Self::write_json(&self.index_path(), &snapshot.realms).await?;
        Self::write_json(&self.metadata_path(), &snapshot.metadata).await?;
        tracing::debug!(realms = snapshot.realms.len(), "Saved cache snapshot");
        Ok(())
    }
}
