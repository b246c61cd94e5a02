//! Concurrency-limited source.
//!
//! Wraps another source so that every request, whichever realm, category or
//! task it comes from, first takes a permit from one shared semaphore.

use crate::error::{ErrorKind, Result};
use crate::{CatalogSource, Entry, SourceHandle};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Global request gate.
///
/// Clones share the same semaphore, so the bound holds across everything
/// that was handed a clone (or the [`SourceHandle`] built from one).
#[derive(Clone)]
pub struct LimitedSource {
    inner: SourceHandle,
    permits: Arc<Semaphore>,
    limit: usize,
}
impl LimitedSource {
    /// A `limit` of zero is raised to one; a gate nothing can pass would
    /// hang every crawl.
    pub fn new(inner: SourceHandle, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            inner,
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Requests currently allowed to start without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    async fn acquire_permit(&self) -> Result<OwnedSemaphorePermit> {
        // The semaphore is never closed, but propagate rather than unwrap.
        self.permits
            .clone()
            .acquire_owned()
            .await
            .or_raise(|| ErrorKind::BackendError("request limiter closed".to_string()))
    }
}

#[async_trait]
impl CatalogSource for LimitedSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn list(&self, realm: &str, dir: &Path) -> Result<Vec<Entry>> {
        let _permit = self.acquire_permit().await?;
        self.inner.list(realm, dir).await
    }

    async fn read(&self, realm: &str, path: &Path) -> Result<Vec<u8>> {
        let _permit = self.acquire_permit().await?;
        self.inner.read(realm, path).await
    }

    fn icon_ref(&self, realm: &str, category: &str, id: &str) -> String {
        self.inner.icon_ref(realm, category, id)
    }
}
