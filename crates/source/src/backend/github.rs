//! Source-control host backend.
//!
//! Directory listings come from the GitHub contents API, item documents from
//! the raw-content host. Only the listing API sees the access token; raw
//! content is public and served from a CDN.

use crate::error::{ErrorKind, Result};
use crate::models::{Entry, EntryKind};
use crate::path::item_key;
use crate::{CatalogSource, validate_path};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// One element of a contents API directory listing. Everything but the name
/// and type is ignored.
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}
impl From<ListingEntry> for Entry {
    fn from(value: ListingEntry) -> Self {
        let kind = match value.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => EntryKind::Other,
        };
        Entry { name: value.name, kind }
    }
}

/// Catalog hosted in a source-control repository.
///
/// # Examples
///
/// ```no_run
/// use itemdb_source::backend::GithubSource;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = GithubSource::new(
///     "github",
///     "https://api.github.com/repos/EXBO-Studio/stalcraft-database/contents",
///     "https://raw.githubusercontent.com/EXBO-Studio/stalcraft-database/main",
///     None,
///     Duration::from_secs(10),
///     "itemdb",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GithubSource {
    name: String,
    client: Client,
    /// Contents API endpoint for the repository root.
    listing: String,
    /// Raw-content endpoint for the branch.
    raw: String,
    token: Option<String>,
}

impl GithubSource {
    /// Create a new source.
    ///
    /// # Arguments
    /// * `listing` - Contents API endpoint, `{api}/repos/{owner}/{repo}/contents`
    /// * `raw` - Raw-content endpoint, `{raw}/{owner}/{repo}/{branch}`
    /// * `token` - Bearer token for the listing API
    /// * `timeout` - Applied to every request individually
    pub fn new(
        name: impl Into<String>,
        listing: impl Into<String>,
        raw: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
        user_agent: impl AsRef<str>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            // GitHub rejects requests without a user agent.
            .user_agent(user_agent.as_ref())
            .build()
            .or_raise(|| ErrorKind::BackendError("could not build HTTP client".to_string()))?;
        Ok(Self {
            name: name.into(),
            client,
            listing: listing.into().trim_end_matches('/').to_string(),
            raw: raw.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn listing_request(&self, key: &str) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        let request = self.client.get(format!("{}/{key}", self.listing)).headers(headers);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and read the whole body, mapping every failure mode to
    /// an [`ErrorKind`].
    async fn fetch(&self, request: RequestBuilder, key: &str) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(|e| Self::map_request_error(e, key))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(Self::map_status(status, key));
        }
        let body = response.bytes().await.map_err(|e| Self::map_request_error(e, key))?;
        Ok(body.to_vec())
    }

    fn map_status(status: StatusCode, key: &str) -> ErrorKind {
        let path = key.to_string();
        match status {
            StatusCode::NOT_FOUND => ErrorKind::NotFound(path),
            StatusCode::UNAUTHORIZED => ErrorKind::PermissionDenied(path),
            // GitHub signals an exhausted quota with 403 as often as with 429.
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited {
                status: status.as_u16(),
                path,
            },
            _ => ErrorKind::Status {
                status: status.as_u16(),
                path,
            },
        }
    }

    fn map_request_error(e: reqwest::Error, key: &str) -> ErrorKind {
        if e.is_timeout() {
            ErrorKind::Timeout(key.to_string())
        } else {
            ErrorKind::Network(format!("{key}: {e}"))
        }
    }
}

#[async_trait]
impl CatalogSource for GithubSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, realm: &str, dir: &Path) -> Result<Vec<Entry>> {
        let key = item_key(realm, dir)?;
        tracing::trace!(source = %self.name, %key, "Listing remote directory");
        let body = self.fetch(self.listing_request(&key), &key).await?;
        // Asking the contents API for a file instead of a directory returns a
        // single object, which fails to decode here: good.
        let entries: Vec<ListingEntry> = serde_json::from_slice(&body).or_raise(|| ErrorKind::Decode(key))?;
        Ok(entries.into_iter().map(Entry::from).collect())
    }

    async fn read(&self, realm: &str, path: &Path) -> Result<Vec<u8>> {
        let key = item_key(realm, path)?;
        tracing::trace!(source = %self.name, %key, "Downloading remote document");
        let request = self.client.get(format!("{}/{key}", self.raw));
        self.fetch(request, &key).await
    }

    fn icon_ref(&self, realm: &str, category: &str, id: &str) -> String {
        // Icons mirror the item tree under `icons/` instead of `items/`.
        let category = validate_path(category).unwrap_or_else(|_| category.to_string());
        format!("{}/{realm}/icons/{category}/{id}.png", self.raw)
    }
}
