//! In-memory catalog source for testing.

use crate::error::{ErrorKind, Result};
use crate::models::Entry;
use crate::CatalogSource;
use crate::path::validate as validate_path;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

type Key = (String, String);

/// In-memory catalog source for testing.
///
/// Documents are keyed by realm and remote path; directories exist implicitly
/// whenever a document lives below them, and listing a directory without any
/// documents yields [`NotFound`](ErrorKind::NotFound), like a real host.
///
/// Besides serving documents it counts requests, tracks how many were in
/// flight at once, and can be told to fail specific listings or reads.
///
/// # Examples
///
/// ```ignore
/// // Requires the `mock` feature.
/// use itemdb_source::backend::MockSource;
/// use itemdb_source::CatalogSource;
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = MockSource::with_files([
///     ("ru/weapon/pistol/a.json", br#"{"id": "a"}"#.to_vec()),
///     ("ru/weapon/pistol/variant1/c.json", br#"{"id": "c"}"#.to_vec()),
/// ]);
/// let entries = source.list("ru", Path::new("weapon/pistol")).await?;
/// assert_eq!(entries.len(), 2);
/// assert_eq!(source.request_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockSource {
    name: String,
    documents: RwLock<BTreeMap<Key, Vec<u8>>>,
    failing_lists: HashSet<Key>,
    failing_reads: HashSet<Key>,
    latency: Option<Duration>,
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    per_path: std::sync::Mutex<HashMap<Key, usize>>,
}

/// Decrements the in-flight counter however the request ends.
struct InFlight<'a>(&'a AtomicUsize);
impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockSource {
    /// Create a mock source pre-populated with documents.
    ///
    /// The first path component is the realm, the rest is the path below the
    /// realm's item root: `"ru/weapon/pistol/a.json"`.
    ///
    /// Panics if any path is invalid. If test setup is wrong, then the test
    /// should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut documents = BTreeMap::new();
        for (path, data) in files {
            let key = Self::split(&path.into());
            documents.insert(key, data.into());
        }
        Self {
            name: "mock".to_string(),
            documents: RwLock::new(documents),
            failing_lists: HashSet::new(),
            failing_reads: HashSet::new(),
            latency: None,
            requests: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            per_path: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn split(path: &Path) -> Key {
        let Ok(full) = validate_path(path) else {
            // Only reachable from test setup.
            panic!("MockSource: invalid path {}", path.display());
        };
        match full.split_once('/') {
            Some((realm, rest)) => (realm.to_string(), rest.to_string()),
            None => panic!("MockSource: path {full} has no realm component"),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Delay every request, so concurrent requests actually overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make listing `dir` in `realm` fail with a network error.
    pub fn fail_listing(mut self, realm: &str, dir: &str) -> Self {
        self.failing_lists.insert(Self::split(&Path::new(realm).join(dir)));
        self
    }

    /// Make reading `path` in `realm` fail with a network error.
    pub fn fail_read(mut self, realm: &str, path: &str) -> Self {
        self.failing_reads.insert(Self::split(&Path::new(realm).join(path)));
        self
    }

    /// Add or replace a document after construction.
    pub async fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        let key = Self::split(&path.into());
        self.documents.write().await.insert(key, data.into());
    }

    /// Total number of requests served (or failed) so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of requests made for one remote path (listing or read).
    pub fn requests_for(&self, realm: &str, path: &str) -> usize {
        let key = Self::split(&Path::new(realm).join(path));
        self.per_path.lock().map(|map| map.get(&key).copied().unwrap_or(0)).unwrap_or(0)
    }

    async fn begin(&self, key: &Key) -> InFlight<'_> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut map) = self.per_path.lock() {
            *map.entry(key.clone()).or_default() += 1;
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        guard
    }

    fn remote_key((realm, path): &Key) -> String {
        format!("{realm}/items/{path}")
    }
}
impl Default for MockSource {
    fn default() -> Self {
        let files: [(&str, Vec<u8>); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, realm: &str, dir: &Path) -> Result<Vec<Entry>> {
        let key = (validate_path(realm)?, validate_path(dir)?);
        let _guard = self.begin(&key).await;
        if self.failing_lists.contains(&key) {
            exn::bail!(ErrorKind::Network(format!("injected listing failure: {}", Self::remote_key(&key))));
        }
        let prefix = format!("{}/", key.1);
        let mut files = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        {
            let guard = self.documents.read().await;
            for (doc_realm, path) in guard.keys() {
                if *doc_realm != key.0 {
                    continue;
                }
                let Some(rest) = path.strip_prefix(&prefix) else {
                    continue;
                };
                match rest.split_once('/') {
                    Some((child, _)) => dirs.insert(child.to_string()),
                    None => files.insert(rest.to_string()),
                };
            }
        }
        if files.is_empty() && dirs.is_empty() {
            exn::bail!(ErrorKind::NotFound(Self::remote_key(&key)));
        }
        Ok(dirs.into_iter().map(Entry::dir).chain(files.into_iter().map(Entry::file)).collect())
    }

    async fn read(&self, realm: &str, path: &Path) -> Result<Vec<u8>> {
        let key = (validate_path(realm)?, validate_path(path)?);
        let _guard = self.begin(&key).await;
        if self.failing_reads.contains(&key) {
            exn::bail!(ErrorKind::Network(format!("injected read failure: {}", Self::remote_key(&key))));
        }
        let document = self.documents.read().await.get(&key).cloned();
        document.ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(Self::remote_key(&key))))
    }

    fn icon_ref(&self, realm: &str, category: &str, id: &str) -> String {
        format!("mock://{realm}/icons/{category}/{id}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pistols() -> MockSource {
        MockSource::with_files([
            ("ru/weapon/pistol/a.json", Vec::from(*b"a")),
            ("ru/weapon/pistol/b.json", Vec::from(*b"b")),
            ("ru/weapon/pistol/variant1/c.json", Vec::from(*b"c")),
            ("global/weapon/pistol/a.json", Vec::from(*b"A")),
        ])
    }

    #[tokio::test]
    async fn test_list_children() {
        let source = pistols();
        let entries = source.list("ru", Path::new("weapon/pistol")).await.unwrap();
        assert_eq!(entries, vec![Entry::dir("variant1"), Entry::file("a.json"), Entry::file("b.json")]);
        let entries = source.list("global", Path::new("weapon/pistol")).await.unwrap();
        assert_eq!(entries, vec![Entry::file("a.json")]);
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let source = pistols();
        let err = source.list("ru", Path::new("artifact")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        // Prefix matching is per component.
        let err = source.list("ru", Path::new("weapon/pis")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read() {
        let source = pistols();
        assert_eq!(source.read("ru", Path::new("weapon/pistol/variant1/c.json")).await.unwrap(), b"c");
        assert_eq!(source.read("global", Path::new("weapon/pistol/a.json")).await.unwrap(), b"A");
        let err = source.read("global", Path::new("weapon/pistol/b.json")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        assert_eq!(source.request_count(), 3);
        assert_eq!(source.requests_for("ru", "weapon/pistol/variant1/c.json"), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let source = pistols().fail_listing("ru", "weapon/pistol").fail_read("global", "weapon/pistol/a.json");
        let err = source.list("ru", Path::new("weapon/pistol")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        let err = source.read("global", Path::new("weapon/pistol/a.json")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        // Failed requests still count.
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_insert_after_construction() {
        let source = MockSource::default();
        assert!(source.list("ru", Path::new("ammo")).await.is_err());
        source.insert("ru/ammo/9x18.json", b"{}".to_vec()).await;
        assert_eq!(source.list("ru", Path::new("ammo")).await.unwrap(), vec![Entry::file("9x18.json")]);
    }

    #[test]
    #[should_panic(expected = "invalid path")]
    fn test_with_files_panics_on_bad_path() {
        MockSource::with_files([("../escape", Vec::from(*b"bad"))]);
    }
}
