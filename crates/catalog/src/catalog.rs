use crate::crawl::error::ErrorKind as CrawlErrorKind;
use crate::crawl::{CrawlEvent, CrawlSummary, Crawler, crawl, fetch_item};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::StreamExt;
use itemdb_cache::{CacheStore, Snapshot, is_expired};
use itemdb_config::Config;
use itemdb_extract::Item;
use itemdb_extract::models::{ItemKey, LanguagePolicy, Record};
use itemdb_index::{RealmIndex, SearchIndex};
use itemdb_source::SourceHandle;
use itemdb_source::backend::{GithubSource, LimitedSource};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::instrument;

/// How [`Catalog::initialize`] made the catalog ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialized {
    /// The catalog was already ready and its data is still fresh.
    Current,
    /// A fresh cache was loaded; no remote requests were made.
    Loaded { items: usize },
    /// Everything was crawled (and an attempt was made to persist it).
    Crawled(CrawlSummary),
}

/// What [`Catalog::status`] reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Neither loaded nor crawled yet; every query comes back empty.
    Uninitialized,
    Ready {
        /// Record count per realm.
        realms: BTreeMap<String, usize>,
        total_items: usize,
        last_update: Option<OffsetDateTime>,
    },
}

/// The item catalog: crawling, caching and querying in one place.
///
/// Construct it once and share it (e.g. behind an `Arc`). Queries are plain
/// synchronous reads of the current index and may run while an update is in
/// progress; they see each realm's previous records until its replacement is
/// complete. Updates themselves are serialized.
pub struct Catalog {
    crawler: Arc<Crawler>,
    realms: Vec<String>,
    index: SearchIndex,
    cache: CacheStore,
    ttl: Duration,
    ready: AtomicBool,
    last_update: RwLock<Option<OffsetDateTime>>,
    updating: Mutex<()>,
}

impl Catalog {
    /// Build a catalog crawling the repository described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;
        let source = GithubSource::new(
            "github",
            config.source.listing_endpoint(),
            config.source.raw_endpoint(),
            config.source.token.clone(),
            config.source.timeout(),
            &config.source.user_agent,
        )
        .or_raise(|| ErrorKind::Source)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Build a catalog on top of any source.
    ///
    /// The source is wrapped in a [`LimitedSource`] so that at most
    /// `crawl.max_concurrent_requests` requests are ever in flight.
    pub fn with_source(config: &Config, source: SourceHandle) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;
        let cache_dir = config.cache_dir().or_raise(|| ErrorKind::Config)?;
        let workers = config.crawl.max_concurrent_requests;
        let policies: HashMap<_, _> = config
            .realms
            .iter()
            .map(|realm| (realm.name.clone(), LanguagePolicy::new(&realm.language, &config.fallback_language)))
            .collect();
        let crawler = Crawler {
            source: Arc::new(LimitedSource::new(source, workers)),
            categories: config.crawl.categories.clone(),
            service_dirs: config.crawl.service_dirs.clone(),
            policies,
            workers,
            queue_capacity: config.crawl.queue_capacity,
        };
        tracing::debug!(cache = %cache_dir.display(), realms = config.realms.len(), workers, "Catalog created");
        Ok(Self {
            crawler: Arc::new(crawler),
            realms: config.realm_names(),
            index: SearchIndex::new(),
            cache: CacheStore::new(cache_dir),
            ttl: config.cache.ttl(),
            ready: AtomicBool::new(false),
            last_update: RwLock::new(None),
            updating: Mutex::new(()),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        self.cache.dir()
    }

    /// Configured realms, in crawl order.
    pub fn realms(&self) -> &[String] {
        &self.realms
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn set_last_update(&self, at: OffsetDateTime) {
        *self.last_update.write().unwrap_or_else(PoisonError::into_inner) = Some(at);
    }

    /// Make the catalog ready, crawling only when necessary.
    ///
    /// Unless `force` is set, an already-ready catalog with fresh data does
    /// nothing, and a fresh cache on disk is loaded instead of crawling. A
    /// missing, expired, or unreadable cache means a full crawl of every
    /// configured realm followed by a save. Neither a failed crawl of some
    /// category nor a failed save makes this fail.
    #[instrument(skip(self))]
    pub async fn initialize(&self, force: bool) -> Initialized {
        let _updating = self.updating.lock().await;
        if !force {
            let now = OffsetDateTime::now_utc();
            if self.is_ready() && self.last_update().is_some_and(|at| now - at <= self.ttl) {
                tracing::debug!("Catalog is already current");
                return Initialized::Current;
            }
            if let Some(items) = self.load_fresh(now).await {
                return Initialized::Loaded { items };
            }
        }
        let summary = self.crawl_realms(self.realms.clone()).await;
        self.set_last_update(OffsetDateTime::now_utc());
        self.persist().await;
        Initialized::Crawled(summary)
    }

    /// Load the cache if it is fresh, without ever crawling.
    ///
    /// Returns the number of records loaded, or `None` if there is no usable
    /// fresh cache.
    #[instrument(skip(self))]
    pub async fn load_cache(&self) -> Option<usize> {
        let _updating = self.updating.lock().await;
        self.load_fresh(OffsetDateTime::now_utc()).await
    }

    async fn load_fresh(&self, now: OffsetDateTime) -> Option<usize> {
        match self.cache.read_metadata().await {
            Ok(metadata) if !is_expired(Some(&metadata), self.ttl, now) => match self.cache.load().await {
                Ok(snapshot) => {
                    let items = self.install(snapshot);
                    tracing::info!(items, "Loaded item database from cache");
                    return Some(items);
                },
                Err(e) => tracing::warn!(error = ?e, "Could not load cache"),
            },
            Ok(metadata) => tracing::info!(last_update = %metadata.last_update, "Cache expired"),
            Err(e) => tracing::info!(error = ?e, "No usable cache"),
        }
        None
    }

    /// Crawl only the named realms and persist the result.
    ///
    /// Other realms keep their current records. A catalog that is not ready
    /// yet first loads whatever cache exists, expired or not, so that those
    /// records survive the save. The update time only moves forward when every
    /// configured realm was crawled, or when there was none before.
    #[instrument(skip(self))]
    pub async fn update_database(&self, realms: &[String]) -> Result<CrawlSummary> {
        if let Some(unknown) = realms.iter().find(|realm| !self.realms.contains(realm)) {
            exn::bail!(ErrorKind::UnknownRealm(unknown.clone()));
        }
        if realms.is_empty() {
            tracing::debug!("No realms to update");
            return Ok(CrawlSummary::default());
        }
        let _updating = self.updating.lock().await;
        if !self.is_ready() {
            match self.cache.load().await {
                Ok(snapshot) => {
                    let items = self.install(snapshot);
                    tracing::info!(items, "Loaded cached realms before updating");
                },
                Err(e) => tracing::debug!(error = ?e, "No cached realms to keep"),
            }
        }
        let summary = self.crawl_realms(realms.to_vec()).await;
        let everything = self.realms.iter().all(|realm| realms.contains(realm));
        if everything || self.last_update().is_none() {
            self.set_last_update(OffsetDateTime::now_utc());
        }
        self.persist().await;
        Ok(summary)
    }

    /// Publish every realm of a loaded snapshot. Returns the record count.
    fn install(&self, snapshot: Snapshot) -> usize {
        let items = snapshot.realms.values().map(Vec::len).sum();
        for (realm, records) in snapshot.realms {
            self.index.publish(RealmIndex::from_records(realm, records));
        }
        self.set_last_update(snapshot.metadata.last_update);
        self.ready.store(true, Ordering::Release);
        items
    }

    async fn crawl_realms(&self, realms: Vec<String>) -> CrawlSummary {
        tracing::info!(realms = ?realms, "Crawling item database");
        let mut events = pin!(crawl(Arc::clone(&self.crawler), realms));
        let mut buffers: HashMap<String, Vec<Record>> = HashMap::new();
        let mut total = CrawlSummary::default();
        while let Some(event) = events.next().await {
            match event {
                CrawlEvent::Fetched(record) => buffers.entry(record.realm.clone()).or_default().push(*record),
                CrawlEvent::RealmComplete { realm, summary } => {
                    let records = buffers.remove(&realm).unwrap_or_default();
                    self.index.publish(RealmIndex::from_records(realm.clone(), records));
                    tracing::info!(
                        realm = %realm,
                        items = self.index.len(&realm),
                        skipped = summary.skipped,
                        failed_categories = summary.failed_categories,
                        "Realm index replaced"
                    );
                },
                CrawlEvent::Complete(summary) => total = summary,
                _ => {},
            }
        }
        self.ready.store(true, Ordering::Release);
        total
    }

    /// Save the current index. Failures are logged; the in-memory index stays
    /// authoritative.
    async fn persist(&self) {
        let updated = self.last_update().unwrap_or_else(OffsetDateTime::now_utc);
        let snapshot = Snapshot::new(self.index.to_records(), updated);
        match self.cache.save(&snapshot).await {
            Ok(()) => tracing::info!(items = snapshot.metadata.total_items, "Item database saved to cache"),
            Err(e) => tracing::warn!(error = ?e, "Could not save item database to cache"),
        }
    }

    /// Up to `limit` records of `realm` matching `query`, in index order.
    pub fn search(&self, query: &str, realm: &str, limit: usize) -> Vec<Record> {
        if !self.is_ready() {
            return Vec::new();
        }
        self.index.search(realm, query, limit)
    }

    pub fn get_by_id(&self, id: &str, realm: &str) -> Option<Record> {
        if !self.is_ready() {
            return None;
        }
        self.index.get_by_id(realm, id)
    }

    pub fn list_all(&self, realm: &str, category: Option<&str>) -> Vec<Record> {
        if !self.is_ready() {
            return Vec::new();
        }
        self.index.list_all(realm, category)
    }

    /// Categories that have at least one record in `realm`.
    pub fn categories(&self, realm: &str) -> Vec<String> {
        if !self.is_ready() {
            return Vec::new();
        }
        self.index.categories(realm)
    }

    pub fn total_item_count(&self) -> usize {
        if !self.is_ready() {
            return 0;
        }
        self.index.total_items()
    }

    /// When the current data was crawled (or, if loaded, when the cache was
    /// written).
    pub fn last_update(&self) -> Option<OffsetDateTime> {
        *self.last_update.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> Status {
        if !self.is_ready() {
            return Status::Uninitialized;
        }
        let realms: BTreeMap<_, _> =
            self.index.realms().into_iter().map(|realm| (realm.clone(), self.index.len(&realm))).collect();
        Status::Ready {
            total_items: realms.values().sum(),
            realms,
            last_update: self.last_update(),
        }
    }

    /// Download one item directly from the source, bypassing the index.
    ///
    /// Returns the full document along with its record. A document that does
    /// not exist fails with [`NotFound`](ErrorKind::NotFound).
    #[instrument(skip(self))]
    pub async fn fetch_item(&self, realm: &str, category: &str, id: &str) -> Result<Item> {
        let key = ItemKey::new(realm, category, id);
        let policy = self.crawler.policy(realm);
        match fetch_item(&self.crawler.source, &key, &policy).await {
            Ok(item) => Ok(item),
            Err(e) if matches!(&*e, CrawlErrorKind::NotFound(_)) => {
                Err(e).or_raise(|| ErrorKind::NotFound(key.to_string()))
            },
            Err(e) => Err(e).or_raise(|| ErrorKind::Fetch(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemdb_cache::Metadata;
    use itemdb_source::backend::MockSource;

    fn config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.crawl.categories = vec!["weapon/pistol".to_string(), "artifact".to_string()];
        config.crawl.max_concurrent_requests = 3;
        config.cache.dir = Some(dir.to_path_buf());
        config
    }

    fn translation(ru: &str, en: &str) -> Vec<u8> {
        format!(r#"{{"name": {{"type": "translation", "lines": {{"ru": "{ru}", "en": "{en}"}}}}}}"#).into_bytes()
    }

    fn armory() -> MockSource {
        MockSource::with_files([
            ("ru/weapon/pistol/pm.json", translation("Пистолет", "Pistol")),
            ("ru/weapon/pistol/variant1/pm_gold.json", translation("Золотой пистолет", "Golden Pistol")),
            ("ru/artifact/crystal.json", translation("Кристалл", "Crystal")),
            ("global/weapon/pistol/pm.json", translation("Пистолет", "Pistol")),
            ("global/artifact/crystal.json", translation("Кристалл", "Crystal")),
        ])
    }

    fn open_catalog(dir: &Path, mock: &Arc<MockSource>) -> Catalog {
        let source: SourceHandle = Arc::clone(mock) as SourceHandle;
        Catalog::with_source(&config(dir), source).unwrap()
    }

    #[tokio::test]
    async fn test_uninitialized_queries_are_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = open_catalog(temp_dir.path(), &Arc::new(armory()));
        assert_eq!(catalog.status(), Status::Uninitialized);
        assert!(catalog.search("", "ru", 10).is_empty());
        assert!(catalog.get_by_id("pm", "ru").is_none());
        assert!(catalog.list_all("ru", None).is_empty());
        assert_eq!(catalog.total_item_count(), 0);
        assert!(catalog.last_update().is_none());
    }

    #[tokio::test]
    async fn test_no_cache_crawls_once_and_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);

        let outcome = catalog.initialize(false).await;
        assert!(matches!(outcome, Initialized::Crawled(summary) if summary.fetched == 5));
        assert_eq!(mock.requests_for("ru", "weapon/pistol"), 1);
        assert_eq!(mock.requests_for("ru", "weapon/pistol/pm.json"), 1);
        assert!(catalog.cache.exists().await);
        assert_eq!(catalog.cache.read_metadata().await.unwrap().total_items, 5);

        let found = catalog.search("пистолет", "ru", 10);
        let ids: Vec<_> = found.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"pm") && ids.contains(&"variant1/pm_gold"));
        assert_eq!(catalog.get_by_id("pm", "ru").unwrap().display_name, "Пистолет");
        assert_eq!(catalog.get_by_id("pm", "global").unwrap().display_name, "Pistol");
        assert_eq!(catalog.total_item_count(), 5);
        assert!(matches!(catalog.status(), Status::Ready { total_items: 5, .. }));
    }

    #[tokio::test]
    async fn test_initialize_twice_makes_no_more_requests() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        catalog.initialize(false).await;
        let requests = mock.request_count();
        assert_eq!(catalog.initialize(false).await, Initialized::Current);
        assert_eq!(mock.request_count(), requests);

        // A new process with a fresh cache loads it without touching the source.
        let fresh_mock = Arc::new(armory());
        let restarted = open_catalog(temp_dir.path(), &fresh_mock);
        assert_eq!(restarted.initialize(false).await, Initialized::Loaded { items: 5 });
        assert_eq!(fresh_mock.request_count(), 0);
        assert_eq!(restarted.search("crystal", "global", 10).len(), 1);
        assert!(restarted.last_update().is_some());
    }

    async fn seed_cache(dir: &Path, age: Duration) {
        let records = BTreeMap::from([(
            "ru".to_string(),
            vec![Record {
                id: "cached".to_string(),
                realm: "ru".to_string(),
                category: "artifact".to_string(),
                display_name: "Cached".to_string(),
                name_variants: BTreeMap::new(),
                icon_ref: "mock://ru/icons/artifact/cached.png".to_string(),
            }],
        )]);
        let snapshot = Snapshot::new(records, OffsetDateTime::now_utc() - age);
        CacheStore::new(dir).save(&snapshot).await.unwrap();
    }

    #[tokio::test]
    async fn test_fresh_cache_is_loaded() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_cache(temp_dir.path(), Duration::hours(1)).await;
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        assert_eq!(catalog.initialize(false).await, Initialized::Loaded { items: 1 });
        assert_eq!(mock.request_count(), 0);
        assert!(catalog.get_by_id("cached", "ru").is_some());
    }

    #[tokio::test]
    async fn test_expired_cache_is_recrawled() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_cache(temp_dir.path(), Duration::hours(25)).await;
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        assert!(matches!(catalog.initialize(false).await, Initialized::Crawled(_)));
        assert!(mock.request_count() > 0);
        assert!(catalog.get_by_id("cached", "ru").is_none());
        let metadata: Metadata = catalog.cache.read_metadata().await.unwrap();
        assert!(OffsetDateTime::now_utc() - metadata.last_update < Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_force_ignores_fresh_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_cache(temp_dir.path(), Duration::hours(1)).await;
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        assert!(matches!(catalog.initialize(true).await, Initialized::Crawled(_)));
        assert_eq!(catalog.total_item_count(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_recrawled() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_cache(temp_dir.path(), Duration::hours(1)).await;
        std::fs::write(temp_dir.path().join(itemdb_cache::INDEX_FILE), "[").unwrap();
        let catalog = open_catalog(temp_dir.path(), &Arc::new(armory()));
        assert!(matches!(catalog.initialize(false).await, Initialized::Crawled(_)));
        assert_eq!(catalog.total_item_count(), 5);
    }

    #[tokio::test]
    async fn test_failing_category_counts_as_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(armory().fail_listing("ru", "weapon/pistol"));
        let catalog = open_catalog(temp_dir.path(), &mock);
        let Initialized::Crawled(summary) = catalog.initialize(false).await else {
            panic!("expected a crawl");
        };
        assert_eq!(summary.failed_categories, 1);
        assert_eq!(catalog.total_item_count(), 3);
        assert!(catalog.get_by_id("pm", "ru").is_none());
        assert!(catalog.get_by_id("crystal", "ru").is_some());
    }

    #[tokio::test]
    async fn test_persist_failure_is_not_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocked = temp_dir.path().join("not-a-directory");
        std::fs::write(&blocked, "").unwrap();
        let catalog = open_catalog(&blocked, &Arc::new(armory()));
        assert!(matches!(catalog.initialize(false).await, Initialized::Crawled(_)));
        assert_eq!(catalog.total_item_count(), 5);
        assert!(catalog.last_update().is_some());
    }

    #[tokio::test]
    async fn test_update_single_realm() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        let summary = catalog.update_database(&["global".to_string()]).await.unwrap();
        assert_eq!(summary.fetched, 2);
        assert_eq!(mock.requests_for("ru", "artifact"), 0);
        assert_eq!(catalog.list_all("global", None).len(), 2);
        assert_eq!(catalog.list_all("global", Some("artifact")).len(), 1);
        assert!(catalog.list_all("ru", None).is_empty());

        mock.insert("ru/artifact/jelly.json", translation("Медуза", "Jellyfish")).await;
        catalog.update_database(&["ru".to_string()]).await.unwrap();
        assert_eq!(catalog.total_item_count(), 6);
        let mut categories = catalog.categories("ru");
        categories.sort();
        assert_eq!(categories, ["artifact", "weapon/pistol"]);

        let err = catalog.update_database(&["moon".to_string()]).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownRealm(realm) if realm == "moon"));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_cached_realms() {
        let temp_dir = tempfile::tempdir().unwrap();
        open_catalog(temp_dir.path(), &Arc::new(armory())).initialize(false).await;

        let mock = Arc::new(armory());
        let updater = open_catalog(temp_dir.path(), &mock);
        updater.update_database(&["ru".to_string()]).await.unwrap();
        assert_eq!(mock.requests_for("global", "artifact"), 0);
        assert_eq!(updater.list_all("global", None).len(), 2);

        let mock = Arc::new(armory());
        let restarted = open_catalog(temp_dir.path(), &mock);
        assert_eq!(restarted.initialize(false).await, Initialized::Loaded { items: 5 });
        assert_eq!(mock.request_count(), 0);
        assert_eq!(restarted.list_all("global", None).len(), 2);
        assert_eq!(restarted.list_all("ru", None).len(), 3);
    }

    #[tokio::test]
    async fn test_partial_update_of_expired_cache_stays_expired() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_cache(temp_dir.path(), Duration::hours(25)).await;
        let updater = open_catalog(temp_dir.path(), &Arc::new(armory()));
        updater.update_database(&["global".to_string()]).await.unwrap();
        assert!(updater.get_by_id("cached", "ru").is_some());
        assert_eq!(updater.list_all("global", None).len(), 2);

        let metadata = updater.cache.read_metadata().await.unwrap();
        assert_eq!(metadata.total_items, 3);
        assert!(OffsetDateTime::now_utc() - metadata.last_update > Duration::hours(24));

        let restarted = open_catalog(temp_dir.path(), &Arc::new(armory()));
        assert!(matches!(restarted.initialize(false).await, Initialized::Crawled(_)));
    }

    #[tokio::test]
    async fn test_load_cache_never_crawls() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        assert_eq!(catalog.load_cache().await, None);
        assert!(!catalog.is_ready());

        seed_cache(temp_dir.path(), Duration::hours(25)).await;
        assert_eq!(catalog.load_cache().await, None);

        seed_cache(temp_dir.path(), Duration::hours(1)).await;
        assert_eq!(catalog.load_cache().await, Some(1));
        assert!(catalog.get_by_id("cached", "ru").is_some());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_loaded_count_is_records_installed() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_cache(temp_dir.path(), Duration::hours(1)).await;
        let store = CacheStore::new(temp_dir.path());
        let metadata = Metadata {
            last_update: OffsetDateTime::now_utc() - Duration::hours(1),
            total_items: 99,
        };
        std::fs::write(store.metadata_path(), serde_json::to_vec(&metadata).unwrap()).unwrap();

        let catalog = open_catalog(temp_dir.path(), &Arc::new(armory()));
        assert_eq!(catalog.initialize(false).await, Initialized::Loaded { items: 1 });
        assert_eq!(catalog.total_item_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_update_does_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(armory());
        let catalog = open_catalog(temp_dir.path(), &mock);
        assert_eq!(catalog.update_database(&[]).await.unwrap(), CrawlSummary::default());
        assert_eq!(mock.request_count(), 0);
        assert!(!catalog.is_ready());
        assert!(catalog.last_update().is_none());
        assert!(!catalog.cache.exists().await);
    }
}
