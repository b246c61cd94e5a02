use crate::crawl::error::Error;
use crate::crawl::{Crawler, fetch_item, list_category};
use async_stream::stream;
use futures::Stream;
use itemdb_extract::models::{ItemKey, Record};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

/// Progress events emitted by [`crawl`].
///
/// Events follow this ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`CategoryListed`](Self::CategoryListed) or
///    [`CategoryFailed`](Self::CategoryFailed), once per realm and category.
/// 3. [`Fetched`](Self::Fetched) or [`Skipped`](Self::Skipped), once per
///    listed item, always after the `CategoryListed` that announced it.
/// 4. [`RealmComplete`](Self::RealmComplete), once per realm, after every
///    other event of that realm.
/// 5. [`Complete`](Self::Complete), exactly once, last.
///
/// Realms are crawled concurrently, so events of different realms interleave.
#[derive(Debug)]
pub enum CrawlEvent {
    Started { realms: Vec<String>, categories: usize },
    /// A category was listed; this many items will follow for it.
    CategoryListed { realm: String, category: String, items: usize },
    /// A category could not be listed and counts as empty.
    CategoryFailed { realm: String, category: String, error: Error },
    Fetched(Box<Record>),
    /// An item was listed but produced no record.
    Skipped { key: ItemKey, error: Error },
    /// Every category and item of this realm is done.
    RealmComplete { realm: String, summary: CrawlSummary },
    Complete(CrawlSummary),
}
impl CrawlEvent {
    fn realm(&self) -> Option<&str> {
        match self {
            Self::CategoryListed { realm, .. } | Self::CategoryFailed { realm, .. } => Some(realm),
            Self::Fetched(record) => Some(&record.realm),
            Self::Skipped { key, .. } => Some(&key.realm),
            Self::Started { .. } | Self::RealmComplete { .. } | Self::Complete(_) => None,
        }
    }
}

/// Counts of what a crawl (or one realm of it) produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub failed_categories: usize,
}
impl CrawlSummary {
    fn record(&mut self, event: &CrawlEvent) {
        match event {
            CrawlEvent::Fetched(_) => self.fetched += 1,
            CrawlEvent::Skipped { .. } => self.skipped += 1,
            CrawlEvent::CategoryFailed { .. } => self.failed_categories += 1,
            _ => {},
        }
    }
}

/// Outstanding work of one realm.
struct RealmProgress {
    categories: usize,
    items: usize,
    summary: CrawlSummary,
    finished: bool,
}
impl RealmProgress {
    fn new(categories: usize) -> Self {
        Self {
            categories,
            items: 0,
            summary: CrawlSummary::default(),
            finished: false,
        }
    }

    fn record(&mut self, event: &CrawlEvent) {
        match event {
            CrawlEvent::CategoryListed { items, .. } => {
                self.categories = self.categories.saturating_sub(1);
                self.items += items;
            },
            CrawlEvent::CategoryFailed { .. } => self.categories = self.categories.saturating_sub(1),
            CrawlEvent::Fetched(_) | CrawlEvent::Skipped { .. } => self.items = self.items.saturating_sub(1),
            _ => {},
        }
        self.summary.record(event);
    }

    /// The realm's summary, the first time it has nothing outstanding.
    fn finish(&mut self, force: bool) -> Option<CrawlSummary> {
        if self.finished || !(force || (self.categories == 0 && self.items == 0)) {
            return None;
        }
        self.finished = true;
        Some(self.summary)
    }
}

struct FetchJob {
    key: ItemKey,
}

async fn run_lister(
    crawler: Arc<Crawler>,
    realm: String,
    category: String,
    jobs: mpsc::Sender<FetchJob>,
    events: mpsc::UnboundedSender<CrawlEvent>,
) {
    match list_category(&crawler.source, &realm, &category, &crawler.service_dirs).await {
        Ok(ids) => {
            tracing::info!(realm, category, items = ids.len(), "Listed category");
            let listed = CrawlEvent::CategoryListed {
                realm: realm.clone(),
                category: category.clone(),
                items: ids.len(),
            };
            // Announce the count before any of the items can be reported.
            if events.send(listed).is_err() {
                return;
            }
            for id in ids {
                let key = ItemKey::new(&realm, &category, id);
                if jobs.send(FetchJob { key }).await.is_err() {
                    return;
                }
            }
        },
        Err(error) => {
            tracing::warn!(realm, category, error = %error, "Category listing failed; counting it as empty");
            let _ = events.send(CrawlEvent::CategoryFailed { realm, category, error });
        },
    }
}

async fn run_worker(
    crawler: Arc<Crawler>,
    jobs: Arc<Mutex<mpsc::Receiver<FetchJob>>>,
    events: mpsc::UnboundedSender<CrawlEvent>,
) {
    loop {
        let Some(FetchJob { key }) = jobs.lock().await.recv().await else {
            break;
        };
        let policy = crawler.policy(&key.realm);
        let event = match fetch_item(&crawler.source, &key, &policy).await {
            Ok(item) => CrawlEvent::Fetched(Box::new(item.record)),
            Err(error) => {
                tracing::warn!(item = %key, error = %error, "Skipping item");
                CrawlEvent::Skipped { key, error }
            },
        };
        if events.send(event).is_err() {
            break;
        }
    }
}

/// Streams [`CrawlEvent`]s while crawling every configured category of every
/// realm in `realms` (duplicates ignored).
///
/// One lister task per realm and category pushes fetch jobs into a bounded
/// queue; `crawler.workers` worker tasks drain it. Failures never end the
/// stream: a category that cannot be listed is reported as
/// [`CategoryFailed`](CrawlEvent::CategoryFailed) and an item that cannot be
/// fetched as [`Skipped`](CrawlEvent::Skipped).
///
/// Dropping the stream aborts every task it spawned.
pub fn crawl(crawler: Arc<Crawler>, realms: Vec<String>) -> impl Stream<Item = CrawlEvent> + Send + 'static {
    let mut unique = Vec::with_capacity(realms.len());
    for realm in realms {
        if !unique.contains(&realm) {
            unique.push(realm);
        }
    }
    let realms = unique;
    stream!({
        yield CrawlEvent::Started {
            realms: realms.clone(),
            categories: crawler.categories.len(),
        };
        let mut progress: HashMap<String, RealmProgress> =
            realms.iter().map(|realm| (realm.clone(), RealmProgress::new(crawler.categories.len()))).collect();
        let mut total = CrawlSummary::default();

        let (job_tx, job_rx) = mpsc::channel(crawler.queue_capacity.max(1));
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();
        for realm in &realms {
            for category in &crawler.categories {
                let (crawler, jobs, events) = (Arc::clone(&crawler), job_tx.clone(), event_tx.clone());
                tasks.spawn(run_lister(crawler, realm.clone(), category.clone(), jobs, events));
            }
        }
        drop(job_tx);
        let job_rx = Arc::new(Mutex::new(job_rx));
        for _ in 0..crawler.workers.max(1) {
            tasks.spawn(run_worker(Arc::clone(&crawler), Arc::clone(&job_rx), event_tx.clone()));
        }
        drop(event_tx);

        // Realms with no categories have nothing outstanding from the start.
        for realm in &realms {
            let finished = progress.get_mut(realm).and_then(|realm| realm.finish(false));
            if let Some(summary) = finished {
                yield CrawlEvent::RealmComplete { realm: realm.clone(), summary };
            }
        }

        // Ends once every task has dropped its sender.
        while let Some(event) = event_rx.recv().await {
            let realm = event.realm().map(ToString::to_string);
            total.record(&event);
            let finished = realm.as_ref().and_then(|realm| progress.get_mut(realm)).and_then(|progress| {
                progress.record(&event);
                progress.finish(false)
            });
            yield event;
            if let (Some(realm), Some(summary)) = (realm, finished) {
                tracing::info!(realm, fetched = summary.fetched, skipped = summary.skipped, "Realm crawled");
                yield CrawlEvent::RealmComplete { realm, summary };
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Crawl task died");
            }
        }
        // Only reachable if a task died with work outstanding.
        for realm in &realms {
            let finished = progress.get_mut(realm).and_then(|realm| realm.finish(true));
            if let Some(summary) = finished {
                tracing::warn!(realm, "Realm crawl ended with work outstanding");
                yield CrawlEvent::RealmComplete { realm: realm.clone(), summary };
            }
        }

        tracing::info!(
            fetched = total.fetched,
            skipped = total.skipped,
            failed_categories = total.failed_categories,
            "Crawl complete"
        );
        yield CrawlEvent::Complete(total);
    })
}
