use itemdb_extract::models::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

/// Contents of `metadata.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// When the snapshot was produced, serialized as RFC 3339 in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
    /// Sum of all realms' record counts at the time of the snapshot.
    pub total_items: usize,
}
impl Metadata {
    /// Time since the snapshot was produced. Negative if `now` is earlier
    /// (clock skew).
    pub fn age(&self, now: OffsetDateTime) -> Duration {
        now - self.last_update
    }
}

/// Everything persisted in one cache write: every realm's records, in index
/// order, plus the metadata describing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub realms: BTreeMap<String, Vec<Record>>,
    pub metadata: Metadata,
}
impl Snapshot {
    /// Snapshot of `realms` taken at `now`; `total_items` is derived.
    pub fn new(realms: BTreeMap<String, Vec<Record>>, now: OffsetDateTime) -> Self {
        let total_items = realms.values().map(Vec::len).sum();
        Self {
            realms,
            metadata: Metadata {
                last_update: now.to_offset(time::UtcOffset::UTC),
                total_items,
            },
        }
    }
}

/// Whether a cache described by `metadata` must be rebuilt.
///
/// Absent metadata is always expired. Otherwise the cache expires once it is
/// strictly older than `ttl`.
pub fn is_expired(metadata: Option<&Metadata>, ttl: Duration, now: OffsetDateTime) -> bool {
    metadata.is_none_or(|metadata| metadata.age(now) > ttl)
}
