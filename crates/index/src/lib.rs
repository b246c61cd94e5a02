//! Per-realm search index.
//!
//! Each realm's records live in an immutable [`RealmIndex`]; the
//! [`SearchIndex`] maps realm names to the current generation behind an
//! `Arc`. Publishing a realm swaps that one `Arc` under the write lock, so a
//! query sees either the whole old generation or the whole new one. Queries
//! hold the read lock only long enough to clone the `Arc`.

mod realm;

pub use crate::realm::RealmIndex;

use itemdb_extract::models::Record;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct SearchIndex {
    realms: RwLock<HashMap<String, Arc<RealmIndex>>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one realm's records with a freshly built index, returning the
    /// previous generation if there was one.
    pub fn publish(&self, index: RealmIndex) -> Option<Arc<RealmIndex>> {
        let realm = index.realm().to_string();
        let items = index.len();
        // Every write is a single insert, so a poisoned map is still consistent.
        let mut realms = self.realms.write().unwrap_or_else(PoisonError::into_inner);
        let previous = realms.insert(realm.clone(), Arc::new(index));
        drop(realms);
        tracing::debug!(realm = %realm, items, replaced = previous.is_some(), "Published realm index");
        previous
    }

    /// Publish several realms, one at a time.
    pub fn publish_all(&self, indexes: impl IntoIterator<Item = RealmIndex>) {
        for index in indexes {
            self.publish(index);
        }
    }

    /// The current generation of a realm, if it was ever published.
    pub fn realm(&self, realm: &str) -> Option<Arc<RealmIndex>> {
        self.realms.read().unwrap_or_else(PoisonError::into_inner).get(realm).cloned()
    }

    /// Names of all published realms, sorted.
    pub fn realms(&self) -> Vec<String> {
        let mut names: Vec<_> = self.realms.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        names.sort();
        names
    }

    /// Search one realm. Unknown realms have no matches.
    pub fn search(&self, realm: &str, query: &str, limit: usize) -> Vec<Record> {
        self.realm(realm).map(|index| index.search(query, limit)).unwrap_or_default()
    }

    pub fn get_by_id(&self, realm: &str, id: &str) -> Option<Record> {
        self.realm(realm)?.get_by_id(id).cloned()
    }

    pub fn list_all(&self, realm: &str, category: Option<&str>) -> Vec<Record> {
        self.realm(realm).map(|index| index.list_all(category)).unwrap_or_default()
    }

    pub fn categories(&self, realm: &str) -> Vec<String> {
        self.realm(realm).map(|index| index.categories()).unwrap_or_default()
    }

    /// Number of records in one realm; zero for unknown realms.
    pub fn len(&self, realm: &str) -> usize {
        self.realm(realm).map_or(0, |index| index.len())
    }

    /// Number of records across all realms.
    pub fn total_items(&self) -> usize {
        self.realms.read().unwrap_or_else(PoisonError::into_inner).values().map(|index| index.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Copy of every realm's records in stored order, for persisting.
    pub fn to_records(&self) -> BTreeMap<String, Vec<Record>> {
        let realms: Vec<_> = self.realms.read().unwrap_or_else(PoisonError::into_inner).values().cloned().collect();
        realms.into_iter().map(|index| (index.realm().to_string(), index.records().to_vec())).collect()
    }
}

impl FromIterator<RealmIndex> for SearchIndex {
    fn from_iter<T: IntoIterator<Item = RealmIndex>>(iter: T) -> Self {
        let index = Self::new();
        index.publish_all(iter);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn record(realm: &str, id: &str, name: &str) -> Record {
        Record {
            id: id.to_string(),
            realm: realm.to_string(),
            category: "weapon/pistol".to_string(),
            display_name: name.to_string(),
            name_variants: BTreeMap::new(),
            icon_ref: format!("mock://{realm}/icons/weapon/pistol/{id}.png"),
        }
    }

    fn generation(realm: &str, tag: &str, count: usize) -> RealmIndex {
        let records = (0..count).map(|n| record(realm, &format!("{tag}{n}"), &format!("{tag} item {n}")));
        RealmIndex::from_records(realm, records)
    }

    #[test]
    fn test_unknown_realm_is_empty() {
        let index = SearchIndex::new();
        assert!(index.search("ru", "", 10).is_empty());
        assert!(index.get_by_id("ru", "a").is_none());
        assert!(index.list_all("ru", None).is_empty());
        assert!(index.categories("ru").is_empty());
        assert_eq!(index.len("ru"), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_realms_are_partitioned() {
        let index: SearchIndex = [generation("ru", "a", 2), generation("global", "b", 3)].into_iter().collect();
        assert_eq!(index.realms(), ["global", "ru"]);
        assert_eq!(index.total_items(), 5);
        assert_eq!(index.len("ru"), 2);
        assert!(index.get_by_id("ru", "b0").is_none());
        assert_eq!(index.get_by_id("global", "b0").map(|record| record.realm), Some("global".to_string()));
        let snapshot = index.to_records();
        assert_eq!(snapshot["global"].len(), 3);
        assert_eq!(snapshot["ru"][1].id, "a1");
    }

    #[test]
    fn test_publish_replaces_whole_realm() {
        let index = SearchIndex::new();
        assert!(index.publish(generation("ru", "old", 3)).is_none());
        let previous = index.publish(generation("ru", "new", 1));
        assert_eq!(previous.map(|realm| realm.len()), Some(3));
        assert_eq!(index.len("ru"), 1);
        assert!(index.get_by_id("ru", "old0").is_none());
        assert!(index.get_by_id("ru", "new0").is_some());
    }

    #[test]
    fn test_readers_see_whole_generations() {
        let index = Arc::new(SearchIndex::new());
        index.publish(generation("ru", "old", 50));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let found = index.search("ru", "", usize::MAX);
                        let old = found.iter().filter(|record| record.id.starts_with("old")).count();
                        let new = found.iter().filter(|record| record.id.starts_with("new")).count();
                        assert!(
                            (old, new) == (50, 0) || (old, new) == (0, 80),
                            "mixed generation: {old} old, {new} new"
                        );
                    }
                })
            })
            .collect();
        index.publish(generation("ru", "new", 80));
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(index.len("ru"), 80);
    }
}
