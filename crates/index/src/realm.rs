use itemdb_extract::models::Record;
use std::collections::HashMap;

/// Lowercased text a record can be found by. Name variants are already
/// lowercase on the record itself.
#[derive(Debug, Clone)]
struct Keys {
    id: String,
    display_name: String,
}
impl Keys {
    fn of(record: &Record) -> Self {
        Self {
            id: record.id.to_lowercase(),
            display_name: record.display_name.to_lowercase(),
        }
    }

    fn matches(&self, record: &Record, query: &str) -> bool {
        self.id.contains(query)
            || self.display_name.contains(query)
            || record.name_variants.values().any(|variant| variant.contains(query))
    }
}

/// All records of one realm, in crawl order, with an id lookup.
///
/// Immutable once built: a new crawl builds a new `RealmIndex` and replaces
/// the old one wholesale.
#[derive(Debug, Clone, Default)]
pub struct RealmIndex {
    realm: String,
    records: Vec<Record>,
    keys: Vec<Keys>,
    by_id: HashMap<String, usize>,
}

impl RealmIndex {
    /// Build an index from records in the order they were produced.
    ///
    /// Duplicate ids keep the position of their first occurrence and the
    /// contents of their last.
    pub fn from_records(realm: impl Into<String>, records: impl IntoIterator<Item = Record>) -> Self {
        let mut index = Self {
            realm: realm.into(),
            ..Self::default()
        };
        for record in records {
            let keys = Keys::of(&record);
            match index.by_id.get(&record.id) {
                Some(&position) => {
                    index.records[position] = record;
                    index.keys[position] = keys;
                },
                None => {
                    index.by_id.insert(record.id.clone(), index.records.len());
                    index.records.push(record);
                    index.keys.push(keys);
                },
            }
        }
        index
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Case-insensitive substring search over id, display name and every name
    /// variant, in stored order, stopping after `limit` matches.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Record> {
        if limit == 0 {
            return Vec::new();
        }
        let query = query.to_lowercase();
        self.records
            .iter()
            .zip(&self.keys)
            .filter(|(record, keys)| keys.matches(record, &query))
            .map(|(record, _)| record.clone())
            .take(limit)
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&position| &self.records[position])
    }

    /// Every record, or only those whose category is exactly `category`.
    pub fn list_all(&self, category: Option<&str>) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| category.is_none_or(|category| record.category == category))
            .cloned()
            .collect()
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::<&str>::new();
        for record in &self.records {
            if !seen.contains(&record.category.as_str()) {
                seen.push(&record.category);
            }
        }
        seen.into_iter().map(ToString::to_string).collect()
    }
}
