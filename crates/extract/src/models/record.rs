use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Where an item was discovered: its realm, the category it was listed under,
/// and its identifier (file stem of the item document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub realm: String,
    /// Category path as configured, e.g. `weapon/pistol`.
    pub category: String,
    pub id: String,
}
impl ItemKey {
    pub fn new(realm: impl Into<String>, category: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            category: category.into(),
            id: id.into(),
        }
    }
}
impl Display for ItemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}/{}", self.realm, self.category, self.id)
    }
}

/// The searchable summary of one item in one realm.
///
/// This is what gets indexed, cached and returned from queries. The full
/// item document is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub realm: String,
    pub category: String,
    /// Never empty: falls back to the id when the document has no usable name.
    pub display_name: String,
    /// Lowercased translations by language code. May be empty.
    #[serde(default)]
    pub name_variants: BTreeMap<String, String>,
    /// Locator of the item's icon in the remote repository.
    pub icon_ref: String,
}
impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}
impl Record {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.realm, &self.category, &self.id)
    }
}
