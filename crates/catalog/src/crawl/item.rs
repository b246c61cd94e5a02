use crate::crawl::error::{ErrorKind, Result};
use exn::ResultExt;
use itemdb_extract::models::{ItemKey, LanguagePolicy};
use itemdb_extract::{Item, extract_item};
use itemdb_source::SourceHandle;
use std::path::PathBuf;

/// Path of an item document below its realm's item root.
fn document_path(key: &ItemKey) -> PathBuf {
    PathBuf::from(&key.category).join(format!("{}.json", key.id))
}

/// Download one item document and extract its record.
///
/// A document that does not exist is reported as
/// [`NotFound`](ErrorKind::NotFound), distinct from transport failures.
pub async fn fetch_item(source: &SourceHandle, key: &ItemKey, policy: &LanguagePolicy) -> Result<Item> {
    let bytes = match source.read(&key.realm, &document_path(key)).await {
        Ok(bytes) => bytes,
        Err(err) if err.is_not_found() => return Err(err).or_raise(|| ErrorKind::NotFound(key.to_string())),
        Err(err) => return Err(err).or_raise(|| ErrorKind::Download(key.to_string())),
    };
    let icon_ref = source.icon_ref(&key.realm, &key.category, &key.id);
    extract_item(bytes, key, policy, icon_ref).or_raise(|| ErrorKind::Extract(key.to_string()))
}
