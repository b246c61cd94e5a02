use crate::crawl::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::future::try_join_all;
use itemdb_source::{Entry, EntryKind, SourceHandle};
use std::path::Path;

const ITEM_EXTENSION: &str = "json";

/// Ids of the documents directly inside `entries`, qualified by `prefix`.
fn ids_in<'a>(entries: &'a [Entry], prefix: Option<&'a str>) -> impl Iterator<Item = String> + 'a {
    entries.iter().filter_map(move |entry| entry.stem_if_extension(ITEM_EXTENSION)).map(move |stem| match prefix {
        Some(prefix) => format!("{prefix}/{stem}"),
        None => stem.to_string(),
    })
}

/// List the item ids of one category in one realm.
///
/// Documents directly in the category contribute their file stem. Every
/// subdirectory that is not a service directory is listed once more and its
/// documents contribute `"{subdir}/{stem}"`; nothing deeper is visited. Those
/// subdirectory listings run concurrently (each still takes its own permit
/// from the source's limiter).
///
/// A category or subdirectory that does not exist contributes no ids. Any
/// other listing failure fails the whole category.
pub async fn list_category(
    source: &SourceHandle,
    realm: &str,
    category: &str,
    service_dirs: &[String],
) -> Result<Vec<String>> {
    let failed = || ErrorKind::Listing {
        realm: realm.to_string(),
        category: category.to_string(),
    };
    let entries = match source.list(realm, Path::new(category)).await {
        Ok(entries) => entries,
        Err(err) if err.is_not_found() => {
            tracing::debug!(realm, category, "Category does not exist");
            return Ok(Vec::new());
        },
        Err(err) => return Err(err).or_raise(failed),
    };

    let subdirs: Vec<&str> = entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Dir && !service_dirs.contains(&entry.name))
        .map(|entry| entry.name.as_str())
        .collect();
    let nested = try_join_all(subdirs.iter().map(|subdir| async move {
        match source.list(realm, &Path::new(category).join(subdir)).await {
            Ok(entries) => Ok((*subdir, entries)),
            Err(err) if err.is_not_found() => Ok((*subdir, Vec::new())),
            Err(err) => Err(err),
        }
    }))
    .await
    .or_raise(failed)?;

    let mut ids: Vec<String> = ids_in(&entries, None).collect();
    for (subdir, entries) in &nested {
        ids.extend(ids_in(entries, Some(subdir)));
    }
    tracing::debug!(realm, category, items = ids.len(), subdirs = nested.len(), "Listed category");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemdb_source::backend::MockSource;
    use std::sync::Arc;

    fn service_dirs() -> Vec<String> {
        vec!["_variants".to_string(), "_deprecated".to_string()]
    }

    fn doc() -> Vec<u8> {
        br#"{"name": "x"}"#.to_vec()
    }

    #[tokio::test]
    async fn test_one_level_of_subdirectories() {
        let source: SourceHandle = Arc::new(MockSource::with_files([
            ("ru/weapon/pistol/a.json", doc()),
            ("ru/weapon/pistol/b.json", doc()),
            ("ru/weapon/pistol/variant1/c.json", doc()),
        ]));
        let ids = list_category(&source, "ru", "weapon/pistol", &service_dirs()).await.unwrap();
        assert_eq!(ids, ["a", "b", "variant1/c"]);
    }

    #[tokio::test]
    async fn test_service_and_deeper_directories_are_skipped() {
        let mock = Arc::new(MockSource::with_files([
            ("ru/artifact/a.json", doc()),
            ("ru/artifact/b.json", doc()),
            ("ru/artifact/_variants/hidden.json", doc()),
            ("ru/artifact/sub/c.json", doc()),
            ("ru/artifact/sub/d.json", doc()),
            ("ru/artifact/sub/e.json", doc()),
            ("ru/artifact/sub/deeper/f.json", doc()),
            ("ru/artifact/notes.txt", doc()),
        ]));
        let source: SourceHandle = mock.clone();
        let ids = list_category(&source, "ru", "artifact", &service_dirs()).await.unwrap();
        assert_eq!(ids, ["a", "b", "sub/c", "sub/d", "sub/e"]);
        assert_eq!(mock.requests_for("ru", "artifact/_variants"), 0);
        assert_eq!(mock.requests_for("ru", "artifact/sub/deeper"), 0);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_extension_is_case_sensitive() {
        let source: SourceHandle = Arc::new(MockSource::with_files([
            ("ru/artifact/a.json", doc()),
            ("ru/artifact/LOUD.JSON", doc()),
            ("ru/artifact/sub/Quiet.Json", doc()),
        ]));
        let ids = list_category(&source, "ru", "artifact", &service_dirs()).await.unwrap();
        assert_eq!(ids, ["a"]);
    }

    #[tokio::test]
    async fn test_missing_category_is_empty() {
        let source: SourceHandle = Arc::new(MockSource::with_files([("ru/ammo/9x18.json", doc())]));
        let ids = list_category(&source, "ru", "weapon/pistol", &service_dirs()).await.unwrap();
        assert!(ids.is_empty());
        let ids = list_category(&source, "global", "ammo", &service_dirs()).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_fails_category() {
        let source: SourceHandle =
            Arc::new(MockSource::with_files([("ru/armor/a.json", doc())]).fail_listing("ru", "armor"));
        let err = list_category(&source, "ru", "armor", &service_dirs()).await.unwrap_err();
        assert_eq!(
            *err,
            ErrorKind::Listing {
                realm: "ru".to_string(),
                category: "armor".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_subdirectory_failure_fails_category() {
        let source: SourceHandle = Arc::new(
            MockSource::with_files([("ru/armor/a.json", doc()), ("ru/armor/heavy/b.json", doc())])
                .fail_listing("ru", "armor/heavy"),
        );
        let err = list_category(&source, "ru", "armor", &service_dirs()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Listing { category, .. } if category == "armor"));
    }
}
