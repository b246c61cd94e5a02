pub mod error;
pub mod models;

use exn::ResultExt;
use serde_json::Value;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::{ItemKey, ItemName, LanguagePolicy, Record};

/// A fully downloaded item: the raw document and the record extracted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub record: Record,
    /// The loosely-typed document exactly as the source served it.
    pub document: Value,
}

/// Identifiers are file stems, optionally qualified by one subdirectory
/// (`variant1/sword01`). Empty segments are never valid.
fn check_id(id: &str) -> Result<&str> {
    let valid = !id.is_empty() && id.split('/').all(|segment| !segment.trim().is_empty()) && !id.contains('\\');
    if !valid {
        exn::bail!(ErrorKind::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Build the searchable [`Record`] for an already-parsed item document.
///
/// Unknown fields are ignored; only `name` is read. When the name is unusable
/// the display name is the last segment of the id.
pub fn record_from_document(
    document: &Value,
    key: &ItemKey,
    policy: &LanguagePolicy,
    icon_ref: String,
) -> Result<Record> {
    let id = check_id(&key.id)?;
    let Some(object) = document.as_object() else {
        exn::bail!(ErrorKind::NotAnObject);
    };
    let name = ItemName::from_value(object.get("name"));
    let display_name = match name.resolve(policy) {
        Some(resolved) => resolved.to_string(),
        None => id.rsplit('/').next().unwrap_or(id).to_string(),
    };
    Ok(Record {
        id: key.id.clone(),
        realm: key.realm.clone(),
        category: key.category.clone(),
        display_name,
        name_variants: name.variants(),
        icon_ref,
    })
}

/// Top-level entrypoint: raw document bytes to an [`Item`].
#[instrument(skip_all, fields(item = %key, size = bytes.as_ref().len()))]
pub fn extract_item(bytes: impl AsRef<[u8]>, key: &ItemKey, policy: &LanguagePolicy, icon_ref: String) -> Result<Item> {
    let document: Value = serde_json::from_slice(bytes.as_ref()).or_raise(|| ErrorKind::MalformedJson)?;
    let record = record_from_document(&document, key, policy, icon_ref)?;
    Ok(Item { record, document })
}

/// Like [`extract_item`], for callers that only need the [`Record`].
pub fn extract(bytes: impl AsRef<[u8]>, key: &ItemKey, policy: &LanguagePolicy, icon_ref: String) -> Result<Record> {
    extract_item(bytes, key, policy, icon_ref).map(|item| item.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn key(id: &str) -> ItemKey {
        ItemKey::new("ru", "weapon/pistol", id)
    }

    fn icon(id: &str) -> String {
        format!("mock://ru/icons/weapon/pistol/{id}.png")
    }

    #[test]
    fn test_extract_translation() {
        let bytes = r#"{
            "id": "pm",
            "category": "weapon/pistol",
            "name": {
                "type": "translation",
                "key": "item.wpn.pm.name",
                "lines": {"ru": "Пистолет", "en": "Pistol"}
            },
            "color": "DEFAULT",
            "infoBlocks": []
        }"#;
        let record = extract(bytes, &key("pm"), &LanguagePolicy::new("ru", "en"), icon("pm")).unwrap();
        assert_eq!(
            record,
            Record {
                id: "pm".to_string(),
                realm: "ru".to_string(),
                category: "weapon/pistol".to_string(),
                display_name: "Пистолет".to_string(),
                name_variants: BTreeMap::from([
                    ("en".to_string(), "pistol".to_string()),
                    ("ru".to_string(), "пистолет".to_string()),
                ]),
                icon_ref: icon("pm"),
            }
        );
    }

    #[test]
    fn test_extract_item_keeps_document() {
        let bytes = br#"{"name": "Bolt", "stats": {"weight": 0.1}}"#;
        let item = extract_item(bytes, &key("bolt"), &LanguagePolicy::default(), icon("bolt")).unwrap();
        assert_eq!(item.record.display_name, "Bolt");
        assert!(item.record.name_variants.is_empty());
        assert_eq!(item.document["stats"]["weight"], 0.1);
    }

    #[rstest]
    #[case::no_name("variant1/sword01", r#"{"id": "x"}"#, "sword01")]
    #[case::blank_translation("sword01", r#"{"name": {"type": "translation", "lines": {"ru": " "}}}"#, "sword01")]
    #[case::null_name("sword01", r#"{"name": null}"#, "sword01")]
    #[case::text_name("variant1/sword01", r#"{"name": {"type": "text", "text": "Sword"}}"#, "Sword")]
    fn test_display_name_fallback(#[case] id: &str, #[case] document: &str, #[case] expected: &str) {
        let record = extract(document, &key(id), &LanguagePolicy::new("ru", "en"), icon(id)).unwrap();
        assert_eq!(record.display_name, expected);
        assert_eq!(record.id, id);
    }

    #[rstest]
    #[case::truncated(r#"{"name": "#, ErrorKind::MalformedJson)]
    #[case::not_json("<html>", ErrorKind::MalformedJson)]
    #[case::array("[1, 2, 3]", ErrorKind::NotAnObject)]
    #[case::string(r#""pistol""#, ErrorKind::NotAnObject)]
    fn test_extract_failures(#[case] document: &str, #[case] expected: ErrorKind) {
        let err = extract(document, &key("pm"), &LanguagePolicy::default(), icon("pm")).unwrap_err();
        assert_eq!(*err, expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading_slash("/pm")]
    #[case::trailing_slash("variant1/")]
    #[case::blank_segment("variant1/ ")]
    #[case::backslash("variant1\\pm")]
    fn test_invalid_ids(#[case] id: &str) {
        let err = extract("{}", &key(id), &LanguagePolicy::default(), icon(id)).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidId(id.to_string()));
    }
}
