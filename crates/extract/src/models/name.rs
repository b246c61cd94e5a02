//! The `name` field of an item document.

use super::LanguagePolicy;
use serde_json::Value;
use std::collections::BTreeMap;

/// An item's name as found in its document.
///
/// Documents describe names either as a translation table
/// (`{"type": "translation", "lines": {"ru": "...", "en": "..."}}`) or as a
/// single text (`{"type": "text", "text": "..."}`, or just a string). Anything
/// else is [`Missing`](Self::Missing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemName {
    /// Language code to translated text; non-string lines are dropped.
    Translation(BTreeMap<String, String>),
    Text(String),
    Missing,
}

fn usable(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

impl ItemName {
    /// Interpret a loosely-typed `name` value. Never fails: unknown shapes are
    /// [`Missing`](Self::Missing).
    pub fn from_value(value: Option<&Value>) -> Self {
        let map = match value {
            Some(Value::String(text)) => return Self::Text(text.clone()),
            Some(Value::Object(map)) => map,
            _ => return Self::Missing,
        };
        let kind = map.get("type").and_then(Value::as_str);
        let lines = map.get("lines").and_then(Value::as_object);
        let text = map.get("text").and_then(Value::as_str);
        match (kind, lines, text) {
            (Some("translation") | None, Some(lines), _) => Self::Translation(
                lines.iter().filter_map(|(lang, line)| Some((lang.clone(), line.as_str()?.to_string()))).collect(),
            ),
            (Some("text") | None, _, Some(text)) => Self::Text(text.to_string()),
            _ => Self::Missing,
        }
    }

    /// Pick the display text according to `policy`.
    ///
    /// Translations try the primary language, then the fallback language,
    /// then any other entry (lowest language code first). Blank entries are
    /// never picked. `None` means the caller has to fall back to the item id.
    pub fn resolve(&self, policy: &LanguagePolicy) -> Option<&str> {
        match self {
            Self::Translation(lines) => policy
                .preferred()
                .find_map(|lang| lines.get(lang).and_then(|line| usable(line)))
                .or_else(|| lines.values().find_map(|line| usable(line))),
            Self::Text(text) => usable(text),
            Self::Missing => None,
        }
    }

    /// Lowercase form of every non-blank translation, keyed by language.
    ///
    /// Plain-text names have no language, and so no variants.
    pub fn variants(&self) -> BTreeMap<String, String> {
        match self {
            Self::Translation(lines) => lines
                .iter()
                .filter_map(|(lang, line)| usable(line).map(|line| (lang.clone(), line.to_lowercase())))
                .collect(),
            Self::Text(_) | Self::Missing => BTreeMap::new(),
        }
    }
}
