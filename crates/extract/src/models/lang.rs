//! Language preference for display-name resolution.

/// Which translation of a name to show, in order of preference.
///
/// Each realm has a primary language; names missing in that language fall
/// back to one shared fallback language before any other translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePolicy {
    /// The realm's own language code (e.g. `ru`).
    pub primary: String,
    /// Tried when the primary language has no usable entry (e.g. `en`).
    pub fallback: String,
}
impl LanguagePolicy {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    /// Language codes in the order they are tried before "any entry".
    ///
    /// ```
    /// use itemdb_extract::models::LanguagePolicy;
    /// assert_eq!(LanguagePolicy::new("ru", "en").preferred().collect::<Vec<_>>(), ["ru", "en"]);
    /// assert_eq!(LanguagePolicy::new("en", "en").preferred().collect::<Vec<_>>(), ["en"]);
    /// ```
    pub fn preferred(&self) -> impl Iterator<Item = &str> {
        let fallback = (self.fallback != self.primary).then_some(self.fallback.as_str());
        std::iter::once(self.primary.as_str()).chain(fallback)
    }
}
impl Default for LanguagePolicy {
    fn default() -> Self {
        Self::new("en", "en")
    }
}
