//! Source models.

use std::path::Path;

/// What kind of thing a directory listing entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else the host reports. Never crawled.
    Other,
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// File or directory name, without any parent path.
    pub name: String,
    pub kind: EntryKind,
}
impl Entry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    /// File stem, if this entry is a file with exactly the given extension.
    ///
    /// ```
    /// use itemdb_source::Entry;
    /// assert_eq!(Entry::file("ak74.json").stem_if_extension("json"), Some("ak74"));
    /// assert_eq!(Entry::file("README.md").stem_if_extension("json"), None);
    /// assert_eq!(Entry::file("AK74.JSON").stem_if_extension("json"), None);
    /// assert_eq!(Entry::dir("ak74.json").stem_if_extension("json"), None);
    /// ```
    pub fn stem_if_extension(&self, extension: &str) -> Option<&str> {
        if self.kind != EntryKind::File {
            return None;
        }
        let path = Path::new(&self.name);
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == extension => path.file_stem().and_then(|s| s.to_str()),
            _ => None,
        }
    }
}
