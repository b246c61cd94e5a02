//! Remote key validation.
//!
//! Remote paths are relative to a realm's item root and are turned into URL
//! segments, so they must be plain: UTF-8, no `..`, no roots, no null bytes.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path};

/// Validates a remote path and returns it as a `/`-joined key.
///
/// Unlike a local filesystem path, a remote key never needs to climb: any `..`
/// is rejected outright instead of being resolved.
///
/// # Examples
///
/// ```
/// use itemdb_source::validate_path;
/// assert_eq!(validate_path("weapon/pistol").unwrap(), "weapon/pistol");
/// assert_eq!(validate_path("./weapon//pistol/").unwrap(), "weapon/pistol");
/// assert!(validate_path("weapon/../pistol").is_err());
/// assert!(validate_path("").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(path.to_string_lossy().into_owned());
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => {
                let Some(segment) = s.to_str() else {
                    exn::bail!(invalid());
                };
                // Null bytes and stray backslashes have no business in a URL path.
                if segment.contains(['\0', '\\']) {
                    exn::bail!(invalid());
                }
                segments.push(segment);
            },
            Component::CurDir => {},
            Component::RootDir | Component::ParentDir | Component::Prefix(_) => exn::bail!(invalid()),
        }
    }
    if segments.is_empty() {
        exn::bail!(invalid());
    }
    Ok(segments.join("/"))
}

/// Remote key of `path` inside `realm`'s item tree.
pub(crate) fn item_key(realm: &str, path: &Path) -> Result<String> {
    let realm = validate(realm)?;
    Ok(format!("{realm}/items/{}", validate(path)?))
}
