//! Mapping of logical blob keys onto object names inside the bucket.

use object_store::path::Path;

use crate::error::{Error, Result};

/// Object name separator.
pub const SEPARATOR: char = '/';

/// Joins `prefix` and `key` into an object name.
///
/// A relative key is joined to the prefix with exactly one separator, so
/// `("media/", "a.jpg")` and `("media", "a.jpg")` both map to `media/a.jpg`.
/// An absolute key (one starting with a separator) is not namespaced and
/// addresses an object at the bucket root: `("media", "/a.jpg")` maps to
/// `a.jpg`. The result never starts with a separator.
pub fn normalize_path(prefix: &str, key: &str) -> String {
    let joined = if key.starts_with(SEPARATOR) {
        key.to_string()
    } else {
        format!("{}{SEPARATOR}{key}", prefix.trim_end_matches(SEPARATOR))
    };

    joined.trim_start_matches(SEPARATOR).to_string()
}

/// Resolves `key` to the object path it is stored under.
///
/// The object name is exactly the [`normalize_path`] result; keys that do
/// not name an object, or that contain empty, `.` or `..` segments, are
/// rejected.
pub(crate) fn object_path(prefix: &str, key: &str) -> Result<Path> {
    if key.trim_matches(SEPARATOR).is_empty() {
        return Err(Error::invalid_key(key));
    }

    let name = normalize_path(prefix, key);
    Path::parse(&name).map_err(|_| Error::invalid_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_prefix_and_key() {
        assert_eq!(normalize_path("media", "a.jpg"), "media/a.jpg");
        assert_eq!(normalize_path("sites/1", "2024/01/a.jpg"), "sites/1/2024/01/a.jpg");
    }

    #[test]
    fn collapses_prefix_separators_at_the_join() {
        assert_eq!(normalize_path("media/", "a.jpg"), "media/a.jpg");
        assert_eq!(normalize_path("media//", "a.jpg"), "media/a.jpg");
    }

    #[test]
    fn strips_leading_separator() {
        assert_eq!(normalize_path("", "a.jpg"), "a.jpg");
        assert_eq!(normalize_path("/media", "a.jpg"), "media/a.jpg");
        assert_eq!(normalize_path("/", "uploads/a.jpg"), "uploads/a.jpg");
    }

    #[test]
    fn absolute_keys_skip_the_prefix() {
        assert_eq!(normalize_path("media", "/a.jpg"), "a.jpg");
        assert_eq!(normalize_path("media", "//uploads/a.jpg"), "uploads/a.jpg");
        assert_eq!(normalize_path("", "/a.jpg"), "a.jpg");
    }

    #[test]
    fn is_deterministic() {
        let first = normalize_path("media", "x/y.bin");
        let second = normalize_path("media", "x/y.bin");
        assert_eq!(first, second);
    }

    #[test]
    fn object_path_keeps_the_literal_name() {
        for (key, name) in [
            ("100%.jpg", "media/100%.jpg"),
            ("a[1].jpg", "media/a[1].jpg"),
            ("x#y.jpg", "media/x#y.jpg"),
            ("a b.jpg", "media/a b.jpg"),
        ] {
            let path = object_path("media", key).unwrap();
            assert_eq!(path.as_ref(), name);
        }
    }

    #[test]
    fn rejects_keys_that_do_not_name_an_object() {
        assert!(matches!(object_path("media", ""), Err(Error::InvalidKey(_))));
        assert!(matches!(object_path("media", "//"), Err(Error::InvalidKey(_))));
        assert!(matches!(object_path("media", "a//b.jpg"), Err(Error::InvalidKey(_))));
        assert!(matches!(object_path("media", "../a.jpg"), Err(Error::InvalidKey(_))));
        assert_eq!(object_path("media", "a").unwrap().as_ref(), "media/a");
    }
}
