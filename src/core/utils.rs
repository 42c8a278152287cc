//! Entry name handling shared by all backends.
//!
//! Names are `/`-delimited. A normalized name has no leading or trailing `/`,
//! no empty, `.` or `..` segments. The empty normalized name is the root.

use super::{Result, VfsError};

/// Normalizes `name` into its canonical form.
///
/// `..` pops the previous segment; popping past the root is an error.
pub fn normalize(name: &str) -> Result<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(VfsError::invalid_name(name, "escapes the root"));
                }
            }
            s if s.contains('\\') || s.contains('\0') => {
                return Err(VfsError::invalid_name(name, "contains a forbidden character"));
            }
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

/// Normalizes `name` and rejects the root, which is never an entry itself.
pub fn normalize_entry(name: &str) -> Result<String> {
    let normalized = normalize(name)?;
    if is_root(&normalized) {
        return Err(VfsError::invalid_name(name, "the root is not an entry"));
    }
    Ok(normalized)
}

pub fn is_root(normalized: &str) -> bool {
    normalized.is_empty()
}

/// Iterates over the strict ancestors of a normalized name, outermost first.
/// The root is not yielded.
pub fn ancestors(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .match_indices('/')
        .map(move |(idx, _)| &normalized[..idx])
}

/// Joins a normalized directory name and a child segment.
pub fn join(dir: &str, child: &str) -> String {
    if is_root(dir) {
        child.to_string()
    } else {
        format!("{dir}/{child}")
    }
}

/// Splits a normalized name into its parent and last segment.
pub fn split_last(normalized: &str) -> (&str, &str) {
    match normalized.rfind('/') {
        Some(idx) => (&normalized[..idx], &normalized[idx + 1..]),
        None => ("", normalized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize("/docs/note.txt").unwrap(), "docs/note.txt");
        assert_eq!(normalize("docs//note.txt/").unwrap(), "docs/note.txt");
        assert_eq!(normalize("./docs/./note.txt").unwrap(), "docs/note.txt");
        assert_eq!(normalize("docs/tmp/../note.txt").unwrap(), "docs/note.txt");
        assert_eq!(normalize("").unwrap(), "");
        assert_eq!(normalize("/").unwrap(), "");
        assert_eq!(normalize("docs/..").unwrap(), "");
    }

    #[test]
    fn test_normalize_rejects_escape() {
        let err = normalize("../etc/passwd").unwrap_err();
        assert!(err.is_invalid_name());
        assert!(normalize("docs/../../x").is_err());
    }

    #[test]
    fn test_normalize_rejects_forbidden_chars() {
        assert!(normalize("docs\\note.txt").unwrap_err().is_invalid_name());
        assert!(normalize("a\0b").unwrap_err().is_invalid_name());
    }

    #[test]
    fn test_normalize_entry_rejects_root() {
        assert!(normalize_entry("/").unwrap_err().is_invalid_name());
        assert!(normalize_entry("a/..").unwrap_err().is_invalid_name());
        assert_eq!(normalize_entry("/a").unwrap(), "a");
    }

    #[test]
    fn test_ancestors() {
        let parents: Vec<_> = ancestors("a/b/c.txt").collect();
        assert_eq!(parents, vec!["a", "a/b"]);
        assert_eq!(ancestors("top").count(), 0);
    }

    #[test]
    fn test_join_and_split() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a/b", "c"), "a/b/c");
        assert_eq!(split_last("a/b/c"), ("a/b", "c"));
        assert_eq!(split_last("c"), ("", "c"));
    }
}
