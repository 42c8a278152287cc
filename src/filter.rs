//! Case-insensitive file extension filtering over [`VirtualFileSystem`] listings.

use tracing::debug;

use crate::core::{Result, VirtualFileSystem, utils};

/// Accepts entry names ending with one of a set of suffixes, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// Builds a filter from suffixes such as `".jar"` or `"txt"`.
    /// An empty suffix list accepts nothing.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn accepts(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Lists `dir` and keeps the accepted child names, in listing order.
    pub fn filter_listing<V>(&self, vfs: &V, dir: &str) -> Result<Vec<String>>
    where
        V: VirtualFileSystem + ?Sized,
    {
        let mut names = vfs.list_entries(dir)?;
        names.retain(|name| self.accepts(name));
        debug!(dir, kept = names.len(), "filtered listing");
        Ok(names)
    }
}

/// Expands a trailing `*suffix` wildcard into the matching entries of its directory.
///
/// `docs/*.txt` lists `docs` and returns `docs/<child>` for every child ending with `.txt`
/// (case-insensitive). A pattern without a leading `*` in its last segment is returned
/// unchanged as the only element.
pub fn expand_pattern<V>(vfs: &V, pattern: &str) -> Result<Vec<String>>
where
    V: VirtualFileSystem + ?Sized,
{
    let normalized = utils::normalize(pattern)?;
    let (dir, last) = utils::split_last(&normalized);
    let Some(suffix) = last.strip_prefix('*') else {
        return Ok(vec![pattern.to_string()]);
    };

    let filter = ExtensionFilter::new([suffix]);
    Ok(filter
        .filter_listing(vfs, dir)?
        .into_iter()
        .map(|child| utils::join(dir, &child))
        .collect())
}
