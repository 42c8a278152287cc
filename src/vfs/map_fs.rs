//! This module provides a virtual filesystem (VFS) implementation that maps to a memory storage.

use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::core::{EntryReader, EntryWriter, Result, VfsError, VirtualFileSystem, utils};
use super::{Entry, EntryType};

/// A virtual file system (VFS) implementation that stores file and directory entries in memory
/// using an ordered map keyed by normalized entry names.
///
/// ### Internal state
///
/// * `entries` — The core storage map that holds all file and directory entries.
///   - Key: normalized entry name (see [`utils::normalize`]); the root is the empty string.
///   - Value: `Entry` holding its type and, for files, the content.
///   - Uses `BTreeMap` for ordered, deterministic iteration and prefix-based range queries:
///     the subtree of `a/b` is the contiguous key range starting at `a/b/`.
/// * `used` — Total number of content bytes across all files.
/// * `quota` — Optional upper bound for `used`.
///
/// ### Invariants
///
/// 1. **Root existence**: The root `""` is always present and has type `Directory`.
/// 2. **Path normalization**: All keys are normalized.
/// 3. **Parent consistency**: For any entry at `a/b/c`, entries `a` and `a/b` exist
///    and have type `Directory`.
/// 4. **Quota**: `used` never exceeds `quota`; a write that would cross it stores nothing.
///
/// ### Sharing
///
/// The storage lives behind `Arc<RwLock<..>>`. Cloning a `MapFS` yields another handle to the
/// same storage, and streams returned by [`output_stream`](VirtualFileSystem::output_stream)
/// write through to it, so written bytes are visible to readers immediately. Each `write` call
/// holds the lock for its whole buffer, so concurrent writers never interleave inside one call.
///
/// ### Example
///
/// ```
/// use vfs_sort_kit::{MapFS, VirtualFileSystem};
///
/// let fs = MapFS::new();
/// fs.write_entry("/docs/note.txt", b"Hello", false).unwrap();
/// assert_eq!(fs.read_entry("/docs/note.txt").unwrap(), b"Hello");
/// assert_eq!(fs.list_entries("/docs").unwrap(), vec!["note.txt"]);
///
/// assert!(fs.remove_entry("/docs/note.txt").unwrap());
/// ```
#[derive(Clone)]
pub struct MapFS {
    storage: Arc<RwLock<Storage>>,
}

struct Storage {
    entries: BTreeMap<String, Entry>,
    used: u64,
    quota: Option<u64>,
}

impl MapFS {
    /// Creates an empty MapFS holding only the root directory.
    pub fn new() -> Self {
        Self::with_storage(None)
    }

    /// Creates an empty MapFS that refuses to hold more than `max_bytes` of file content.
    pub fn with_quota(max_bytes: u64) -> Self {
        Self::with_storage(Some(max_bytes))
    }

    fn with_storage(quota: Option<u64>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(String::new(), Entry::new(EntryType::Directory));
        Self {
            storage: Arc::new(RwLock::new(Storage {
                entries,
                used: 0,
                quota,
            })),
        }
    }

    /// Number of files (directories excluded).
    pub fn file_count(&self) -> Result<usize> {
        let storage = self.read_lock()?;
        Ok(storage.entries.values().filter(|e| e.is_file()).count())
    }

    /// Total bytes of file content currently stored.
    pub fn used_bytes(&self) -> Result<u64> {
        Ok(self.read_lock()?.used)
    }

    pub fn quota(&self) -> Result<Option<u64>> {
        Ok(self.read_lock()?.quota)
    }

    /// Removes all entries, but preserves the root.
    pub fn clear(&self) -> Result<()> {
        let mut storage = self.write_lock()?;
        storage.entries.retain(|name, _| utils::is_root(name));
        storage.used = 0;
        Ok(())
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, Storage>> {
        self.storage
            .read()
            .map_err(|_| VfsError::io("lock map storage", poisoned()))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, Storage>> {
        self.storage
            .write()
            .map_err(|_| VfsError::io("lock map storage", poisoned()))
    }
}

impl Default for MapFS {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapFS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("MapFS");
        if let Ok(storage) = self.storage.read() {
            out.field("entry_count", &storage.entries.len())
                .field("used", &storage.used)
                .field("quota", &storage.quota);
        }
        out.finish()
    }
}

impl Storage {
    /// Makes sure every ancestor of `name` is a directory, creating the missing ones.
    /// Nothing is created if any ancestor turns out to be a file.
    fn ensure_parents(&mut self, name: &str) -> Result<()> {
        for parent in utils::ancestors(name) {
            if let Some(entry) = self.entries.get(parent) {
                if entry.is_file() {
                    return Err(VfsError::io_kind(
                        format!("create {name}"),
                        io::ErrorKind::NotADirectory,
                        &format!("{parent} is not a directory"),
                    ));
                }
            }
        }
        for parent in utils::ancestors(name) {
            self.entries
                .entry(parent.to_string())
                .or_insert_with(|| Entry::new(EntryType::Directory));
        }
        Ok(())
    }

    fn append(&mut self, name: &str, content: &[u8]) -> io::Result<()> {
        let new_used = self.used + content.len() as u64;
        if let Some(quota) = self.quota {
            if new_used > quota {
                return Err(io::Error::new(
                    io::ErrorKind::StorageFull,
                    format!(
                        "writing {} bytes to {name} exceeds quota of {quota} bytes",
                        content.len()
                    ),
                ));
            }
        }
        match self.entries.get_mut(name) {
            Some(entry) if entry.is_file() => {
                entry.append_content(content);
                self.used = new_used;
                Ok(())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{name} was removed while open"),
            )),
        }
    }
}

impl VirtualFileSystem for MapFS {
    /// Opens a snapshot of the file content; later writes are not visible through it.
    fn input_stream(&self, name: &str) -> Result<EntryReader> {
        let inner = utils::normalize_entry(name)?;
        debug!(name = %inner, "map fs: open for read");
        let storage = self.read_lock()?;
        match storage.entries.get(&inner) {
            None => Err(VfsError::not_found(name)),
            Some(entry) if entry.is_dir() => Err(VfsError::io_kind(
                format!("read {name}"),
                io::ErrorKind::IsADirectory,
                "is a directory",
            )),
            Some(entry) => Ok(Box::new(Cursor::new(entry.content().to_vec()))),
        }
    }

    fn output_stream(&self, name: &str, append: bool) -> Result<EntryWriter> {
        let inner = utils::normalize_entry(name)?;
        debug!(name = %inner, append, "map fs: open for write");
        let mut storage = self.write_lock()?;
        if storage.entries.get(&inner).is_some_and(Entry::is_dir) {
            return Err(VfsError::io_kind(
                format!("write {name}"),
                io::ErrorKind::IsADirectory,
                "is a directory",
            ));
        }
        storage.ensure_parents(&inner)?;

        let Storage { entries, used, .. } = &mut *storage;
        let entry = entries
            .entry(inner.clone())
            .or_insert_with(|| Entry::new(EntryType::File));
        if !append {
            *used -= entry.len() as u64;
            entry.truncate();
        }

        Ok(Box::new(MapWriter {
            storage: Arc::clone(&self.storage),
            name: inner,
        }))
    }

    fn remove_entry(&self, name: &str) -> Result<bool> {
        let inner = utils::normalize_entry(name)?;
        debug!(name = %inner, "map fs: remove");
        let mut storage = self.write_lock()?;
        if !storage.entries.contains_key(&inner) {
            return Ok(false);
        }

        let prefix = format!("{inner}/");
        let mut removed = vec![inner.clone()];
        removed.extend(
            storage
                .entries
                .range(prefix.clone()..)
                .map(|(key, _)| key)
                .take_while(|key| key.starts_with(&prefix))
                .cloned(),
        );

        for key in &removed {
            if let Some(entry) = storage.entries.remove(key) {
                storage.used -= entry.len() as u64;
            }
        }

        Ok(true)
    }

    fn list_entries(&self, name: &str) -> Result<Vec<String>> {
        let inner = utils::normalize(name)?;
        debug!(name = %inner, "map fs: list");
        let storage = self.read_lock()?;
        match storage.entries.get(&inner) {
            None => {
                return Err(VfsError::io_kind(
                    format!("list {name}"),
                    io::ErrorKind::NotFound,
                    "no such directory",
                ));
            }
            Some(entry) if entry.is_file() => {
                return Err(VfsError::io_kind(
                    format!("list {name}"),
                    io::ErrorKind::NotADirectory,
                    "not a directory",
                ));
            }
            Some(_) => {}
        }

        let prefix = if utils::is_root(&inner) {
            String::new()
        } else {
            format!("{inner}/")
        };
        // keys are ordered, so a directory's subtree is one contiguous range
        let children: Vec<String> = storage
            .entries
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(&prefix))
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        Ok(children)
    }
}

/// Write-through stream returned by [`MapFS::output_stream`].
struct MapWriter {
    storage: Arc<RwLock<Storage>>,
    name: String,
}

impl Write for MapWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut storage = self.storage.write().map_err(|_| poisoned())?;
        storage.append(&self.name, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn poisoned() -> io::Error {
    io::Error::other("map storage lock poisoned")
}
