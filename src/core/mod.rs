mod error;
pub mod utils;

use std::io::{self, Read, Write};
use std::sync::Arc;

pub use error::VfsError;

pub type Result<T> = std::result::Result<T, VfsError>;

/// Readable byte stream over an entry. Dropping it releases the entry.
pub type EntryReader = Box<dyn Read + Send>;

/// Writable byte stream over an entry. Dropping it releases the entry.
pub type EntryWriter = Box<dyn Write + Send>;

/// Named-entry storage independent of the backing store.
///
/// Every backend interprets names the same way (see [`utils`]): `/`-delimited,
/// hierarchical, with the empty name denoting the root directory. The root is
/// listable but is never an entry, so reading, writing or removing it fails with
/// [`VfsError::InvalidName`].
///
/// Backends are `Send + Sync` and take `&self`, so one instance can be shared
/// behind an `Arc` or used as `Box<dyn VirtualFileSystem>`. No cross-entry
/// atomicity is promised.
pub trait VirtualFileSystem: Send + Sync {
    /// Opens `name` for reading.
    ///
    /// Fails with [`VfsError::NotFound`] when nothing exists under `name` and
    /// with [`VfsError::Io`] for any other fault (including `name` being a
    /// directory).
    fn input_stream(&self, name: &str) -> Result<EntryReader>;

    /// Opens or creates `name` for writing. Missing parent directories are
    /// created. With `append` the existing content is kept and new writes go
    /// after it, otherwise the content is discarded.
    fn output_stream(&self, name: &str, append: bool) -> Result<EntryWriter>;

    /// Removes `name` (recursively, for a directory).
    /// Returns `Ok(false)` when there was nothing to remove.
    fn remove_entry(&self, name: &str) -> Result<bool>;

    /// Returns the immediate child names of the directory `name`, sorted.
    ///
    /// Fails with [`VfsError::Io`] when `name` is missing or is not a
    /// directory; an empty directory yields an empty vector.
    fn list_entries(&self, name: &str) -> Result<Vec<String>>;

    /// Reads the entire content of `name`.
    fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let mut reader = self.input_stream(name)?;
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|e| VfsError::io(format!("read {name}"), e))?;
        Ok(content)
    }

    /// Writes `content` to `name` and flushes the stream.
    fn write_entry(&self, name: &str, content: &[u8], append: bool) -> Result<()> {
        let mut writer = self.output_stream(name, append)?;
        writer
            .write_all(content)
            .and_then(|_| writer.flush())
            .map_err(|e| VfsError::io(format!("write {name}"), e))
    }

    /// Checks whether anything (entry or directory) exists under `name`.
    fn exists(&self, name: &str) -> Result<bool> {
        match self.input_stream(name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) if e.io_error_kind() == Some(io::ErrorKind::IsADirectory) => Ok(true),
            Err(e) => Err(e),
        }
    }
}

impl<T: VirtualFileSystem + ?Sized> VirtualFileSystem for Box<T> {
    fn input_stream(&self, name: &str) -> Result<EntryReader> {
        (**self).input_stream(name)
    }

    fn output_stream(&self, name: &str, append: bool) -> Result<EntryWriter> {
        (**self).output_stream(name, append)
    }

    fn remove_entry(&self, name: &str) -> Result<bool> {
        (**self).remove_entry(name)
    }

    fn list_entries(&self, name: &str) -> Result<Vec<String>> {
        (**self).list_entries(name)
    }
}

impl<T: VirtualFileSystem + ?Sized> VirtualFileSystem for Arc<T> {
    fn input_stream(&self, name: &str) -> Result<EntryReader> {
        (**self).input_stream(name)
    }

    fn output_stream(&self, name: &str, append: bool) -> Result<EntryWriter> {
        (**self).output_stream(name, append)
    }

    fn remove_entry(&self, name: &str) -> Result<bool> {
        (**self).remove_entry(name)
    }

    fn list_entries(&self, name: &str) -> Result<Vec<String>> {
        (**self).list_entries(name)
    }
}
