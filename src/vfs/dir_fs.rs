//! This module provides a virtual filesystem (VFS) implementation that maps to a real directory
//! on the host system. Entry names are resolved inside a controlled root path, so no operation
//! can reach the host file system outside of it.
//!
//! ### Key Features:
//! - **Isolated root**: All operations are confined to a designated root directory (self.root).
//! - **Name normalization**: `.` and `..` segments are resolved before touching the disk;
//!   names escaping the root are rejected.
//! - **Auto‑cleanup**: Optionally removes on Drop what this instance created: written files,
//!   directories made for them, and the root with its parents if `new()` made them
//!   (when is_auto_clean = true).
//! - **Cross‑platform**: Uses std::path::Path and PathBuf for portable path handling.

use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::core::{EntryReader, EntryWriter, Result, VfsError, VirtualFileSystem, utils};

/// A virtual filesystem (VFS) implementation that maps to a real directory on the host system.
///
/// Unlike [`MapFS`](crate::MapFS), `DirFS` keeps no index of its own: every operation asks the
/// host file system, so entries created by other processes under the root are visible too.
///
/// ### Usage notes:
/// - `DirFS` does not follow symlinks on removal; `remove_entry()` removes the link,
///   not the target.
/// - Symlinks already present below the root are followed by `input_stream()` and
///   `output_stream()`. Names alone never leave the root; links placed on the host can.
/// - Permissions are not automatically adjusted; ensure `root` is writable.
/// - Entries are plain files; directories are created on demand by `output_stream()`.
/// - File names that are not valid UTF-8 make `list_entries()` fail with `InvalidData`.
///
/// ### Example:
/// ```
/// use vfs_sort_kit::{DirFS, VirtualFileSystem};
///
/// let root = std::env::temp_dir().join("vfs_sort_kit_doc");
///
/// let mut fs = DirFS::new(&root).unwrap();
/// fs.set_auto_clean(true);
/// fs.write_entry("/docs/note.txt", b"Hello", false).unwrap();
/// assert!(fs.exists("/docs/note.txt").unwrap());
///
/// fs.remove_entry("/docs/note.txt").unwrap();
/// ```
#[derive(Debug)]
pub struct DirFS {
    root: PathBuf,                      // host-related absolute canonical path
    created_root_parents: Vec<PathBuf>, // host-related absolute paths
    created: Mutex<BTreeSet<PathBuf>>,  // files and dirs made below the root by this instance
    is_auto_clean: bool,
}

impl DirFS {
    /// Creates a new DirFS instance with the root directory at `root`.
    /// Checks permissions to create and write into `root`.
    /// * `root` is an absolute host path. If it does not exist it will be created.
    /// If `root` is not absolute or is not a directory, error returns.
    /// By default, the `is_auto_clean` flag is set to `false`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let display = root.display().to_string();

        if root.as_os_str().is_empty() {
            return Err(VfsError::invalid_name(display, "invalid root path: empty"));
        }
        if root.is_relative() {
            return Err(VfsError::invalid_name(display, "the root path must be absolute"));
        }
        if root.exists() && !root.is_dir() {
            return Err(VfsError::io_kind(
                format!("open root {display}"),
                io::ErrorKind::NotADirectory,
                "not a directory",
            ));
        }

        let mut created_root_parents = Vec::new();
        if !root.exists() {
            created_root_parents.extend(Self::mkdir_all(root)?);
        }

        let root = root
            .canonicalize()
            .map_err(|e| VfsError::io(format!("canonicalize {display}"), e))?;

        // check permissions
        Self::check_permissions(&root)?;

        debug!(root = %root.display(), created = created_root_parents.len(), "dir fs: opened");
        Ok(Self {
            root,
            created_root_parents,
            created: Mutex::new(BTreeSet::new()),
            is_auto_clean: false,
        })
    }

    /// Returns root path related to the host file system.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Changes auto-clean flag.
    /// If auto-clean flag is true, files and directories created through this instance are
    /// removed on drop. Content that existed before, or was added by others, is kept, and so
    /// are the directories holding it. The root and its parents are removed only when
    /// [`DirFS::new`] created them.
    pub fn set_auto_clean(&mut self, clean: bool) {
        self.is_auto_clean = clean;
    }

    /// Returns the path on the host system that matches the entry `name`.
    pub fn to_host(&self, name: &str) -> Result<PathBuf> {
        let inner = utils::normalize(name)?;
        let mut host = self.root.clone();
        if !utils::is_root(&inner) {
            host.extend(inner.split('/'));
        }
        Ok(host)
    }

    /// Make directories recursively.
    /// * `path` is an absolute host path.
    /// Returns vector of created directories, outermost first.
    /// On failure the directories created so far are removed again.
    fn mkdir_all(path: &Path) -> Result<Vec<PathBuf>> {
        let mut missing = Vec::new();
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.exists() {
                break;
            }
            missing.push(dir.to_path_buf());
            current = dir.parent();
        }

        let mut created = Vec::new();
        for dir in missing.into_iter().rev() {
            if let Err(e) = fs::create_dir(&dir) {
                Self::rollback(&created);
                return Err(VfsError::io(format!("create directory {}", dir.display()), e));
            }
            created.push(dir);
        }
        Ok(created)
    }

    /// Removes directories returned by [`DirFS::mkdir_all`], innermost first.
    fn rollback(created: &[PathBuf]) {
        for dir in created.iter().rev() {
            if let Err(e) = fs::remove_dir(dir) {
                warn!(dir = %dir.display(), error = %e, "dir fs: failed to roll back directory");
            }
        }
    }

    fn created(&self) -> MutexGuard<'_, BTreeSet<PathBuf>> {
        self.created.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_permissions(root: &Path) -> Result<()> {
        let probe = root.join(".access");
        fs::write(&probe, b"check")
            .and_then(|_| fs::remove_file(&probe))
            .map_err(|e| VfsError::io(format!("access denied: {}", root.display()), e))
    }
}

impl VirtualFileSystem for DirFS {
    fn input_stream(&self, name: &str) -> Result<EntryReader> {
        let host = self.to_host(name)?;
        if host == self.root {
            return Err(VfsError::invalid_name(name, "the root is not an entry"));
        }
        debug!(name, host = %host.display(), "dir fs: open for read");

        let metadata = match fs::metadata(&host) {
            Ok(metadata) => metadata,
            Err(e) if is_missing(&e) => return Err(VfsError::not_found(name)),
            Err(e) => return Err(VfsError::io(format!("stat {name}"), e)),
        };
        if metadata.is_dir() {
            return Err(VfsError::io_kind(
                format!("read {name}"),
                io::ErrorKind::IsADirectory,
                "is a directory",
            ));
        }

        match File::open(&host) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if is_missing(&e) => Err(VfsError::not_found(name)),
            Err(e) => Err(VfsError::io(format!("open {name}"), e)),
        }
    }

    fn output_stream(&self, name: &str, append: bool) -> Result<EntryWriter> {
        let host = self.to_host(name)?;
        if host == self.root {
            return Err(VfsError::invalid_name(name, "the root is not an entry"));
        }
        debug!(name, append, host = %host.display(), "dir fs: open for write");

        if host.is_dir() {
            return Err(VfsError::io_kind(
                format!("write {name}"),
                io::ErrorKind::IsADirectory,
                "is a directory",
            ));
        }

        let parents = match host.parent() {
            Some(parent) => Self::mkdir_all(parent)?,
            None => Vec::new(),
        };
        let existed = host.exists();
        let file = match OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&host)
        {
            Ok(file) => file,
            Err(e) => {
                Self::rollback(&parents);
                return Err(VfsError::io(format!("open {name} for write"), e));
            }
        };

        let mut created = self.created();
        created.extend(parents);
        if !existed {
            created.insert(host);
        }
        Ok(Box::new(file))
    }

    fn remove_entry(&self, name: &str) -> Result<bool> {
        let host = self.to_host(name)?;
        if host == self.root {
            return Err(VfsError::invalid_name(name, "the root cannot be removed"));
        }
        debug!(name, host = %host.display(), "dir fs: remove");

        let metadata = match fs::symlink_metadata(&host) {
            Ok(metadata) => metadata,
            Err(e) if is_missing(&e) => return Ok(false),
            Err(e) => return Err(VfsError::io(format!("stat {name}"), e)),
        };
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&host)
        } else {
            fs::remove_file(&host)
        };
        match removed {
            Ok(()) => {
                self.created().retain(|path| !path.starts_with(&host));
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VfsError::io(format!("remove {name}"), e)),
        }
    }

    fn list_entries(&self, name: &str) -> Result<Vec<String>> {
        let host = self.to_host(name)?;
        debug!(name, host = %host.display(), "dir fs: list");

        let context = || format!("list {name}");
        let mut children = Vec::new();
        for entry in fs::read_dir(&host).map_err(|e| VfsError::io(context(), e))? {
            let entry = entry.map_err(|e| VfsError::io(context(), e))?;
            let child = entry.file_name().into_string().map_err(|raw| {
                VfsError::io_kind(
                    context(),
                    io::ErrorKind::InvalidData,
                    &format!("non UTF-8 file name {raw:?}"),
                )
            })?;
            children.push(child);
        }
        children.sort();
        Ok(children)
    }
}

impl Drop for DirFS {
    fn drop(&mut self) {
        if !self.is_auto_clean {
            return;
        }

        // a path sorts before its descendants, so reverse order is innermost first
        let created = self.created.get_mut().unwrap_or_else(PoisonError::into_inner);
        let created = std::mem::take(created);
        for path in created.iter().rev() {
            let removed = if path.is_dir() {
                fs::remove_dir(path)
            } else {
                fs::remove_file(path)
            };
            match removed {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => {
                    debug!(dir = %path.display(), "dir fs: kept directory with foreign content");
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "dir fs: failed to remove created entry"
                    );
                }
            }
        }

        // a root that existed before `new()` is left in place
        if self.created_root_parents.is_empty() {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.root) {
            warn!(root = %self.root.display(), error = %e, "dir fs: failed to remove root");
        }
        // innermost first; the root itself may be the last of them
        for dir in self.created_root_parents.iter().rev() {
            if dir.exists() {
                if let Err(e) = fs::remove_dir(dir) {
                    warn!(
                        dir = %dir.display(),
                        error = %e,
                        "dir fs: failed to remove created parent"
                    );
                }
            }
        }
    }
}

/// A missing entry, or a parent segment that is a file: nothing exists under the name.
fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use tempdir::TempDir;

    use super::*;

    fn setup_test_vfs() -> (TempDir, DirFS) {
        let tmp = TempDir::new("dir_fs").unwrap();
        let fs = DirFS::new(tmp.path()).unwrap();
        fs.write_entry("/home/user/config.txt", b"Config content", false)
            .unwrap();
        fs.write_entry("/readme.md", b"Project docs", false).unwrap();
        (tmp, fs)
    }

    mod creations {
        use super::*;

        #[test]
        fn test_new_absolute_path_existing() {
            let tmp = TempDir::new("dir_fs").unwrap();
            let fs = DirFS::new(tmp.path()).unwrap();
            assert_eq!(fs.root(), tmp.path().canonicalize().unwrap());
            assert!(fs.created_root_parents.is_empty());
            assert!(!fs.is_auto_clean);
            assert!(!tmp.path().join(".access").exists());
        }

        #[test]
        fn test_new_nested_nonexistent_path() {
            let tmp = TempDir::new("dir_fs").unwrap();
            let root = tmp.path().join("a").join("b");
            let fs = DirFS::new(&root).unwrap();
            assert!(root.is_dir());
            assert_eq!(fs.created_root_parents.len(), 2);
            assert_eq!(fs.created_root_parents[0], tmp.path().join("a"));
        }

        #[test]
        fn test_new_relative_path() {
            let err = DirFS::new("relative/root").unwrap_err();
            assert!(err.is_invalid_name());
        }

        #[test]
        fn test_new_empty_path() {
            assert!(DirFS::new("").unwrap_err().is_invalid_name());
        }

        #[test]
        fn test_new_root_is_file() {
            let tmp = TempDir::new("dir_fs").unwrap();
            let file = tmp.path().join("file.txt");
            std::fs::write(&file, b"x").unwrap();
            let err = DirFS::new(&file).unwrap_err();
            assert_eq!(err.io_error_kind(), Some(io::ErrorKind::NotADirectory));
        }

        #[test]
        fn test_to_host() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            assert_eq!(fs.to_host("/")?, fs.root());
            assert_eq!(fs.to_host("docs/./a.txt")?, fs.root().join("docs").join("a.txt"));
            assert!(fs.to_host("../outside").unwrap_err().is_invalid_name());
            Ok(())
        }
    }

    mod drop {
        use super::*;

        #[test]
        fn test_drop_removes_created_directories() {
            let tmp = TempDir::new("dir_fs").unwrap();
            let root = tmp.path().join("created").join("root");
            {
                let mut fs = DirFS::new(&root).unwrap();
                fs.set_auto_clean(true);
                fs.write_entry("a/b.txt", b"x", false).unwrap();
            }
            assert!(!root.exists());
            assert!(!tmp.path().join("created").exists());
            assert!(tmp.path().exists());
        }

        #[test]
        fn test_drop_keeps_preexisting_content() {
            let tmp = TempDir::new("dir_fs").unwrap();
            std::fs::write(tmp.path().join("precious.txt"), b"keep").unwrap();
            std::fs::create_dir(tmp.path().join("shared")).unwrap();
            std::fs::write(tmp.path().join("shared").join("theirs.txt"), b"keep").unwrap();
            {
                let mut fs = DirFS::new(tmp.path()).unwrap();
                fs.set_auto_clean(true);
                fs.write_entry("created.txt", b"x", false).unwrap();
                fs.write_entry("shared/mine.txt", b"x", false).unwrap();
                fs.write_entry("new/deep/file.txt", b"x", false).unwrap();
                fs.write_entry("precious.txt", b"+more", true).unwrap();
            }
            assert!(tmp.path().is_dir());
            assert_eq!(std::fs::read(tmp.path().join("precious.txt")).unwrap(), b"keep+more");
            assert!(tmp.path().join("shared").join("theirs.txt").exists());
            assert!(!tmp.path().join("shared").join("mine.txt").exists());
            assert!(!tmp.path().join("created.txt").exists());
            assert!(!tmp.path().join("new").exists());
        }

        #[test]
        fn test_drop_keeps_created_directory_with_foreign_files() {
            let tmp = TempDir::new("dir_fs").unwrap();
            {
                let mut fs = DirFS::new(tmp.path()).unwrap();
                fs.set_auto_clean(true);
                fs.write_entry("ours/a.txt", b"x", false).unwrap();
                std::fs::write(fs.root().join("ours").join("foreign.txt"), b"y").unwrap();
            }
            assert!(!tmp.path().join("ours").join("a.txt").exists());
            assert!(tmp.path().join("ours").join("foreign.txt").exists());
        }

        #[test]
        fn test_drop_forgets_removed_entries() {
            let tmp = TempDir::new("dir_fs").unwrap();
            {
                let mut fs = DirFS::new(tmp.path()).unwrap();
                fs.set_auto_clean(true);
                fs.write_entry("again.txt", b"ours", false).unwrap();
                fs.remove_entry("again.txt").unwrap();
                // recreated by someone else after the removal
                std::fs::write(fs.root().join("again.txt"), b"theirs").unwrap();
            }
            assert_eq!(std::fs::read(tmp.path().join("again.txt")).unwrap(), b"theirs");
        }

        #[test]
        fn test_drop_with_is_auto_clean_false() {
            let tmp = TempDir::new("dir_fs").unwrap();
            let root = tmp.path().join("kept");
            {
                let fs = DirFS::new(&root).unwrap();
                fs.write_entry("a.txt", b"x", false).unwrap();
            }
            assert!(root.join("a.txt").exists());
        }
    }

    mod input_stream {
        use super::*;

        #[test]
        fn test_read_existing_file() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            let mut content = String::new();
            fs.input_stream("home/user/config.txt")?
                .read_to_string(&mut content)
                .unwrap();
            assert_eq!(content, "Config content");
            Ok(())
        }

        #[test]
        fn test_read_missing_is_not_found() {
            let (_tmp, fs) = setup_test_vfs();
            assert!(fs.input_stream("/nope.txt").err().unwrap().is_not_found());
            // a parent segment that is a file
            assert!(fs.input_stream("/readme.md/x").err().unwrap().is_not_found());
        }

        #[test]
        fn test_read_directory_is_io_failure() {
            let (_tmp, fs) = setup_test_vfs();
            let err = fs.input_stream("/home").err().unwrap();
            assert_eq!(err.io_error_kind(), Some(io::ErrorKind::IsADirectory));
        }

        #[test]
        fn test_read_root_is_invalid() {
            let (_tmp, fs) = setup_test_vfs();
            assert!(fs.input_stream("").err().unwrap().is_invalid_name());
        }
    }

    mod output_stream {
        use super::*;

        #[test]
        fn test_write_creates_parents_on_host() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            fs.write_entry("/x/y/z.bin", &[1, 2, 3], false)?;
            assert_eq!(std::fs::read(fs.root().join("x/y/z.bin")).unwrap(), vec![1, 2, 3]);
            Ok(())
        }

        #[test]
        fn test_write_truncates_and_appends() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            fs.write_entry("/readme.md", b"New", false)?;
            assert_eq!(fs.read_entry("/readme.md")?, b"New");
            {
                let mut writer = fs.output_stream("/readme.md", true)?;
                writer.write_all(b" text").unwrap();
            }
            assert_eq!(fs.read_entry("/readme.md")?, b"New text");
            Ok(())
        }

        #[test]
        fn test_write_to_directory_fails() {
            let (_tmp, fs) = setup_test_vfs();
            let err = fs.output_stream("/home/user", false).err().unwrap();
            assert!(err.is_io_failure());
        }

        #[test]
        fn test_write_under_file_fails() {
            let (_tmp, fs) = setup_test_vfs();
            let err = fs.output_stream("/readme.md/inner.txt", false).err().unwrap();
            assert!(err.is_io_failure());
        }

        #[test]
        fn test_failed_open_leaves_no_directories() {
            let (_tmp, fs) = setup_test_vfs();
            let too_long = "x".repeat(300);
            let err = fs
                .output_stream(&format!("fresh/sub/{too_long}"), false)
                .err()
                .unwrap();
            assert!(err.is_io_failure());
            assert!(!fs.root().join("fresh").exists());
            assert_eq!(fs.list_entries("").unwrap(), vec!["home", "readme.md"]);
        }

        #[test]
        fn test_write_escaping_root_is_invalid() {
            let (_tmp, fs) = setup_test_vfs();
            let err = fs.output_stream("/../escape.txt", false).err().unwrap();
            assert!(err.is_invalid_name());
        }
    }

    mod remove_entry {
        use super::*;

        #[test]
        fn test_remove_file() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            assert!(fs.remove_entry("/readme.md")?);
            assert!(!fs.root().join("readme.md").exists());
            assert!(fs.input_stream("/readme.md").err().unwrap().is_not_found());
            Ok(())
        }

        #[test]
        fn test_remove_missing() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            assert!(!fs.remove_entry("/missing")?);
            assert!(!fs.remove_entry("/readme.md/child")?);
            Ok(())
        }

        #[test]
        fn test_remove_directory_recursively() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            assert!(fs.remove_entry("/home")?);
            assert!(!fs.root().join("home").exists());
            assert_eq!(fs.list_entries("/")?, vec!["readme.md"]);
            Ok(())
        }

        #[test]
        fn test_remove_root_is_invalid() {
            let (_tmp, fs) = setup_test_vfs();
            assert!(fs.remove_entry("/").unwrap_err().is_invalid_name());
            assert!(fs.root().exists());
        }
    }

    mod list_entries {
        use super::*;

        #[test]
        fn test_ls_empty_root() -> Result<()> {
            let tmp = TempDir::new("dir_fs").unwrap();
            let fs = DirFS::new(tmp.path())?;
            assert!(fs.list_entries("/")?.is_empty());
            Ok(())
        }

        #[test]
        fn test_ls_sorted_children() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            fs.write_entry("/b.txt", b"", false)?;
            assert_eq!(fs.list_entries("/")?, vec!["b.txt", "home", "readme.md"]);
            assert_eq!(fs.list_entries("/home")?, vec!["user"]);
            Ok(())
        }

        #[test]
        fn test_ls_sees_host_changes() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            std::fs::write(fs.root().join("home").join("external.txt"), b"x").unwrap();
            assert_eq!(fs.list_entries("home")?, vec!["external.txt", "user"]);
            Ok(())
        }

        #[test]
        fn test_ls_missing_and_file_fail() {
            let (_tmp, fs) = setup_test_vfs();
            let err = fs.list_entries("/nope").unwrap_err();
            assert_eq!(err.io_error_kind(), Some(io::ErrorKind::NotFound));
            let err = fs.list_entries("/readme.md").unwrap_err();
            assert!(err.is_io_failure());
        }
    }

    #[cfg(unix)]
    mod host_faults {
        use std::os::unix::fs::{PermissionsExt, symlink};

        use super::*;

        fn set_mode(path: &Path, mode: u32) {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
        }

        /// Permission bits mean nothing to a superuser; such runs skip the checks.
        fn permissions_enforced(dir: &Path) -> bool {
            let sample = dir.join("mode_check");
            std::fs::write(&sample, b"x").unwrap();
            set_mode(&sample, 0o000);
            let enforced = File::open(&sample).is_err();
            set_mode(&sample, 0o644);
            std::fs::remove_file(&sample).unwrap();
            enforced
        }

        #[test]
        fn test_new_unwritable_root() {
            let tmp = TempDir::new("dir_fs").unwrap();
            if !permissions_enforced(tmp.path()) {
                return;
            }
            let protected = tmp.path().join("protected");
            std::fs::create_dir(&protected).unwrap();
            set_mode(&protected, 0o555);

            let existing = DirFS::new(&protected);
            let nested = DirFS::new(protected.join("root"));
            set_mode(&protected, 0o755);

            assert!(existing.unwrap_err().is_io_failure());
            assert!(nested.unwrap_err().is_io_failure());
        }

        #[test]
        fn test_unreadable_file_is_io_failure() {
            let (_tmp, fs) = setup_test_vfs();
            if !permissions_enforced(fs.root()) {
                return;
            }
            let host = fs.root().join("readme.md");
            set_mode(&host, 0o000);
            let err = fs.input_stream("readme.md").err().unwrap();
            set_mode(&host, 0o644);

            assert!(!err.is_not_found());
            assert_eq!(err.io_error_kind(), Some(io::ErrorKind::PermissionDenied));
        }

        #[test]
        fn test_locked_directory_is_io_failure() {
            let (_tmp, fs) = setup_test_vfs();
            if !permissions_enforced(fs.root()) {
                return;
            }
            fs.write_entry("locked/inner/file.txt", b"x", false).unwrap();
            let host = fs.root().join("locked");
            set_mode(&host, 0o000);
            let read = fs.input_stream("locked/inner/file.txt").err().unwrap();
            let removed = fs.remove_entry("locked/inner");
            let listed = fs.list_entries("locked");
            set_mode(&host, 0o755);

            assert!(read.is_io_failure());
            assert!(!read.is_not_found());
            assert!(removed.unwrap_err().is_io_failure());
            assert!(listed.unwrap_err().is_io_failure());
            assert!(host.join("inner").join("file.txt").exists());
        }

        #[test]
        fn test_remove_in_read_only_directory_is_io_failure() {
            let (_tmp, fs) = setup_test_vfs();
            if !permissions_enforced(fs.root()) {
                return;
            }
            fs.write_entry("ro/file.txt", b"x", false).unwrap();
            let host = fs.root().join("ro");
            set_mode(&host, 0o555);
            let removed = fs.remove_entry("ro/file.txt");
            set_mode(&host, 0o755);

            let err = removed.unwrap_err();
            assert_eq!(err.io_error_kind(), Some(io::ErrorKind::PermissionDenied));
            assert!(host.join("file.txt").exists());
        }

        #[test]
        fn test_symlinks_are_followed_but_not_removed_through() -> Result<()> {
            let (_tmp, fs) = setup_test_vfs();
            let outside = TempDir::new("dir_fs_outside").unwrap();
            let target = outside.path().join("target.txt");
            std::fs::write(&target, b"outside").unwrap();
            symlink(&target, fs.root().join("link")).unwrap();

            assert_eq!(fs.read_entry("link")?, b"outside");
            assert!(fs.remove_entry("link")?);
            assert!(!fs.root().join("link").exists());
            assert_eq!(std::fs::read(&target).unwrap(), b"outside");
            Ok(())
        }
    }
}
