//! Storage-independent named-entry I/O and comparator-driven sorting.
//!
//! ### Overview
//!
//! `vfs-sort-kit` lets application code read, write, remove and list named entries without
//! depending on where they live. It defines the object-safe [`VirtualFileSystem`] trait and
//! ships backends for it:
//! - [`MapFS`] keeps everything in memory (optionally under a byte quota);
//! - [`DirFS`] maps entries to files below a root directory on the host;
//! - [`FaultyFS`] wraps another backend and injects I/O failures for tests.
//!
//! Next to it lives a small sorting toolkit: a [`Bag`] that collects elements in insertion
//! order, pluggable [`OrderingStrategy`] values and the [`SortEngine`] applying them.
//!
//! **Key ideas**:
//! - **Abstraction**: Work with different types of storage through a single API.
//! - **Safety**: Names are normalized; no name can address anything outside a backend's root.
//!   [`DirFS`] still follows symlinks placed below its root on the host.
//! - **Testability**: Swap a disk backend for `MapFS` or `FaultyFS` in unit tests.
//! - **Clarity**: Two failure shapes only, domain errors and wrapped I/O errors, see [`VfsError`].
//!
//! ### Example
//!
//! ```
//! use vfs_sort_kit::{Bag, Descending, MapFS, VirtualFileSystem};
//!
//! let fs = MapFS::new();
//! fs.write_entry("scores/alice", b"42", false).unwrap();
//! fs.write_entry("scores/bob", b"17", false).unwrap();
//!
//! let mut bag = Bag::new();
//! for name in fs.list_entries("scores").unwrap() {
//!     let raw = fs.read_entry(&format!("scores/{name}")).unwrap();
//!     bag.add(String::from_utf8(raw).unwrap().parse::<u32>().unwrap());
//! }
//! assert_eq!(bag.into_sorted(&Descending), vec![42, 17]);
//! ```

mod config;
mod core;
mod filter;
mod report;
mod sort;
mod vfs;

pub use crate::config::{BackendConfig, ConfigError, VfsConfig};
pub use crate::core::{EntryReader, EntryWriter, Result, VfsError, VirtualFileSystem, utils};
pub use crate::filter::{ExtensionFilter, expand_pattern};
pub use crate::report::{
    CheckedAction, Choice, ErrorHandler, ErrorReceiver, ErrorReport, ErrorSender, ReportMode,
    WriterHandler, report_channel,
};
pub use crate::sort::{
    Algorithm, Ascending, Bag, ByKey, Descending, Elements, OrderingStrategy, Reversed,
    SortEngine, is_sorted_by, sort,
};
pub use crate::vfs::{DirFS, FailurePolicy, FaultyFS, MapFS};
