//! A backend wrapper that can simulate storage failures.
//!
//! Useful for testing how callers handle I/O faults without breaking a real disk.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

use crate::core::{EntryReader, EntryWriter, Result, VfsError, VirtualFileSystem};

/// Policy for when failures should occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Let the first N operations through, fail every one after
    AfterOps(usize),
    /// Fail every operation whose name is one of these, exactly as passed by the caller
    OnNames(Vec<String>),
}

/// Wrapper around a [`VirtualFileSystem`] that fails operations according to a [`FailurePolicy`].
///
/// Injected failures are [`VfsError::Io`] whose cause has kind `io::ErrorKind::Other`.
#[derive(Debug)]
pub struct FaultyFS<V> {
    inner: V,
    policy: FailurePolicy,
    op_count: AtomicUsize,
}

impl<V: VirtualFileSystem> FaultyFS<V> {
    pub fn new(inner: V, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            op_count: AtomicUsize::new(0),
        }
    }

    /// Get the wrapped backend (for inspection)
    pub fn inner(&self) -> &V {
        &self.inner
    }

    /// Number of operations attempted so far, failed ones included
    pub fn op_count(&self) -> usize {
        self.op_count.load(Ordering::SeqCst)
    }

    /// Replace the failure policy and reset the operation counter
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.op_count.store(0, Ordering::SeqCst);
    }

    pub fn into_inner(self) -> V {
        self.inner
    }

    fn check(&self, op: &'static str, name: &str) -> Result<()> {
        let count = self.op_count.fetch_add(1, Ordering::SeqCst);
        let fail = match &self.policy {
            FailurePolicy::Never => false,
            FailurePolicy::AfterOps(n) => count >= *n,
            FailurePolicy::OnNames(names) => names.iter().any(|n| n == name),
        };
        if fail {
            warn!(op, name, count, "faulty fs: injected failure");
            return Err(VfsError::io(
                format!("{op} {name}"),
                io::Error::other("injected failure"),
            ));
        }
        Ok(())
    }
}

impl<V: VirtualFileSystem> VirtualFileSystem for FaultyFS<V> {
    fn input_stream(&self, name: &str) -> Result<EntryReader> {
        self.check("read", name)?;
        self.inner.input_stream(name)
    }

    fn output_stream(&self, name: &str, append: bool) -> Result<EntryWriter> {
        self.check("write", name)?;
        self.inner.output_stream(name, append)
    }

    fn remove_entry(&self, name: &str) -> Result<bool> {
        self.check("remove", name)?;
        self.inner.remove_entry(name)
    }

    fn list_entries(&self, name: &str) -> Result<Vec<String>> {
        self.check("list", name)?;
        self.inner.list_entries(name)
    }
}
