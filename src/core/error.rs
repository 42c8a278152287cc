use std::io;

/// Errors surfaced by every [`VirtualFileSystem`](crate::VirtualFileSystem) backend.
///
/// Domain failures (`NotFound`, `InvalidName`) are raised by the backend itself;
/// any lower-level storage fault is wrapped as `Io` and keeps the original
/// `io::Error` reachable through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// No entry exists under the requested name.
    #[error("entry not found: {name}")]
    NotFound { name: String },

    /// The name cannot address an entry (escapes the root, addresses the root, ...).
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Underlying storage failure.
    #[error("I/O failure: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl VfsError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason,
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Shortcut for an `Io` failure whose cause carries `kind`.
    pub(crate) fn io_kind(context: impl Into<String>, kind: io::ErrorKind, msg: &str) -> Self {
        let context = context.into();
        let source = io::Error::new(kind, format!("{context}: {msg}"));
        Self::Io { context, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }

    pub fn is_io_failure(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Kind of the wrapped `io::Error`, if this is an I/O failure.
    pub fn io_error_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
