//! Backend selection from TOML.
//!
//! ```toml
//! [backend]
//! kind = "dir"
//! root = "/var/lib/app/data"
//! auto_clean = false
//! ```
//!
//! or, for an in-memory backend with an optional byte quota:
//!
//! ```toml
//! [backend]
//! kind = "memory"
//! quota = 1048576
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Result, VirtualFileSystem};
use crate::{DirFS, MapFS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VfsConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    Memory {
        #[serde(default)]
        quota: Option<u64>,
    },
    Dir {
        root: PathBuf,
        #[serde(default)]
        auto_clean: bool,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Memory { quota: None }
    }
}

impl VfsConfig {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Instantiates the configured backend.
    pub fn open(&self) -> Result<Box<dyn VirtualFileSystem>> {
        match &self.backend {
            BackendConfig::Memory { quota } => {
                info!(?quota, "opening memory backend");
                Ok(Box::new(match quota {
                    Some(max_bytes) => MapFS::with_quota(*max_bytes),
                    None => MapFS::new(),
                }))
            }
            BackendConfig::Dir { root, auto_clean } => {
                info!(root = %root.display(), auto_clean, "opening dir backend");
                let mut fs = DirFS::new(root)?;
                fs.set_auto_clean(*auto_clean);
                Ok(Box::new(fs))
            }
        }
    }
}
