//! Persisted key-value capability backing the client-local identity stores.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kiosk_core::write_text_atomic;

/// Storage key holding the demo session identifier.
pub const DEMO_SESSION_STORAGE_KEY: &str = "kiosk_demo_session_id";
/// Storage key holding the admin preview toggle.
pub const ADMIN_PREVIEW_STORAGE_KEY: &str = "kiosk_admin_preview";

/// Synchronous persisted string storage scoped to one client.
///
/// Values are plain strings with no schema versioning. Implementations are
/// single-writer-per-tab; no cross-tab coordination is attempted.
pub trait ClientStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage keeping one file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileClientStorage {
    root: PathBuf,
}

impl FileClientStorage {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.as_os_str().is_empty() {
            bail!("client storage root cannot be empty");
        }
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create client storage root {}", root.display()))?;
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let key = key.trim();
        if key.is_empty() {
            bail!("client storage key cannot be empty");
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.')
        {
            bail!("client storage key '{key}' contains unsupported characters");
        }
        Ok(self.root.join(key))
    }
}

impl ClientStorage for FileClientStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error)
                .with_context(|| format!("failed to read client storage {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        write_text_atomic(&path, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error)
                .with_context(|| format!("failed to remove client storage {}", path.display())),
        }
    }
}
