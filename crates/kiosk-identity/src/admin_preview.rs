//! Admin preview toggle persisted alongside the demo session id.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::client_storage::{ClientStorage, ADMIN_PREVIEW_STORAGE_KEY};

/// Persisted flag letting an admin preview the storefront as a plain visitor.
/// Plain string values, no schema versioning.
pub struct AdminPreviewStore {
    storage: Arc<dyn ClientStorage>,
}

impl AdminPreviewStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    pub fn is_enabled(&self) -> Result<bool> {
        let value = self
            .storage
            .read(ADMIN_PREVIEW_STORAGE_KEY)
            .context("failed to read admin preview toggle")?;
        Ok(value.as_deref().map(str::trim) == Some("true"))
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.storage
                .write(ADMIN_PREVIEW_STORAGE_KEY, "true")
                .context("failed to persist admin preview toggle")
        } else {
            self.storage
                .remove(ADMIN_PREVIEW_STORAGE_KEY)
                .context("failed to clear admin preview toggle")
        }
    }
}
