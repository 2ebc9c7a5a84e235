//! Uninstall pipeline

use crate::error::{AddonError, Result};
use crate::events::{EventEnvelope, EventPublisher};
use crate::locks::NameLocks;
use crate::registry::AddonRegistry;
use crate::validator;
use std::sync::Arc;
use tracing::info;

pub struct UninstallPipeline {
    registry: Arc<AddonRegistry>,
    locks: Arc<NameLocks>,
    publisher: Arc<dyn EventPublisher>,
}

impl UninstallPipeline {
    pub fn new(
        registry: Arc<AddonRegistry>,
        locks: Arc<NameLocks>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            registry,
            locks,
            publisher,
        }
    }

    /// Delete `registryRoot/<name>`.
    ///
    /// Unsafe names and default addons are refused before anything on disk
    /// is touched. The registry cache is refreshed afterwards, so `list()`
    /// no longer shows the addon.
    pub async fn uninstall(&self, name: &str) -> Result<bool> {
        info!("Uninstalling addon '{}'", name);

        if !validator::is_safe_name(name) {
            return Err(AddonError::invalid_addon(format!(
                "'{}' is not an addon name",
                name
            )));
        }
        if self.registry.is_default(name) {
            return Err(AddonError::default_protected(name));
        }

        let _guard = self.locks.acquire(name).await;

        let dir = self.registry.addon_dir(name);
        tokio::fs::remove_dir_all(&dir)
            .await
            .map_err(|e| AddonError::io(format!("Failed to remove {}", dir.display()), e))?;

        self.publisher.emit(EventEnvelope::uninstall(name)).await;
        self.registry.refresh().await;

        info!("Uninstalled '{}'", name);
        Ok(true)
    }
}
