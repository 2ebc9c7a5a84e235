//! Defaults synchronizer
//!
//! Every immediate entry of the template root is force-copied over the
//! registry root and provisioned. Entries are processed concurrently and
//! independently; the synchronization as a whole never fails.

use crate::error::{AddonError, Result};
use crate::fs_ops::replace_tree_async;
use crate::locks::NameLocks;
use crate::provision::DependencyProvisioner;
use crate::registry::AddonRegistry;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome for one template entry
#[derive(Debug)]
pub struct SyncOutcome {
    /// Entry name under the template root
    pub entry: String,
    pub result: Result<()>,
}

impl SyncOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct DefaultsSynchronizer {
    registry: Arc<AddonRegistry>,
    locks: Arc<NameLocks>,
    provisioner: Arc<dyn DependencyProvisioner>,
}

impl DefaultsSynchronizer {
    pub fn new(
        registry: Arc<AddonRegistry>,
        locks: Arc<NameLocks>,
        provisioner: Arc<dyn DependencyProvisioner>,
    ) -> Self {
        Self {
            registry,
            locks,
            provisioner,
        }
    }

    /// Copy and provision every template entry, one outcome per entry
    pub async fn sync_defaults(&self) -> Vec<SyncOutcome> {
        let entries = match self.template_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("No default addons synchronized: {}", e);
                return Vec::new();
            }
        };

        let outcomes = join_all(entries.into_iter().map(|(entry, path)| async move {
            let result = self.sync_entry(&entry, path).await;
            SyncOutcome { entry, result }
        }))
        .await;

        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => info!("Updated default addon '{}'", outcome.entry),
                Err(e) => error!("Default addon '{}': {}", outcome.entry, e),
            }
        }
        let ok = outcomes.iter().filter(|o| o.is_ok()).count();
        info!(
            "Default addons synchronized: {} ok, {} failed",
            ok,
            outcomes.len() - ok
        );

        outcomes
    }

    async fn template_entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let root = self.registry.template_root();
        let mut dir = tokio::fs::read_dir(root)
            .await
            .map_err(|e| AddonError::io(format!("Failed to read {}", root.display()), e))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| AddonError::io(format!("Failed to read {}", root.display()), e))?
        {
            entries.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
        }
        entries.sort();
        Ok(entries)
    }

    async fn sync_entry(&self, entry: &str, source: PathBuf) -> Result<()> {
        let metadata = tokio::fs::symlink_metadata(&source)
            .await
            .map_err(|e| AddonError::io(format!("Failed to stat {}", source.display()), e))?;
        if !metadata.is_dir() {
            return Err(AddonError::InvalidTemplateLayout { path: source });
        }

        let _guard = self.locks.acquire(entry).await;

        let target = self.registry.addon_dir(entry);
        debug!("Copying {} to {}", source.display(), target.display());
        replace_tree_async(source, target.clone())
            .await
            .map_err(|e| AddonError::io(format!("Failed to update {}", target.display()), e))?;

        self.provisioner
            .provision(&target)
            .await
            .map_err(|e| AddonError::dependency_provision(entry, format!("{:#}", e)))
    }
}
