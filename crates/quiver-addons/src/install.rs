//! Install pipeline
//!
//! Stages run strictly in order:
//!
//! 1. Stage: fetch the source into a fresh staging directory
//! 2. Validate: read and check `package.json`
//! 3. Authorize: ask the policy hook
//! 4. Commit: swap the staged tree into the registry root
//! 5. Optimize: build the client bundle (client-capable only)
//! 6. Provision: install the addon's dependencies
//! 7. Activate: load the server entry (server-capable only)
//! 8. Reload: refresh the registry cache (when requested)
//! 9. Notify: emit `addons.install`
//!
//! Stages 1-4 fail fast and leave the registry root untouched; the staging
//! directory is removed on every path except a failed commit. Stages 5-7
//! run against an addon that is already committed, so their failures are
//! collected in the report instead of undoing the install.

use crate::activation::ActivationGateway;
use crate::error::{AddonError, Result};
use crate::events::{EventEnvelope, EventPublisher};
use crate::fetch::Fetcher;
use crate::fs_ops::replace_tree_async;
use crate::hooks::Authorizer;
use crate::locks::NameLocks;
use crate::provision::DependencyProvisioner;
use crate::registry::{read_manifest, AddonRegistry};
use crate::staging::{StagingArea, StagingDirectory};
use crate::validator;
use quiver_core::types::{AddonDescriptor, AddonState};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Install options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Refresh the registry cache once the addon is committed
    pub reload: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self { reload: true }
    }
}

/// Result of an install that reached the commit stage
#[derive(Debug)]
pub struct InstallReport {
    /// Descriptor of the committed addon
    pub descriptor: AddonDescriptor,

    /// Optimize, provision and activation failures, in stage order
    pub failures: Vec<AddonError>,
}

impl InstallReport {
    /// Committed, but at least one post-commit stage failed
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Descriptor, or the first post-commit failure
    pub fn into_result(self) -> Result<AddonDescriptor> {
        match self.failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.descriptor),
        }
    }
}

pub struct InstallPipeline {
    registry: Arc<AddonRegistry>,
    staging: StagingArea,
    locks: Arc<NameLocks>,
    gateway: Arc<ActivationGateway>,
    fetcher: Arc<dyn Fetcher>,
    provisioner: Arc<dyn DependencyProvisioner>,
    authorizer: Arc<dyn Authorizer>,
    publisher: Arc<dyn EventPublisher>,
}

impl InstallPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<AddonRegistry>,
        staging: StagingArea,
        locks: Arc<NameLocks>,
        gateway: Arc<ActivationGateway>,
        fetcher: Arc<dyn Fetcher>,
        provisioner: Arc<dyn DependencyProvisioner>,
        authorizer: Arc<dyn Authorizer>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            registry,
            staging,
            locks,
            gateway,
            fetcher,
            provisioner,
            authorizer,
            publisher,
        }
    }

    /// Install the addon behind `source_ref`
    pub async fn install(&self, source_ref: &str, options: InstallOptions) -> Result<InstallReport> {
        info!("Installing addon from {}", source_ref);

        let staging = self.staging.create().await?;

        let descriptor = match self.fetch_and_validate(source_ref, &staging).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                discard_staging(staging).await;
                return Err(e);
            }
        };
        let name = descriptor.name.clone();

        let _guard = self.locks.acquire(&name).await;

        if let Err(e) = self.authorizer.authorize(&descriptor).await {
            warn!("Installation of '{}' rejected: {:#}", name, e);
            discard_staging(staging).await;
            return Err(AddonError::policy_rejected(&name, format!("{:#}", e)));
        }

        self.commit(&descriptor, staging).await?;

        let failures = self.post_commit(&descriptor).await;

        if options.reload {
            self.registry.refresh().await;
        }

        let state_after = if failures.is_empty() {
            AddonState::Activated
        } else {
            AddonState::Committed
        };
        self.publisher
            .emit(EventEnvelope::install(descriptor.clone(), state_after))
            .await;

        if failures.is_empty() {
            info!("Installed '{}' {}", name, descriptor.version);
        } else {
            warn!(
                "Installed '{}' {} with {} failed stage(s)",
                name,
                descriptor.version,
                failures.len()
            );
        }

        Ok(InstallReport {
            descriptor,
            failures,
        })
    }

    /// Stages 1 and 2
    async fn fetch_and_validate(
        &self,
        source_ref: &str,
        staging: &StagingDirectory,
    ) -> Result<AddonDescriptor> {
        self.fetcher
            .fetch(source_ref, staging.path())
            .await
            .map_err(|e| AddonError::fetch(source_ref, format!("{:#}", e)))?;
        debug!("Fetched {} into {}", source_ref, staging.path().display());

        let manifest = read_manifest(staging.path()).await?.ok_or_else(|| {
            AddonError::MissingMetadata {
                path: staging.path().to_path_buf(),
            }
        })?;

        if !validator::validate(&manifest) {
            return Err(AddonError::invalid_addon(
                "'package.json' needs a name, a version and a 'main' or 'client.main' entry",
            ));
        }

        let name = manifest.name().unwrap_or_default();
        if !validator::is_safe_name(name) {
            return Err(AddonError::invalid_addon(format!(
                "'{}' cannot be used as an addon directory name",
                name
            )));
        }

        AddonDescriptor::from_manifest(
            &manifest,
            self.registry.addon_dir(name),
            self.registry.is_default(name),
        )
        .ok_or_else(|| AddonError::invalid_addon("invalid 'package.json' file"))
    }

    /// Stage 4
    async fn commit(&self, descriptor: &AddonDescriptor, staging: StagingDirectory) -> Result<()> {
        if let Err(e) = self.registry.ensure_root().await {
            let kept = staging.keep();
            return Err(AddonError::commit(&descriptor.name, kept, e));
        }

        let target = descriptor.installed_path.clone();
        debug!("Committing '{}' to {}", descriptor.name, target.display());

        if let Err(e) = replace_tree_async(staging.path().to_path_buf(), target).await {
            let kept = staging.keep();
            error!(
                "Commit of '{}' failed, staged copy kept at {}",
                descriptor.name,
                kept.display()
            );
            return Err(AddonError::commit(&descriptor.name, kept, e));
        }

        discard_staging(staging).await;
        Ok(())
    }

    /// Stages 5, 6 and 7
    async fn post_commit(&self, descriptor: &AddonDescriptor) -> Vec<AddonError> {
        let mut failures = Vec::new();

        if descriptor.is_client_capable() {
            if let Err(e) = self.gateway.activate_client(descriptor).await {
                warn!("{}", e);
                failures.push(e);
            }
        }

        if let Err(e) = self.provisioner.provision(&descriptor.installed_path).await {
            let e = AddonError::dependency_provision(&descriptor.name, format!("{:#}", e));
            warn!("{}", e);
            failures.push(e);
        }

        if descriptor.is_server_capable() {
            if let Err(e) = self.gateway.activate_server(descriptor).await {
                warn!("{}", e);
                failures.push(e);
            }
        }

        failures
    }
}

async fn discard_staging(staging: StagingDirectory) {
    let path = staging.path().to_path_buf();
    if let Err(e) = staging.destroy().await {
        warn!(
            "Failed to remove staging directory {}: {}",
            path.display(),
            e
        );
    }
}
