//! Activation gateway
//!
//! Hands server-capable addons to the host loader and client-capable addons
//! to the bundler, translating collaborator failures into `Activation` and
//! `Optimize` errors respectively.

use crate::bundler::{BuildRequest, Bundler};
use crate::error::{AddonError, Result};
use crate::loader::HostLoader;
use quiver_core::types::AddonDescriptor;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of activating or optimizing one addon
#[derive(Debug)]
pub struct ActivationOutcome {
    pub name: String,
    pub result: Result<()>,
}

impl ActivationOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct ActivationGateway {
    loader: Arc<dyn HostLoader>,
    bundler: Arc<dyn Bundler>,
    output_file: String,
    path_aliases: BTreeMap<String, PathBuf>,
}

impl ActivationGateway {
    pub fn new(
        loader: Arc<dyn HostLoader>,
        bundler: Arc<dyn Bundler>,
        output_file: impl Into<String>,
        path_aliases: BTreeMap<String, PathBuf>,
    ) -> Self {
        Self {
            loader,
            bundler,
            output_file: output_file.into(),
            path_aliases,
        }
    }

    /// Built bundle location for an addon
    pub fn output_path(&self, descriptor: &AddonDescriptor) -> PathBuf {
        descriptor.installed_path.join(&self.output_file)
    }

    /// Hand the installed addon directory to the host loader
    pub async fn activate_server(&self, descriptor: &AddonDescriptor) -> Result<()> {
        if !descriptor.is_server_capable() {
            return Err(AddonError::activation(
                &descriptor.name,
                "addon has no server entry",
            ));
        }

        debug!("Activating server code of '{}'", descriptor.name);
        self.loader
            .load(&descriptor.installed_path)
            .await
            .map_err(|e| AddonError::activation(&descriptor.name, format!("{:#}", e)))?;

        info!("Activated '{}'", descriptor.name);
        Ok(())
    }

    /// Build the addon's client bundle, returning the built file
    pub async fn activate_client(&self, descriptor: &AddonDescriptor) -> Result<PathBuf> {
        let client = descriptor.client.as_ref().ok_or_else(|| {
            AddonError::optimize(&descriptor.name, "addon has no client entry")
        })?;

        let request = BuildRequest {
            base_dir: descriptor.client_base_dir().to_path_buf(),
            entry_module: client.client_entry.clone(),
            output_file: self.output_path(descriptor),
            path_aliases: self.path_aliases.clone(),
        };

        debug!("Optimizing client bundle of '{}'", descriptor.name);
        let built = self
            .bundler
            .build(request)
            .await
            .map_err(|e| AddonError::optimize(&descriptor.name, format!("{:#}", e)))?;

        info!("Optimized '{}' into {}", descriptor.name, built.display());
        Ok(built)
    }
}
