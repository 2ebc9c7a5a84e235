//! Staging directories for in-flight installs
//!
//! Each install fetches into its own freshly created directory. The
//! directory is not removed on drop: the install pipeline destroys it on
//! success and on early failure, and leaves it behind when the commit step
//! fails.

use crate::error::{AddonError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const STAGING_PREFIX: &str = "addon-";

/// Allocates staging directories
#[derive(Debug, Clone, Default)]
pub struct StagingArea {
    /// Parent directory; the system temp dir when `None`
    base: Option<PathBuf>,
}

/// A staging directory owned by one install
#[derive(Debug)]
pub struct StagingDirectory {
    path: PathBuf,
}

impl StagingArea {
    /// Stage under the system temp dir
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage under `base`, created on demand
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Parent of all staging directories
    pub fn base(&self) -> PathBuf {
        self.base.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Allocate a fresh, uniquely named directory
    pub async fn create(&self) -> Result<StagingDirectory> {
        let base = self.base();
        tokio::fs::create_dir_all(&base).await.map_err(|e| {
            AddonError::io(
                format!("Failed to create staging root {}", base.display()),
                e,
            )
        })?;

        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&base)
            .map_err(|e| {
                AddonError::io(
                    format!("Failed to create staging directory in {}", base.display()),
                    e,
                )
            })?;

        let path = dir.keep();
        debug!("Created staging directory {}", path.display());
        Ok(StagingDirectory { path })
    }
}

impl StagingDirectory {
    /// Location of the staged tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursively delete the directory
    pub async fn destroy(self) -> std::io::Result<()> {
        debug!("Removing staging directory {}", self.path.display());
        match tokio::fs::remove_dir_all(&self.path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Give up ownership without deleting, returning the path
    pub fn keep(self) -> PathBuf {
        self.path
    }
}
