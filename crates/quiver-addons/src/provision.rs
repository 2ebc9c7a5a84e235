//! Dependency provisioning

use crate::process::run_tool;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Installs an addon's own dependencies inside its directory
#[async_trait]
pub trait DependencyProvisioner: Send + Sync {
    async fn provision(&self, dir: &Path) -> Result<()>;
}

/// Runs a package manager (`npm install .` by default) in the addon directory
#[derive(Debug, Clone)]
pub struct CommandProvisioner {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandProvisioner {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

impl Default for CommandProvisioner {
    fn default() -> Self {
        Self::new("npm", vec!["install".into(), ".".into()], None)
    }
}

#[async_trait]
impl DependencyProvisioner for CommandProvisioner {
    async fn provision(&self, dir: &Path) -> Result<()> {
        info!("Installing dependencies in {}", dir.display());
        run_tool(&self.program, &self.args, Some(dir), self.timeout).await
    }
}
