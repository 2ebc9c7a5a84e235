//! Source fetching

use crate::process::run_tool;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Fetches an addon's full file tree into a local directory
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Populate `dest` (existing, empty) with the tree behind `source_ref`
    async fn fetch(&self, source_ref: &str, dest: &Path) -> Result<()>;
}

/// Fetches by running `git clone`
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: String,
    depth: Option<u32>,
    timeout: Option<Duration>,
}

impl GitFetcher {
    pub fn new(program: impl Into<String>, depth: Option<u32>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            depth,
            timeout,
        }
    }

    /// Arguments for cloning `source_ref` into `dest`
    pub fn clone_args(&self, source_ref: &str, dest: &Path) -> Vec<String> {
        let mut args = vec!["clone".to_string()];
        if let Some(depth) = self.depth {
            args.push("--depth".to_string());
            args.push(depth.to_string());
        }
        args.push(source_ref.to_string());
        args.push(dest.to_string_lossy().to_string());
        args
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new("git", Some(1), None)
    }
}

#[async_trait]
impl Fetcher for GitFetcher {
    async fn fetch(&self, source_ref: &str, dest: &Path) -> Result<()> {
        info!("Cloning {} into {}", source_ref, dest.display());
        run_tool(
            &self.program,
            self.clone_args(source_ref, dest),
            None,
            self.timeout,
        )
        .await
    }
}
