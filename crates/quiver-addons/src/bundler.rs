//! Client bundle building
//!
//! The bundler turns an addon's client entry module into a single built
//! file written next to the sources. `RequireJsBundler` drives the r.js
//! optimizer; path aliases become `paths.<alias>=<dir>` arguments.

use crate::process::run_tool;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Alias under which the css/less loader plugins are resolved
pub const REQUIRE_TOOLS_ALIAS: &str = "require-tools";

/// One bundle build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Directory module ids are resolved against
    pub base_dir: PathBuf,

    /// Root module, relative to `base_dir`
    pub entry_module: String,

    /// Built file
    pub output_file: PathBuf,

    /// Module path aliases
    pub path_aliases: BTreeMap<String, PathBuf>,
}

/// Builds client bundles
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Build the bundle and return the output file
    async fn build(&self, request: BuildRequest) -> Result<PathBuf>;
}

/// r.js optimizer
#[derive(Debug, Clone)]
pub struct RequireJsBundler {
    program: String,
    timeout: Option<Duration>,
}

impl RequireJsBundler {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Optimizer arguments for `request`
    pub fn build_args(request: &BuildRequest) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("baseUrl={}", request.base_dir.display()),
            format!("name={}", request.entry_module),
            format!("out={}", request.output_file.display()),
        ];

        for (alias, path) in &request.path_aliases {
            args.push(format!("paths.{}={}", alias, path.display()));
        }

        if request.path_aliases.contains_key(REQUIRE_TOOLS_ALIAS) {
            args.push(format!("map.*.css={}/css/css", REQUIRE_TOOLS_ALIAS));
            args.push(format!("map.*.less={}/less/less", REQUIRE_TOOLS_ALIAS));
        }

        args
    }
}

impl Default for RequireJsBundler {
    fn default() -> Self {
        Self::new("r.js", None)
    }
}

#[async_trait]
impl Bundler for RequireJsBundler {
    async fn build(&self, request: BuildRequest) -> Result<PathBuf> {
        info!(
            "Optimizing {} from {}",
            request.entry_module,
            request.base_dir.display()
        );
        let args = Self::build_args(&request);
        run_tool(
            &self.program,
            args,
            Some(request.base_dir.as_path()),
            self.timeout,
        )
        .await?;
        Ok(request.output_file)
    }
}
