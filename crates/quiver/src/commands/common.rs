//! Shared helpers for commands

use anyhow::{Context, Result};
use camino::Utf8Path;
use quiver_addons::{AddonError, AddonManager};
use quiver_core::{ConfigLoader, QuiverConfig};
use tracing::debug;

/// Load configuration from defaults, the config file and the environment
pub fn load_config(config: Option<&Utf8Path>) -> Result<QuiverConfig> {
    let mut loader = ConfigLoader::new().context("Failed to locate the quiver directory")?;
    if let Some(path) = config {
        debug!("Using config file {}", path);
        loader = loader.with_file(path.as_std_path());
    }
    loader.load().context("Failed to load configuration")
}

/// Build an addon manager backed by the configured tools
pub fn load_manager(config: Option<&Utf8Path>) -> Result<AddonManager> {
    let config = load_config(config)?;
    debug!(
        "Registry root {}, template root {}",
        config.paths.registry_root.display(),
        config.paths.template_root.display()
    );
    AddonManager::from_config(&config).context("Failed to set up addon collaborators")
}

/// `KindName: message` for terminal output
pub fn describe(err: &AddonError) -> String {
    format!("{}: {}", err.kind(), err)
}

/// `yes`/`-` cell
pub fn flag(value: bool) -> String {
    let cell = if value { "yes" } else { "-" };
    cell.to_string()
}
