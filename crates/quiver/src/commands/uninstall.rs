//! Uninstall command

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use tracing::info;

use super::common::{describe, load_manager};
use crate::cli::UninstallArgs;
use crate::output;

pub async fn run(args: UninstallArgs, config: Option<&Utf8Path>) -> Result<()> {
    let manager = load_manager(config)?;
    info!("Uninstalling addon '{}'", args.name);

    manager
        .uninstall(&args.name)
        .await
        .map_err(|e| anyhow!(describe(&e)))?;

    output::success(&format!("Uninstalled {}", args.name));
    Ok(())
}
