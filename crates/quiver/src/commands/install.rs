//! Install command

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use quiver_addons::InstallOptions;
use tracing::{info, warn};

use super::common::{describe, load_manager};
use crate::cli::InstallArgs;
use crate::output;

pub async fn run(args: InstallArgs, config: Option<&Utf8Path>) -> Result<()> {
    let manager = load_manager(config)?;
    let options = InstallOptions {
        reload: !args.no_reload,
    };
    info!("Installing addon from {}", args.source);

    let spinner = output::spinner(&format!("Installing {}...", args.source));
    let result = manager.install(&args.source, options).await;
    spinner.finish_and_clear();

    let report = result.map_err(|e| anyhow!(describe(&e)))?;
    let addon = &report.descriptor;

    if report.is_degraded() {
        warn!(
            "Addon '{}' installed with {} failure(s)",
            addon.name,
            report.failures.len()
        );
        output::warning(&format!(
            "Installed {} {} with errors",
            addon.name, addon.version
        ));
        for failure in &report.failures {
            output::addon_error(&addon.name, failure);
        }
    } else {
        output::success(&format!("Installed {} {}", addon.name, addon.version));
    }
    output::kv("path", &addon.installed_path.display().to_string());
    if let Some(entry) = &addon.server_entry {
        output::kv("server", entry);
    }
    if let Some(client) = &addon.client {
        output::kv("client", &client.client_entry);
    }

    Ok(())
}
