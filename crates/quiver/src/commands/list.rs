//! List command

use anyhow::{Context, Result};
use camino::Utf8Path;
use quiver_core::types::AddonDescriptor;
use tabled::{settings::Style, Table, Tabled};

use super::common::{flag, load_manager};
use crate::cli::ListArgs;
use crate::output;

#[derive(Tabled)]
struct AddonRow {
    name: String,
    version: String,
    server: String,
    client: String,
    default: String,
    path: String,
}

impl From<&AddonDescriptor> for AddonRow {
    fn from(addon: &AddonDescriptor) -> Self {
        Self {
            name: addon.name.clone(),
            version: addon.version.clone(),
            server: addon
                .server_entry
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            client: addon
                .client
                .as_ref()
                .map(|c| c.client_entry.clone())
                .unwrap_or_else(|| "-".to_string()),
            default: flag(addon.is_default),
            path: addon.installed_path.display().to_string(),
        }
    }
}

pub async fn run(args: ListArgs, config: Option<&Utf8Path>) -> Result<()> {
    let manager = load_manager(config)?;
    let addons = manager.list().await;

    if args.json {
        let list: Vec<&AddonDescriptor> = addons.values().collect();
        let json =
            serde_json::to_string_pretty(&list).context("Failed to serialize addons to JSON")?;
        println!("{}", json);
    } else if addons.is_empty() {
        output::warning(&format!(
            "No addons installed in {}",
            manager.static_root().display()
        ));
    } else {
        let mut table = Table::new(addons.values().map(AddonRow::from));
        table.with(Style::sharp());
        println!("{}", table);
    }

    Ok(())
}
