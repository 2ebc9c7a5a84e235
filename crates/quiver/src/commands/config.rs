//! Config command

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::common::load_config;
use crate::cli::{ConfigCommands, ConfigShowArgs};

pub fn run(cmd: ConfigCommands, config: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config),
    }
}

fn show(args: ConfigShowArgs, config: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config)?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?
    } else {
        serde_yaml_ng::to_string(&config).context("Failed to serialize configuration")?
    };
    println!("{}", rendered);

    Ok(())
}
