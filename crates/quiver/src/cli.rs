//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Quiver - Addon lifecycle manager
#[derive(Parser, Debug)]
#[command(name = "quiver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a quiver config file (default: ~/.quiver/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List installed addons
    List(ListArgs),

    /// Install an addon from a git repository
    Install(InstallArgs),

    /// Remove an installed addon
    Uninstall(UninstallArgs),

    /// Copy default addons from the template root
    SyncDefaults,

    /// Run the startup sequence: sync defaults, optimize, activate
    Start,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Source to fetch (git URL or path)
    pub source: String,

    /// Do not refresh the registry after installing
    #[arg(long)]
    pub no_reload: bool,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Addon name
    pub name: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
