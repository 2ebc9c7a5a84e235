//! Shared utility functions for Quiver crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// containers and test harnesses can redirect it.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the Quiver state directory (~/.quiver)
pub fn get_quiver_dir() -> anyhow::Result<PathBuf> {
    Ok(get_home_dir()?.join(".quiver"))
}
