//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Config file (`--config <path>` or ~/.quiver/config.yaml)
//! 3. Environment variables (QUIVER_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::QuiverConfig;
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "quiver-defaults.yaml";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Base directory for configuration files
    config_dir: PathBuf,

    /// Explicit config file, replaces `<config_dir>/config.yaml`
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader rooted at ~/.quiver
    pub fn new() -> Result<Self> {
        let config_dir = crate::utils::get_quiver_dir()
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        Ok(Self::with_dir(config_dir))
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            config_file: None,
        }
    }

    /// Use an explicit config file instead of `<config_dir>/config.yaml`.
    ///
    /// Unlike the implicit file, an explicit one must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Load the configuration with hierarchical precedence
    pub fn load(&self) -> Result<QuiverConfig> {
        let mut merged = Self::load_embedded_defaults()?;

        match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.display().to_string()));
                }
                merge_values(&mut merged, self.load_yaml_file(path)?);
            }
            None => {
                let path = self.config_dir.join("config.yaml");
                if path.exists() {
                    merge_values(&mut merged, self.load_yaml_file(&path)?);
                }
            }
        }

        let config: QuiverConfig = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Failed to parse configuration: {}", e)))?;

        let config = Self::apply_env_overrides(config)?;
        Ok(config.expand_paths())
    }

    /// Load the embedded defaults as an untyped tree
    fn load_embedded_defaults() -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    /// Load a YAML file as an untyped tree
    fn load_yaml_file(&self, path: &Path) -> Result<Value> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| {
            Error::invalid_config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: QuiverConfig) -> Result<QuiverConfig> {
        if let Ok(val) = env::var("QUIVER_REGISTRY_ROOT") {
            config.paths.registry_root = PathBuf::from(val);
        }

        if let Ok(val) = env::var("QUIVER_TEMPLATE_ROOT") {
            config.paths.template_root = PathBuf::from(val);
        }

        if let Ok(val) = env::var("QUIVER_STAGING_ROOT") {
            config.paths.staging_root = Some(PathBuf::from(val));
        }

        if let Ok(val) = env::var("QUIVER_GIT") {
            config.fetch.program = val;
        }

        if let Ok(val) = env::var("QUIVER_NPM") {
            config.provision.program = val;
        }

        if let Ok(val) = env::var("QUIVER_BUNDLER") {
            config.bundler.program = val;
        }

        if let Ok(val) = env::var("QUIVER_TOOL_TIMEOUT_SECS") {
            config.tool_timeout_secs = Some(val.parse().map_err(|_| {
                Error::invalid_config("QUIVER_TOOL_TIMEOUT_SECS must be a valid number")
            })?);
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Deep-merge `overlay` into `base`: mappings merge key by key, anything
/// else in the overlay replaces the base value.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}
