//! Configuration types for the addon manager
//!
//! Paths may start with `~`; they are expanded by `QuiverConfig::expand_paths`
//! after all configuration layers have been applied.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete Quiver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuiverConfig {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Source fetch tool
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Dependency installation tool
    #[serde(default)]
    pub provision: ProvisionConfig,

    /// Client bundler
    #[serde(default)]
    pub bundler: BundlerConfig,

    /// Host loader for server-side addons
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Install authorization policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Timeout applied to each external tool invocation
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,

    /// Public path prefix the registry root is served under
    #[serde(default = "default_static_prefix")]
    pub static_prefix: String,
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathsConfig {
    /// Directory holding installed addons
    #[serde(default = "default_registry_root")]
    pub registry_root: PathBuf,

    /// Directory holding default addon templates
    #[serde(default = "default_template_root")]
    pub template_root: PathBuf,

    /// Parent of staging directories; system temp dir when absent
    #[serde(default)]
    pub staging_root: Option<PathBuf>,
}

/// Source fetch tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchConfig {
    /// git executable
    #[serde(default = "default_git")]
    pub program: String,

    /// Shallow clone depth
    #[serde(default = "default_depth")]
    pub depth: Option<u32>,
}

/// Dependency installation tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProvisionConfig {
    /// Executable run inside the addon directory
    #[serde(default = "default_npm")]
    pub program: String,

    /// Arguments passed to the executable
    #[serde(default = "default_provision_args")]
    pub args: Vec<String>,
}

/// Client bundler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundlerConfig {
    /// r.js executable
    #[serde(default = "default_bundler")]
    pub program: String,

    /// Root of the `require-tools` plugins (css/less loaders)
    #[serde(default)]
    pub require_tools: Option<PathBuf>,

    /// Built bundle file name, written inside the addon directory
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

/// Host loader settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoaderConfig {
    /// Command the server entry path is appended to
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

/// Install authorization policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PolicyConfig {
    /// Addon names that may not be installed
    #[serde(default)]
    pub denied: Vec<String>,
}

fn default_static_prefix() -> String {
    "/static/addons".to_string()
}

fn default_registry_root() -> PathBuf {
    PathBuf::from("~/.quiver/addons")
}

fn default_template_root() -> PathBuf {
    PathBuf::from("~/.quiver/defaults")
}

fn default_git() -> String {
    "git".to_string()
}

fn default_depth() -> Option<u32> {
    Some(1)
}

fn default_npm() -> String {
    "npm".to_string()
}

fn default_provision_args() -> Vec<String> {
    vec!["install".to_string(), ".".to_string()]
}

fn default_bundler() -> String {
    "r.js".to_string()
}

fn default_output_file() -> String {
    "addon-built.js".to_string()
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            fetch: FetchConfig::default(),
            provision: ProvisionConfig::default(),
            bundler: BundlerConfig::default(),
            loader: LoaderConfig::default(),
            policy: PolicyConfig::default(),
            tool_timeout_secs: None,
            static_prefix: default_static_prefix(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            registry_root: default_registry_root(),
            template_root: default_template_root(),
            staging_root: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            program: default_git(),
            depth: default_depth(),
        }
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            program: default_npm(),
            args: default_provision_args(),
        }
    }
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            program: default_bundler(),
            require_tools: None,
            output_file: default_output_file(),
        }
    }
}

impl QuiverConfig {
    /// Expand `~` in every configured path
    pub fn expand_paths(mut self) -> Self {
        self.paths.registry_root = expand(&self.paths.registry_root);
        self.paths.template_root = expand(&self.paths.template_root);
        self.paths.staging_root = self.paths.staging_root.as_deref().map(expand);
        self.bundler.require_tools = self.bundler.require_tools.as_deref().map(expand);
        self
    }
}

fn expand(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}
