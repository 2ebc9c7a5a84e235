//! Addon metadata and descriptor types
//!
//! `PackageManifest` is the raw shape of an addon's `package.json`: every
//! field is optional so that malformed or partial metadata can still be
//! read and judged. `AddonDescriptor` is the strong type the rest of the
//! system works with, and can only be built from metadata that names the
//! addon, carries a version and exposes at least one capability.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the metadata file at the root of every addon directory
pub const METADATA_FILE: &str = "package.json";

/// Raw addon metadata as found in `package.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Addon name, doubles as the installed directory name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version string (not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Relative path to server-side code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Client-side section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientSection>,

    /// Remaining keys (dependencies, scripts, ...) kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `client` section of `package.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Relative path to the client bundle root module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Parse manifest JSON
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Name, treating an empty string as absent
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    /// Version, treating an empty string as absent
    pub fn version(&self) -> Option<&str> {
        non_empty(self.version.as_deref())
    }

    /// Server entry, treating an empty string as absent
    pub fn server_entry(&self) -> Option<&str> {
        non_empty(self.main.as_deref())
    }

    /// Client entry, present only when the `client` section names a module
    pub fn client_entry(&self) -> Option<&str> {
        non_empty(self.client.as_ref().and_then(|c| c.main.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Client-side capability of an addon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCapability {
    /// Bundle root module, relative to the addon directory
    pub client_entry: String,
}

/// A valid, located addon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonDescriptor {
    /// Unique addon name
    pub name: String,

    /// Version string
    pub version: String,

    /// Relative path to server-side code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_entry: Option<String>,

    /// Client-side capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientCapability>,

    /// True when an addon of the same name exists in the template root
    pub is_default: bool,

    /// Directory the addon lives in
    pub installed_path: PathBuf,
}

impl AddonDescriptor {
    /// Build a descriptor from raw metadata.
    ///
    /// Returns `None` when the metadata lacks a name, a version, or both
    /// capabilities.
    pub fn from_manifest(
        manifest: &PackageManifest,
        installed_path: impl Into<PathBuf>,
        is_default: bool,
    ) -> Option<Self> {
        let name = manifest.name()?;
        let version = manifest.version()?;
        let server_entry = manifest.server_entry().map(str::to_string);
        let client = manifest.client_entry().map(|entry| ClientCapability {
            client_entry: entry.to_string(),
        });

        if server_entry.is_none() && client.is_none() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            version: version.to_string(),
            server_entry,
            client,
            is_default,
            installed_path: installed_path.into(),
        })
    }

    /// Has a server-side entry point
    pub fn is_server_capable(&self) -> bool {
        self.server_entry.is_some()
    }

    /// Has a client-side bundle entry point
    pub fn is_client_capable(&self) -> bool {
        self.client.is_some()
    }

    /// Base directory the client bundle is built from
    pub fn client_base_dir(&self) -> &Path {
        &self.installed_path
    }

    /// Same descriptor relocated to another directory
    pub fn relocated(mut self, installed_path: impl Into<PathBuf>) -> Self {
        self.installed_path = installed_path.into();
        self
    }
}

/// Addon lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonState {
    /// Found by a registry scan
    Discovered,
    /// Fetched into a staging directory, not yet visible
    Staged,
    /// Moved into the registry root
    Committed,
    /// Server code loaded and/or client bundle built
    Activated,
    /// Directory deleted
    Removed,
}
