//! Addon registry
//!
//! The registry root holds one directory per installed addon. `scan` reads
//! it from disk; `refresh` replaces the cached snapshot with a fresh scan;
//! `list` serves the snapshot. The cache is never patched incrementally:
//! every mutating operation ends with a full `refresh`, so the snapshot is
//! always a faithful picture of the filesystem at that moment.

use crate::error::{AddonError, Result};
use crate::validator;
use quiver_core::types::{AddonDescriptor, PackageManifest, METADATA_FILE};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Installed addons keyed by name
pub type AddonMap = BTreeMap<String, AddonDescriptor>;

/// Leading character of entries the scan ignores
const HIDDEN_MARKER: char = '.';

/// Registry of installed addons with a refreshable snapshot
pub struct AddonRegistry {
    /// Directory holding installed addons
    root: PathBuf,

    /// Directory holding default addon templates
    template_root: PathBuf,

    /// Last scan result
    cache: RwLock<Option<Arc<AddonMap>>>,
}

impl AddonRegistry {
    /// Create a registry over `root`, classifying defaults against `template_root`
    pub fn new(root: impl Into<PathBuf>, template_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            template_root: template_root.into(),
            cache: RwLock::new(None),
        }
    }

    /// Registry root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Template root directory
    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Directory an addon of this name occupies
    pub fn addon_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether `name` is a default addon (present in the template root).
    ///
    /// Names that are not a single path component are never defaults.
    pub fn is_default(&self, name: &str) -> bool {
        validator::is_safe_name(name) && self.template_root.join(name).exists()
    }

    /// Create the registry root if it does not exist yet
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AddonError::io(
                format!("Failed to create registry root {}", self.root.display()),
                e,
            )
        })
    }

    /// Read the registry root and return every valid addon.
    ///
    /// Hidden entries and entries without metadata are skipped; an entry that
    /// cannot be read or parsed is left out without failing the scan. A
    /// missing root scans as empty.
    pub async fn scan(&self) -> AddonMap {
        let mut addons = AddonMap::new();

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read registry root {}: {}", self.root.display(), e);
                return addons;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    debug!("Stopped reading {}: {}", self.root.display(), e);
                    break;
                }
            };

            let dir_name = entry.file_name().to_string_lossy().to_string();
            if dir_name.starts_with(HIDDEN_MARKER) {
                continue;
            }

            let dir = entry.path();
            let manifest = match read_manifest(&dir).await {
                Ok(Some(manifest)) => manifest,
                Ok(None) => continue,
                Err(e) => {
                    debug!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            if !validator::validate(&manifest) {
                debug!("Skipping {}: invalid package.json", dir.display());
                continue;
            }

            let is_default = manifest.name().is_some_and(|name| self.is_default(name));
            if let Some(descriptor) = AddonDescriptor::from_manifest(&manifest, &dir, is_default)
            {
                if descriptor.name != dir_name {
                    debug!(
                        "Addon '{}' lives in directory '{}'",
                        descriptor.name, dir_name
                    );
                }
                insert_scanned(&mut addons, descriptor);
            }
        }

        addons
    }

    /// Rescan the root and replace the cached snapshot
    pub async fn refresh(&self) -> Arc<AddonMap> {
        let snapshot = Arc::new(self.scan().await);
        info!("Loaded {} addons from {}", snapshot.len(), self.root.display());

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Cached snapshot, scanning once if the registry was never loaded
    pub async fn list(&self) -> Arc<AddonMap> {
        if let Some(snapshot) = self.cached() {
            return snapshot;
        }
        self.refresh().await
    }

    /// Look up an addon in the cached snapshot
    pub async fn get(&self, name: &str) -> Option<AddonDescriptor> {
        self.list().await.get(name).cloned()
    }

    fn cached(&self) -> Option<Arc<AddonMap>> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }
}

/// Insert a scanned addon, resolving manifest name clashes.
///
/// The directory named after the addon wins; otherwise the lexically first
/// directory does, so the result does not depend on `read_dir` order.
fn insert_scanned(addons: &mut AddonMap, descriptor: AddonDescriptor) {
    let Some(existing) = addons.get(&descriptor.name) else {
        addons.insert(descriptor.name.clone(), descriptor);
        return;
    };

    let rank = |d: &AddonDescriptor| {
        let matches_name = d.installed_path.file_name() == Some(OsStr::new(&d.name));
        (!matches_name, d.installed_path.clone())
    };
    let (kept, dropped) = if rank(&descriptor) < rank(existing) {
        (descriptor.installed_path.clone(), existing.installed_path.clone())
    } else {
        (existing.installed_path.clone(), descriptor.installed_path.clone())
    };

    warn!(
        "Addon '{}' is declared by both {} and {}; using {}",
        descriptor.name,
        kept.display(),
        dropped.display(),
        kept.display()
    );
    if kept == descriptor.installed_path {
        addons.insert(descriptor.name.clone(), descriptor);
    }
}

/// Read `<dir>/package.json`.
///
/// Returns `Ok(None)` when the file does not exist.
pub async fn read_manifest(dir: &Path) -> Result<Option<PackageManifest>> {
    let path = dir.join(METADATA_FILE);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AddonError::io(
                format!("Failed to read {}", path.display()),
                e,
            ))
        }
    };

    PackageManifest::from_json(&content)
        .map(Some)
        .map_err(|e| AddonError::invalid_addon(format!("malformed {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_addon(root: &Path, dir: &str, json: &str) {
        let addon_dir = root.join(dir);
        fs::create_dir_all(&addon_dir).unwrap();
        fs::write(addon_dir.join(METADATA_FILE), json).unwrap();
    }

    #[tokio::test]
    async fn test_scan_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = AddonRegistry::new(temp.path().join("nope"), temp.path().join("t"));
        assert!(registry.scan().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_manifest_absent() {
        let temp = TempDir::new().unwrap();
        assert!(read_manifest(temp.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_manifest_malformed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(METADATA_FILE), "{ not json").unwrap();
        let err = read_manifest(temp.path()).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidAddon);
    }

    #[tokio::test]
    async fn test_list_is_cached_until_refresh() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("addons");
        let registry = AddonRegistry::new(&root, temp.path().join("defaults"));

        write_addon(&root, "one", r#"{"name":"one","version":"1","main":"i.js"}"#);
        assert_eq!(registry.list().await.len(), 1);

        write_addon(&root, "two", r#"{"name":"two","version":"1","main":"i.js"}"#);
        assert_eq!(registry.list().await.len(), 1);

        registry.refresh().await;
        assert_eq!(registry.list().await.len(), 2);
        assert!(registry.get("two").await.is_some());
    }

    #[tokio::test]
    async fn test_is_default() {
        let temp = TempDir::new().unwrap();
        let templates = temp.path().join("defaults");
        fs::create_dir_all(templates.join("hello")).unwrap();

        let registry = AddonRegistry::new(temp.path().join("addons"), &templates);
        assert!(registry.is_default("hello"));
        assert!(!registry.is_default("other"));
    }

    #[tokio::test]
    async fn test_unsafe_names_are_never_default() {
        let temp = TempDir::new().unwrap();
        let templates = temp.path().join("defaults");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(temp.path().join("precious")).unwrap();

        let registry = AddonRegistry::new(temp.path().join("addons"), &templates);
        assert!(!registry.is_default(""));
        assert!(!registry.is_default("."));
        assert!(!registry.is_default("../precious"));
    }

    #[tokio::test]
    async fn test_name_clash_prefers_matching_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("addons");
        let json = r#"{"name":"hello","version":"1","main":"i.js"}"#;
        write_addon(&root, "a-copy", json);
        write_addon(&root, "hello", json);
        write_addon(&root, "z-copy", json);

        let registry = AddonRegistry::new(&root, temp.path().join("defaults"));
        let addons = registry.scan().await;

        assert_eq!(addons.len(), 1);
        assert_eq!(addons["hello"].installed_path, root.join("hello"));
    }

    #[tokio::test]
    async fn test_name_clash_without_matching_directory_is_stable() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("addons");
        let json = r#"{"name":"hello","version":"1","main":"i.js"}"#;
        write_addon(&root, "b-copy", json);
        write_addon(&root, "a-copy", json);

        let registry = AddonRegistry::new(&root, temp.path().join("defaults"));
        let addons = registry.scan().await;

        assert_eq!(addons["hello"].installed_path, root.join("a-copy"));
    }
}
