//! Filesystem fixtures
//!
//! `TestEnv` lays out a registry root, a template root, a staging root and
//! a directory of fetchable sources inside one temporary directory.

#![allow(dead_code)]

use super::mocks::Fakes;
use quiver_addons::{AddonManager, ManagerPaths};
use quiver_core::types::METADATA_FILE;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary addon environment
pub struct TestEnv {
    temp_dir: TempDir,
    pub registry_root: PathBuf,
    pub template_root: PathBuf,
    pub staging_root: PathBuf,
    pub sources_root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        let env = Self {
            registry_root: root.join("addons"),
            template_root: root.join("defaults"),
            staging_root: root.join("staging"),
            sources_root: root.join("sources"),
            temp_dir,
        };

        fs::create_dir_all(&env.template_root).unwrap();
        fs::create_dir_all(&env.sources_root).unwrap();
        env
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn paths(&self) -> ManagerPaths {
        ManagerPaths::new(&self.registry_root, &self.template_root)
            .with_staging_root(&self.staging_root)
    }

    /// Manager over this environment using `fakes`
    pub fn manager(&self, fakes: &Fakes) -> AddonManager {
        AddonManager::new(self.paths(), fakes.collaborators())
    }

    /// Create a fetchable source tree and return its source ref
    pub fn source(&self, dir: &str, package_json: &str) -> String {
        let path = self.sources_root.join(dir);
        write_addon_tree(&path, Some(package_json));
        path.to_string_lossy().to_string()
    }

    /// Create a fetchable source tree without `package.json`
    pub fn source_without_metadata(&self, dir: &str) -> String {
        let path = self.sources_root.join(dir);
        write_addon_tree(&path, None);
        path.to_string_lossy().to_string()
    }

    /// Create a default addon under the template root
    pub fn template(&self, dir: &str, package_json: &str) -> PathBuf {
        let path = self.template_root.join(dir);
        write_addon_tree(&path, Some(package_json));
        path
    }

    /// Put a plain file directly under the template root
    pub fn template_file(&self, name: &str) -> PathBuf {
        let path = self.template_root.join(name);
        fs::write(&path, "not an addon").unwrap();
        path
    }

    /// Place an addon directly in the registry root
    pub fn installed(&self, dir: &str, package_json: &str) -> PathBuf {
        let path = self.registry_root.join(dir);
        write_addon_tree(&path, Some(package_json));
        path
    }

    /// Visible and hidden entries of the registry root, sorted
    pub fn registry_entries(&self) -> Vec<String> {
        dir_entries(&self.registry_root)
    }

    /// Entries left in the staging root, sorted
    pub fn staging_entries(&self) -> Vec<String> {
        dir_entries(&self.staging_root)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Write an addon tree: metadata, server and client sources, a hidden file
pub fn write_addon_tree(dir: &Path, package_json: Option<&str>) {
    fs::create_dir_all(dir.join("client")).unwrap();
    if let Some(json) = package_json {
        fs::write(dir.join(METADATA_FILE), json).unwrap();
    }
    fs::write(dir.join("index.js"), "module.exports = function() {};").unwrap();
    fs::write(dir.join("server.js"), "module.exports = function() {};").unwrap();
    fs::write(dir.join("client/main.js"), "define([], function() {});").unwrap();
    fs::write(dir.join(".gitignore"), "node_modules\n").unwrap();
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
