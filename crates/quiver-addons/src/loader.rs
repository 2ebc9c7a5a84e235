//! Host loader for server-side addon code

use crate::process::run_tool;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Registers an addon's server code with the running host
///
/// The host receives the installed addon directory and resolves the
/// package's `main` itself.
#[async_trait]
pub trait HostLoader: Send + Sync {
    async fn load(&self, addon_dir: &Path) -> Result<()>;
}

/// Runs a configured command with the addon directory appended
#[derive(Debug, Clone)]
pub struct CommandLoader {
    argv: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandLoader {
    /// `argv[0]` is the program; the addon directory becomes the last argument
    pub fn new(argv: Vec<String>, timeout: Option<Duration>) -> Result<Self> {
        if argv.is_empty() {
            return Err(anyhow!("loader command must not be empty"));
        }
        Ok(Self { argv, timeout })
    }
}

#[async_trait]
impl HostLoader for CommandLoader {
    async fn load(&self, addon_dir: &Path) -> Result<()> {
        let (program, rest) = self
            .argv
            .split_first()
            .ok_or_else(|| anyhow!("loader command must not be empty"))?;

        let mut args: Vec<String> = rest.to_vec();
        args.push(addon_dir.to_string_lossy().to_string());

        info!("Loading server code from {}", addon_dir.display());
        run_tool(program, args, None, self.timeout).await
    }
}

/// Keeps loaded addon directories in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingLoader {
    loaded: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories handed to `load`, in call order
    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl HostLoader for RecordingLoader {
    async fn load(&self, addon_dir: &Path) -> Result<()> {
        if !addon_dir.is_dir() {
            return Err(anyhow!(
                "addon directory {} does not exist",
                addon_dir.display()
            ));
        }
        info!("Registered server code from {}", addon_dir.display());
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(addon_dir.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandLoader::new(Vec::new(), None).is_err());
    }

    #[tokio::test]
    async fn test_recording_loader_requires_addon_dir() {
        let temp = TempDir::new().unwrap();
        let addon_dir = temp.path().join("hello");
        let loader = RecordingLoader::new();

        assert!(loader.load(&addon_dir).await.is_err());

        std::fs::create_dir(&addon_dir).unwrap();
        loader.load(&addon_dir).await.unwrap();
        assert_eq!(loader.loaded(), vec![addon_dir]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_loader_appends_path() {
        let temp = TempDir::new().unwrap();
        let marker = temp.path().join("seen");
        let script = format!("echo \"$0\" > {}", marker.display());
        let loader = CommandLoader::new(vec!["sh".into(), "-c".into(), script], None).unwrap();

        loader.load(Path::new("/srv/addons/a")).await.unwrap();

        let seen = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(seen.trim(), "/srv/addons/a");
    }
}
