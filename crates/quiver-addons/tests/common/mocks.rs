//! Recording fakes for external collaborators
//!
//! Each fake records its invocations behind `Arc<Mutex<..>>` so a test can
//! keep a clone and inspect it after handing the fake to the manager.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use quiver_addons::fs_ops::copy_tree;
use quiver_addons::{
    AllowAll, Authorizer, BuildRequest, Bundler, Collaborators, DependencyProvisioner,
    EventEnvelope, EventPublisher, Fetcher, HostLoader,
};
use quiver_core::types::AddonDescriptor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Fetches by copying a local directory named by the source ref
#[derive(Clone, Default)]
pub struct DirFetcher {
    fetched: Arc<Mutex<Vec<String>>>,
}

impl DirFetcher {
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch(&self, source_ref: &str, dest: &Path) -> Result<()> {
        self.fetched.lock().unwrap().push(source_ref.to_string());
        let source = Path::new(source_ref);
        if !source.is_dir() {
            return Err(anyhow!("repository '{}' not found", source_ref));
        }
        copy_tree(source, dest)?;
        Ok(())
    }
}

/// Records provisioned directories; fails for directories whose name is listed
#[derive(Clone, Default)]
pub struct MockProvisioner {
    calls: Arc<Mutex<Vec<PathBuf>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl MockProvisioner {
    pub fn fail_for(&self, name: &str) {
        self.failing.lock().unwrap().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DependencyProvisioner for MockProvisioner {
    async fn provision(&self, dir: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(dir.to_path_buf());
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.failing.lock().unwrap().contains(&name) {
            return Err(anyhow!("npm ERR! could not install dependencies of {}", name));
        }
        Ok(())
    }
}

/// Writes a stub bundle for every request unless told to fail
#[derive(Clone, Default)]
pub struct MockBundler {
    requests: Arc<Mutex<Vec<BuildRequest>>>,
    fail_all: Arc<Mutex<bool>>,
}

impl MockBundler {
    pub fn fail(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bundler for MockBundler {
    async fn build(&self, request: BuildRequest) -> Result<PathBuf> {
        self.requests.lock().unwrap().push(request.clone());
        if *self.fail_all.lock().unwrap() {
            return Err(anyhow!("Tracing dependencies for: {}", request.entry_module));
        }
        std::fs::write(&request.output_file, "/* built */")?;
        Ok(request.output_file)
    }
}

/// Records loaded server paths
#[derive(Clone, Default)]
pub struct MockLoader {
    loaded: Arc<Mutex<Vec<PathBuf>>>,
    fail_all: Arc<Mutex<bool>>,
}

impl MockLoader {
    pub fn fail(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostLoader for MockLoader {
    async fn load(&self, addon_dir: &Path) -> Result<()> {
        self.loaded.lock().unwrap().push(addon_dir.to_path_buf());
        if *self.fail_all.lock().unwrap() {
            return Err(anyhow!("Cannot find module 'left-pad'"));
        }
        Ok(())
    }
}

/// Rejects every addon
#[derive(Clone, Default)]
pub struct RejectingAuthorizer {
    seen: Arc<Mutex<Vec<String>>>,
}

impl RejectingAuthorizer {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authorizer for RejectingAuthorizer {
    async fn authorize(&self, descriptor: &AddonDescriptor) -> Result<()> {
        self.seen.lock().unwrap().push(descriptor.name.clone());
        Err(anyhow!("incompatible with this host"))
    }
}

/// Keeps every emitted envelope
#[derive(Clone, Default)]
pub struct CapturingPublisher {
    events: Arc<Mutex<Vec<EventEnvelope>>>,
}

impl CapturingPublisher {
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.lock().unwrap().clone()
    }

    /// Envelopes with the given dotted name
    pub fn named(&self, name: &str) -> Vec<EventEnvelope> {
        self.events()
            .into_iter()
            .filter(|e| e.name() == name)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for CapturingPublisher {
    async fn emit(&self, envelope: EventEnvelope) {
        self.events.lock().unwrap().push(envelope);
    }
}

/// One handle on every fake
#[derive(Clone, Default)]
pub struct Fakes {
    pub fetcher: DirFetcher,
    pub provisioner: MockProvisioner,
    pub bundler: MockBundler,
    pub loader: MockLoader,
    pub publisher: CapturingPublisher,
    pub authorizer: Option<Arc<dyn Authorizer>>,
}

impl Fakes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            fetcher: Arc::new(self.fetcher.clone()),
            provisioner: Arc::new(self.provisioner.clone()),
            bundler: Arc::new(self.bundler.clone()),
            loader: Arc::new(self.loader.clone()),
            authorizer: self
                .authorizer
                .clone()
                .unwrap_or_else(|| Arc::new(AllowAll)),
            publisher: Arc::new(self.publisher.clone()),
        }
    }
}
