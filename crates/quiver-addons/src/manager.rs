//! Addon manager
//!
//! Wires the registry, the pipelines and the collaborators together and
//! runs the startup sequence: defaults sync, registry refresh, client
//! optimization, server activation.

use crate::activation::{ActivationGateway, ActivationOutcome};
use crate::bundler::{Bundler, RequireJsBundler, REQUIRE_TOOLS_ALIAS};
use crate::defaults::{DefaultsSynchronizer, SyncOutcome};
use crate::error::Result;
use crate::events::{EventPublisher, TracingPublisher};
use crate::fetch::{Fetcher, GitFetcher};
use crate::hooks::{AllowAll, Authorizer, DenyList};
use crate::install::{InstallOptions, InstallPipeline, InstallReport};
use crate::loader::{CommandLoader, HostLoader, RecordingLoader};
use crate::locks::NameLocks;
use crate::provision::{CommandProvisioner, DependencyProvisioner};
use crate::registry::{AddonMap, AddonRegistry};
use crate::staging::StagingArea;
use crate::uninstall::UninstallPipeline;
use futures::future::join_all;
use quiver_core::types::AddonDescriptor;
use quiver_core::QuiverConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Filesystem layout and bundle settings
#[derive(Debug, Clone)]
pub struct ManagerPaths {
    pub registry_root: PathBuf,
    pub template_root: PathBuf,

    /// Parent of staging directories; system temp dir when `None`
    pub staging_root: Option<PathBuf>,

    /// Public prefix the registry root is served under
    pub static_prefix: String,

    /// Built client bundle file name
    pub bundle_file: String,

    /// css/less loader plugins root
    pub require_tools: Option<PathBuf>,
}

impl ManagerPaths {
    pub fn new(registry_root: impl Into<PathBuf>, template_root: impl Into<PathBuf>) -> Self {
        let defaults = QuiverConfig::default();
        Self {
            registry_root: registry_root.into(),
            template_root: template_root.into(),
            staging_root: None,
            static_prefix: defaults.static_prefix,
            bundle_file: defaults.bundler.output_file,
            require_tools: None,
        }
    }

    pub fn with_staging_root(mut self, staging_root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(staging_root.into());
        self
    }

    pub fn from_config(config: &QuiverConfig) -> Self {
        Self {
            registry_root: config.paths.registry_root.clone(),
            template_root: config.paths.template_root.clone(),
            staging_root: config.paths.staging_root.clone(),
            static_prefix: config.static_prefix.clone(),
            bundle_file: config.bundler.output_file.clone(),
            require_tools: config.bundler.require_tools.clone(),
        }
    }

    fn path_aliases(&self) -> BTreeMap<String, PathBuf> {
        self.require_tools
            .iter()
            .map(|path| (REQUIRE_TOOLS_ALIAS.to_string(), path.clone()))
            .collect()
    }
}

/// External collaborators
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn Fetcher>,
    pub provisioner: Arc<dyn DependencyProvisioner>,
    pub bundler: Arc<dyn Bundler>,
    pub loader: Arc<dyn HostLoader>,
    pub authorizer: Arc<dyn Authorizer>,
    pub publisher: Arc<dyn EventPublisher>,
}

impl Collaborators {
    /// Process-backed collaborators as configured
    pub fn from_config(config: &QuiverConfig) -> anyhow::Result<Self> {
        let timeout = config.tool_timeout_secs.map(Duration::from_secs);

        let loader: Arc<dyn HostLoader> = match &config.loader.command {
            Some(argv) => Arc::new(CommandLoader::new(argv.clone(), timeout)?),
            None => Arc::new(RecordingLoader::new()),
        };

        let authorizer: Arc<dyn Authorizer> = if config.policy.denied.is_empty() {
            Arc::new(AllowAll)
        } else {
            Arc::new(DenyList::new(config.policy.denied.iter().cloned()))
        };

        Ok(Self {
            fetcher: Arc::new(GitFetcher::new(
                config.fetch.program.clone(),
                config.fetch.depth,
                timeout,
            )),
            provisioner: Arc::new(CommandProvisioner::new(
                config.provision.program.clone(),
                config.provision.args.clone(),
                timeout,
            )),
            bundler: Arc::new(RequireJsBundler::new(config.bundler.program.clone(), timeout)),
            loader,
            authorizer,
            publisher: Arc::new(TracingPublisher),
        })
    }
}

/// What happened during startup
#[derive(Debug, Default)]
pub struct StartupReport {
    pub defaults: Vec<SyncOutcome>,
    pub optimized: Vec<ActivationOutcome>,
    pub activated: Vec<ActivationOutcome>,
}

impl StartupReport {
    /// Number of failed entries across all phases
    pub fn failure_count(&self) -> usize {
        self.defaults.iter().filter(|o| !o.is_ok()).count()
            + self.optimized.iter().filter(|o| !o.is_ok()).count()
            + self.activated.iter().filter(|o| !o.is_ok()).count()
    }
}

pub struct AddonManager {
    registry: Arc<AddonRegistry>,
    gateway: Arc<ActivationGateway>,
    installer: InstallPipeline,
    uninstaller: UninstallPipeline,
    defaults: DefaultsSynchronizer,
    static_prefix: String,
}

impl AddonManager {
    pub fn new(paths: ManagerPaths, collaborators: Collaborators) -> Self {
        let registry = Arc::new(AddonRegistry::new(
            &paths.registry_root,
            &paths.template_root,
        ));
        let locks = Arc::new(NameLocks::new());
        let gateway = Arc::new(ActivationGateway::new(
            Arc::clone(&collaborators.loader),
            Arc::clone(&collaborators.bundler),
            paths.bundle_file.clone(),
            paths.path_aliases(),
        ));
        let staging = match &paths.staging_root {
            Some(base) => StagingArea::with_base(base),
            None => StagingArea::new(),
        };

        let installer = InstallPipeline::new(
            Arc::clone(&registry),
            staging,
            Arc::clone(&locks),
            Arc::clone(&gateway),
            Arc::clone(&collaborators.fetcher),
            Arc::clone(&collaborators.provisioner),
            Arc::clone(&collaborators.authorizer),
            Arc::clone(&collaborators.publisher),
        );
        let uninstaller = UninstallPipeline::new(
            Arc::clone(&registry),
            Arc::clone(&locks),
            Arc::clone(&collaborators.publisher),
        );
        let defaults = DefaultsSynchronizer::new(
            Arc::clone(&registry),
            Arc::clone(&locks),
            Arc::clone(&collaborators.provisioner),
        );

        Self {
            registry,
            gateway,
            installer,
            uninstaller,
            defaults,
            static_prefix: paths.static_prefix,
        }
    }

    /// Manager backed by the configured external tools
    pub fn from_config(config: &QuiverConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            ManagerPaths::from_config(config),
            Collaborators::from_config(config)?,
        ))
    }

    /// Sync defaults, then optimize client addons, then activate server addons
    pub async fn start(&self) -> Result<StartupReport> {
        info!("Initializing addons");
        self.registry.ensure_root().await?;

        let defaults = self.sync_defaults().await;
        let addons = self.registry.refresh().await;

        info!("Optimizing client addons");
        let optimized = join_all(
            addons
                .values()
                .filter(|d| d.is_client_capable())
                .map(|d| async move {
                    ActivationOutcome {
                        name: d.name.clone(),
                        result: self.gateway.activate_client(d).await.map(|_| ()),
                    }
                }),
        )
        .await;

        info!("Loading server addons");
        let activated = join_all(
            addons
                .values()
                .filter(|d| d.is_server_capable())
                .map(|d| async move {
                    ActivationOutcome {
                        name: d.name.clone(),
                        result: self.gateway.activate_server(d).await,
                    }
                }),
        )
        .await;

        let report = StartupReport {
            defaults,
            optimized,
            activated,
        };
        for outcome in report.optimized.iter().chain(&report.activated) {
            if let Err(e) = &outcome.result {
                warn!("{}", e);
            }
        }
        info!(
            "Addons are ready ({} installed, {} failure(s))",
            addons.len(),
            report.failure_count()
        );

        Ok(report)
    }

    /// Cached registry snapshot
    pub async fn list(&self) -> Arc<AddonMap> {
        self.registry.list().await
    }

    /// Rescan the registry root
    pub async fn refresh(&self) -> Arc<AddonMap> {
        self.registry.refresh().await
    }

    pub async fn get(&self, name: &str) -> Option<AddonDescriptor> {
        self.registry.get(name).await
    }

    pub async fn install(&self, source_ref: &str, options: InstallOptions) -> Result<InstallReport> {
        self.installer.install(source_ref, options).await
    }

    pub async fn uninstall(&self, name: &str) -> Result<bool> {
        self.uninstaller.uninstall(name).await
    }

    pub async fn sync_defaults(&self) -> Vec<SyncOutcome> {
        self.defaults.sync_defaults().await
    }

    /// Directory served for client assets (the registry root)
    pub fn static_root(&self) -> &Path {
        self.registry.root()
    }

    pub fn static_prefix(&self) -> &str {
        &self.static_prefix
    }

    pub fn registry(&self) -> &AddonRegistry {
        &self.registry
    }
}
