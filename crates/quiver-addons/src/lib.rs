//! Addon lifecycle management for Quiver
//!
//! This crate handles:
//! - Addon registry scanning and caching
//! - Installation from a remote source (fetch, validate, authorize, commit,
//!   optimize, provision, activate)
//! - Uninstallation with default-addon protection
//! - Synchronization of default addons from the template root
//! - Server activation and client bundle optimization

pub mod activation;
pub mod bundler;
pub mod defaults;
pub mod error;
pub mod events;
pub mod fetch;
pub mod fs_ops;
pub mod hooks;
pub mod install;
pub mod loader;
pub mod locks;
pub mod manager;
pub mod process;
pub mod provision;
pub mod registry;
pub mod staging;
pub mod uninstall;
pub mod validator;

pub use activation::{ActivationGateway, ActivationOutcome};
pub use bundler::{BuildRequest, Bundler, RequireJsBundler};
pub use defaults::{DefaultsSynchronizer, SyncOutcome};
pub use error::{AddonError, ErrorKind, Result};
pub use events::{AddonEvent, BroadcastPublisher, EventEnvelope, EventPublisher, TracingPublisher};
pub use fetch::{Fetcher, GitFetcher};
pub use hooks::{AllowAll, Authorizer, DenyList};
pub use install::{InstallOptions, InstallPipeline, InstallReport};
pub use loader::{CommandLoader, HostLoader, RecordingLoader};
pub use locks::NameLocks;
pub use manager::{AddonManager, Collaborators, ManagerPaths, StartupReport};
pub use provision::{CommandProvisioner, DependencyProvisioner};
pub use registry::{AddonMap, AddonRegistry};
pub use staging::{StagingArea, StagingDirectory};
pub use uninstall::UninstallPipeline;
pub use validator::{is_safe_name, validate};
