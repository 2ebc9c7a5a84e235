//! Error types for addon lifecycle operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using quiver-addons' error type
pub type Result<T> = std::result::Result<T, AddonError>;

/// Addon lifecycle errors
#[derive(Error, Debug)]
pub enum AddonError {
    /// Filesystem or staging failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be fetched
    #[error("Failed to fetch addon from {source_ref}: {message}")]
    Fetch { source_ref: String, message: String },

    /// The fetched tree has no metadata file
    #[error("No 'package.json' found in {}", .path.display())]
    MissingMetadata { path: PathBuf },

    /// The metadata does not describe a legal addon
    #[error("Invalid addon: {reason}")]
    InvalidAddon { reason: String },

    /// The authorization hook refused the addon
    #[error("Installation of '{name}' rejected: {reason}")]
    PolicyRejected { name: String, reason: String },

    /// The staged tree could not be moved into the registry root
    #[error("Failed to commit '{name}' (staged copy kept at {}): {message}", .staging.display())]
    Commit {
        name: String,
        staging: PathBuf,
        message: String,
    },

    /// The client bundle could not be built
    #[error("Failed to optimize client bundle for '{name}': {message}")]
    Optimize { name: String, message: String },

    /// Dependency installation failed
    #[error("Failed to install dependencies for '{name}': {message}")]
    DependencyProvision { name: String, message: String },

    /// The host loader refused the server code
    #[error("Failed to activate '{name}': {message}")]
    Activation { name: String, message: String },

    /// Default addons cannot be uninstalled
    #[error("Cannot uninstall default addon '{name}'")]
    DefaultAddonProtected { name: String },

    /// A non-directory entry sits in the template root
    #[error("There is a file inside the default addons directory: {}", .path.display())]
    InvalidTemplateLayout { path: PathBuf },
}

/// Error taxonomy without payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Fetch,
    MissingMetadata,
    InvalidAddon,
    PolicyRejected,
    Commit,
    Optimize,
    DependencyProvision,
    Activation,
    DefaultAddonProtected,
    InvalidTemplateLayout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "IOError",
            ErrorKind::Fetch => "FetchError",
            ErrorKind::MissingMetadata => "MissingMetadataError",
            ErrorKind::InvalidAddon => "InvalidAddonError",
            ErrorKind::PolicyRejected => "PolicyRejectedError",
            ErrorKind::Commit => "CommitError",
            ErrorKind::Optimize => "OptimizeError",
            ErrorKind::DependencyProvision => "DependencyProvisionError",
            ErrorKind::Activation => "ActivationError",
            ErrorKind::DefaultAddonProtected => "DefaultAddonProtectedError",
            ErrorKind::InvalidTemplateLayout => "InvalidTemplateLayoutError",
        };
        f.write_str(name)
    }
}

impl AddonError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AddonError::Io { .. } => ErrorKind::Io,
            AddonError::Fetch { .. } => ErrorKind::Fetch,
            AddonError::MissingMetadata { .. } => ErrorKind::MissingMetadata,
            AddonError::InvalidAddon { .. } => ErrorKind::InvalidAddon,
            AddonError::PolicyRejected { .. } => ErrorKind::PolicyRejected,
            AddonError::Commit { .. } => ErrorKind::Commit,
            AddonError::Optimize { .. } => ErrorKind::Optimize,
            AddonError::DependencyProvision { .. } => ErrorKind::DependencyProvision,
            AddonError::Activation { .. } => ErrorKind::Activation,
            AddonError::DefaultAddonProtected { .. } => ErrorKind::DefaultAddonProtected,
            AddonError::InvalidTemplateLayout { .. } => ErrorKind::InvalidTemplateLayout,
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error
    pub fn fetch(source_ref: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            source_ref: source_ref.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid addon error
    pub fn invalid_addon(reason: impl Into<String>) -> Self {
        Self::InvalidAddon {
            reason: reason.into(),
        }
    }

    /// Create a policy rejection error
    pub fn policy_rejected(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::PolicyRejected {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a commit error
    pub fn commit(
        name: impl Into<String>,
        staging: impl Into<PathBuf>,
        message: impl fmt::Display,
    ) -> Self {
        Self::Commit {
            name: name.into(),
            staging: staging.into(),
            message: message.to_string(),
        }
    }

    /// Create an optimize error
    pub fn optimize(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Optimize {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a dependency provisioning error
    pub fn dependency_provision(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::DependencyProvision {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create an activation error
    pub fn activation(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Activation {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a default addon protection error
    pub fn default_protected(name: impl Into<String>) -> Self {
        Self::DefaultAddonProtected { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Io.to_string(), "IOError");
        assert_eq!(
            ErrorKind::DefaultAddonProtected.to_string(),
            "DefaultAddonProtectedError"
        );
    }

    #[test]
    fn test_kind_matches_variant() {
        let err = AddonError::optimize("hello", "r.js exited with 1");
        assert_eq!(err.kind(), ErrorKind::Optimize);
        assert!(err.to_string().contains("hello"));
        assert!(err.to_string().contains("r.js exited with 1"));
    }

    #[test]
    fn test_commit_message_names_staging_dir() {
        let err = AddonError::commit("hello", "/tmp/addon-x1", "rename failed");
        assert!(err.to_string().contains("/tmp/addon-x1"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;
        let err = AddonError::io(
            "Failed to read registry root",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.source().is_some());
    }
}
