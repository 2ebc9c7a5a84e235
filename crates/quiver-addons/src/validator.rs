//! Addon metadata validation
//!
//! `validate` decides whether raw metadata describes a legal addon. It is
//! pure: scans use it to filter entries, install uses it to reject a fetched
//! source.

use quiver_core::types::PackageManifest;
use std::path::{Component, Path};

/// Check that metadata names the addon, carries a version and exposes a
/// server entry, a client entry, or both.
pub fn validate(manifest: &PackageManifest) -> bool {
    manifest.name().is_some()
        && manifest.version().is_some()
        && (manifest.server_entry().is_some() || manifest.client_entry().is_some())
}

/// Check that an addon name can be used as a directory name directly under
/// the registry root: one normal path component, not hidden.
pub fn is_safe_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
