//! Test constants for quiver-addons tests

#![allow(dead_code)]

/// Server-only addon metadata
pub const SERVER_ADDON_JSON: &str = r#"{"name":"hello","version":"1.0","main":"index.js"}"#;

/// Client-only addon metadata
pub const CLIENT_ADDON_JSON: &str = r#"{"name":"theme","version":"0.3.0","client":{"main":"client/main"}}"#;

/// Addon with both capabilities
pub const DUAL_ADDON_JSON: &str =
    r#"{"name":"editor","version":"2.1.0","main":"server.js","client":{"main":"client/main"}}"#;

/// Server addon whose `main` is a bare module id
pub const BARE_MODULE_ADDON_JSON: &str = r#"{"name":"plain","version":"1.0","main":"index"}"#;

/// Server addon whose `main` names a directory
pub const DIR_MAIN_ADDON_JSON: &str = r#"{"name":"plain","version":"1.0","main":"lib"}"#;

/// Metadata without any capability
pub const INCAPABLE_ADDON_JSON: &str = r#"{"name":"bare","version":"1.0"}"#;

/// Metadata without a version
pub const VERSIONLESS_ADDON_JSON: &str = r#"{"name":"noversion","main":"index.js"}"#;

/// Bundle file the manager writes next to client sources
pub const BUNDLE_FILE: &str = "addon-built.js";
