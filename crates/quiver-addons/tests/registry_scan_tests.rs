//! Registry scan integration tests
//!
//! Tests how the registry reads the registry root:
//! - Hidden entries and entries without metadata are skipped
//! - Unreadable or invalid entries are dropped without failing the scan
//! - Default classification against the template root

mod common;

use common::*;

#[cfg(test)]
mod registry_scan {
    use super::*;
    use quiver_addons::AddonRegistry;
    use quiver_core::types::METADATA_FILE;
    use std::fs;

    fn registry(env: &TestEnv) -> AddonRegistry {
        AddonRegistry::new(&env.registry_root, &env.template_root)
    }

    #[tokio::test]
    async fn test_scan_filters_entries() {
        let env = TestEnv::new();
        env.installed("hello", SERVER_ADDON_JSON);
        env.installed("theme", CLIENT_ADDON_JSON);
        env.installed(".hello.incoming-1234", SERVER_ADDON_JSON);
        env.installed("bare", INCAPABLE_ADDON_JSON);
        fs::create_dir_all(env.registry_root.join("no-metadata")).unwrap();
        env.installed("broken", "{ not json");
        fs::write(env.registry_root.join("stray-file"), "x").unwrap();

        let addons = registry(&env).scan().await;

        assert_eq!(
            addons.keys().cloned().collect::<Vec<_>>(),
            vec!["hello".to_string(), "theme".to_string()]
        );
    }

    #[tokio::test]
    async fn test_capabilities_and_paths() {
        let env = TestEnv::new();
        let dir = env.installed("editor", DUAL_ADDON_JSON);

        let addons = registry(&env).scan().await;
        let editor = addons.get("editor").unwrap();

        assert!(editor.is_server_capable());
        assert!(editor.is_client_capable());
        assert_eq!(editor.installed_path, dir);
        assert!(!editor.is_default);
    }

    #[tokio::test]
    async fn test_default_classification() {
        let env = TestEnv::new();
        env.template("hello", SERVER_ADDON_JSON);
        env.installed("hello", SERVER_ADDON_JSON);
        env.installed("theme", CLIENT_ADDON_JSON);

        let addons = registry(&env).scan().await;

        assert!(addons.get("hello").unwrap().is_default);
        assert!(!addons.get("theme").unwrap().is_default);
    }

    #[tokio::test]
    async fn test_keyed_by_manifest_name() {
        let env = TestEnv::new();
        let dir = env.installed("checkout-dir", SERVER_ADDON_JSON);

        let addons = registry(&env).scan().await;

        let hello = addons.get("hello").unwrap();
        assert_eq!(hello.installed_path, dir);
        assert!(!addons.contains_key("checkout-dir"));
    }

    #[tokio::test]
    async fn test_scan_is_repeatable() {
        let env = TestEnv::new();
        env.installed("hello", SERVER_ADDON_JSON);
        let registry = registry(&env);

        let first = registry.scan().await;
        let second = registry.scan().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_removal() {
        let env = TestEnv::new();
        let dir = env.installed("hello", SERVER_ADDON_JSON);
        let registry = registry(&env);
        assert_eq!(registry.list().await.len(), 1);

        fs::remove_file(dir.join(METADATA_FILE)).unwrap();
        assert_eq!(registry.list().await.len(), 1);

        registry.refresh().await;
        assert!(registry.list().await.is_empty());
    }
}
