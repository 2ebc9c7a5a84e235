//! Install authorization hooks

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use quiver_core::types::AddonDescriptor;
use std::collections::BTreeSet;

/// Approves or rejects an addon before it is committed
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// `Err` carries the rejection reason
    async fn authorize(&self, descriptor: &AddonDescriptor) -> Result<()>;
}

/// Approves everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn authorize(&self, _descriptor: &AddonDescriptor) -> Result<()> {
        Ok(())
    }
}

/// Rejects addons by name
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    denied: BTreeSet<String>,
}

impl DenyList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denied: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.denied.contains(name)
    }
}

#[async_trait]
impl Authorizer for DenyList {
    async fn authorize(&self, descriptor: &AddonDescriptor) -> Result<()> {
        if self.is_denied(&descriptor.name) {
            return Err(anyhow!("addon '{}' is denied by policy", descriptor.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor(name: &str) -> AddonDescriptor {
        AddonDescriptor {
            name: name.to_string(),
            version: "1.0".to_string(),
            server_entry: Some("index.js".to_string()),
            client: None,
            is_default: false,
            installed_path: PathBuf::from("/addons").join(name),
        }
    }

    #[tokio::test]
    async fn test_allow_all() {
        AllowAll.authorize(&descriptor("anything")).await.unwrap();
    }

    #[tokio::test]
    async fn test_deny_list() {
        let policy = DenyList::new(["evil"]);

        policy.authorize(&descriptor("good")).await.unwrap();

        let err = policy.authorize(&descriptor("evil")).await.unwrap_err();
        assert_eq!(err.to_string(), "addon 'evil' is denied by policy");
    }
}
