#![allow(dead_code)]

use async_trait::async_trait;
use knife_drift::remote::{CookbookManifest, ManifestRecord, RemoteError, RemoteSource};
use knife_drift::{compute_hash, DigestAlgorithm, DriftConfig, LocalRepo};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use tokio::fs;

/// Create a temporary directory for a test chef-repo
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a file below `root`, creating parent directories
pub async fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("path has a parent"))
        .await
        .expect("Should create parent dirs");
    fs::write(&path, content).await.expect("Should write file");
}

/// A repo using the default layout under `root`
pub fn local_repo(root: &Path) -> LocalRepo {
    LocalRepo::new(&DriftConfig::default().resolve_paths(root))
}

pub fn md5_hex(content: &str) -> String {
    compute_hash(DigestAlgorithm::Md5, content.as_bytes())
        .as_hex()
        .to_string()
}

/// In-memory server
#[derive(Default)]
pub struct FakeRemote {
    cookbooks: BTreeMap<String, CookbookManifest>,
    data_bags: BTreeMap<String, BTreeMap<String, Value>>,
    roles: BTreeMap<String, Value>,
    failing: bool,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server whose every request fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Add a cookbook with (path, content) files
    pub fn with_cookbook(mut self, name: &str, files: &[(&str, &str)]) -> Self {
        let records = files
            .iter()
            .map(|(path, content)| ManifestRecord {
                name: Some(path.rsplit('/').next().unwrap_or(*path).to_string()),
                path: Some(path.to_string()),
                checksum: md5_hex(content),
            })
            .collect();
        self.cookbooks.insert(
            name.to_string(),
            CookbookManifest {
                name: name.to_string(),
                version: "1.0.0".to_string(),
                records,
                bare_checksums: vec![],
            },
        );
        self
    }

    /// Add a cookbook whose manifest only lists checksums
    pub fn with_hash_only_cookbook(mut self, name: &str, contents: &[&str]) -> Self {
        self.cookbooks.insert(
            name.to_string(),
            CookbookManifest {
                name: name.to_string(),
                version: "0.1.0".to_string(),
                records: vec![],
                bare_checksums: contents.iter().map(|c| md5_hex(c)).collect(),
            },
        );
        self
    }

    /// Add a cookbook with a manifest built by the test
    pub fn with_manifest(mut self, manifest: CookbookManifest) -> Self {
        self.cookbooks.insert(manifest.name.clone(), manifest);
        self
    }

    pub fn with_data_bag(mut self, bag: &str) -> Self {
        self.data_bags.entry(bag.to_string()).or_default();
        self
    }

    pub fn with_item(mut self, bag: &str, item: &str, data: Value) -> Self {
        self.data_bags
            .entry(bag.to_string())
            .or_default()
            .insert(item.to_string(), data);
        self
    }

    pub fn with_role(mut self, name: &str, data: Value) -> Self {
        self.roles.insert(name.to_string(), data);
        self
    }

    fn check(&self, what: &str) -> Result<(), RemoteError> {
        if self.failing {
            Err(RemoteError::Status {
                url: format!("http://fake/{what}"),
                status: 500,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    async fn list_cookbooks(&self) -> Result<Vec<String>, RemoteError> {
        self.check("cookbooks")?;
        Ok(self.cookbooks.keys().cloned().collect())
    }

    async fn cookbook_manifest(&self, cookbook: &str) -> Result<CookbookManifest, RemoteError> {
        self.check("cookbooks")?;
        self.cookbooks
            .get(cookbook)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("cookbooks/{cookbook}")))
    }

    async fn list_data_bags(&self) -> Result<Vec<String>, RemoteError> {
        self.check("data")?;
        Ok(self.data_bags.keys().cloned().collect())
    }

    async fn list_data_bag_items(&self, bag: &str) -> Result<Vec<String>, RemoteError> {
        self.check("data")?;
        self.data_bags
            .get(bag)
            .map(|items| items.keys().cloned().collect())
            .ok_or_else(|| RemoteError::NotFound(format!("data/{bag}")))
    }

    async fn data_bag_item(&self, bag: &str, item: &str) -> Result<Value, RemoteError> {
        self.check("data")?;
        self.data_bags
            .get(bag)
            .and_then(|items| items.get(item))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("data/{bag}/{item}")))
    }

    async fn list_roles(&self) -> Result<Vec<String>, RemoteError> {
        self.check("roles")?;
        Ok(self.roles.keys().cloned().collect())
    }

    async fn role(&self, name: &str) -> Result<Value, RemoteError> {
        self.check("roles")?;
        self.roles
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("roles/{name}")))
    }
}
