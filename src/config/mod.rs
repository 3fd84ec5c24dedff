use crate::utils::CONFIG_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid server URL {0:?}: {1}")]
    InvalidServerUrl(String, String),

    #[error("Config file not found at {0}")]
    NotFound(String),
}

fn default_chef_server_url() -> String {
    "http://127.0.0.1:8889".to_string()
}

fn default_cookbook_path() -> Vec<PathBuf> {
    vec![PathBuf::from("cookbooks")]
}

fn default_data_bag_path() -> PathBuf {
    PathBuf::from("data_bags")
}

fn default_role_path() -> PathBuf {
    PathBuf::from("roles")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

/// Repository layout and server location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriftConfig {
    #[serde(default = "default_chef_server_url")]
    pub chef_server_url: String,
    /// Directories holding cookbooks, searched in order
    #[serde(default = "default_cookbook_path")]
    pub cookbook_path: Vec<PathBuf>,
    #[serde(default = "default_data_bag_path")]
    pub data_bag_path: PathBuf,
    #[serde(default = "default_role_path")]
    pub role_path: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            chef_server_url: default_chef_server_url(),
            cookbook_path: default_cookbook_path(),
            data_bag_path: default_data_bag_path(),
            role_path: default_role_path(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl DriftConfig {
    /// Resolve relative repository paths against the repo root
    pub fn resolve_paths(mut self, repo_root: &Path) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                repo_root.join(p)
            }
        };

        self.cookbook_path = self.cookbook_path.iter().map(|p| resolve(p)).collect();
        self.data_bag_path = resolve(&self.data_bag_path);
        self.role_path = resolve(&self.role_path);
        self
    }

    /// Replace the server URL, validating it
    pub fn with_server_url(mut self, url: &str) -> Result<Self, ConfigError> {
        validate_server_url(url)?;
        self.chef_server_url = url.to_string();
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Check that a server URL is an absolute http(s) URL
pub fn validate_server_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidServerUrl(url.to_string(), e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidServerUrl(
            url.to_string(),
            format!("unsupported scheme {other}"),
        )),
    }
}

/// Read the configuration file at the repository root, if there is one
pub async fn read_config(repo_root: &Path) -> Result<Option<DriftConfig>, ConfigError> {
    let config_path = repo_root.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(None);
    }

    read_config_file(&config_path).await.map(Some)
}

/// Read a configuration file from an explicit path
pub async fn read_config_file(path: &Path) -> Result<DriftConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).await?;
    let config: DriftConfig = serde_json::from_str(&content)?;
    validate_server_url(&config.chef_server_url)?;
    Ok(config)
}

/// Load configuration: explicit file, else `<repo>/knife-drift.json`, else defaults.
/// Relative paths are resolved against `repo_root`.
pub async fn load_config(
    repo_root: &Path,
    config_file: Option<&Path>,
) -> Result<DriftConfig, ConfigError> {
    let config = match config_file {
        Some(path) => read_config_file(path).await?,
        None => read_config(repo_root).await?.unwrap_or_default(),
    };

    Ok(config.resolve_paths(repo_root))
}
