//! Access to the configuration server.
//!
//! Everything that talks to the server goes through [`RemoteSource`], so
//! collection builders and commands can run against [`HttpRemote`] or any
//! other implementation.

mod http;
mod types;

pub use http::HttpRemote;
pub use types::{
    normalize_role, parse_cookbook_manifest, parse_latest_version_url, parse_name_index,
    unwrap_data_bag_item, CookbookManifest, ManifestRecord,
};

use crate::utils::NameError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Not found on server: {0}")]
    NotFound(String),

    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    #[error("Invalid URL {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    InvalidName(#[from] NameError),
}

impl RemoteError {
    pub(crate) fn unexpected(url: &str, reason: &str) -> Self {
        RemoteError::UnexpectedResponse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Read-only view of the artifacts stored on the server
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Cookbook names, sorted
    async fn list_cookbooks(&self) -> Result<Vec<String>, RemoteError>;

    /// Manifest of the newest version of a cookbook
    async fn cookbook_manifest(&self, cookbook: &str) -> Result<CookbookManifest, RemoteError>;

    /// Data bag names, sorted
    async fn list_data_bags(&self) -> Result<Vec<String>, RemoteError>;

    /// Item ids of one data bag, sorted
    async fn list_data_bag_items(&self, bag: &str) -> Result<Vec<String>, RemoteError>;

    /// Raw data of one data bag item
    async fn data_bag_item(&self, bag: &str, item: &str) -> Result<serde_json::Value, RemoteError>;

    /// Role names, sorted
    async fn list_roles(&self) -> Result<Vec<String>, RemoteError>;

    /// One role document
    async fn role(&self, name: &str) -> Result<serde_json::Value, RemoteError>;
}
