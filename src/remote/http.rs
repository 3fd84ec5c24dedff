//! HTTP client for the server's REST API.
//!
//! Wraps reqwest with a request timeout and a bounded retry on transport
//! errors and 5xx responses. Requests are unauthenticated.

use super::types::{
    parse_cookbook_manifest, parse_latest_version_url, parse_name_index, unwrap_data_bag_item,
    CookbookManifest,
};
use super::{RemoteError, RemoteSource};
use crate::config::DriftConfig;
use crate::utils::validate_name;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Base delay between retries, multiplied by the attempt number
const RETRY_DELAY_MS: u64 = 500;

/// Client for a server reachable over HTTP
pub struct HttpRemote {
    client: Client,
    base_url: Url,
    max_retries: u32,
}

impl HttpRemote {
    /// Create a client for the server configured in `config`
    pub fn new(config: &DriftConfig) -> Result<Self, RemoteError> {
        let mut base = config.chef_server_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|_| RemoteError::InvalidUrl(base.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the server base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|_| RemoteError::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    async fn get_path(&self, path: &str) -> Result<Value, RemoteError> {
        let url = self.endpoint(path)?;
        self.get_json(url).await
    }

    /// GET a JSON document, retrying transport errors and server errors
    async fn get_json(&self, url: Url) -> Result<Value, RemoteError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(url = %url, attempt, "GET");

            let failure = match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json::<Value>().await?);
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Err(RemoteError::NotFound(url.to_string()));
                    }
                    let err = RemoteError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    };
                    if !status.is_server_error() {
                        return Err(err);
                    }
                    err
                }
                Err(e) => RemoteError::HttpError(e),
            };

            if attempt > self.max_retries {
                return Err(failure);
            }
            warn!("Request to {} failed: {}, retrying...", url, failure);
            tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64)).await;
        }
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn list_cookbooks(&self) -> Result<Vec<String>, RemoteError> {
        let path = "cookbooks?num_versions=1";
        let document = self.get_path(path).await?;
        let names = parse_name_index(path, &document)?;
        info!("Server has {} cookbooks", names.len());
        Ok(names)
    }

    async fn cookbook_manifest(&self, cookbook: &str) -> Result<CookbookManifest, RemoteError> {
        validate_name("cookbook", cookbook)?;

        let path = format!("cookbooks/{cookbook}");
        let index = self.get_path(&path).await?;
        let version_url = match parse_latest_version_url(&path, cookbook, &index)? {
            Some(url) => Url::parse(&url).map_err(|_| RemoteError::InvalidUrl(url))?,
            None => self.endpoint(&format!("cookbooks/{cookbook}/_latest"))?,
        };

        let url_text = version_url.to_string();
        let document = self.get_json(version_url).await?;
        parse_cookbook_manifest(&url_text, cookbook, &document)
    }

    async fn list_data_bags(&self) -> Result<Vec<String>, RemoteError> {
        let document = self.get_path("data").await?;
        parse_name_index("data", &document)
    }

    async fn list_data_bag_items(&self, bag: &str) -> Result<Vec<String>, RemoteError> {
        validate_name("data bag", bag)?;
        let path = format!("data/{bag}");
        let document = self.get_path(&path).await?;
        parse_name_index(&path, &document)
    }

    async fn data_bag_item(&self, bag: &str, item: &str) -> Result<Value, RemoteError> {
        validate_name("data bag", bag)?;
        validate_name("data bag item", item)?;
        let document = self.get_path(&format!("data/{bag}/{item}")).await?;
        Ok(unwrap_data_bag_item(document))
    }

    async fn list_roles(&self) -> Result<Vec<String>, RemoteError> {
        let document = self.get_path("roles").await?;
        parse_name_index("roles", &document)
    }

    async fn role(&self, name: &str) -> Result<Value, RemoteError> {
        validate_name("role", name)?;
        self.get_path(&format!("roles/{name}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(url: &str) -> HttpRemote {
        HttpRemote::new(&DriftConfig {
            chef_server_url: url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_keeps_organization_prefix() {
        let remote = remote("https://chef.example.com/organizations/acme");
        assert_eq!(
            remote.endpoint("data/users").unwrap().as_str(),
            "https://chef.example.com/organizations/acme/data/users"
        );
        assert_eq!(
            remote.endpoint("cookbooks?num_versions=1").unwrap().as_str(),
            "https://chef.example.com/organizations/acme/cookbooks?num_versions=1"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = HttpRemote::new(&DriftConfig {
            chef_server_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(RemoteError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_invalid_names_never_reach_the_network() {
        let remote = remote("http://127.0.0.1:9");
        let result = remote.data_bag_item("users", "../../roles").await;
        assert!(matches!(result, Err(RemoteError::InvalidName(_))));
    }
}
