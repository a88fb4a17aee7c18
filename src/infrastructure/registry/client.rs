use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::transport::{HttpRegistryTransport, RegistryTransport};
use crate::domain::dataset::{DatasetPath, DatasetRegistry, PushReceipt, PushRequest};
use crate::domain::DomainError;

pub const DEFAULT_REGISTRY_URL: &str = "https://api.pandabi.ai/api";
pub const DEFAULT_APP_URL: &str = "https://app.pandabi.ai";

pub const REGISTRY_API_KEY_ENV: &str = "PANDABI_API_KEY";
pub const REGISTRY_URL_ENV: &str = "PANDABI_API_URL";

/// Dataset registry settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: Option<String>,
    /// Web app origin used to build links to pushed datasets
    pub app_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            app_url: DEFAULT_APP_URL.to_string(),
            api_key: None,
            timeout_secs: Some(60),
        }
    }
}

impl RegistryConfig {
    /// Fill unset key and base URL from the given variable lookup
    pub fn with_env_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        self.api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| non_empty(REGISTRY_API_KEY_ENV));
        self.base_url = self.base_url.or_else(|| non_empty(REGISTRY_URL_ENV));
        self
    }
}

/// Client for the remote dataset registry
#[derive(Debug)]
pub struct RegistryClient<T: RegistryTransport> {
    transport: T,
    base_url: String,
    app_url: String,
    api_key: Option<String>,
}

impl RegistryClient<HttpRegistryTransport> {
    /// Build a client with a reqwest transport, reading missing settings from the environment
    pub fn new(config: RegistryConfig) -> Result<Self, DomainError> {
        let config = config.with_env_fallback(|name| std::env::var(name).ok());
        let transport = HttpRegistryTransport::new(config.timeout_secs.map(Duration::from_secs))?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: RegistryTransport> RegistryClient<T> {
    pub fn with_transport(transport: T, config: RegistryConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_REGISTRY_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            transport,
            base_url,
            app_url: config.app_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.is_empty()),
        }
    }

    fn auth_header(&self) -> Result<String, DomainError> {
        self.api_key
            .as_ref()
            .map(|key| format!("Bearer {}", key))
            .ok_or(DomainError::MissingRegistryApiKey)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl<T: RegistryTransport> DatasetRegistry for RegistryClient<T> {
    fn ensure_credentials(&self) -> Result<(), DomainError> {
        self.auth_header().map(|_| ())
    }

    async fn push(&self, request: PushRequest) -> Result<PushReceipt, DomainError> {
        let auth = self.auth_header()?;
        let path = request.path.to_string();

        let mut query = vec![("path", path.as_str())];
        if let Some(description) = request.description.as_deref() {
            query.push(("description", description));
        }
        query.push(("name", request.name.as_str()));

        debug!(path = %path, files = request.files.len(), "Pushing dataset bundle");

        let response = self
            .transport
            .post_multipart(
                &self.url("/datasets/push"),
                vec![("accept", "application/json"), ("x-authorization", auth.as_str())],
                query,
                request.files,
            )
            .await?;

        if !response.is_success() {
            return Err(DomainError::provider(
                "registry",
                format!(
                    "Push failed with HTTP {}: {}",
                    response.status,
                    String::from_utf8_lossy(&response.body)
                ),
            ));
        }

        let url = format!("{}/datasets/{}", self.app_url, path);
        info!(path = %path, url = %url, "Dataset pushed to the remote server");

        Ok(PushReceipt {
            path: request.path,
            url,
        })
    }

    async fn pull(&self, path: &DatasetPath) -> Result<Vec<u8>, DomainError> {
        let auth = self.auth_header()?;
        let path = path.to_string();

        debug!(path = %path, "Pulling dataset bundle");

        let response = self
            .transport
            .get(
                &self.url("/datasets/pull"),
                vec![("accept", "application/json"), ("x-authorization", auth.as_str())],
                vec![("path", path.as_str())],
            )
            .await?;

        if response.status != 200 {
            return Err(DomainError::dataset_not_found("Remote dataset not found to pull!"));
        }

        Ok(response.body.to_vec())
    }
}
