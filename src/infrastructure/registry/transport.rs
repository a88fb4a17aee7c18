use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::domain::dataset::BundleFile;
use crate::domain::DomainError;

/// Status and body of a registry response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for registry HTTP operations (for mocking)
#[async_trait]
pub trait RegistryTransport: Send + Sync + std::fmt::Debug {
    /// POST every file as a part of the `files` multipart field
    async fn post_multipart(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: Vec<(&str, &str)>,
        files: Vec<BundleFile>,
    ) -> Result<TransportResponse, DomainError>;

    async fn get(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: Vec<(&str, &str)>,
    ) -> Result<TransportResponse, DomainError>;
}

/// Registry transport using reqwest
#[derive(Debug, Clone)]
pub struct HttpRegistryTransport {
    client: reqwest::Client,
}

impl HttpRegistryTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            DomainError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<TransportResponse, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("registry", format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::provider("registry", format!("Failed to read body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl RegistryTransport for HttpRegistryTransport {
    async fn post_multipart(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: Vec<(&str, &str)>,
        files: Vec<BundleFile>,
    ) -> Result<TransportResponse, DomainError> {
        let mut form = Form::new();

        for file in files {
            let part = Part::bytes(file.content)
                .file_name(file.name.clone())
                .mime_str(file.content_type)
                .map_err(|e| {
                    DomainError::provider("registry", format!("Invalid content type: {}", e))
                })?;
            form = form.part("files", part);
        }

        let mut request = self.client.post(url).query(&query).multipart(form);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        Self::send(request).await
    }

    async fn get(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: Vec<(&str, &str)>,
    ) -> Result<TransportResponse, DomainError> {
        let mut request = self.client.get(url).query(&query);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        Self::send(request).await
    }
}
