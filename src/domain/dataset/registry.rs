//! Remote dataset registry abstraction

use std::fmt::Debug;

use async_trait::async_trait;

use super::DatasetPath;
use crate::domain::DomainError;

/// A file shipped to the registry as one multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

impl BundleFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            name: name.into(),
            content,
            content_type,
        }
    }
}

/// Metadata sent alongside a pushed bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub path: DatasetPath,
    pub name: String,
    pub description: Option<String>,
    pub files: Vec<BundleFile>,
}

/// Confirmation of a successful push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReceipt {
    pub path: DatasetPath,
    pub url: String,
}

/// Trait for registries storing dataset bundles by `organization/dataset` path
#[async_trait]
pub trait DatasetRegistry: Send + Sync + Debug {
    /// Fails unless a credential is configured; never touches the network
    fn ensure_credentials(&self) -> Result<(), DomainError>;

    /// Upload a bundle
    async fn push(&self, request: PushRequest) -> Result<PushReceipt, DomainError>;

    /// Download a bundle as a zip archive
    async fn pull(&self, path: &DatasetPath) -> Result<Vec<u8>, DomainError>;
}
