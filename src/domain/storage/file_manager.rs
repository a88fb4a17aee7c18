//! File manager trait definition

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::DomainError;

/// File access used by datasets, rooted at an implementation-defined base directory.
///
/// All paths are relative to that base.
#[async_trait]
pub trait FileManager: Send + Sync + Debug {
    /// Reads a UTF-8 file
    async fn load(&self, path: &Path) -> Result<String, DomainError> {
        let bytes = self.load_binary(path).await?;

        String::from_utf8(bytes).map_err(|e| {
            DomainError::storage(format!("File {} is not valid UTF-8: {}", path.display(), e))
        })
    }

    /// Reads a file as raw bytes
    async fn load_binary(&self, path: &Path) -> Result<Vec<u8>, DomainError>;

    /// Writes a UTF-8 file, replacing any previous content
    async fn write(&self, path: &Path, content: &str) -> Result<(), DomainError> {
        self.write_binary(path, content.as_bytes()).await
    }

    /// Writes raw bytes, replacing any previous content
    async fn write_binary(&self, path: &Path, content: &[u8]) -> Result<(), DomainError>;

    /// Checks whether a file or directory exists
    async fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all of its parents
    async fn mkdir(&self, path: &Path) -> Result<(), DomainError>;

    /// Resolves a relative path against the base directory
    fn abs_path(&self, path: &Path) -> PathBuf;
}
