//! Local-disk file manager

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{DomainError, FileManager};

/// File manager rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct LocalFileManager {
    base_path: PathBuf,
}

impl LocalFileManager {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl FileManager for LocalFileManager {
    async fn load_binary(&self, path: &Path) -> Result<Vec<u8>, DomainError> {
        let full_path = self.abs_path(path);

        tokio::fs::read(&full_path).await.map_err(|e| {
            DomainError::storage(format!("Failed to read {}: {}", full_path.display(), e))
        })
    }

    async fn write_binary(&self, path: &Path, content: &[u8]) -> Result<(), DomainError> {
        let full_path = self.abs_path(path);
        debug!(path = %full_path.display(), bytes = content.len(), "Writing file");

        tokio::fs::write(&full_path, content).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", full_path.display(), e))
        })
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.abs_path(path))
            .await
            .unwrap_or(false)
    }

    async fn mkdir(&self, path: &Path) -> Result<(), DomainError> {
        let full_path = self.abs_path(path);

        tokio::fs::create_dir_all(&full_path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create directory {}: {}",
                full_path.display(),
                e
            ))
        })
    }

    fn abs_path(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let fm = LocalFileManager::new(dir.path());

        let folder = Path::new("acme/sales");
        fm.mkdir(folder).await.unwrap();
        fm.write(&folder.join("schema.yaml"), "name: sales\n").await.unwrap();

        assert!(fm.exists(folder).await);
        assert_eq!(fm.load(&folder.join("schema.yaml")).await.unwrap(), "name: sales\n");
        assert_eq!(fm.abs_path(folder), dir.path().join("acme/sales"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fm = LocalFileManager::new(dir.path());

        assert!(!fm.exists(Path::new("nope.parquet")).await);
        assert!(matches!(
            fm.load_binary(Path::new("nope.parquet")).await,
            Err(DomainError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_without_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let fm = LocalFileManager::new(dir.path());

        let result = fm.write_binary(Path::new("missing/dir/file.bin"), b"x").await;
        assert!(result.is_err());
    }
}
