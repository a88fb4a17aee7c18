//! In-memory file manager implementation

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, FileManager};

/// Thread-safe in-memory file manager
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Like a real filesystem, writes fail unless the parent directory was created first.
#[derive(Debug, Default)]
pub struct InMemoryFileManager {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    dirs: RwLock<HashSet<PathBuf>>,
}

impl InMemoryFileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of every stored file, sorted
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self
            .files
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    fn parent_exists(&self, path: &Path) -> Result<bool, DomainError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(true),
        };

        let dirs = self.dirs.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(dirs.contains(parent))
    }
}

#[async_trait]
impl FileManager for InMemoryFileManager {
    async fn load_binary(&self, path: &Path) -> Result<Vec<u8>, DomainError> {
        let files = self.files.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        files
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::storage(format!("File not found: {}", path.display())))
    }

    async fn write_binary(&self, path: &Path, content: &[u8]) -> Result<(), DomainError> {
        if !self.parent_exists(path)? {
            return Err(DomainError::storage(format!(
                "Parent directory of {} does not exist",
                path.display()
            )));
        }

        let mut files = self.files.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        let is_file = self
            .files
            .read()
            .map(|files| files.contains_key(path))
            .unwrap_or(false);

        is_file
            || self
                .dirs
                .read()
                .map(|dirs| dirs.contains(path))
                .unwrap_or(false)
    }

    async fn mkdir(&self, path: &Path) -> Result<(), DomainError> {
        let mut dirs = self.dirs.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }

        Ok(())
    }

    fn abs_path(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mkdir_creates_ancestors() {
        let fm = InMemoryFileManager::new();
        fm.mkdir(Path::new("a/b/c")).await.unwrap();

        assert!(fm.exists(Path::new("a")).await);
        assert!(fm.exists(Path::new("a/b")).await);
        assert!(fm.exists(Path::new("a/b/c")).await);
    }

    #[tokio::test]
    async fn test_write_requires_parent() {
        let fm = InMemoryFileManager::new();
        assert!(fm.write(Path::new("a/file.txt"), "x").await.is_err());

        fm.mkdir(Path::new("a")).await.unwrap();
        fm.write(Path::new("a/file.txt"), "x").await.unwrap();
        assert_eq!(fm.load(Path::new("a/file.txt")).await.unwrap(), "x");
        assert_eq!(fm.file_paths(), vec![PathBuf::from("a/file.txt")]);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let fm = InMemoryFileManager::new();
        fm.write_binary(Path::new("f.bin"), b"one").await.unwrap();
        fm.write_binary(Path::new("f.bin"), b"two").await.unwrap();

        assert_eq!(fm.load_binary(Path::new("f.bin")).await.unwrap(), b"two");
    }
}
