//! File manager factory for runtime storage selection

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::FileManager;

use super::in_memory::InMemoryFileManager;
use super::local::LocalFileManager;

fn default_datasets_dir() -> PathBuf {
    PathBuf::from("datasets")
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Dataset directories on local disk
    Local {
        #[serde(default = "default_datasets_dir")]
        root: PathBuf,
    },
    /// In-memory storage (for testing/development)
    InMemory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Local {
            root: default_datasets_dir(),
        }
    }
}

/// Factory for creating file managers
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Arc<dyn FileManager> {
        match config {
            StorageConfig::Local { root } => Arc::new(LocalFileManager::new(root.clone())),
            StorageConfig::InMemory => Arc::new(InMemoryFileManager::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_is_local_datasets_dir() {
        let fm = StorageFactory::create(&StorageConfig::default());
        assert_eq!(fm.abs_path(Path::new("a/b")), PathBuf::from("datasets/a/b"));
    }

    #[test]
    fn test_config_deserializes() {
        let config: StorageConfig =
            serde_json::from_value(serde_json::json!({ "type": "local", "root": "/data" }))
                .unwrap();
        assert!(matches!(config, StorageConfig::Local { ref root } if root == Path::new("/data")));

        let config: StorageConfig =
            serde_json::from_value(serde_json::json!({ "type": "in_memory" })).unwrap();
        assert!(matches!(config, StorageConfig::InMemory));
    }
}
