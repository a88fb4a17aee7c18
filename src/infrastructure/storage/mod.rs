//! File manager implementations

mod factory;
mod in_memory;
mod local;

pub use factory::{StorageConfig, StorageFactory};
pub use in_memory::InMemoryFileManager;
pub use local::LocalFileManager;
