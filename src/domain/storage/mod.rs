//! Storage domain - file access for local dataset directories

mod file_manager;

pub use file_manager::FileManager;
