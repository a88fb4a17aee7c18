//! Tablechat
//!
//! Ask natural-language questions about tabular datasets:
//! - OpenAI adapter choosing the chat or completion endpoint per model
//! - Datasets with inferred schemas stored as `schema.yaml` + `data.parquet`
//! - Push and pull against a remote dataset registry
//! - An agent turning questions into read-only SQL run in-process

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::dataset::Dataset;
