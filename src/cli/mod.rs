//! CLI module for tablechat
//!
//! Subcommands:
//! - `create`: save a CSV or parquet file as a local dataset
//! - `schema`: print the schema inferred for a data file
//! - `chat`: ask questions about a local dataset
//! - `push` / `pull`: sync a dataset with the remote registry
//! - `export`: write a dataset's data to a CSV or parquet file

pub mod chat;
pub mod create;
pub mod export;
pub mod pull;
pub mod push;
pub mod schema;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::DatasetPath;
use crate::infrastructure::dataset::{DataFormat, Dataset, DatasetLoader};
use crate::infrastructure::logging;
use crate::infrastructure::storage::StorageFactory;

/// Tablechat - ask questions about tabular datasets in plain language
#[derive(Parser)]
#[command(name = "tablechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save a data file as a new local dataset
    Create(create::CreateArgs),

    /// Print the schema inferred for a data file
    Schema(schema::SchemaArgs),

    /// Ask questions about a local dataset
    Chat(chat::ChatArgs),

    /// Upload a local dataset to the registry
    Push(push::PushArgs),

    /// Download a dataset from the registry
    Pull(pull::PullArgs),

    /// Write a dataset's data to a file
    Export(export::ExportArgs),
}

/// Load `.env` and configuration, then install logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Load a dataset saved under the configured storage root
pub(crate) async fn load_dataset(config: &AppConfig, path: &str) -> anyhow::Result<Dataset> {
    let path = DatasetPath::parse(path)?;
    let file_manager = StorageFactory::create(&config.storage);

    let dataset = DatasetLoader::from_path(&path, file_manager.as_ref())
        .await?
        .load()
        .await?
        .with_agent_config(config.agent.clone());

    Ok(dataset)
}

/// Read a CSV or parquet file from disk
pub(crate) async fn read_data_file(file: &Path) -> anyhow::Result<polars::prelude::DataFrame> {
    let format = DataFormat::from_extension(file)
        .with_context(|| format!("Unsupported file type: {}", file.display()))?;

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    Ok(format.read(bytes)?)
}
