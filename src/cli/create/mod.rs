//! Create command - saves a data file as a local dataset

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::dataset::Dataset;
use crate::infrastructure::storage::StorageFactory;

/// Arguments for the create command
#[derive(Args, Clone)]
pub struct CreateArgs {
    /// Dataset path in the form organization/dataset
    pub path: String,

    /// CSV or parquet file holding the data
    #[arg(long, short)]
    pub file: PathBuf,

    /// Human readable description stored in the schema
    #[arg(long, short)]
    pub description: Option<String>,

    /// Table name used in queries (defaults to the dataset name)
    #[arg(long)]
    pub table_name: Option<String>,
}

pub async fn run(config: &AppConfig, args: CreateArgs) -> anyhow::Result<()> {
    let frame = super::read_data_file(&args.file).await?;
    let file_manager = StorageFactory::create(&config.storage);

    let mut dataset = Dataset::new(frame);
    if let Some(name) = args.table_name {
        dataset = dataset.with_table_name(name);
    }
    if let Some(description) = args.description {
        dataset.set_description(description);
    }

    dataset.save(&args.path, file_manager.as_ref()).await?;

    let location = file_manager.abs_path(&dataset_dir(&dataset));
    info!(path = %args.path, rows = dataset.rows_count(), "Dataset created");
    println!("Dataset saved to {}", location.display());

    Ok(())
}

fn dataset_dir(dataset: &Dataset) -> PathBuf {
    dataset
        .path()
        .map(|p| p.to_path_buf())
        .unwrap_or_default()
}
