//! Export command - writes a dataset's data to a file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::dataset::{DataFormat, write_csv, write_parquet};

/// Arguments for the export command
#[derive(Args, Clone)]
pub struct ExportArgs {
    /// Dataset path in the form organization/dataset
    pub path: String,

    /// Output file; the extension selects CSV or parquet
    #[arg(long, short)]
    pub output: PathBuf,
}

pub async fn run(config: &AppConfig, args: ExportArgs) -> anyhow::Result<()> {
    let dataset = super::load_dataset(config, &args.path).await?;

    let format = DataFormat::from_extension(&args.output)
        .with_context(|| format!("Unsupported file type: {}", args.output.display()))?;

    let bytes = match format {
        DataFormat::Parquet => write_parquet(dataset.frame())?,
        DataFormat::Csv => write_csv(dataset.frame())?.into_bytes(),
    };

    tokio::fs::write(&args.output, bytes)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Exported {} rows to {}", dataset.rows_count(), args.output.display());
    Ok(())
}
