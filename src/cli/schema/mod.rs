//! Schema command - prints the schema inferred for a data file

use std::path::PathBuf;

use clap::Args;

use crate::domain::SemanticLayerSchema;

/// Arguments for the schema command
#[derive(Args, Clone)]
pub struct SchemaArgs {
    /// CSV or parquet file to inspect
    pub file: PathBuf,

    /// Table name to use instead of the column hash
    #[arg(long)]
    pub table_name: Option<String>,
}

pub async fn run(args: SchemaArgs) -> anyhow::Result<()> {
    let frame = super::read_data_file(&args.file).await?;
    let schema = SemanticLayerSchema::infer(&frame, args.table_name.as_deref());

    print!("{}", schema.to_yaml()?);
    Ok(())
}
