//! Pull command - downloads a dataset from the registry

use clap::Args;

use crate::config::AppConfig;
use crate::domain::DatasetPath;
use crate::infrastructure::dataset::pull_dataset;
use crate::infrastructure::registry::RegistryClient;
use crate::infrastructure::storage::StorageFactory;

/// Arguments for the pull command
#[derive(Args, Clone)]
pub struct PullArgs {
    /// Dataset path in the form organization/dataset
    pub path: String,
}

pub async fn run(config: &AppConfig, args: PullArgs) -> anyhow::Result<()> {
    let path = DatasetPath::parse(&args.path)?;
    let registry = RegistryClient::new(config.registry.clone())?;
    let file_manager = StorageFactory::create(&config.storage);

    let dataset = pull_dataset(&path, &registry, file_manager.as_ref()).await?;

    println!(
        "Pulled {} ({} rows, {} columns) into {}",
        path,
        dataset.rows_count(),
        dataset.columns_count(),
        file_manager.abs_path(&path.to_path_buf()).display()
    );
    Ok(())
}
