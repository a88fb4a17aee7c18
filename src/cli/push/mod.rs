//! Push command - uploads a local dataset to the registry

use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::registry::RegistryClient;
use crate::infrastructure::storage::StorageFactory;

/// Arguments for the push command
#[derive(Args, Clone)]
pub struct PushArgs {
    /// Dataset path in the form organization/dataset
    pub path: String,
}

pub async fn run(config: &AppConfig, args: PushArgs) -> anyhow::Result<()> {
    let dataset = super::load_dataset(config, &args.path).await?;
    let registry = RegistryClient::new(config.registry.clone())?;
    let file_manager = StorageFactory::create(&config.storage);

    let receipt = dataset.push(&registry, file_manager.as_ref()).await?;

    println!("Your dataset was successfully pushed to the remote server!");
    println!("URL: {}", receipt.url);
    Ok(())
}
