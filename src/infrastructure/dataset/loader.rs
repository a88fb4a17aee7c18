//! Rebuilds a dataset from its local directory

use std::path::{Component, Path};

use tracing::debug;

use super::codec::DataFormat;
use super::dataset::Dataset;
use crate::domain::dataset::{DATA_FILE_NAME, DatasetPath, SCHEMA_FILE_NAME, SemanticLayerSchema};
use crate::domain::{DomainError, FileManager};

/// Reads `schema.yaml` and the data file it points at
#[derive(Debug)]
pub struct DatasetLoader<'a> {
    path: DatasetPath,
    schema: SemanticLayerSchema,
    file_manager: &'a dyn FileManager,
}

impl<'a> DatasetLoader<'a> {
    pub async fn from_path(
        path: &DatasetPath,
        file_manager: &'a dyn FileManager,
    ) -> Result<Self, DomainError> {
        let schema_path = path.to_path_buf().join(SCHEMA_FILE_NAME);

        if !file_manager.exists(&schema_path).await {
            return Err(DomainError::dataset_not_found(format!(
                "No {} found for dataset {}",
                SCHEMA_FILE_NAME, path
            )));
        }

        let schema = SemanticLayerSchema::from_yaml(&file_manager.load(&schema_path).await?)?;
        schema.validate()?;

        Ok(Self {
            path: path.clone(),
            schema,
            file_manager,
        })
    }

    pub fn schema(&self) -> &SemanticLayerSchema {
        &self.schema
    }

    /// Load the data. Only sources stored in the dataset directory can be loaded.
    pub async fn load(self) -> Result<Dataset, DomainError> {
        let (source_type, file) = match &self.schema.source {
            Some(source) => (
                source.source_type.as_str(),
                source.path.as_deref().unwrap_or(DATA_FILE_NAME),
            ),
            None => ("parquet", DATA_FILE_NAME),
        };

        let format = DataFormat::from_source_type(source_type).ok_or_else(|| {
            DomainError::validation(format!(
                "Source type '{}' is not stored locally and cannot be loaded",
                source_type
            ))
        })?;

        let file = Path::new(file);
        if !file.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(DomainError::validation(format!(
                "Source path must stay inside the dataset directory: {}",
                file.display()
            )));
        }

        let data_path = self.path.to_path_buf().join(file);
        debug!(path = %data_path.display(), "Loading dataset data");

        let frame = format.read(self.file_manager.load_binary(&data_path).await?)?;

        Ok(Dataset::new(frame)
            .with_schema(self.schema)
            .with_dataset_path(self.path))
    }
}
