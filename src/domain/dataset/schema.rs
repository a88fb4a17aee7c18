//! Schema document persisted as `schema.yaml` next to the dataset data

use std::collections::HashSet;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use super::ColumnType;
use crate::domain::DomainError;

/// File name of the schema document inside a dataset directory
pub const SCHEMA_FILE_NAME: &str = "schema.yaml";

/// File name of the columnar data inside a dataset directory
pub const DATA_FILE_NAME: &str = "data.parquet";

/// Source types whose data lives in the dataset directory
pub const LOCAL_SOURCE_TYPES: &[&str] = &["parquet", "csv"];

/// Source types backed by an external database
pub const REMOTE_SOURCE_TYPES: &[&str] = &[
    "postgres",
    "mysql",
    "cockroachdb",
    "sqlite",
    "bigquery",
    "snowflake",
    "databricks",
    "oracle",
];

/// Where the dataset's rows come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Source {
    pub fn parquet(path: impl Into<String>) -> Self {
        Self {
            source_type: "parquet".to_string(),
            path: Some(path.into()),
        }
    }

    pub fn is_local(&self) -> bool {
        LOCAL_SOURCE_TYPES.contains(&self.source_type.as_str())
    }
}

/// A column entry of the schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaColumn {
    pub fn new(name: impl Into<String>, column_type: Option<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type,
            description: None,
        }
    }
}

/// Structured description of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticLayerSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
}

impl SemanticLayerSchema {
    /// Build the default schema for a frame.
    ///
    /// Columns follow the frame's column order. Without a table name the schema is named
    /// after the column hash.
    pub fn infer(frame: &DataFrame, table_name: Option<&str>) -> Self {
        let columns = frame
            .get_columns()
            .iter()
            .map(|c| SchemaColumn::new(c.name().as_str(), ColumnType::from_dtype(c.dtype())))
            .collect();

        let name = match table_name {
            Some(name) => name.to_string(),
            None => format!("table_{}", column_hash(frame)),
        };

        Self {
            name,
            description: None,
            source: Some(Source::parquet(DATA_FILE_NAME)),
            columns,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Schema name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(DomainError::validation("Column names cannot be empty"));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DomainError::validation(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
        }

        if let Some(source) = &self.source {
            let known = source.is_local()
                || REMOTE_SOURCE_TYPES.contains(&source.source_type.as_str());
            if !known {
                return Err(DomainError::validation(format!(
                    "Unsupported source type: {}",
                    source.source_type
                )));
            }
            if source.is_local() && source.path.as_deref().is_none_or(str::is_empty) {
                return Err(DomainError::validation(format!(
                    "Source of type '{}' requires a path",
                    source.source_type
                )));
            }
        }

        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, DomainError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, DomainError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// MD5 hex digest of the frame's column names joined by commas
pub fn column_hash(frame: &DataFrame) -> String {
    let joined = frame
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(",");

    format!("{:x}", md5::compute(joined.as_bytes()))
}
