use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("API key not found: {message}")]
    ApiKeyNotFound { message: String },

    #[error("Unsupported model: {model}")]
    UnsupportedModel { model: String },

    #[error("Please save the dataset before pushing to the remote server")]
    MissingLocalPath,

    #[error("Registry API key is required, set PANDABI_API_KEY or registry.api_key")]
    MissingRegistryApiKey,

    #[error("Dataset not found: {message}")]
    DatasetNotFound { message: String },

    #[error("Dataset already exists at path: {path}")]
    DatasetAlreadyExists { path: String },

    #[error("Invalid dataset path '{path}': {message}")]
    InvalidDatasetPath { path: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Query error: {message}")]
    Query { message: String },

    #[error("Unsafe query rejected: {message}")]
    UnsafeQuery { message: String },

    #[error("No existing conversation. Please use chat() to start a new conversation")]
    NoConversation,
}

impl DomainError {
    pub fn api_key_not_found(message: impl Into<String>) -> Self {
        Self::ApiKeyNotFound {
            message: message.into(),
        }
    }

    pub fn unsupported_model(model: impl Into<String>) -> Self {
        Self::UnsupportedModel {
            model: model.into(),
        }
    }

    pub fn dataset_not_found(message: impl Into<String>) -> Self {
        Self::DatasetNotFound {
            message: message.into(),
        }
    }

    pub fn dataset_already_exists(path: impl Into<String>) -> Self {
        Self::DatasetAlreadyExists { path: path.into() }
    }

    pub fn invalid_dataset_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDatasetPath {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn unsafe_query(message: impl Into<String>) -> Self {
        Self::UnsafeQuery {
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for DomainError {
    fn from(error: polars::prelude::PolarsError) -> Self {
        Self::query(error.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization(format!("Invalid schema document: {}", error))
    }
}
