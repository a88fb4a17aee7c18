use std::path::Path;

use serde::Deserialize;

use crate::infrastructure::agent::AgentConfig;
use crate::infrastructure::llm::LlmProviderConfig;
use crate::infrastructure::registry::RegistryConfig;
use crate::infrastructure::storage::StorageConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmProviderConfig,
    pub registry: RegistryConfig,
    pub storage: StorageConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `TABLECHAT__*` variables, in that order
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(
                config::Environment::with_prefix("TABLECHAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.agent.max_retries, 3);
        assert!(matches!(
            config.storage,
            StorageConfig::Local { ref root } if root == &PathBuf::from("datasets")
        ));
    }

    #[test]
    fn test_layered_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.yaml"),
            "llm:\n  type: open_ai\n  model: gpt-4o\nlogging:\n  level: info\n  format: json\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("local.yaml"),
            "agent:\n  max_retries: 1\nstorage:\n  type: in_memory\n",
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();

        let LlmProviderConfig::OpenAi(openai) = &config.llm;
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.agent.max_retries, 1);
        assert_eq!(config.agent.memory_size, 10);
        assert!(matches!(config.storage, StorageConfig::InMemory));
    }
}
