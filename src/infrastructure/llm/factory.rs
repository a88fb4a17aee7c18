use serde::Deserialize;
use std::sync::Arc;

use super::openai::{OpenAiConfig, OpenAiLlm};
use crate::domain::{DomainError, LlmProvider};

/// LLM provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmProviderConfig {
    OpenAi(OpenAiConfig),
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self::OpenAi(OpenAiConfig::default())
    }
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from configuration
    pub fn create(config: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        match config {
            LlmProviderConfig::OpenAi(openai) => {
                let provider = OpenAiLlm::new(openai.clone())?;
                Ok(Arc::new(provider))
            }
        }
    }

    /// Create an OpenAI provider for a model with an explicit key
    pub fn create_openai(
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let config = OpenAiConfig::new(model).with_api_key(api_key);
        Ok(Arc::new(OpenAiLlm::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_provider() {
        let provider = LlmFactory::create_openai("gpt-4o-mini", "test-key").unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_factory_with_config() {
        let config = LlmProviderConfig::OpenAi(
            OpenAiConfig::new("gpt-3.5-turbo-instruct").with_api_key("sk-test"),
        );

        let provider = LlmFactory::create(&config).unwrap();
        assert_eq!(provider.model(), "gpt-3.5-turbo-instruct");
    }

    #[test]
    fn test_factory_rejects_unknown_model() {
        let result = LlmFactory::create_openai("llama-3", "sk-test");
        assert!(matches!(result, Err(DomainError::UnsupportedModel { .. })));
    }

    #[test]
    fn test_config_deserializes_tagged() {
        let json = serde_json::json!({ "type": "open_ai", "model": "gpt-4o", "temperature": 0.3 });
        let config: LlmProviderConfig = serde_json::from_value(json).unwrap();

        let LlmProviderConfig::OpenAi(openai) = config;
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.temperature, 0.3);
        assert_eq!(openai.max_tokens, 1000);
    }
}
