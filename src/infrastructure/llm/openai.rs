use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::{HttpClient, HttpClientConfig, HttpClientTrait};
use crate::domain::llm::{DEFAULT_MODEL, ModelKind};
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, Usage,
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_API_BASE_ENV: &str = "OPENAI_API_BASE";
pub const OPENAI_PROXY_ENV: &str = "OPENAI_PROXY";

/// Settings for the OpenAI adapter.
///
/// Unset key, base URL and proxy fall back to `OPENAI_API_KEY`, `OPENAI_API_BASE` and
/// `OPENAI_PROXY` when built through [`OpenAiLlm::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub proxy: Option<String>,
    pub model: String,
    pub organization: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Completion models only
    pub best_of: u32,
    pub n: u32,
    pub stop: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub default_headers: HashMap<String, String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            proxy: None,
            model: DEFAULT_MODEL.to_string(),
            organization: None,
            temperature: 0.0,
            max_tokens: 1000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.6,
            best_of: 1,
            n: 1,
            stop: None,
            seed: None,
            request_timeout_secs: None,
            default_headers: HashMap::new(),
        }
    }
}

impl OpenAiConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Fill unset key, base URL and proxy from the given variable lookup
    pub fn with_env_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        self.api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| non_empty(OPENAI_API_KEY_ENV));
        self.api_base = self.api_base.or_else(|| non_empty(OPENAI_API_BASE_ENV));
        self.proxy = self.proxy.or_else(|| non_empty(OPENAI_PROXY_ENV));
        self
    }

    fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.request_timeout_secs.map(Duration::from_secs),
            proxy: self.proxy.clone(),
        }
    }
}

/// OpenAI adapter bound to one model and to the endpoint family that serves it
#[derive(Debug)]
pub struct OpenAiLlm<C: HttpClientTrait> {
    client: C,
    config: OpenAiConfig,
    kind: ModelKind,
    auth_header: String,
    base_url: String,
}

impl OpenAiLlm<HttpClient> {
    /// Build an adapter with a reqwest transport, reading missing settings from the environment
    pub fn new(config: OpenAiConfig) -> Result<Self, DomainError> {
        let config = config.with_env_fallback(|name| std::env::var(name).ok());
        let client = HttpClient::from_config(&config.http_config())?;
        Self::with_client(client, config)
    }
}

impl<C: HttpClientTrait> OpenAiLlm<C> {
    pub fn with_client(client: C, config: OpenAiConfig) -> Result<Self, DomainError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DomainError::api_key_not_found("OpenAI API key is required"))?;

        let kind = ModelKind::classify(&config.model)
            .ok_or_else(|| DomainError::unsupported_model(&config.model))?;

        let base_url = config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        debug!(
            model = %config.model,
            kind = %kind,
            base_url = %base_url,
            "OpenAI client configured"
        );

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", api_key),
            config,
            kind,
            base_url,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn is_chat_model(&self) -> bool {
        self.kind == ModelKind::Chat
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, self.kind.endpoint_path())
    }

    fn build_request(&self, request: &LlmRequest) -> serde_json::Value {
        let config = &self.config;

        let mut body = serde_json::json!({
            "model": config.model,
            "temperature": request.temperature.unwrap_or(config.temperature),
            "max_tokens": request.max_tokens.unwrap_or(config.max_tokens),
            "top_p": config.top_p,
            "frequency_penalty": config.frequency_penalty,
            "presence_penalty": config.presence_penalty,
            "n": config.n,
        });

        match self.kind {
            ModelKind::Chat => {
                let messages: Vec<OpenAiMessage> =
                    request.messages.iter().map(OpenAiMessage::from_domain).collect();
                body["messages"] = serde_json::json!(messages);
            }
            ModelKind::Completion => {
                body["prompt"] = serde_json::json!(request.to_prompt());
                body["best_of"] = serde_json::json!(config.best_of);
            }
        }

        if let Some(stop) = request.stop.as_ref().or(config.stop.as_ref()) {
            body["stop"] = serde_json::json!(stop);
        }

        if let Some(seed) = config.seed {
            body["seed"] = serde_json::json!(seed);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        if let Some(ref organization) = self.config.organization {
            headers.push(("OpenAI-Organization", organization.as_str()));
        }

        for (key, value) in &self.config.default_headers {
            headers.push((key.as_str(), value.as_str()));
        }

        headers
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        let content = match self.kind {
            ModelKind::Chat => choice.message.and_then(|m| m.content),
            ModelKind::Completion => choice.text,
        }
        .unwrap_or_default();

        let mut llm_response =
            LlmResponse::new(response.id, response.model, Message::assistant(content));

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiLlm<C> {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.endpoint_url();
        let body = self.build_request(&request);

        debug!(url = %url, model = %self.config.model, "Sending OpenAI request");

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

/// Chat choices carry `message`, completion choices carry `text`
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiResponseMessage>,
    text: Option<String>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{CHAT_MODELS, COMPLETION_MODELS};
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
    const COMPLETION_URL: &str = "https://api.openai.com/v1/completions";

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18 }
        })
    }

    fn config(model: &str) -> OpenAiConfig {
        OpenAiConfig::new(model).with_api_key("sk-test")
    }

    #[test]
    fn test_missing_api_key() {
        let result = OpenAiLlm::with_client(MockHttpClient::new(), OpenAiConfig::new("gpt-4o"));
        assert!(matches!(result, Err(DomainError::ApiKeyNotFound { .. })));

        let result = OpenAiLlm::with_client(
            MockHttpClient::new(),
            OpenAiConfig::new("gpt-4o").with_api_key(""),
        );
        assert!(matches!(result, Err(DomainError::ApiKeyNotFound { .. })));
    }

    #[test]
    fn test_every_listed_model_selects_its_endpoint() {
        for model in CHAT_MODELS {
            let llm = OpenAiLlm::with_client(MockHttpClient::new(), config(model)).unwrap();
            assert!(llm.is_chat_model(), "{}", model);
            assert_eq!(llm.endpoint_url(), CHAT_URL);
        }

        for model in COMPLETION_MODELS {
            let llm = OpenAiLlm::with_client(MockHttpClient::new(), config(model)).unwrap();
            assert_eq!(llm.kind(), ModelKind::Completion, "{}", model);
            assert_eq!(llm.endpoint_url(), COMPLETION_URL);
        }
    }

    #[test]
    fn test_unsupported_model() {
        let result = OpenAiLlm::with_client(MockHttpClient::new(), config("text-davinci-003"));
        match result {
            Err(DomainError::UnsupportedModel { model }) => assert_eq!(model, "text-davinci-003"),
            other => panic!("expected unsupported model, got {:?}", other),
        }
    }

    #[test]
    fn test_fine_tuned_model_keeps_full_id() {
        let llm = OpenAiLlm::with_client(
            MockHttpClient::new(),
            config("ft:gpt-4o-mini:acme:custom:abc123"),
        )
        .unwrap();

        assert!(llm.is_chat_model());
        assert_eq!(llm.model(), "ft:gpt-4o-mini:acme:custom:abc123");
    }

    #[test]
    fn test_env_fallback_only_fills_missing_values() {
        let lookup = |name: &str| match name {
            OPENAI_API_KEY_ENV => Some("sk-env".to_string()),
            OPENAI_API_BASE_ENV => Some("http://env-base/v1".to_string()),
            OPENAI_PROXY_ENV => Some("http://proxy:3128".to_string()),
            _ => None,
        };

        let resolved = OpenAiConfig::new("gpt-4o")
            .with_api_base("http://explicit/v1")
            .with_env_fallback(lookup);

        assert_eq!(resolved.api_key.as_deref(), Some("sk-env"));
        assert_eq!(resolved.api_base.as_deref(), Some("http://explicit/v1"));
        assert_eq!(resolved.proxy.as_deref(), Some("http://proxy:3128"));

        let explicit = OpenAiConfig::new("gpt-4o")
            .with_api_key("sk-explicit")
            .with_env_fallback(lookup);
        assert_eq!(explicit.api_key.as_deref(), Some("sk-explicit"));
    }

    #[tokio::test]
    async fn test_chat_model_request() {
        let client = MockHttpClient::new().with_response(CHAT_URL, chat_reply("Hello!"));
        let llm = OpenAiLlm::with_client(client, config("gpt-4o")).unwrap();

        let request = LlmRequest::builder().system("sys").user("Hi").build();
        let response = llm.chat(request).await.unwrap();

        assert_eq!(response.id, "chatcmpl-123");
        assert_eq!(response.content(), "Hello!");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().total_tokens, 18);

        let sent = &llm.client.requests()[0];
        assert_eq!(sent.body["model"], "gpt-4o");
        assert_eq!(sent.body["messages"][0]["role"], "system");
        assert_eq!(sent.body["messages"][1]["content"], "Hi");
        assert_eq!(sent.body["max_tokens"], 1000);
        assert!(sent.body.get("prompt").is_none());
        assert!(sent
            .headers
            .contains(&("Authorization".to_string(), "Bearer sk-test".to_string())));
    }

    #[tokio::test]
    async fn test_completion_model_request() {
        let reply = serde_json::json!({
            "id": "cmpl-1",
            "model": "gpt-3.5-turbo-instruct",
            "choices": [{ "text": "SELECT 1", "finish_reason": "length" }]
        });
        let client = MockHttpClient::new().with_response(COMPLETION_URL, reply);
        let llm = OpenAiLlm::with_client(client, config("gpt-3.5-turbo-instruct")).unwrap();

        let request = LlmRequest::builder().user("count rows").build();
        let response = llm.chat(request).await.unwrap();

        assert_eq!(response.content(), "SELECT 1");
        assert_eq!(response.finish_reason, Some(FinishReason::Length));

        let sent = &llm.client.requests()[0];
        assert!(sent.body["prompt"].as_str().unwrap().contains("count rows"));
        assert_eq!(sent.body["best_of"], 1);
        assert!(sent.body.get("messages").is_none());
    }

    #[tokio::test]
    async fn test_request_overrides_and_extra_headers() {
        let url = "http://localhost:8080/v1/chat/completions";
        let client = MockHttpClient::new().with_response(url, chat_reply("ok"));

        let mut cfg = config("gpt-4").with_api_base("http://localhost:8080/v1/");
        cfg.organization = Some("org-1".to_string());
        cfg.seed = Some(7);
        cfg.default_headers.insert("X-Trace".to_string(), "abc".to_string());

        let llm = OpenAiLlm::with_client(client, cfg).unwrap();
        assert_eq!(llm.base_url(), "http://localhost:8080/v1");

        let request = LlmRequest::builder()
            .user("Hi")
            .temperature(0.5)
            .stop(vec!["###".to_string()])
            .build();
        llm.chat(request).await.unwrap();

        let sent = &llm.client.requests()[0];
        assert_eq!(sent.url, url);
        assert_eq!(sent.body["temperature"], 0.5);
        assert_eq!(sent.body["stop"][0], "###");
        assert_eq!(sent.body["seed"], 7);
        assert!(sent
            .headers
            .contains(&("OpenAI-Organization".to_string(), "org-1".to_string())));
        assert!(sent.headers.contains(&("X-Trace".to_string(), "abc".to_string())));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let client = MockHttpClient::new().with_error(CHAT_URL, "API key invalid");
        let llm = OpenAiLlm::with_client(client, config("gpt-4o")).unwrap();

        let result = llm.chat(LlmRequest::builder().user("Hi").build()).await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let reply = serde_json::json!({ "id": "x", "model": "gpt-4o", "choices": [] });
        let client = MockHttpClient::new().with_response(CHAT_URL, reply);
        let llm = OpenAiLlm::with_client(client, config("gpt-4o")).unwrap();

        let err = llm.chat(LlmRequest::builder().user("Hi").build()).await.unwrap_err();
        assert!(err.to_string().contains("No choices"));
    }
}
