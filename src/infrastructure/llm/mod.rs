//! LLM provider implementations

mod factory;
mod http_client;
mod openai;

pub use factory::{LlmFactory, LlmProviderConfig};
pub use http_client::{HttpClient, HttpClientConfig, HttpClientTrait};
pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiConfig, OpenAiLlm};
