//! LLM provider domain models and traits

mod message;
mod model_registry;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use model_registry::{CHAT_MODELS, COMPLETION_MODELS, DEFAULT_MODEL, ModelKind, base_model_name};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};
pub use response::{FinishReason, LlmResponse, Usage};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
