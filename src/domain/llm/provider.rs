use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for LLM providers bound to a single model
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a generation request to the bound model
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model id this provider was constructed for
    fn model(&self) -> &str;
}
