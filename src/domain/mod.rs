//! Domain layer - Core entities, traits and errors

pub mod agent;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod storage;

pub use agent::{AgentResponse, Memory, QueryTable, ResponseValue, Sandbox};
pub use dataset::{
    ColumnType, DatasetPath, DatasetRegistry, PushReceipt, PushRequest, SchemaColumn,
    SemanticLayerSchema, Source,
};
pub use error::DomainError;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    ModelKind, Usage,
};
pub use storage::FileManager;
