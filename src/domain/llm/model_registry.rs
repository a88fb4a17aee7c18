//! Closed registry of the OpenAI model ids the adapter knows how to call

use std::fmt;

/// Model used when no model is configured
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Models served by the chat completions endpoint
pub const CHAT_MODELS: &[&str] = &[
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-0125",
    "gpt-3.5-turbo-1106",
    "gpt-3.5-turbo-0613",
    "gpt-3.5-turbo-16k",
    "gpt-3.5-turbo-16k-0613",
    "gpt-4",
    "gpt-4-0125-preview",
    "gpt-4-1106-preview",
    "gpt-4-0613",
    "gpt-4-32k",
    "gpt-4-32k-0613",
    "gpt-4-turbo-preview",
    "gpt-4o",
    "gpt-4o-2024-05-13",
    "gpt-4o-mini",
    "gpt-4o-mini-2024-07-18",
    "gpt-4.1",
    "gpt-4.1-2025-04-14",
    "gpt-4.1-mini",
    "gpt-4.1-mini-2025-04-14",
    "gpt-4.1-nano",
    "gpt-4.1-nano-2025-04-14",
];

/// Models served by the legacy completions endpoint
pub const COMPLETION_MODELS: &[&str] = &["gpt-3.5-turbo-instruct"];

/// Which endpoint family a model belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Chat,
    Completion,
}

impl ModelKind {
    /// Classify a model id. Returns `None` for models in neither list.
    ///
    /// Fine-tuned ids (`ft:<base>:<org>:...`) are classified by their base model.
    pub fn classify(model: &str) -> Option<Self> {
        let name = base_model_name(model);

        if CHAT_MODELS.contains(&name) {
            Some(Self::Chat)
        } else if COMPLETION_MODELS.contains(&name) {
            Some(Self::Completion)
        } else {
            None
        }
    }

    /// Path of the endpoint relative to the API base
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Self::Chat => "/chat/completions",
            Self::Completion => "/completions",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Completion => write!(f, "completion"),
        }
    }
}

/// Strip the fine-tune prefix from a model id
pub fn base_model_name(model: &str) -> &str {
    if model.contains("ft:") {
        model.split(':').nth(1).unwrap_or(model)
    } else {
        model
    }
}
