use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::prompt::{correct_error_prompt, generate_query_prompt};
use super::query::extract_query;
use super::sql_sandbox::SqlSandbox;
use crate::domain::agent::DEFAULT_MEMORY_SIZE;
use crate::domain::{
    AgentResponse, DomainError, LlmProvider, LlmRequest, Memory, Message, QueryTable, Sandbox,
};

/// Agent settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Extra generations allowed after a query fails to execute
    pub max_retries: u32,
    pub memory_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            memory_size: DEFAULT_MEMORY_SIZE,
        }
    }
}

/// A queryable table together with its prompt rendering
#[derive(Debug, Clone)]
pub struct AgentTable {
    pub table: QueryTable,
    pub serialized: String,
}

impl AgentTable {
    pub fn new(table: QueryTable, serialized: impl Into<String>) -> Self {
        Self {
            table,
            serialized: serialized.into(),
        }
    }
}

/// Turns questions into queries with an LLM and runs them in a sandbox
#[derive(Debug)]
pub struct Agent {
    tables: Vec<AgentTable>,
    query_tables: Vec<QueryTable>,
    llm: Arc<dyn LlmProvider>,
    sandbox: Arc<dyn Sandbox>,
    config: AgentConfig,
    memory: Memory,
    conversation_id: Uuid,
    last_query: Option<String>,
}

impl Agent {
    /// Create an agent. Without an explicit sandbox queries run in [`SqlSandbox`].
    pub fn new(
        tables: Vec<AgentTable>,
        llm: Arc<dyn LlmProvider>,
        sandbox: Option<Arc<dyn Sandbox>>,
        config: AgentConfig,
    ) -> Self {
        let query_tables = tables.iter().map(|t| t.table.clone()).collect();

        Self {
            tables,
            query_tables,
            llm,
            sandbox: sandbox.unwrap_or_else(|| Arc::new(SqlSandbox::new()) as Arc<dyn Sandbox>),
            memory: Memory::new(config.memory_size),
            config,
            conversation_id: Uuid::new_v4(),
            last_query: None,
        }
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Start a new conversation and answer `query`
    pub async fn chat(&mut self, query: &str) -> Result<AgentResponse, DomainError> {
        self.start_new_conversation();
        self.process(query).await
    }

    /// Answer `query` in the context of the current conversation
    pub async fn follow_up(&mut self, query: &str) -> Result<AgentResponse, DomainError> {
        self.process(query).await
    }

    pub fn start_new_conversation(&mut self) {
        self.memory.clear();
        self.conversation_id = Uuid::new_v4();
        self.last_query = None;
    }

    async fn process(&mut self, query: &str) -> Result<AgentResponse, DomainError> {
        info!(conversation_id = %self.conversation_id, "Processing query");

        self.memory.add(Message::user(query));

        let system = generate_query_prompt(&self.tables);
        let mut messages = self.memory.messages();
        let mut sql = self.generate(&system, &messages).await?;
        let mut retries = 0;

        loop {
            match self.sandbox.execute(&sql, &self.query_tables).await {
                Ok(frame) => {
                    debug!(rows = frame.height(), "Query executed");
                    self.memory.add(Message::assistant(format!("```sql\n{}\n```", sql)));
                    self.last_query = Some(sql.clone());
                    return Ok(AgentResponse::from_frame(frame, sql));
                }
                Err(e) if retries < self.config.max_retries && is_correctable(&e) => {
                    retries += 1;
                    warn!(
                        attempt = retries,
                        error = %e,
                        "Query failed, asking the model to fix it"
                    );

                    messages.push(Message::assistant(sql.clone()));
                    messages.push(Message::user(correct_error_prompt(&sql, &e.to_string())));
                    sql = self.generate(&system, &messages).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn generate(&self, system: &str, messages: &[Message]) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .system(system)
            .messages(messages.to_vec())
            .build();

        let response = self.llm.chat(request).await?;
        extract_query(response.content())
    }
}

fn is_correctable(error: &DomainError) -> bool {
    matches!(
        error,
        DomainError::Query { .. } | DomainError::UnsafeQuery { .. }
    )
}
