//! Natural-language query agent

mod agent;
mod prompt;
mod query;
mod sql_sandbox;

pub use agent::{Agent, AgentConfig, AgentTable};
pub use query::{ensure_read_only, extract_query};
pub use sql_sandbox::SqlSandbox;
