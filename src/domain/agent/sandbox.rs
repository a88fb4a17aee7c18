use std::fmt::Debug;

use async_trait::async_trait;
use polars::prelude::DataFrame;

use crate::domain::DomainError;

/// A frame registered under the name queries refer to it by
#[derive(Debug, Clone)]
pub struct QueryTable {
    pub name: String,
    pub frame: DataFrame,
}

impl QueryTable {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }
}

/// Executes generated queries against a set of tables
#[async_trait]
pub trait Sandbox: Send + Sync + Debug {
    async fn execute(&self, query: &str, tables: &[QueryTable]) -> Result<DataFrame, DomainError>;

    fn name(&self) -> &'static str;
}
