//! In-process sandbox running read-only SQL through polars

use async_trait::async_trait;
use polars::prelude::*;
use polars::sql::SQLContext;
use tracing::debug;

use super::query::{ROW_COUNT_ANCHOR, anchor_row_count, ensure_read_only};
use crate::domain::{DomainError, QueryTable, Sandbox};

/// Runs queries against the registered frames only. Nothing outside the given tables
/// is reachable and write statements are rejected before planning.
#[derive(Debug, Default, Clone)]
pub struct SqlSandbox;

impl SqlSandbox {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sandbox for SqlSandbox {
    async fn execute(&self, query: &str, tables: &[QueryTable]) -> Result<DataFrame, DomainError> {
        ensure_read_only(query)?;

        let mut ctx = SQLContext::new();
        for table in tables {
            ctx.register(&table.name, table.frame.clone().lazy());
        }

        debug!(query = %query, tables = tables.len(), "Executing query");

        match anchor_row_count(query, tables) {
            Some(anchored) => {
                debug!(query = %anchored, "Anchored row count");
                let frame = ctx.execute(&anchored)?.collect()?;
                Ok(frame.drop(ROW_COUNT_ANCHOR)?)
            }
            None => Ok(ctx.execute(query)?.collect()?),
        }
    }

    fn name(&self) -> &'static str {
        "sql"
    }
}
