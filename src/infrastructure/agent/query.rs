//! Pulling a SQL query out of an LLM reply and checking it is read-only

use std::ops::ControlFlow;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::{
    Expr, GroupByExpr, Ident, SelectItem, SetExpr, Statement, TableFactor, visit_expressions,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::domain::{DomainError, QueryTable};

/// Alias of the helper aggregate added by [`anchor_row_count`]
pub const ROW_COUNT_ANCHOR: &str = "__tablechat_rows";

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[ \t]*(?:sql|SQL)?[ \t]*\n?(.*?)```").unwrap());

static WRITE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(insert|update|delete|merge|drop|create|alter|truncate|grant|revoke|attach|detach|copy|pragma|call|exec|execute)\b",
    )
    .unwrap()
});

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").unwrap());

static QUOTED_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(?:[^"]|"")*""#).unwrap());

/// Extract the query from a reply. Prefers the first fenced block, else the whole reply.
pub fn extract_query(reply: &str) -> Result<String, DomainError> {
    let query = match FENCED_BLOCK.captures(reply) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => reply,
    };

    let query = query.trim().trim_end_matches(';').trim();
    if query.is_empty() {
        return Err(DomainError::query("The model did not return a query"));
    }

    Ok(query.to_string())
}

/// Accept only a single `SELECT` or `WITH` statement without write keywords
pub fn ensure_read_only(query: &str) -> Result<(), DomainError> {
    let stripped = STRING_LITERAL.replace_all(query, "''");
    let stripped = QUOTED_IDENTIFIER.replace_all(&stripped, "\"\"");
    let trimmed = stripped.trim_start();
    let lowered = trimmed.to_ascii_lowercase();

    if !(lowered.starts_with("select") || lowered.starts_with("with")) {
        return Err(DomainError::unsafe_query(
            "only SELECT or WITH statements are allowed",
        ));
    }

    if stripped.trim().trim_end_matches(';').contains(';') {
        return Err(DomainError::unsafe_query(
            "multiple statements are not allowed",
        ));
    }

    if let Some(m) = WRITE_KEYWORDS.find(&stripped) {
        return Err(DomainError::unsafe_query(format!(
            "keyword '{}' is not allowed",
            m.as_str().to_ascii_uppercase()
        )));
    }

    Ok(())
}

/// Rewrite a `COUNT(*)` query whose projection references no column.
///
/// The polars planner broadcasts such a projection back to the input height, so
/// `SELECT COUNT(*) FROM t` yields one row per row of `t`. Adding a column-based aggregate
/// aliased [`ROW_COUNT_ANCHOR`] makes it plan as a single-row aggregation; the caller drops
/// that column afterwards. Returns `None` when the query needs no rewrite.
pub fn anchor_row_count(query: &str, tables: &[QueryTable]) -> Option<String> {
    let mut statements = Parser::parse_sql(&GenericDialect {}, query).ok()?;
    if statements.len() != 1 {
        return None;
    }

    let Statement::Query(parsed) = &mut statements[0] else {
        return None;
    };
    let SetExpr::Select(select) = parsed.body.as_mut() else {
        return None;
    };

    if !matches!(&select.group_by, GroupByExpr::Expressions(keys, _) if keys.is_empty()) {
        return None;
    }

    let mut counts_rows = false;
    for item in &select.projection {
        let expr = match item {
            SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => expr,
            _ => return None,
        };

        let references_column = visit_expressions(expr, |e| match e {
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) => ControlFlow::Break(()),
            Expr::Function(f) => {
                if f.name.to_string().eq_ignore_ascii_case("count") {
                    counts_rows = true;
                }
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Continue(()),
        })
        .is_break();

        if references_column {
            return None;
        }
    }

    if !counts_rows {
        return None;
    }

    let TableFactor::Table { name, alias, .. } = &select.from.first()?.relation else {
        return None;
    };
    let table_name = name.0.last()?.value.clone();
    let qualifier = alias
        .as_ref()
        .map_or(table_name.clone(), |a| a.name.value.clone());

    let table = tables.iter().find(|t| t.name == table_name)?;
    let column = table.frame.get_column_names().first()?.to_string();

    let anchor = Parser::new(&GenericDialect {})
        .try_with_sql(&format!(
            "COUNT({}.{})",
            quote_identifier(&qualifier),
            quote_identifier(&column)
        ))
        .ok()?
        .parse_expr()
        .ok()?;

    select.projection.push(SelectItem::ExprWithAlias {
        expr: anchor,
        alias: Ident::new(ROW_COUNT_ANCHOR),
    });
    // A single aggregated row has nothing to order
    parsed.order_by = None;

    Some(statements[0].to_string())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
