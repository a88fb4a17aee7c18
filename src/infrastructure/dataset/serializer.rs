//! Renders a dataset as the table block embedded in prompts

use polars::prelude::DataFrame;

use super::codec::write_csv;
use crate::domain::{DomainError, SemanticLayerSchema};

/// Number of sample rows included in a serialized table
pub const SAMPLE_ROWS: usize = 5;

/// Maximum characters kept per sample line
const MAX_LINE_CHARS: usize = 200;

/// Serialize a frame as:
///
/// ```text
/// <table dialect="duckdb" table_name="orders" dimensions="120x4">
/// id,price,...
/// ...
/// </table>
/// ```
pub fn serialize_table(
    schema: &SemanticLayerSchema,
    frame: &DataFrame,
    dialect: &str,
) -> Result<String, DomainError> {
    let mut out = format!("<table dialect=\"{}\" table_name=\"{}\"", dialect, schema.name);

    if let Some(description) = &schema.description {
        out.push_str(&format!(" description=\"{}\"", description.replace('"', "'")));
    }

    out.push_str(&format!(" dimensions=\"{}x{}\">\n", frame.height(), frame.width()));

    let sample = write_csv(&frame.head(Some(SAMPLE_ROWS)))?;
    for line in sample.lines() {
        if line.chars().count() > MAX_LINE_CHARS {
            out.extend(line.chars().take(MAX_LINE_CHARS));
            out.push_str("...");
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    out.push_str("</table>\n");
    Ok(out)
}
