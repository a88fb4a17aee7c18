//! Prompt templates for query generation

use super::AgentTable;

/// System prompt describing the available tables and the answer contract
pub fn generate_query_prompt(tables: &[AgentTable]) -> String {
    let mut prompt = String::from("<tables>\n");

    for table in tables {
        prompt.push_str(&table.serialized);
        prompt.push('\n');
    }

    prompt.push_str("</tables>\n\n");
    prompt.push_str(
        "You are a data analyst. Answer the user's questions about the tables above by \
         writing exactly one SQL query.\n\
         - Refer to tables by their table_name.\n\
         - Only read data: use a single SELECT or WITH statement.\n\
         - Return a single value when the question asks for one, otherwise return the rows \
         that answer it.\n\
         - Reply with the query inside a ```sql fenced block and nothing else.",
    );

    prompt
}

/// Follow-up message asking the model to repair a failed query
pub fn correct_error_prompt(query: &str, error: &str) -> String {
    format!(
        "The query you wrote failed.\n\n```sql\n{}\n```\n\nError:\n{}\n\n\
         Fix the query so it answers the last question. \
         Reply with the corrected query inside a ```sql fenced block.",
        query, error
    )
}
