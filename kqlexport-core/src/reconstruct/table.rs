//! `.create table` statement assembly.

use crate::error::ExportError;
use crate::Result;
use regex::Regex;
use std::sync::OnceLock;

fn column_type_pair() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\w+):(\w+)").expect("Invalid column pattern"))
}

/// Normalizes a `cslschema` string into a parenthesized column list.
///
/// Output for a plain `name:type` list is a fixed point: feeding it back
/// in changes nothing. Chained pairs such as `a:b:c` are not, since each
/// pass only spaces every other colon.
///
/// ```rust
/// use kqlexport_core::reconstruct::format_schema_definition;
///
/// assert_eq!(
///     format_schema_definition("Id:long, Name:string"),
///     "(Id: long, Name: string)"
/// );
/// ```
pub fn format_schema_definition(schema: &str) -> String {
    let trimmed = schema.trim();
    let wrapped = if trimmed.starts_with('(') {
        trimmed.to_string()
    } else {
        format!("({})", trimmed)
    };

    column_type_pair()
        .replace_all(&wrapped, "${1}: ${2}")
        .into_owned()
}

/// Builds the `.create table` command for one table.
///
/// # Errors
/// Returns [`ExportError::MissingData`] when the schema text is blank.
pub fn build_table_statement(name: &str, schema: &str) -> Result<String> {
    if schema.trim().is_empty() {
        return Err(ExportError::missing_data(name));
    }

    Ok(format!(
        ".create table {} {}",
        name,
        format_schema_definition(schema)
    ))
}

/// Comment header written above an exported table command.
pub fn file_header(name: &str, generated_at: &str) -> String {
    format!(
        "// CREATE TABLE command for {}\n// Generated on {}\n\n",
        name, generated_at
    )
}
