//! Core data models for exported schema objects.
//!
//! Everything here is transient: it is built from live management command
//! responses during one export run and only ever persisted as the final
//! `.kql` text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Object namespaces that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Exported as `.create table`
    Table,
    /// Exported as `.create-or-alter function`
    Function,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ObjectKind {
    /// Lowercase singular name, as used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::Function => "function",
        }
    }

    /// Capitalised singular name, as used in document headings.
    pub fn title(self) -> &'static str {
        match self {
            ObjectKind::Table => "Table",
            ObjectKind::Function => "Function",
        }
    }

    /// CLI subcommand that exports this kind.
    pub fn subcommand(self) -> &'static str {
        match self {
            ObjectKind::Table => "tables",
            ObjectKind::Function => "functions",
        }
    }

    /// Output directory used when none is given.
    pub fn default_output_dir(self) -> &'static str {
        match self {
            ObjectKind::Table => "table_schemas",
            ObjectKind::Function => "function_schemas",
        }
    }

    /// File name for an exported object of this kind.
    pub fn file_name(self, object_name: &str) -> String {
        format!("{object_name}.kql")
    }
}

/// Named view over one metadata row.
pub type FieldMap = BTreeMap<String, Value>;

/// A single row from a management command result.
///
/// `values` is kept as raw JSON because the row shape differs between
/// endpoints: some return an object keyed by column name, others an array
/// that only makes sense against `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Column names of the result table, in order.
    pub columns: Vec<String>,
    /// Raw row value, an object or an array.
    pub values: Value,
}

impl ResultRow {
    /// Creates a row from its column names and raw value.
    pub fn new(columns: Vec<String>, values: Value) -> Self {
        Self { columns, values }
    }
}

/// Metadata for one function as reported by `.show function`.
///
/// Empty strings are normalised to `None`, so an empty docstring behaves
/// exactly like a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Function name
    pub name: Option<String>,
    /// Body text, usually wrapped in one pair of braces
    pub body: Option<String>,
    /// Free-text description
    pub doc_string: Option<String>,
    /// Display folder
    pub folder: Option<String>,
    /// Parenthesized parameter list as reported by the service
    pub parameters: Option<String>,
}

impl FunctionMetadata {
    /// Builds metadata from a field map using the service's column names.
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            name: text_field(fields, "Name"),
            body: text_field(fields, "Body"),
            doc_string: text_field(fields, "DocString"),
            folder: text_field(fields, "Folder"),
            parameters: text_field(fields, "Parameters"),
        }
    }

    /// Returns the name and body when both are present.
    pub fn required(&self) -> Option<(&str, &str)> {
        Some((self.name.as_deref()?, self.body.as_deref()?))
    }

    /// Body length in characters, zero when absent.
    pub fn body_len(&self) -> usize {
        self.body.as_deref().map_or(0, |body| body.chars().count())
    }
}

fn text_field(fields: &FieldMap, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Running counters owned by an export driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTally {
    /// Objects written to disk.
    pub exported: usize,
    /// Objects skipped because of an error.
    pub failed: usize,
    /// Names of exported objects, in processing order.
    pub exported_names: Vec<String>,
}

impl ExportTally {
    /// Counts `name` as exported.
    pub fn record_success(&mut self, name: impl Into<String>) {
        self.exported += 1;
        self.exported_names.push(name.into());
    }

    /// Counts one skipped object.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => FieldMap::new(),
        }
    }

    #[test]
    fn test_object_kind_naming() {
        assert_eq!(ObjectKind::Table.to_string(), "table");
        assert_eq!(ObjectKind::Function.title(), "Function");
        assert_eq!(ObjectKind::Table.default_output_dir(), "table_schemas");
        assert_eq!(ObjectKind::Function.default_output_dir(), "function_schemas");
        assert_eq!(ObjectKind::Function.subcommand(), "functions");
        assert_eq!(ObjectKind::Table.file_name("StormEvents"), "StormEvents.kql");
    }

    #[test]
    fn test_function_metadata_from_fields() {
        let metadata = FunctionMetadata::from_fields(&fields(json!({
            "Name": "MyFunc",
            "Parameters": "(x:long)",
            "Body": "{ T | take x }",
            "Folder": "Demo",
            "DocString": ""
        })));

        assert_eq!(metadata.name.as_deref(), Some("MyFunc"));
        assert_eq!(metadata.parameters.as_deref(), Some("(x:long)"));
        assert_eq!(metadata.folder.as_deref(), Some("Demo"));
        assert!(metadata.doc_string.is_none());
        assert_eq!(metadata.required(), Some(("MyFunc", "{ T | take x }")));
    }

    #[test]
    fn test_function_metadata_missing_body() {
        let metadata = FunctionMetadata::from_fields(&fields(json!({
            "Name": "F2",
            "Body": null
        })));

        assert!(metadata.required().is_none());
        assert_eq!(metadata.body_len(), 0);
    }

    #[test]
    fn test_non_string_fields_are_rendered() {
        let metadata = FunctionMetadata::from_fields(&fields(json!({ "Name": 42 })));
        assert_eq!(metadata.name.as_deref(), Some("42"));
    }

    #[test]
    fn test_tally_counts() {
        let mut tally = ExportTally::default();
        tally.record_success("F1");
        tally.record_failure();

        assert_eq!(tally.exported, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.exported_names, vec!["F1".to_string()]);
    }
}
