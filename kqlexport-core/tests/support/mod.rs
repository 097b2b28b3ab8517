//! In-memory Kusto source shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kqlexport_core::{
    ConnectionConfig, ExportConfig, ExportError, KustoSource, ObjectKind, Result, ResultRow,
};
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Columns returned by `.show function`.
pub const FUNCTION_COLUMNS: [&str; 5] = ["Name", "Parameters", "Body", "Folder", "DocString"];

/// Scripted database: listings, per-object responses and injected failures.
#[derive(Debug, Default)]
pub struct InMemorySource {
    pub tables: Vec<String>,
    pub functions: Vec<String>,
    pub schemas: BTreeMap<String, Option<String>>,
    pub function_rows: BTreeMap<String, Option<ResultRow>>,
    pub failing_objects: BTreeSet<String>,
    pub listing_fails: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, schema: &str) -> Self {
        self.tables.push(name.to_string());
        self.schemas.insert(name.to_string(), Some(schema.to_string()));
        self
    }

    /// Adds a function whose row is an array aligned with [`FUNCTION_COLUMNS`].
    pub fn with_function(mut self, name: &str, values: Value) -> Self {
        self.functions.push(name.to_string());
        self.function_rows
            .insert(name.to_string(), Some(function_row(values)));
        self
    }

    /// Adds a function with a custom row shape.
    pub fn with_function_row(mut self, name: &str, row: Option<ResultRow>) -> Self {
        self.functions.push(name.to_string());
        self.function_rows.insert(name.to_string(), row);
        self
    }

    pub fn with_remote_failure(mut self, name: &str) -> Self {
        self.failing_objects.insert(name.to_string());
        self
    }

    pub fn with_failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    fn check(&self, command: &str, name: &str) -> Result<()> {
        if self.failing_objects.contains(name) {
            return Err(ExportError::malformed_response(command, "HTTP 500: simulated failure"));
        }
        Ok(())
    }
}

/// Builds a `.show function` row from positional values.
pub fn function_row(values: Value) -> ResultRow {
    ResultRow::new(
        FUNCTION_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        values,
    )
}

/// Row with `Name` and `Body` only, in function-column order.
pub fn simple_function(name: &str, body: &str) -> Value {
    json!([name, "", body, "", ""])
}

#[async_trait]
impl KustoSource for InMemorySource {
    async fn list_tables(&self) -> Result<Vec<String>> {
        if self.listing_fails {
            return Err(ExportError::malformed_response(".show tables", "HTTP 401: Unauthorized"));
        }
        Ok(self.tables.clone())
    }

    async fn list_functions(&self) -> Result<Vec<String>> {
        if self.listing_fails {
            return Err(ExportError::malformed_response(".show functions", "HTTP 401: Unauthorized"));
        }
        Ok(self.functions.clone())
    }

    async fn table_schema(&self, name: &str) -> Result<Option<String>> {
        self.check(".show table cslschema", name)?;
        Ok(self.schemas.get(name).cloned().flatten())
    }

    async fn function_row(&self, name: &str) -> Result<Option<ResultRow>> {
        self.check(".show function", name)?;
        Ok(self.function_rows.get(name).cloned().flatten())
    }
}

/// Export config writing into `dir`.
pub fn export_config(kind: ObjectKind, dir: &Path) -> ExportConfig {
    let connection = ConnectionConfig::new("https://help.kusto.windows.net", "Samples")
        .expect("valid connection config");
    ExportConfig::new(connection, kind).with_output_dir(dir.join(kind.default_output_dir()))
}

/// Sorted names of the files in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
