//! Table and function export drivers.
//!
//! A run lists the objects of one kind, then processes them one at a time
//! in listing order: fetch, reconstruct, validate (functions only), write.
//! A failure on one object is logged and counted, and the run moves on.
//! Only directory creation and the listing itself can end a run early.
//!
//! # Module Structure
//! - `fetch`: function detail retrieval through the field access adapters
//! - `output`: output directory and file writes
//! - `readme`: README rendering
//! - `summary`: run report and exit code

use crate::adapters::{ConnectionConfig, KustoSource};
use crate::error::ExportError;
use crate::models::{ExportTally, FunctionMetadata, ObjectKind};
use crate::reconstruct::{build_function_statement, build_table_statement, file_header};
use crate::reporter::Reporter;
use crate::validation::validate_function_statement;
use crate::Result;
use std::path::PathBuf;

pub mod fetch;
pub mod output;
pub mod readme;
pub mod summary;

pub use fetch::fetch_function_details;
pub use output::OutputDirectory;
pub use readme::{ReadmeContext, ReadmeInput, write_readme};
pub use summary::{ExportReport, exit_code_for};

/// Timestamp format used in file headers and the README.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings for one export run.
///
/// # Example
/// ```rust
/// use kqlexport_core::adapters::ConnectionConfig;
/// use kqlexport_core::export::ExportConfig;
/// use kqlexport_core::models::ObjectKind;
///
/// let connection = ConnectionConfig::new("help", "Samples").unwrap();
/// let config = ExportConfig::new(connection, ObjectKind::Table);
/// assert_eq!(config.output_dir.to_str(), Some("table_schemas"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Cluster and database to read from.
    pub connection: ConnectionConfig,
    /// Which objects to export.
    pub kind: ObjectKind,
    /// Directory receiving the `.kql` files and the README.
    pub output_dir: PathBuf,
}

impl ExportConfig {
    /// Creates a config using the kind's default output directory.
    pub fn new(connection: ConnectionConfig, kind: ObjectKind) -> Self {
        Self {
            connection,
            kind,
            output_dir: PathBuf::from(kind.default_output_dir()),
        }
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Logs the effective configuration.
    pub fn log_configuration(&self, reporter: &dyn Reporter) {
        reporter.info(&format!("Cluster: {}", self.connection.display_cluster()));
        reporter.info(&format!("Database: {}", self.connection.database));
        reporter.info(&format!("Output directory: {}", self.output_dir.display()));
    }
}

/// Banner printed when an exporter starts.
pub fn banner(kind: ObjectKind) -> String {
    format!("=== Kusto {} Schema Exporter ===", kind.title())
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Runs the exporter for `config.kind` against `source`.
///
/// # Errors
/// Returns an error when the output directory cannot be created, the
/// listing fails, or the listing is empty. Per-object failures are counted
/// in the report instead.
pub async fn run_export(
    config: &ExportConfig,
    source: &dyn KustoSource,
    reporter: &dyn Reporter,
) -> Result<ExportReport> {
    match config.kind {
        ObjectKind::Table => export_tables(config, source, reporter).await,
        ObjectKind::Function => export_functions(config, source, reporter).await,
    }
}

/// Exports every table as `<Table>.kql` with a comment header.
///
/// # Errors
/// See [`run_export`].
pub async fn export_tables(
    config: &ExportConfig,
    source: &dyn KustoSource,
    reporter: &dyn Reporter,
) -> Result<ExportReport> {
    let kind = ObjectKind::Table;
    let output = OutputDirectory::create(&config.output_dir, reporter).await?;

    reporter.progress("Fetching table list from database...");
    let tables = list_objects(kind, source.list_tables().await, config, reporter)?;

    reporter.header("Processing tables...");
    let mut tally = ExportTally::default();
    let mut failed_names = Vec::new();
    let total = tables.len();

    for (index, table) in tables.iter().enumerate() {
        reporter.progress(&format!("Processing table {}/{}: {}", index + 1, total, table));

        match export_table(table, source, &output, reporter).await {
            Ok(()) => tally.record_success(table.as_str()),
            Err(e) => {
                report_object_failure(kind, table, &e, reporter);
                tally.record_failure();
                failed_names.push(table.as_str());
            }
        }
    }

    if !failed_names.is_empty() {
        reporter.warning(&format!(
            "Failed to process {} tables: {}",
            failed_names.len(),
            failed_names.join(", ")
        ));
    }
    reporter.success(&format!(
        "Successfully processed {} out of {} tables",
        tally.exported, total
    ));

    finish(kind, config, &output, total, tally, reporter).await
}

async fn export_table(
    table: &str,
    source: &dyn KustoSource,
    output: &OutputDirectory,
    reporter: &dyn Reporter,
) -> Result<()> {
    let schema = source
        .table_schema(table)
        .await?
        .ok_or_else(|| ExportError::not_found(ObjectKind::Table, table))?;

    let statement = build_table_statement(table, &schema)?;
    reporter.success(&format!("Successfully processed table '{}'", table));

    let content = format!("{}{}", file_header(table, &timestamp_now()), statement);
    output
        .write(
            &ObjectKind::Table.file_name(table),
            &content,
            &format!("table {}", table),
            reporter,
        )
        .await?;
    Ok(())
}

/// Exports every function as `<Function>.kql` after validation.
///
/// # Errors
/// See [`run_export`].
pub async fn export_functions(
    config: &ExportConfig,
    source: &dyn KustoSource,
    reporter: &dyn Reporter,
) -> Result<ExportReport> {
    let kind = ObjectKind::Function;
    let output = OutputDirectory::create(&config.output_dir, reporter).await?;

    reporter.progress("Fetching function list from database...");
    let functions = list_objects(kind, source.list_functions().await, config, reporter)?;
    reporter.info(&format!("Functions to export: {}", functions.join(", ")));

    reporter.header("Processing functions...");
    let mut tally = ExportTally::default();
    let total = functions.len();

    for (index, function) in functions.iter().enumerate() {
        reporter.progress(&format!(
            "Processing function {}/{}: {}",
            index + 1,
            total,
            function
        ));

        match export_function(function, source, &output, reporter).await {
            Ok(name) => tally.record_success(name),
            Err(e) => {
                report_object_failure(kind, function, &e, reporter);
                tally.record_failure();
            }
        }
    }

    finish(kind, config, &output, total, tally, reporter).await
}

/// Processes one function and returns the name it was written under.
async fn export_function(
    function: &str,
    source: &dyn KustoSource,
    output: &OutputDirectory,
    reporter: &dyn Reporter,
) -> Result<String> {
    let fields = fetch_function_details(source, function, reporter)
        .await?
        .ok_or_else(|| ExportError::not_found(ObjectKind::Function, function))?;

    let metadata = FunctionMetadata::from_fields(&fields);
    reporter.detail(&format!(
        "Function name: {}",
        metadata.name.as_deref().unwrap_or("<missing>")
    ));
    reporter.detail(&format!("Body length: {} characters", metadata.body_len()));

    let Some((name, _)) = metadata.required() else {
        return Err(ExportError::missing_data(function));
    };
    let name = name.to_string();

    let statement = build_function_statement(&metadata, reporter)?;
    validate_function_statement(&statement, &name).map_err(|reason| ExportError::Validation {
        name: name.clone(),
        reason,
    })?;

    output
        .write(
            &ObjectKind::Function.file_name(&name),
            &statement,
            &format!("function {}", name),
            reporter,
        )
        .await?;
    Ok(name)
}

fn list_objects(
    kind: ObjectKind,
    listing: Result<Vec<String>>,
    config: &ExportConfig,
    reporter: &dyn Reporter,
) -> Result<Vec<String>> {
    let names = listing.inspect_err(|e| {
        reporter.error(&format!("Failed to fetch {} list: {}", kind, e));
    })?;

    if names.is_empty() {
        reporter.warning(&format!("No {}s found in database", kind));
        return Err(ExportError::NothingToExport { kind });
    }

    reporter.success(&format!(
        "Found {} {}s in database '{}'",
        names.len(),
        kind,
        config.connection.database
    ));
    Ok(names)
}

fn report_object_failure(kind: ObjectKind, name: &str, error: &ExportError, reporter: &dyn Reporter) {
    match error {
        ExportError::MissingData { .. } if kind == ObjectKind::Table => {
            reporter.warning(&format!("Table '{}' has empty schema definition", name));
        }
        ExportError::MissingData { .. } => {
            reporter.warning(&format!("Missing required data for {} {}", kind, name));
        }
        ExportError::NotFound { .. } => reporter.warning(&error.to_string()),
        ExportError::Validation { .. } => reporter.error(&error.to_string()),
        _ => reporter.error(&format!(
            "{} processing {} '{}': {}",
            error.category(),
            kind,
            name,
            error
        )),
    }
}

async fn finish(
    kind: ObjectKind,
    config: &ExportConfig,
    output: &OutputDirectory,
    total_found: usize,
    tally: ExportTally,
    reporter: &dyn Reporter,
) -> Result<ExportReport> {
    reporter.progress("Generating README.md...");
    let generated_at = timestamp_now();
    let cluster = config.connection.display_cluster();
    let output_dir_name = output.base_name();
    let readme = ReadmeInput {
        kind,
        cluster: &cluster,
        database: &config.connection.database,
        output_dir_name: &output_dir_name,
        generated_at: &generated_at,
        exported_count: tally.exported,
        failed_count: tally.failed,
        exported_names: &tally.exported_names,
    };
    match write_readme(output, &readme, reporter).await {
        Ok(()) => reporter.success("Generated README.md in output directory"),
        Err(e) => reporter.error(&format!("Failed to generate README.md: {}", e)),
    }

    Ok(ExportReport {
        kind,
        total_found,
        exported: tally.exported,
        failed: tally.failed,
        exported_names: tally.exported_names,
        output_dir: output.path().to_path_buf(),
    })
}
