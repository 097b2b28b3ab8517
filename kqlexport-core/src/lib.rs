//! Core reconstruction, validation and export pipeline for kqlexport.
//!
//! This crate turns live Kusto metadata into `.kql` files: one
//! `.create table` command per table, or one `.create-or-alter function`
//! command per function, plus a generated README for the output directory.
//!
//! # Guarantees
//! - Only `.show` management commands are sent to the cluster
//! - Access tokens are never logged, serialized or written to disk
//! - A function statement that fails validation is never written
//! - One object's failure never aborts the rest of the run
//!
//! # Architecture
//! - [`adapters`]: the [`KustoSource`] trait, the REST client, credentials
//!   and the named/positional field access adapters
//! - [`reconstruct`]: parameter recovery and statement assembly
//! - [`validation`]: structural checks on function statements
//! - [`export`]: the per-kind drivers, output writer, README and summary
//! - [`reporter`]: the narration capability injected into every stage

pub mod adapters;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reconstruct;
pub mod reporter;
pub mod validation;

// Re-export commonly used types
pub use adapters::{ConnectionConfig, CredentialSource, KustoRestClient, KustoSource, create_source};
pub use error::{ExportError, Result};
pub use export::{ExportConfig, ExportReport, exit_code_for, run_export};
pub use models::{FieldMap, FunctionMetadata, ObjectKind, ResultRow};
pub use reporter::{MemoryReporter, ReportLevel, Reporter, TracingReporter};
pub use validation::{ValidationFailure, validate_function_statement};
