//! Rebuilding creation commands from live metadata.
//!
//! # Module Structure
//! - `parameters`: parameter list recovery and normalization
//! - `function`: `.create-or-alter function` statements
//! - `table`: `.create table` statements and file headers

mod function;
mod parameters;
mod table;

pub use function::{
    CREATE_OR_ALTER_FUNCTION, body_interior, build_function_statement, escape_docstring,
    with_clause,
};
pub use parameters::{
    extract_signature_from_body, normalize_parameters, parse_parameters_field,
    reconstruct_parameters,
};
pub use table::{build_table_statement, file_header, format_schema_definition};
