//! Structural checks for reconstructed function statements.
//!
//! These are shape checks only. Braces are counted naively, so a `{` or `}`
//! inside a string literal or comment in the body still counts. A statement
//! that passes may still be rejected by the service.
//!
//! # Example
//! ```rust
//! use kqlexport_core::validation::validate_function_statement;
//!
//! let statement = ".create-or-alter function TopOne() {\nT | take 1\n}";
//! assert!(validate_function_statement(statement, "TopOne").is_ok());
//! ```

use crate::reconstruct::CREATE_OR_ALTER_FUNCTION;
use thiserror::Error;

/// Reason a reconstructed function statement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("KQL doesn't start with .create-or-alter function")]
    MissingCommandPrefix,

    #[error("Function name {name} not found in KQL")]
    NameNotFound { name: String },

    /// Opening and closing brace counts differ
    #[error("Unbalanced braces: {open} open, {close} close")]
    UnbalancedBraces { open: usize, close: usize },

    #[error("KQL doesn't end with closing brace")]
    MissingClosingBrace,
}

/// Checks a reconstructed statement, reporting the first failed rule.
///
/// Rules are applied in order: command prefix, presence of the name,
/// balanced brace counts, trailing closing brace.
///
/// # Errors
/// Returns the [`ValidationFailure`] for the first rule that does not hold.
pub fn validate_function_statement(
    statement: &str,
    name: &str,
) -> std::result::Result<(), ValidationFailure> {
    let trimmed = statement.trim();

    if !trimmed.starts_with(CREATE_OR_ALTER_FUNCTION) {
        return Err(ValidationFailure::MissingCommandPrefix);
    }

    if !statement.contains(name) {
        return Err(ValidationFailure::NameNotFound {
            name: name.to_string(),
        });
    }

    let open = statement.matches('{').count();
    let close = statement.matches('}').count();
    if open != close {
        return Err(ValidationFailure::UnbalancedBraces { open, close });
    }

    if !trimmed.ends_with('}') {
        return Err(ValidationFailure::MissingClosingBrace);
    }

    Ok(())
}
