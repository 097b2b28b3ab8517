//! `.create-or-alter function` statement assembly.

use super::parameters::reconstruct_parameters;
use crate::error::ExportError;
use crate::models::FunctionMetadata;
use crate::reporter::Reporter;
use crate::Result;

/// Command prefix every reconstructed function statement starts with.
pub const CREATE_OR_ALTER_FUNCTION: &str = ".create-or-alter function";

const DOCSTRING_PREVIEW_CHARS: usize = 100;

/// Escapes a docstring for use inside a double-quoted `with` property.
///
/// Quotes are backslash-escaped, newlines become the two-character `\n`
/// sequence and carriage returns are dropped.
///
/// ```rust
/// use kqlexport_core::reconstruct::escape_docstring;
///
/// assert_eq!(escape_docstring("Finds \"x\"\ny"), "Finds \\\"x\\\"\\ny");
/// ```
pub fn escape_docstring(doc_string: &str) -> String {
    doc_string
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Builds the optional ` with (...)` clause.
pub fn with_clause(doc_string: Option<&str>, folder: Option<&str>) -> Option<String> {
    let mut properties = Vec::new();
    if let Some(doc_string) = doc_string.filter(|d| !d.is_empty()) {
        properties.push(format!("docstring = \"{}\"", escape_docstring(doc_string)));
    }
    if let Some(folder) = folder.filter(|f| !f.is_empty()) {
        properties.push(format!("folder = \"{}\"", folder));
    }

    if properties.is_empty() {
        None
    } else {
        Some(format!(" with ({})", properties.join(",")))
    }
}

/// Returns the body text that goes between the rebuilt braces.
///
/// A body that is already wrapped in `{ ... }` loses exactly that outer
/// pair; anything else is used as-is after trimming.
pub fn body_interior(body: &str) -> &str {
    let trimmed = body.trim();
    trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .map_or(trimmed, str::trim)
}

/// Assembles the full creation statement for a function.
///
/// # Errors
/// Returns [`ExportError::MissingData`] when the name or body is absent.
pub fn build_function_statement(
    metadata: &FunctionMetadata,
    reporter: &dyn Reporter,
) -> Result<String> {
    let (name, body) = metadata.required().ok_or_else(|| {
        ExportError::missing_data(metadata.name.as_deref().unwrap_or("<unnamed function>"))
    })?;

    let parameters = reconstruct_parameters(metadata.parameters.as_deref(), body, name, reporter);

    if let Some(doc_string) = metadata.doc_string.as_deref() {
        let preview: String = doc_string.chars().take(DOCSTRING_PREVIEW_CHARS).collect();
        let ellipsis = if doc_string.chars().count() > DOCSTRING_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        reporter.detail(&format!("DocString: {}{}", preview, ellipsis));
    }
    if let Some(folder) = metadata.folder.as_deref() {
        reporter.detail(&format!("Folder: {}", folder));
    }
    reporter.detail(&format!("Final parameters: {}", parameters));

    let mut statement = String::from(CREATE_OR_ALTER_FUNCTION);
    if let Some(clause) =
        with_clause(metadata.doc_string.as_deref(), metadata.folder.as_deref())
    {
        statement.push_str(&clause);
    }
    statement.push_str(&format!(" {}({}) {{\n", name, parameters));
    statement.push_str(body_interior(body));
    statement.push_str("\n}");

    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{MemoryReporter, ReportLevel};

    fn metadata(name: &str, body: &str) -> FunctionMetadata {
        FunctionMetadata {
            name: Some(name.to_string()),
            body: Some(body.to_string()),
            ..FunctionMetadata::default()
        }
    }

    #[test]
    fn test_escape_docstring() {
        assert_eq!(escape_docstring("Finds \"x\"\ny"), r#"Finds \"x\"\ny"#);
        assert_eq!(escape_docstring("line one\r\nline two"), r"line one\nline two");
    }

    #[test]
    fn test_with_clause_ordering() {
        assert_eq!(with_clause(None, None), None);
        assert_eq!(
            with_clause(Some("Doc"), Some("Reports")),
            Some(r#" with (docstring = "Doc",folder = "Reports")"#.to_string())
        );
        assert_eq!(
            with_clause(None, Some("Reports")),
            Some(r#" with (folder = "Reports")"#.to_string())
        );
    }

    #[test]
    fn test_body_interior_strips_one_pair() {
        assert_eq!(body_interior("{ T | take 1 }"), "T | take 1");
        assert_eq!(body_interior("  {\n  T | take 1\n}\n"), "T | take 1");
        assert_eq!(body_interior("{{ inner }}"), "{ inner }");
        assert_eq!(body_interior("T | take 1"), "T | take 1");
        assert_eq!(body_interior("{"), "{");
        assert_eq!(body_interior("{}"), "");
    }

    #[test]
    fn test_build_statement_with_braced_body() {
        let reporter = MemoryReporter::new();
        let mut meta = metadata("TopOne", "{ T | take 1 }");
        meta.parameters = Some("()".to_string());

        let statement = build_function_statement(&meta, &reporter).unwrap();
        assert_eq!(statement, ".create-or-alter function TopOne() {\nT | take 1\n}");
    }

    #[test]
    fn test_build_statement_with_metadata() {
        let reporter = MemoryReporter::new();
        let meta = FunctionMetadata {
            name: Some("Find".to_string()),
            body: Some("{\n    T | where Name == name\n}".to_string()),
            doc_string: Some("Finds \"x\"\ny".to_string()),
            folder: Some("Search".to_string()),
            parameters: Some("(name:string)".to_string()),
        };

        let statement = build_function_statement(&meta, &reporter).unwrap();
        assert_eq!(
            statement,
            ".create-or-alter function with (docstring = \"Finds \\\"x\\\"\\ny\",folder = \"Search\") Find(name:string) {\nT | where Name == name\n}"
        );
        assert_eq!(statement.lines().count(), 3);
        assert!(reporter.contains(ReportLevel::Detail, "Folder: Search"));
        assert!(reporter.contains(ReportLevel::Detail, "Final parameters: name:string"));
    }

    #[test]
    fn test_build_statement_extracts_parameters_from_body() {
        let reporter = MemoryReporter::new();
        let meta = metadata("Scale", "Scale(x: real, factor: real) { x * factor }");

        let statement = build_function_statement(&meta, &reporter).unwrap();
        assert!(statement.starts_with(".create-or-alter function Scale(x: real,factor: real) {\n"));
        assert!(statement.ends_with("\n}"));
    }

    #[test]
    fn test_build_statement_missing_body() {
        let reporter = MemoryReporter::new();
        let meta = FunctionMetadata {
            name: Some("F2".to_string()),
            ..FunctionMetadata::default()
        };

        let error = build_function_statement(&meta, &reporter).unwrap_err();
        assert!(matches!(error, ExportError::MissingData { ref name } if name == "F2"));
    }

    #[test]
    fn test_long_docstring_is_previewed() {
        let reporter = MemoryReporter::new();
        let mut meta = metadata("F", "{ print 1 }");
        meta.doc_string = Some("d".repeat(150));

        build_function_statement(&meta, &reporter).unwrap();
        let expected = format!("DocString: {}...", "d".repeat(100));
        assert!(reporter.messages(ReportLevel::Detail).contains(&expected));
    }
}
