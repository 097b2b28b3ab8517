//! Named and positional views over a metadata row.
//!
//! Management command rows arrive in one of two shapes. Some already carry
//! their column names (a JSON object, or an array that lines up one-to-one
//! with a unique column list); others are bare arrays that only make sense
//! when zipped against the separately reported columns. Each shape has its
//! own [`FieldAccess`] adapter and callers try them in a fixed order.

use crate::models::{FieldMap, ResultRow};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Why a row could not be viewed through a particular adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    #[error("row is a {found}, expected {expected}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("row has {values} values but {columns} columns")]
    LengthMismatch { values: usize, columns: usize },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("row has no fields")]
    Empty,
}

/// Capability for turning a result row into a name → value map.
pub trait FieldAccess: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    /// Builds the field map for `row`.
    ///
    /// # Errors
    /// Returns [`FieldAccessError`] when the row does not have the shape
    /// this adapter understands.
    fn fields(&self, row: &ResultRow) -> Result<FieldMap, FieldAccessError>;
}

/// Reads rows that already expose their field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedFieldAccess;

impl FieldAccess for NamedFieldAccess {
    fn name(&self) -> &'static str {
        "named"
    }

    fn fields(&self, row: &ResultRow) -> Result<FieldMap, FieldAccessError> {
        let fields: FieldMap = match &row.values {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            Value::Array(values) => {
                if values.len() != row.columns.len() {
                    return Err(FieldAccessError::LengthMismatch {
                        values: values.len(),
                        columns: row.columns.len(),
                    });
                }

                let mut seen = HashSet::new();
                for column in &row.columns {
                    if !seen.insert(column.as_str()) {
                        return Err(FieldAccessError::DuplicateColumn(column.clone()));
                    }
                }

                row.columns
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect()
            }
            other => {
                return Err(FieldAccessError::UnexpectedShape {
                    expected: "object or array",
                    found: json_kind(other),
                });
            }
        };

        if fields.is_empty() {
            return Err(FieldAccessError::Empty);
        }
        Ok(fields)
    }
}

/// Binds array values to columns by index.
///
/// Extra values or extra columns are ignored; a later duplicate column
/// name overwrites an earlier one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalFieldAccess;

impl FieldAccess for PositionalFieldAccess {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn fields(&self, row: &ResultRow) -> Result<FieldMap, FieldAccessError> {
        let Value::Array(values) = &row.values else {
            return Err(FieldAccessError::UnexpectedShape {
                expected: "array",
                found: json_kind(&row.values),
            });
        };

        let fields: FieldMap = row
            .columns
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect();

        if fields.is_empty() {
            return Err(FieldAccessError::Empty);
        }
        Ok(fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn test_named_access_on_object_row() {
        let row = ResultRow::new(Vec::new(), json!({ "Name": "F1", "Body": "{ print 1 }" }));
        let fields = NamedFieldAccess.fields(&row).unwrap();

        assert_eq!(fields.get("Name"), Some(&json!("F1")));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_named_access_on_aligned_array() {
        let row = ResultRow::new(columns(&["Name", "Body"]), json!(["F1", "{ print 1 }"]));
        let fields = NamedFieldAccess.fields(&row).unwrap();

        assert_eq!(fields.get("Body"), Some(&json!("{ print 1 }")));
    }

    #[test]
    fn test_named_access_rejects_misaligned_array() {
        let row = ResultRow::new(columns(&["Name", "Body", "Folder"]), json!(["F1", "{ print 1 }"]));

        assert_eq!(
            NamedFieldAccess.fields(&row),
            Err(FieldAccessError::LengthMismatch {
                values: 2,
                columns: 3
            })
        );
    }

    #[test]
    fn test_named_access_rejects_duplicate_columns() {
        let row = ResultRow::new(columns(&["Name", "Name"]), json!(["a", "b"]));

        assert_eq!(
            NamedFieldAccess.fields(&row),
            Err(FieldAccessError::DuplicateColumn("Name".to_string()))
        );
    }

    #[test]
    fn test_positional_access_zips_shorter_side() {
        let row = ResultRow::new(columns(&["Name", "Body", "Folder"]), json!(["F1", "{ print 1 }"]));
        let fields = PositionalFieldAccess.fields(&row).unwrap();

        assert_eq!(fields.get("Name"), Some(&json!("F1")));
        assert_eq!(fields.get("Body"), Some(&json!("{ print 1 }")));
        assert!(!fields.contains_key("Folder"));
    }

    #[test]
    fn test_positional_access_rejects_objects() {
        let row = ResultRow::new(columns(&["Name"]), json!({ "Name": "F1" }));

        assert_eq!(
            PositionalFieldAccess.fields(&row),
            Err(FieldAccessError::UnexpectedShape {
                expected: "array",
                found: "object"
            })
        );
    }

    #[test]
    fn test_both_reject_scalars_and_empty_rows() {
        let scalar = ResultRow::new(columns(&["Name"]), json!("F1"));
        assert!(NamedFieldAccess.fields(&scalar).is_err());
        assert!(PositionalFieldAccess.fields(&scalar).is_err());

        let empty = ResultRow::new(Vec::new(), json!([]));
        assert_eq!(NamedFieldAccess.fields(&empty), Err(FieldAccessError::Empty));
        assert_eq!(PositionalFieldAccess.fields(&empty), Err(FieldAccessError::Empty));
    }
}
