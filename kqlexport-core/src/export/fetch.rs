//! Function detail retrieval.

use crate::adapters::{FieldAccess, KustoSource, NamedFieldAccess, PositionalFieldAccess};
use crate::models::{FieldMap, ResultRow};
use crate::reporter::Reporter;
use crate::Result;

/// Field access adapters in the order they are tried.
pub const DEFAULT_FIELD_ACCESS: [&dyn FieldAccess; 2] = [&NamedFieldAccess, &PositionalFieldAccess];

/// Fetches the metadata row for one function as a field map.
///
/// `Ok(None)` means the service returned no row, or no adapter could read
/// the row; both cases are logged here.
///
/// # Errors
/// Remote errors from the detail query are returned unchanged.
pub async fn fetch_function_details(
    source: &dyn KustoSource,
    name: &str,
    reporter: &dyn Reporter,
) -> Result<Option<FieldMap>> {
    reporter.detail(&format!("Fetching details for function: {}", name));

    let Some(row) = source.function_row(name).await? else {
        reporter.warning(&format!("No results returned for function {}", name));
        return Ok(None);
    };

    Ok(extract_fields(&row, name, &DEFAULT_FIELD_ACCESS, reporter))
}

/// Reads `row` with the first adapter that accepts it.
///
/// Failures of all but the last adapter are warnings; failure of the last
/// one is an error.
pub fn extract_fields(
    row: &ResultRow,
    name: &str,
    adapters: &[&dyn FieldAccess],
    reporter: &dyn Reporter,
) -> Option<FieldMap> {
    for (index, adapter) in adapters.iter().enumerate() {
        match adapter.fields(row) {
            Ok(fields) => {
                let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                reporter.detail(&format!(
                    "Read {} using {} access with keys: {}",
                    name,
                    adapter.name(),
                    keys.join(", ")
                ));
                return Some(fields);
            }
            Err(e) if index + 1 < adapters.len() => {
                reporter.warning(&format!("{} access failed for {}: {}", adapter.name(), name, e));
            }
            Err(e) => {
                reporter.error(&format!("{} access failed for {}: {}", adapter.name(), name, e));
            }
        }
    }

    reporter.error(&format!("All methods failed for {}", name));
    None
}
