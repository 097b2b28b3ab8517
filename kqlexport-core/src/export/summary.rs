//! End-of-run report and exit code.

use crate::models::ObjectKind;
use crate::reporter::Reporter;
use crate::Result;
use std::path::PathBuf;

/// Outcome of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Kind of object exported.
    pub kind: ObjectKind,
    /// Objects returned by the listing.
    pub total_found: usize,
    /// Objects written to disk.
    pub exported: usize,
    /// Objects skipped because of an error.
    pub failed: usize,
    /// Names of exported objects, in processing order.
    pub exported_names: Vec<String>,
    /// Directory the files were written to.
    pub output_dir: PathBuf,
}

impl ExportReport {
    /// `0` when at least one object was exported, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.exported == 0)
    }

    /// Prints the summary block through `reporter`.
    pub fn print_summary(&self, reporter: &dyn Reporter) {
        reporter.header("=== Export Summary ===");
        reporter.info(&format!("Total {}s found: {}", self.kind, self.total_found));
        reporter.success(&format!("Successfully exported: {}", self.exported));
        if self.failed > 0 {
            reporter.error(&format!("Failed to export: {}", self.failed));
        }
        reporter.info(&format!("Output directory: {}", self.output_dir.display()));

        if self.exported > 0 {
            reporter.header("Export completed successfully!");
        } else {
            reporter.error(&format!("No {}s were exported", self.kind));
        }
    }
}

/// Exit code for a finished run; every fatal error maps to `1`.
pub fn exit_code_for(result: &Result<ExportReport>) -> u8 {
    result.as_ref().map_or(1, ExportReport::exit_code)
}
