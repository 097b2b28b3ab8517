//! Output directory handling.

use crate::error::ExportError;
use crate::reporter::Reporter;
use crate::Result;
use std::path::{Path, PathBuf};

/// Directory that receives the `.kql` files and the README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Creates the directory (and parents) if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`ExportError::Io`] if the directory cannot be created.
    pub async fn create(path: impl Into<PathBuf>, reporter: &dyn Reporter) -> Result<Self> {
        let path = path.into();
        reporter.progress(&format!("Creating output directory: {}", path.display()));

        tokio::fs::create_dir_all(&path).await.map_err(|e| {
            ExportError::io(
                format!("Failed to create output directory {}", path.display()),
                e,
            )
        })?;

        reporter.success(&format!("Output directory ready: {}", path.display()));
        Ok(Self { path })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, used in the regeneration command.
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Writes one UTF-8 file into the directory, replacing any existing one.
    ///
    /// # Errors
    /// Returns [`ExportError::Io`] if the write fails.
    pub async fn write(
        &self,
        file_name: &str,
        content: &str,
        description: &str,
        reporter: &dyn Reporter,
    ) -> Result<PathBuf> {
        let file_path = self.path.join(file_name);
        reporter.progress(&format!("Writing {}: {}", description, file_name));

        tokio::fs::write(&file_path, content).await.map_err(|e| {
            ExportError::io(
                format!("Failed to write {} '{}'", description, file_name),
                e,
            )
        })?;

        reporter.success(&format!("Successfully exported: {}", file_name));
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{MemoryReporter, ReportLevel};

    #[tokio::test]
    async fn test_create_nested_and_write() {
        let temp = tempfile::tempdir().unwrap();
        let reporter = MemoryReporter::new();

        let output = OutputDirectory::create(temp.path().join("a").join("function_schemas"), &reporter)
            .await
            .unwrap();
        assert_eq!(output.base_name(), "function_schemas");

        let written = output
            .write("F1.kql", ".create-or-alter function F1() {\nprint 1\n}", "function F1", &reporter)
            .await
            .unwrap();

        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.starts_with(".create-or-alter function F1()"));
        assert!(reporter.contains(ReportLevel::Success, "Successfully exported: F1.kql"));
        assert!(reporter.contains(ReportLevel::Progress, "Writing function F1: F1.kql"));
    }

    #[tokio::test]
    async fn test_create_fails_over_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("taken");
        std::fs::write(&blocker, "not a directory").unwrap();
        let reporter = MemoryReporter::new();

        let error = OutputDirectory::create(blocker.join("schemas"), &reporter)
            .await
            .unwrap_err();
        assert!(matches!(error, ExportError::Io { .. }));
        assert_eq!(error.category(), "Write error");
    }
}
