//! README generation for an output directory.

use super::output::OutputDirectory;
use crate::models::ObjectKind;
use crate::reporter::Reporter;
use crate::Result;
use askama::Template;

/// File name of the generated index document.
pub const README_FILE_NAME: &str = "README.md";

/// Name of the executable shown in the regeneration command.
pub const GENERATOR_NAME: &str = "kql-export";

const TABLE_USAGE_EXAMPLE: &str = "// Execute the content of any .kql file to create the table
.create table MyTable (
    Column1: string,
    Column2: datetime,
    Column3: real
)";

const FUNCTION_USAGE_EXAMPLE: &str = "// Execute the content of any .kql file to create/update the function
.create-or-alter function MyFunction(param1: string, param2: int) {
    // Function body here
    MyTable
    | where Column1 == param1
    | take param2
}";

const FUNCTION_METADATA_SECTION: &str = "The exported functions include:
- Function parameters with types and default values
- Documentation strings (docstring)
- Folder organization information
- Complete function body";

/// One line of the exported objects list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeEntry {
    /// Exported file name, e.g. `Events.kql`
    pub file_name: String,
    /// Short description of the command in the file
    pub description: String,
}

/// Extra titled section rendered after the usage block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeSection {
    /// Heading text without the `##` prefix
    pub title: String,
    /// Markdown body
    pub body: String,
}

/// Values rendered into `templates/readme.md`.
#[derive(Debug, Clone, Template)]
#[template(path = "readme.md", escape = "none")]
pub struct ReadmeContext {
    /// Capitalised kind, used in headings
    pub kind_title: &'static str,
    /// Lowercase kind, used in sentences
    pub kind: &'static str,
    /// Run timestamp in [`TIMESTAMP_FORMAT`](super::TIMESTAMP_FORMAT)
    pub generated_at: String,
    /// Redacted cluster URL
    pub cluster: String,
    /// Source database
    pub database: String,
    /// Command name shown as the generator
    pub generator: String,
    /// Objects exported
    pub exported_count: usize,
    /// Objects skipped; the line is omitted when zero
    pub failed_count: usize,
    /// Number of `.kql` files listed
    pub total_files: usize,
    /// Sentence introducing the file list
    pub entries_intro: String,
    /// File list, sorted by object name
    pub entries: Vec<ReadmeEntry>,
    /// Sentence introducing the usage example
    pub usage_intro: String,
    /// Usage example block
    pub usage_example: &'static str,
    /// Kind-specific extra sections
    pub sections: Vec<ReadmeSection>,
    /// Command line that reproduces this export
    pub regenerate_command: String,
}

/// Inputs describing one finished export run.
#[derive(Debug, Clone)]
pub struct ReadmeInput<'a> {
    /// Kind of object exported
    pub kind: ObjectKind,
    /// Redacted cluster URL
    pub cluster: &'a str,
    /// Source database
    pub database: &'a str,
    /// Last component of the output directory
    pub output_dir_name: &'a str,
    /// Run timestamp
    pub generated_at: &'a str,
    /// Objects exported
    pub exported_count: usize,
    /// Objects skipped
    pub failed_count: usize,
    /// Names of exported objects, in any order
    pub exported_names: &'a [String],
}

impl ReadmeContext {
    /// Builds the context for `input`, sorting the exported names.
    pub fn new(input: &ReadmeInput<'_>) -> Self {
        let kind = input.kind;
        let mut names: Vec<&String> = input.exported_names.iter().collect();
        names.sort();

        let entries = names
            .into_iter()
            .map(|name| ReadmeEntry {
                file_name: kind.file_name(name),
                description: entry_description(kind, name),
            })
            .collect();

        let (usage_intro, usage_example, sections) = match kind {
            ObjectKind::Table => (
                "Each `.kql` file contains a complete CREATE TABLE command that can be executed in Kusto/Azure Data Explorer to recreate the table structure.",
                TABLE_USAGE_EXAMPLE,
                Vec::new(),
            ),
            ObjectKind::Function => (
                "Each `.kql` file contains a complete `.create-or-alter function` command that can be executed in Kusto/Azure Data Explorer to recreate the function.",
                FUNCTION_USAGE_EXAMPLE,
                vec![ReadmeSection {
                    title: "Function Metadata".to_string(),
                    body: FUNCTION_METADATA_SECTION.to_string(),
                }],
            ),
        };

        Self {
            kind_title: kind.title(),
            kind: kind.as_str(),
            generated_at: input.generated_at.to_string(),
            cluster: input.cluster.to_string(),
            database: input.database.to_string(),
            generator: format!("{} {}", GENERATOR_NAME, kind.subcommand()),
            exported_count: input.exported_count,
            failed_count: input.failed_count,
            total_files: input.exported_count + 1,
            entries_intro: format!(
                "The following {} CREATE commands were successfully exported:",
                kind
            ),
            entries,
            usage_intro: usage_intro.to_string(),
            usage_example,
            sections,
            regenerate_command: format!(
                "{} {} -c \"{}\" -d \"{}\" -o \"{}\"",
                GENERATOR_NAME,
                kind.subcommand(),
                input.cluster,
                input.database,
                input.output_dir_name
            ),
        }
    }

    /// Renders the README text, always ending with a newline.
    ///
    /// # Errors
    /// Returns [`ExportError::Template`](crate::error::ExportError::Template)
    /// if rendering fails.
    pub fn render_text(&self) -> Result<String> {
        let mut text = self.render()?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

fn entry_description(kind: ObjectKind, name: &str) -> String {
    match kind {
        ObjectKind::Table => format!("CREATE TABLE command for `{}`", name),
        ObjectKind::Function => format!("CREATE-OR-ALTER FUNCTION command for `{}()`", name),
    }
}

/// Renders and writes `README.md` into `output`.
///
/// # Errors
/// Returns a template or I/O error; callers treat either as non-fatal.
pub async fn write_readme(
    output: &OutputDirectory,
    input: &ReadmeInput<'_>,
    reporter: &dyn Reporter,
) -> Result<()> {
    let text = ReadmeContext::new(input).render_text()?;
    output
        .write(README_FILE_NAME, &text, "README", reporter)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn render(kind: ObjectKind, exported: &[String], failed: usize) -> String {
        ReadmeContext::new(&ReadmeInput {
            kind,
            cluster: "https://help.kusto.windows.net",
            database: "Samples",
            output_dir_name: kind.default_output_dir(),
            generated_at: "2026-03-04 05:06:07",
            exported_count: exported.len(),
            failed_count: failed,
            exported_names: exported,
        })
        .render_text()
        .unwrap()
    }

    #[test]
    fn test_table_readme_layout() {
        let text = render(ObjectKind::Table, &names(&["Zeta", "Alpha"]), 0);

        assert!(text.starts_with("# Auto-Generated KQL Table Schemas\n\n⚠️ **WARNING:"));
        assert!(text.contains("- **Generated on:** 2026-03-04 05:06:07\n"));
        assert!(text.contains("- **Source Cluster:** https://help.kusto.windows.net\n"));
        assert!(text.contains("- **Source Database:** Samples\n"));
        assert!(text.contains(
            "- **Total tables exported:** 2\n- **Total files generated:** 3 (including this README)\n\n## Exported Tables\n\n"
        ));
        assert!(!text.contains("Failed exports"));
        assert!(text.contains(
            "- `Alpha.kql` - CREATE TABLE command for `Alpha`\n- `Zeta.kql` - CREATE TABLE command for `Zeta`\n\n## Usage\n\n"
        ));
        assert!(text.contains(".create table MyTable (\n    Column1: string,"));
        assert!(!text.contains("## Function Metadata"));
        assert!(text.contains(
            "```\n\n## Regeneration\n\nTo regenerate these files with updated table definitions, run:\n```bash\nkql-export tables -c \"https://help.kusto.windows.net\" -d \"Samples\" -o \"table_schemas\"\n```\n"
        ));
        assert!(text.ends_with("```\n"));
    }

    #[test]
    fn test_function_readme_sections() {
        let text = render(ObjectKind::Function, &names(&["F1"]), 1);

        assert!(text.starts_with("# Auto-Generated KQL Function Schemas\n"));
        assert!(text.contains("- **Total functions exported:** 1\n- **Failed exports:** 1\n- **Total files generated:** 2"));
        assert!(text.contains("The following function CREATE commands were successfully exported:"));
        assert!(text.contains("- `F1.kql` - CREATE-OR-ALTER FUNCTION command for `F1()`\n"));
        assert!(text.contains("```\n\n## Function Metadata\n\nThe exported functions include:\n"));
        assert!(text.contains("- Complete function body\n\n## Regeneration"));
        assert!(text.contains("kql-export functions -c"));
    }

    #[test]
    fn test_readme_without_exports() {
        let text = render(ObjectKind::Table, &[], 2);

        assert!(!text.contains("## Exported Tables"));
        assert!(text.contains("(including this README)\n\n## Usage\n"));
    }
}
