//! Command-line surface for kqlexport.
//!
//! The binary in `main.rs` only parses arguments, installs logging and
//! hands over to [`run`]; everything else lives here so it can be tested.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use kqlexport_core::{
    ConnectionConfig, CredentialSource, ExportConfig, ObjectKind, Reporter, TracingReporter,
    create_source, exit_code_for,
    export::{banner, run_export},
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "kql-export")]
#[command(about = "Export Kusto table and function schemas to individual KQL files")]
#[command(version)]
#[command(long_about = "
kql-export - Kusto schema exporter

Writes one .kql file per table (.create table) or per function
(.create-or-alter function) plus a README.md describing the export.

AUTHENTICATION:
  KUSTO_ACCESS_TOKEN is used when set, otherwise a token is requested
  from the Azure CLI (run `az login` first).

EXAMPLES:
  kql-export tables -c https://help.kusto.windows.net -d Samples
  kql-export functions -c help -d Samples -o exported_functions
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export table CREATE commands
    Tables(ExportArgs),
    /// Export function CREATE-OR-ALTER commands
    Functions(ExportArgs),
}

impl Command {
    /// Object kind exported by this subcommand.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Tables(_) => ObjectKind::Table,
            Self::Functions(_) => ObjectKind::Function,
        }
    }

    /// Arguments shared by both subcommands.
    pub fn args(&self) -> &ExportArgs {
        match self {
            Self::Tables(args) | Self::Functions(args) => args,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Cluster URL or bare cluster name
    #[arg(
        short,
        long,
        env = "KUSTO_CLUSTER",
        help = "Cluster URL (e.g. https://<name>.kusto.windows.net)"
    )]
    pub cluster: String,

    /// Database name
    #[arg(short, long, env = "KUSTO_DATABASE", help = "Database name")]
    pub database: String,

    /// Output directory
    #[arg(
        short,
        long,
        help = "Directory for the exported KQL files [default: table_schemas or function_schemas]"
    )]
    pub output_dir: Option<PathBuf>,
}

impl ExportArgs {
    /// Builds the export configuration for `kind`.
    ///
    /// # Errors
    /// Returns an error if the cluster or database is invalid.
    pub fn export_config(&self, kind: ObjectKind) -> anyhow::Result<ExportConfig> {
        let connection = ConnectionConfig::new(&self.cluster, self.database.as_str())
            .context("Invalid connection settings")?;

        let config = ExportConfig::new(connection, kind);
        Ok(match &self.output_dir {
            Some(dir) => config.with_output_dir(dir),
            None => config,
        })
    }
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v adds debug events, -vv traces requests)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Runs the selected exporter and returns the process exit code.
///
/// Authentication happens before the output directory is created, so a
/// missing token leaves nothing behind on disk.
///
/// # Errors
/// Returns an error only for invalid command-line settings; every failure
/// after that is reported and mapped to exit code `1`.
pub async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let kind = cli.command.kind();
    let reporter = TracingReporter;

    reporter.header(&banner(kind));
    let config = cli.command.args().export_config(kind)?;
    config.log_configuration(&reporter);

    let credentials = CredentialSource::detect(config.connection.cluster_url());
    reporter.progress(&format!("Authenticating with {}...", credentials.describe()));
    let source = match create_source(&config.connection, &credentials).await {
        Ok(source) => {
            reporter.success("Successfully authenticated");
            source
        }
        Err(e) => {
            reporter.error(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    let result = run_export(&config, source.as_ref(), &reporter).await;
    match &result {
        Ok(report) => report.print_summary(&reporter),
        Err(e) => reporter.error(&format!("{} export failed: {}", kind.title(), e)),
    }

    Ok(ExitCode::from(exit_code_for(&result)))
}
