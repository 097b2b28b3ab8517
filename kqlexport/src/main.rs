//! Kusto schema export tool.
//!
//! Exports table or function definitions from one database into
//! individual `.kql` files and a README.
//!
//! # Guarantees
//! - Read-only `.show` management commands only
//! - Access tokens are never logged
//! - Exit code 0 only when at least one object was exported

use clap::Parser;
use kqlexport::{Cli, run};
use kqlexport_core::logging::init_logging;
use kqlexport_core::{Reporter, TracingReporter};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            TracingReporter.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
