//! Logging initialisation for the kqlexport binary.
//!
//! The export pipeline never writes to stdout directly and narrates through
//! a [`Reporter`](crate::reporter::Reporter) instead. Each reporter level
//! renders its own colored tag, so the subscriber prints bare messages
//! without timestamps or level names.

use crate::Result;
use tracing_subscriber::fmt::MakeWriter;

/// Maps CLI verbosity flags to a tracing level.
///
/// The default shows the complete narration, details included. `-v` adds
/// internal debug events and `-vv` request tracing.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
///
/// # Example
/// ```rust,no_run
/// use kqlexport_core::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing::subscriber::set_global_default(console_subscriber(verbose, quiet, std::io::stdout))
        .map_err(|e| {
            crate::error::ExportError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(())
}

/// Console subscriber writing narration lines to `writer`.
pub fn console_subscriber<W>(
    verbose: u8,
    quiet: bool,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_writer(writer)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per test process,
    // so only the level mapping is exercised here.
    #[test]
    fn test_verbosity_levels() {
        let test_cases = [
            ((true, 0), tracing::Level::ERROR),
            ((true, 5), tracing::Level::ERROR),
            ((false, 0), tracing::Level::INFO),
            ((false, 1), tracing::Level::DEBUG),
            ((false, 2), tracing::Level::TRACE),
            ((false, 10), tracing::Level::TRACE),
        ];

        for ((quiet, verbose), expected) in test_cases {
            assert_eq!(
                level_for(verbose, quiet),
                expected,
                "Failed for quiet={}, verbose={}",
                quiet,
                verbose
            );
        }
    }
}
