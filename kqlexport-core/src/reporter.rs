//! Narration capability passed to every pipeline component.
//!
//! Components never log through a process-wide singleton; they receive a
//! `&dyn Reporter` and describe each stage through its seven operations.

use colored::Colorize;
use std::sync::Mutex;

/// Leveled narration operations used throughout an export run.
pub trait Reporter: Send + Sync {
    /// General information about the run.
    fn info(&self, message: &str);
    /// A step or object that completed.
    fn success(&self, message: &str);
    /// A recoverable problem; the run continues.
    fn warning(&self, message: &str);
    /// A failure of one object or of the whole run.
    fn error(&self, message: &str);
    /// A step that is starting.
    fn progress(&self, message: &str);
    /// Secondary detail under the current step.
    fn detail(&self, message: &str);
    /// Section heading.
    fn header(&self, message: &str);
}

/// Console line for `message` at `level`.
///
/// Every level except headers and details carries a bracketed tag; only the
/// tag is colored so the message text stays greppable.
pub fn render(level: ReportLevel, message: &str) -> String {
    match level {
        ReportLevel::Info => format!("{} {}", "[INFO]".blue(), message),
        ReportLevel::Success => format!("{} {}", "[SUCCESS]".green(), message),
        ReportLevel::Warning => format!("{} {}", "[WARNING]".yellow(), message),
        ReportLevel::Error => format!("{} {}", "[ERROR]".red(), message),
        ReportLevel::Progress => format!("{} {}", "[PROGRESS]".cyan(), message),
        ReportLevel::Detail => format!("  {} {}", "→".cyan(), message),
        ReportLevel::Header => message.magenta().bold().to_string(),
    }
}

/// Reporter backed by `tracing` events.
///
/// Warnings and errors go out at WARN and ERROR; everything else, details
/// included, at INFO so a default run shows the full narration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{}", render(ReportLevel::Info, message));
    }

    fn success(&self, message: &str) {
        tracing::info!("{}", render(ReportLevel::Success, message));
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", render(ReportLevel::Warning, message));
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", render(ReportLevel::Error, message));
    }

    fn progress(&self, message: &str) {
        tracing::info!("{}", render(ReportLevel::Progress, message));
    }

    fn detail(&self, message: &str) {
        tracing::info!("{}", render(ReportLevel::Detail, message));
    }

    fn header(&self, message: &str) {
        tracing::info!("{}", render(ReportLevel::Header, message));
    }
}

/// Level of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Success,
    Warning,
    Error,
    Progress,
    Detail,
    Header,
}

/// Reporter that keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(ReportLevel, String)>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<(ReportLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages reported at one level.
    pub fn messages(&self, level: ReportLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// Whether any message at `level` contains `needle`.
    pub fn contains(&self, level: ReportLevel, needle: &str) -> bool {
        self.messages(level)
            .iter()
            .any(|message| message.contains(needle))
    }

    fn push(&self, level: ReportLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.push(ReportLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(ReportLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.push(ReportLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(ReportLevel::Error, message);
    }

    fn progress(&self, message: &str) {
        self.push(ReportLevel::Progress, message);
    }

    fn detail(&self, message: &str) {
        self.push(ReportLevel::Detail, message);
    }

    fn header(&self, message: &str) {
        self.push(ReportLevel::Header, message);
    }
}
