//! Operation reporting and relaying of tool output.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::formats::ArchiveFormat;
use crate::security::PathSafetyVerdict;

/// Kind of operation a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Archive creation.
    Pack,
    /// Archive extraction.
    Unpack,
}

/// Report of a completed pack or unpack operation.
#[derive(Debug, Clone)]
pub struct OperationReport {
    /// What was done.
    pub operation: Operation,

    /// Resolved archive format.
    pub format: ArchiveFormat,

    /// Archive path as given by the caller.
    pub archive: PathBuf,

    /// Rendered command lines, in the order they ran.
    pub commands: Vec<String>,

    /// Listing scan result. `None` when the scan was skipped.
    pub verdict: Option<PathSafetyVerdict>,

    /// Derived output file of a single-stream unpack.
    pub output: Option<PathBuf>,

    /// Duration of the operation.
    pub duration: Duration,
}

impl OperationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(operation: Operation, format: ArchiveFormat, archive: impl Into<PathBuf>) -> Self {
        Self {
            operation,
            format,
            archive: archive.into(),
            commands: Vec::new(),
            verdict: None,
            output: None,
            duration: Duration::ZERO,
        }
    }

    /// Records a command that ran.
    pub fn add_command(&mut self, command: String) {
        self.commands.push(command);
    }

    /// Returns whether the listing scan ran.
    #[must_use]
    pub const fn was_scanned(&self) -> bool {
        self.verdict.is_some()
    }
}

/// Receiver of tool output and diagnostic events.
///
/// Tool output arrives line by line, without the line terminator. Standard
/// error lines may arrive from several threads at once, hence `Sync`.
///
/// # Examples
///
/// ```
/// use emarch_core::Reporter;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Collect(Mutex<Vec<String>>);
///
/// impl Reporter for Collect {
///     fn on_tool_stdout(&self, line: &str) {
///         self.0.lock().unwrap().push(line.to_string());
///     }
///
///     fn on_tool_stderr(&self, line: &str) {
///         self.0.lock().unwrap().push(format!("! {line}"));
///     }
/// }
/// ```
pub trait Reporter: Sync {
    /// Called before a tool chain starts, with its rendered command line.
    fn on_command(&self, _command: &str) {}

    /// Called for each standard output line of a chain's last stage.
    fn on_tool_stdout(&self, line: &str);

    /// Called for each standard error line of any stage.
    fn on_tool_stderr(&self, line: &str);

    /// Called before the listing of an archive is scanned.
    fn on_scan_start(&self, _command: &str) {}

    /// Called after each scanned listing line.
    fn on_scan_progress(&self, _lines: usize) {}

    /// Called once the listing has been fully read.
    fn on_scan_complete(&self, _verdict: &PathSafetyVerdict) {}
}

/// Mirrors tool output to the process's own standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioReporter {
    quiet: bool,
}

impl StdioReporter {
    /// Creates a reporter that also prints scan progress messages.
    #[must_use]
    pub const fn new() -> Self {
        Self { quiet: false }
    }

    /// Creates a reporter that only mirrors tool output.
    #[must_use]
    pub const fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Reporter for StdioReporter {
    fn on_tool_stdout(&self, line: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }

    fn on_tool_stderr(&self, line: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn on_scan_start(&self, _command: &str) {
        if !self.quiet {
            let _ = writeln!(
                std::io::stdout().lock(),
                "Scanning archive listing for dangerous paths..."
            );
        }
    }

    fn on_scan_complete(&self, verdict: &PathSafetyVerdict) {
        if !self.quiet && verdict.is_clear() {
            let _ = writeln!(std::io::stdout().lock(), "okay, unpacking...");
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn on_tool_stdout(&self, _line: &str) {}

    fn on_tool_stderr(&self, _line: &str) {}
}
