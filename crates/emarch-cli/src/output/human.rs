//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::ScanSpinner;
use console::Term;
use console::style;
use emarch_core::Operation;
use emarch_core::OperationReport;
use emarch_core::PathSafetyVerdict;
use emarch_core::Reporter;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    out: Term,
    err: Term,
    spinner: Mutex<Option<ScanSpinner>>,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            out: Term::stdout(),
            err: Term::stderr(),
            spinner: Mutex::new(None),
        }
    }

    /// Runs `f` with the scan spinner, if any, hidden.
    fn print(&self, f: impl FnOnce()) {
        let spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match spinner.as_ref() {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }

    fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis >= 1000 {
            format!("{:.2}s", duration.as_secs_f64())
        } else {
            format!("{millis}ms")
        }
    }

    fn format_summary(&self, headline: &str, report: &OperationReport) {
        if self.use_colors {
            let _ = self
                .out
                .write_line(&format!("{} {headline}", style("✓").green().bold()));
        } else {
            let _ = self.out.write_line(headline);
        }

        let _ = self
            .out
            .write_line(&format!("  Format:    {}", report.format));
        for command in &report.commands {
            let _ = self.out.write_line(&format!("  Command:   {command}"));
        }
        match &report.verdict {
            Some(PathSafetyVerdict::Clear { lines_scanned }) => {
                let _ = self
                    .out
                    .write_line(&format!("  Scanned:   {lines_scanned} listing lines"));
            }
            Some(PathSafetyVerdict::Rejected { .. }) => {}
            None if report.operation == Operation::Unpack => {
                let _ = self.out.write_line("  Scanned:   skipped");
            }
            None => {}
        }
        if let Some(output) = &report.output {
            let _ = self
                .out
                .write_line(&format!("  Output:    {}", output.display()));
        }
        let _ = self.out.write_line(&format!(
            "  Duration:  {}",
            Self::format_duration(report.duration)
        ));
    }
}

impl Reporter for HumanFormatter {
    fn on_command(&self, command: &str) {
        if self.verbose {
            self.print(|| {
                let line = if self.use_colors {
                    format!("{} {command}", style("$").dim())
                } else {
                    format!("$ {command}")
                };
                let _ = self.err.write_line(&line);
            });
        }
    }

    fn on_tool_stdout(&self, line: &str) {
        if !self.quiet {
            self.print(|| {
                let _ = self.out.write_line(line);
            });
        }
    }

    fn on_tool_stderr(&self, line: &str) {
        self.print(|| {
            let _ = self.err.write_line(line);
        });
    }

    fn on_scan_start(&self, _command: &str) {
        if self.quiet {
            return;
        }
        let _ = self
            .out
            .write_line("Scanning archive listing for dangerous paths...");
        if ScanSpinner::should_show() {
            *self.spinner.lock().unwrap_or_else(PoisonError::into_inner) = Some(ScanSpinner::new());
        }
    }

    fn on_scan_progress(&self, lines: usize) {
        if let Some(spinner) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            spinner.set_lines(lines);
        }
    }

    fn on_scan_complete(&self, verdict: &PathSafetyVerdict) {
        if let Some(spinner) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            spinner.finish();
        }
        if !self.quiet && verdict.is_clear() {
            let _ = self.out.write_line("okay, unpacking...");
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, report: &OperationReport) {
        if !self.verbose {
            return;
        }
        self.format_summary(
            &format!("Archive packed: {}", report.archive.display()),
            report,
        );
    }

    fn format_unpack_result(&self, report: &OperationReport) {
        if !self.verbose {
            return;
        }
        self.format_summary(
            &format!("Archive unpacked: {}", report.archive.display()),
            report,
        );
    }

    fn format_error(&self, error: &anyhow::Error) {
        // A failed listing never reports completion.
        if let Some(spinner) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            spinner.finish();
        }

        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {error:#}", style("Error:").red().bold()));
        } else {
            let _ = self.err.write_line(&format!("Error: {error:#}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(&format!("WARNING: {message}"));
        }
    }
}
