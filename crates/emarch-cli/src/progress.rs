//! Spinner shown while an archive listing is being scanned.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

/// Spinner counting scanned listing lines.
///
/// Drawn on standard error so it never mixes with relayed tool output.
/// Clears itself on drop.
pub struct ScanSpinner {
    bar: ProgressBar,
}

impl ScanSpinner {
    /// Creates and starts a spinner.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Scanning listing: 0 entries");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Checks if the spinner should be drawn (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    pub fn set_lines(&self, lines: usize) {
        self.bar
            .set_message(format!("Scanning listing: {lines} entries"));
    }

    /// Hides the spinner while `f` prints.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ScanSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let spinner = ScanSpinner::new();
        spinner.set_lines(42);
        let value = spinner.suspend(|| 7);
        assert_eq!(value, 7);
        spinner.finish();
        assert!(spinner.bar.is_finished());
    }
}
