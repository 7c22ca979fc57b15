//! Output formatter trait for CLI results.

use emarch_core::OperationReport;
use emarch_core::Reporter;

/// Common output formatter trait.
///
/// A formatter is also the [`Reporter`] receiving relayed tool output while
/// an operation runs.
pub trait OutputFormatter: Reporter {
    /// Format the result of a finished pack
    fn format_pack_result(&self, report: &OperationReport);

    /// Format the result of a finished unpack
    fn format_unpack_result(&self, report: &OperationReport);

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}
