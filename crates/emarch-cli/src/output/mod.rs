//! Output formatting module.

mod formatter;
mod human;

pub use formatter::OutputFormatter;

use human::HumanFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    Box::new(HumanFormatter::new(verbose, quiet))
}
