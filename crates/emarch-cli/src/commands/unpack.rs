//! Unpack command implementation.

use crate::cli::UnpackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use emarch_core::ToolConfig;
use emarch_core::UnpackEngine;
use emarch_core::resolve_format;

pub fn execute(
    args: &UnpackArgs,
    config: ToolConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let format = add_archive_context(
        resolve_format(&args.archive, args.format.as_deref()),
        &args.archive,
    )?;

    let report = add_archive_context(
        UnpackEngine::new(config, formatter).unpack(format, &args.archive, args.trust),
        &args.archive,
    )?;

    formatter.format_unpack_result(&report);

    Ok(())
}
