//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use emarch_core::PackEngine;
use emarch_core::ToolConfig;
use emarch_core::resolve_format;

pub fn execute(args: &PackArgs, config: ToolConfig, formatter: &dyn OutputFormatter) -> Result<()> {
    if args.trust {
        formatter.format_warning("--trust has no effect when packing");
    }

    let format = add_archive_context(
        resolve_format(&args.archive, args.format.as_deref()),
        &args.archive,
    )?;

    let report = add_archive_context(
        PackEngine::new(config, formatter).pack(format, &args.archive, &args.inputs),
        &args.archive,
    )?;

    formatter.format_pack_result(&report);

    Ok(())
}
