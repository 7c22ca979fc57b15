//! Error conversion utilities for CLI.
//!
//! Converts emarch-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use emarch_core::ArchiveError;
use emarch_core::ArchiveFormat;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context.
///
/// Tool failures are kept as typed errors so [`exit_code`] can recover the
/// tool's exit code.
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::UnsafeArchive { kind, line } => {
            anyhow!(
                "Archive '{}' seems to contain an entry with {kind}:\n{line}\n\
                 HINT: Nothing was unpacked. Use --trust only if the archive comes from a \
                 trusted source.",
                archive.display()
            )
        }
        ArchiveError::UnsupportedFormat { format } => {
            anyhow!(
                "Archive format not supported: {format}\n\
                 HINT: Use --format to name the format. Supported suffixes: {}",
                supported_suffixes()
            )
        }
        ArchiveError::PackUnsupported { format } => {
            anyhow!(
                "Cannot create '{}': {format} archives can only be unpacked\n\
                 HINT: Pick a packable format such as tar.gz or zip.",
                archive.display()
            )
        }
        ArchiveError::TargetAlreadyExists { path } => {
            anyhow!(
                "Output file already exists: {}\n\
                 HINT: Move or delete the file, then unpack '{}' again.",
                path.display(),
                archive.display()
            )
        }
        ArchiveError::ProcessSpawnFailed { command, source } => {
            anyhow!(
                "Failed to run `{command}`: {source}\n\
                 HINT: Check that the named files exist and the tool is installed. Other tools \
                 can be selected with --gzip-tool, --bzip2-tool, --xz-tool and --zip-tool."
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err),
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}

/// Process exit code for an error.
///
/// A failing tool's exit code is passed through; everything else maps to 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<ArchiveError>()
        .map_or(1, ArchiveError::exit_code);
    u8::try_from(code).unwrap_or(1)
}

fn supported_suffixes() -> String {
    ArchiveFormat::ALL
        .iter()
        .flat_map(|format| format.suffixes())
        .collect::<Vec<_>>()
        .join(", ")
}
