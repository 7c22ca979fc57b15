//! High-level entry points for packing and unpacking.

use std::path::Path;

use crate::ArchiveFormat;
use crate::OperationReport;
use crate::Result;
use crate::ToolConfig;
use crate::creation::PackEngine;
use crate::extraction::UnpackEngine;
use crate::report::StdioReporter;

/// Resolves the format of `archive`, preferring an explicit hint.
///
/// The hint may be a bare suffix (`gz`), a dotted suffix (`.gz`) or a
/// sample file name. Without a hint the archive path itself is used.
///
/// # Errors
///
/// Returns `ArchiveError::UnsupportedFormat` if nothing matches.
///
/// # Examples
///
/// ```
/// use emarch_core::ArchiveFormat;
/// use emarch_core::resolve_format;
///
/// assert_eq!(resolve_format("a.tgz", None)?, ArchiveFormat::TarGz);
/// assert_eq!(resolve_format("a.bin", Some("zip"))?, ArchiveFormat::Zip);
/// # Ok::<(), emarch_core::ArchiveError>(())
/// ```
pub fn resolve_format<P: AsRef<Path>>(archive: P, hint: Option<&str>) -> Result<ArchiveFormat> {
    match hint {
        Some(hint) => ArchiveFormat::resolve(hint),
        None => ArchiveFormat::resolve(&archive.as_ref().to_string_lossy()),
    }
}

/// Packs `inputs` into `archive` in the current directory, mirroring tool
/// output to the process's standard streams.
///
/// # Errors
///
/// See [`PackEngine::pack`].
///
/// # Examples
///
/// ```no_run
/// use emarch_core::ToolConfig;
/// use emarch_core::pack_archive;
///
/// let report = pack_archive("notes.txt.xz", &["notes.txt"], None, &ToolConfig::default())?;
/// println!("{}", report.commands[0]);
/// # Ok::<(), emarch_core::ArchiveError>(())
/// ```
pub fn pack_archive<A: AsRef<Path>, P: AsRef<Path>>(
    archive: A,
    inputs: &[P],
    format: Option<&str>,
    config: &ToolConfig,
) -> Result<OperationReport> {
    let archive = archive.as_ref();
    let format = resolve_format(archive, format)?;
    let reporter = StdioReporter::new();
    PackEngine::new(*config, &reporter).pack(format, archive, inputs)
}

/// Unpacks `archive` into the current directory, mirroring tool output to
/// the process's standard streams.
///
/// # Errors
///
/// See [`UnpackEngine::unpack`].
pub fn unpack_archive<A: AsRef<Path>>(
    archive: A,
    format: Option<&str>,
    trust: bool,
    config: &ToolConfig,
) -> Result<OperationReport> {
    let archive = archive.as_ref();
    let format = resolve_format(archive, format)?;
    let reporter = StdioReporter::new();
    UnpackEngine::new(*config, &reporter).unpack(format, archive, trust)
}
