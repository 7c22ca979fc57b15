//! Archive extraction through external tools.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use super::target::derive_output_name;
use crate::ArchiveError;
use crate::Result;
use crate::config::ToolConfig;
use crate::formats::ArchiveFormat;
use crate::formats::Codec;
use crate::formats::Layout;
use crate::formats::layout::stream_extraction;
use crate::formats::layout::tar_extraction;
use crate::process::ToolInvoker;
use crate::report::Operation;
use crate::report::OperationReport;
use crate::report::Reporter;
use crate::security::PathSafetyScanner;
use crate::security::scan_listing;

/// Unpacks archives into a working directory by running external tools.
///
/// Unless trusted, multi-entry archives are listed first and the listing is
/// scanned for absolute, up-going and device-name paths. Extraction only
/// starts when the scan comes back clear. Existing files are overwritten
/// without asking, except for the output of a single compressed stream.
///
/// # Examples
///
/// ```no_run
/// use emarch_core::ArchiveFormat;
/// use emarch_core::StdioReporter;
/// use emarch_core::ToolConfig;
/// use emarch_core::UnpackEngine;
///
/// let reporter = StdioReporter::new();
/// let engine = UnpackEngine::new(ToolConfig::default(), &reporter).in_dir("/tmp/out");
/// let report = engine.unpack(ArchiveFormat::Zip, "/tmp/bundle.zip", false)?;
/// assert!(report.was_scanned());
/// # Ok::<(), emarch_core::ArchiveError>(())
/// ```
pub struct UnpackEngine<'r> {
    config: ToolConfig,
    work_dir: PathBuf,
    reporter: &'r dyn Reporter,
}

impl<'r> UnpackEngine<'r> {
    /// Creates an engine unpacking into the current directory.
    #[must_use]
    pub fn new(config: ToolConfig, reporter: &'r dyn Reporter) -> Self {
        Self {
            config,
            work_dir: PathBuf::from("."),
            reporter,
        }
    }

    /// Sets the directory to unpack into.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Unpacks `archive`.
    ///
    /// With `trust` set the listing scan is skipped.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::UnsafeArchive` if the listing looks dangerous,
    /// `ArchiveError::TargetAlreadyExists` if a single stream's output file
    /// exists, and tool errors for failing listings or extractions.
    pub fn unpack(
        &self,
        format: ArchiveFormat,
        archive: impl AsRef<Path>,
        trust: bool,
    ) -> Result<OperationReport> {
        let start = Instant::now();
        let archive = archive.as_ref();
        let layout = format.layout();
        let mut report = OperationReport::new(Operation::Unpack, format, archive);
        let invoker = ToolInvoker::new(self.reporter);
        let on_exit = move |command: String, code: Option<i32>| ArchiveError::UnpackToolFailed {
            format,
            command,
            code,
        };

        if !trust && let Some(listing) = layout.listing(&self.config, archive) {
            let chain = listing.chain.in_dir(&self.work_dir);
            report.add_command(chain.to_string());
            let scanner = PathSafetyScanner::new(listing.style, listing.header);
            let verdict =
                scan_listing(&invoker, &chain, scanner).map_err(|e| e.into_archive_error(on_exit))?;
            report.verdict = Some(verdict.clone());
            verdict.into_result()?;
        }

        let chain = match layout {
            Layout::Archiver(archiver) => archiver.extraction(&self.config, archive),
            Layout::TarStream(codec) => tar_extraction(codec, &self.config, archive),
            Layout::SingleStream(codec) => {
                let target = self.stream_target(codec, archive)?;
                let chain = stream_extraction(codec, &self.config, archive, &target);
                report.output = Some(target);
                chain
            }
        }
        .in_dir(&self.work_dir);

        report.add_command(chain.to_string());
        invoker
            .run(&chain)
            .map_err(|e| e.into_archive_error(on_exit))?;

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Output file of a single stream, relative to the working directory.
    fn stream_target(&self, codec: Codec, archive: &Path) -> Result<PathBuf> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = PathBuf::from(derive_output_name(codec, &name));
        if fs::symlink_metadata(self.work_dir.join(&target)).is_ok() {
            return Err(ArchiveError::TargetAlreadyExists { path: target });
        }
        Ok(target)
    }
}

impl std::fmt::Debug for UnpackEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpackEngine")
            .field("config", &self.config)
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}
