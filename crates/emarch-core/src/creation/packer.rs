//! Archive creation through external tools.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ArchiveError;
use crate::Result;
use crate::config::ToolConfig;
use crate::formats::ArchiveFormat;
use crate::formats::Archiver;
use crate::formats::Layout;
use crate::formats::detect::has_any_ending;
use crate::formats::detect::is_dos_file_name;
use crate::process::ToolInvoker;
use crate::report::Operation;
use crate::report::OperationReport;
use crate::report::Reporter;

/// Creates archives by running the packing tools of a format.
///
/// Relative archive and input paths are interpreted against the engine's
/// working directory, which is also where the tools run.
///
/// # Examples
///
/// ```no_run
/// use emarch_core::ArchiveFormat;
/// use emarch_core::PackEngine;
/// use emarch_core::StdioReporter;
/// use emarch_core::ToolConfig;
///
/// let reporter = StdioReporter::new();
/// let engine = PackEngine::new(ToolConfig::default(), &reporter);
/// let report = engine.pack(ArchiveFormat::TarGz, "backup.tgz", &["src", "Cargo.toml"])?;
/// println!("ran {}", report.commands.join("; "));
/// # Ok::<(), emarch_core::ArchiveError>(())
/// ```
pub struct PackEngine<'r> {
    config: ToolConfig,
    work_dir: PathBuf,
    reporter: &'r dyn Reporter,
}

impl<'r> PackEngine<'r> {
    /// Creates an engine working in the current directory.
    #[must_use]
    pub fn new(config: ToolConfig, reporter: &'r dyn Reporter) -> Self {
        Self {
            config,
            work_dir: PathBuf::from("."),
            reporter,
        }
    }

    /// Sets the working directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Packs `inputs` into `archive`.
    ///
    /// All checks run before the archive path is touched. A regular file
    /// already at the archive path is then deleted, so the tools never
    /// append to an old archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails validation, the old archive
    /// cannot be deleted, or a tool fails. Partial output is left in place.
    pub fn pack<A, P>(
        &self,
        format: ArchiveFormat,
        archive: A,
        inputs: &[P],
    ) -> Result<OperationReport>
    where
        A: AsRef<Path>,
        P: AsRef<Path>,
    {
        let start = Instant::now();
        let archive = archive.as_ref();
        let inputs: Vec<PathBuf> = inputs.iter().map(|p| p.as_ref().to_path_buf()).collect();

        self.validate(format, archive, &inputs)?;
        self.remove_stale(archive)?;

        let mut report = OperationReport::new(Operation::Pack, format, archive);
        let invoker = ToolInvoker::new(self.reporter);
        for chain in format.layout().pack_chains(&self.config, archive, &inputs) {
            let chain = chain.in_dir(&self.work_dir);
            report.add_command(chain.to_string());
            invoker.run(&chain).map_err(|e| {
                e.into_archive_error(|command, code| ArchiveError::PackToolFailed {
                    format,
                    command,
                    code,
                })
            })?;
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    fn validate(&self, format: ArchiveFormat, archive: &Path, inputs: &[PathBuf]) -> Result<()> {
        if inputs.is_empty() {
            return Err(ArchiveError::BadArguments {
                reason: "no files to pack".to_string(),
            });
        }
        if !format.can_pack() {
            return Err(ArchiveError::PackUnsupported { format });
        }

        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match format.layout() {
            Layout::Archiver(Archiver::Arc) => {
                if !has_any_ending(&name) || !is_dos_file_name(&name) {
                    return Err(ArchiveError::NotDosFileName {
                        archive: archive.to_path_buf(),
                    });
                }
                self.reject_directories("arc", inputs)?;
            }
            Layout::Archiver(archiver @ (Archiver::SevenZip | Archiver::Arj | Archiver::Zip)) => {
                if !has_any_ending(&name) {
                    return Err(ArchiveError::MissingSuffix {
                        archive: archive.to_path_buf(),
                        example: suffix_example(archiver),
                    });
                }
            }
            Layout::Archiver(Archiver::Lha) | Layout::TarStream(_) => {}
            Layout::SingleStream(codec) => {
                if inputs.len() > 1 {
                    return Err(ArchiveError::MultipleInputsUnsupported { tool: codec.name() });
                }
                self.reject_directories(codec.name(), inputs)?;
            }
        }
        Ok(())
    }

    fn reject_directories(&self, tool: &'static str, inputs: &[PathBuf]) -> Result<()> {
        match inputs.iter().find(|input| self.work_dir.join(input).is_dir()) {
            Some(dir) => Err(ArchiveError::DirectoryUnsupported {
                tool,
                path: dir.clone(),
            }),
            None => Ok(()),
        }
    }

    fn remove_stale(&self, archive: &Path) -> Result<()> {
        let path = self.work_dir.join(archive);
        if path.is_file() {
            fs::remove_file(&path).map_err(|source| ArchiveError::StaleArchive {
                path: archive.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PackEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackEngine")
            .field("config", &self.config)
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}

// Tools that silently append their own suffix to a bare archive name.
const fn suffix_example(archiver: Archiver) -> &'static str {
    match archiver {
        Archiver::SevenZip => "7z",
        Archiver::Arj => "arj",
        Archiver::Zip => "zip",
        Archiver::Arc => "arc",
        Archiver::Lha => "lzh",
    }
}
