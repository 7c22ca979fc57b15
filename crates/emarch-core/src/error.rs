//! Error types for archive pack and unpack operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::formats::ArchiveFormat;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Kind of dangerous entry found in an archive listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeKind {
    /// Absolute path, up-going (`..`) path or drive-letter reference.
    IllPath,
    /// A path segment equal to a reserved Windows device name.
    DeviceName,
}

impl std::fmt::Display for UnsafeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllPath => write!(f, "an absolute or up-going path"),
            Self::DeviceName => write!(f, "a Windows device name"),
        }
    }
}

/// Errors that can occur while packing or unpacking an archive.
///
/// Every error is fatal to the current invocation. Nothing is retried and
/// partially written output is left in place.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No known suffix matches the archive name or format hint.
    #[error("unsupported archive format: {format}")]
    UnsupportedFormat {
        /// The name or hint that was tried.
        format: String,
    },

    /// The format can only be unpacked.
    #[error("packing of {format} is not supported")]
    PackUnsupported {
        /// The resolved format.
        format: ArchiveFormat,
    },

    /// The tool would append its own suffix to a suffix-less archive name.
    #[error("archive file name has no suffix (e.g. \".{example}\"): {}", archive.display())]
    MissingSuffix {
        /// The archive path as given.
        archive: PathBuf,
        /// Example suffix for the message.
        example: &'static str,
    },

    /// arc silently shortens names that are not DOS 8.3 names.
    #[error(
        "arc archive file name must be a DOS file name \
         (<max 8 non-dot chars><dot><max 3 chars>): {}",
        archive.display()
    )]
    NotDosFileName {
        /// The archive path as given.
        archive: PathBuf,
    },

    /// A single-stream compressor was given more than one input.
    #[error("cannot pack multiple files with {tool}")]
    MultipleInputsUnsupported {
        /// Name of the compressor.
        tool: &'static str,
    },

    /// A directory was given to a tool that packs only regular files.
    #[error("cannot pack a directory with {tool}: {}", path.display())]
    DirectoryUnsupported {
        /// Name of the tool.
        tool: &'static str,
        /// The offending input.
        path: PathBuf,
    },

    /// A file already occupying the archive path could not be removed.
    #[error("failed to delete {}: {source}", path.display())]
    StaleArchive {
        /// The archive path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The archive listing contains a dangerous entry.
    #[error("archive seems to contain an entry with {kind}:\n{line}")]
    UnsafeArchive {
        /// What was found.
        kind: UnsafeKind,
        /// The listing line, quoted verbatim.
        line: String,
    },

    /// The derived output file of a single-stream unpack already exists.
    #[error("file already exists: {}", path.display())]
    TargetAlreadyExists {
        /// The derived output path.
        path: PathBuf,
    },

    /// A packing tool exited unsuccessfully.
    #[error("packing {format} failed: `{command}` exited with {}", describe_code(*code))]
    PackToolFailed {
        /// The resolved format.
        format: ArchiveFormat,
        /// The rendered tool chain.
        command: String,
        /// Exit code, if the tool was not killed by a signal.
        code: Option<i32>,
    },

    /// An unpacking or listing tool exited unsuccessfully.
    #[error("unpacking {format} failed: `{command}` exited with {}", describe_code(*code))]
    UnpackToolFailed {
        /// The resolved format.
        format: ArchiveFormat,
        /// The rendered tool chain.
        command: String,
        /// Exit code, if the tool was not killed by a signal.
        code: Option<i32>,
    },

    /// A tool could not be located or started.
    #[error("failed to run {command}: {source}")]
    ProcessSpawnFailed {
        /// The rendered tool chain.
        command: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The request itself is malformed.
    #[error("bad arguments: {reason}")]
    BadArguments {
        /// What is wrong.
        reason: String,
    },
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"))
}

impl ArchiveError {
    /// Returns the process exit code this error should map to.
    ///
    /// Tool failures propagate the tool's own exit code; everything else is
    /// `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use emarch_core::ArchiveError;
    /// use emarch_core::ArchiveFormat;
    ///
    /// let err = ArchiveError::UnpackToolFailed {
    ///     format: ArchiveFormat::TarGz,
    ///     command: "gzip -d -c < a.tgz | tar xvf -".into(),
    ///     code: Some(2),
    /// };
    /// assert_eq!(err.exit_code(), 2);
    ///
    /// let err = ArchiveError::UnsupportedFormat { format: "rar".into() };
    /// assert_eq!(err.exit_code(), 1);
    /// ```
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PackToolFailed { code, .. } | Self::UnpackToolFailed { code, .. } => {
                code.filter(|c| *c != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }

    /// Returns `true` if the archive was refused for safety reasons.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::UnsafeArchive { .. })
    }

    /// Returns the rendered command line of the failing tool, if any.
    #[must_use]
    pub fn tool_command(&self) -> Option<&str> {
        match self {
            Self::PackToolFailed { command, .. }
            | Self::UnpackToolFailed { command, .. }
            | Self::ProcessSpawnFailed { command, .. } => Some(command),
            _ => None,
        }
    }
}
