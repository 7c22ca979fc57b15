//! Archive packing and unpacking through external command-line tools.
//!
//! `emarch-core` maps an archive file name (or a format hint) to one of the
//! supported formats and drives the matching tools: `tar` with a stream
//! compressor, `zip`/`unzip`, `7za`, `arj`, `arc`, `lha`, or a single-file
//! compressor. Before unpacking, the archive's listing is scanned for
//! absolute paths, up-going paths and Windows device names, and extraction
//! is refused when any are found.
//!
//! # Examples
//!
//! ```no_run
//! use emarch_core::ToolConfig;
//! use emarch_core::unpack_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = unpack_archive("release.tar.xz", None, false, &ToolConfig::default())?;
//! for command in &report.commands {
//!     println!("ran: {command}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod creation;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod process;
pub mod report;
pub mod security;

pub use api::pack_archive;
pub use api::resolve_format;
pub use api::unpack_archive;
pub use config::ToolConfig;
pub use creation::PackEngine;
pub use error::ArchiveError;
pub use error::Result;
pub use error::UnsafeKind;
pub use extraction::UnpackEngine;
pub use formats::ArchiveFormat;
pub use report::NoopReporter;
pub use report::Operation;
pub use report::OperationReport;
pub use report::Reporter;
pub use report::StdioReporter;
pub use security::PathSafetyVerdict;
