//! Shared fixtures for integration tests.
//!
//! Hostile archives are built in memory so tests never depend on a tool that
//! would refuse to create them.

#![allow(dead_code, unused_macros, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::sync::Mutex;

use emarch_core::PathSafetyVerdict;
use emarch_core::Reporter;

/// Builds a tar archive, writing entry names verbatim into the header.
///
/// `tar::Builder::append_data` refuses `..` components, so names go straight
/// into the old-style name field.
pub fn raw_tar(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = tar::Header::new_old();
        let field = &mut header.as_old_mut().name;
        field[..name.len()].copy_from_slice(name.as_bytes());
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append(&header, data.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Gzip-compresses `data`.
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builds a zip archive with stored entries and verbatim names.
pub fn stored_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Returns `true` if every program is on `PATH`.
pub fn tools_available(tools: &[&str]) -> bool {
    tools.iter().all(|tool| which::which(tool).is_ok())
}

/// Returns early from a test when a program is missing.
macro_rules! require_tools {
    ($($tool:expr),+ $(,)?) => {
        if !common::tools_available(&[$($tool),+]) {
            eprintln!("skipping: {} not installed", [$($tool),+].join(", "));
            return;
        }
    };
}

/// Reporter remembering everything it receives.
#[derive(Default)]
pub struct RecordingReporter {
    pub commands: Mutex<Vec<String>>,
    pub stdout: Mutex<Vec<String>>,
    pub stderr: Mutex<Vec<String>>,
    pub scans_started: Mutex<usize>,
    pub verdicts: Mutex<Vec<PathSafetyVerdict>>,
}

impl Reporter for RecordingReporter {
    fn on_command(&self, command: &str) {
        self.commands.lock().unwrap().push(command.to_string());
    }

    fn on_tool_stdout(&self, line: &str) {
        self.stdout.lock().unwrap().push(line.to_string());
    }

    fn on_tool_stderr(&self, line: &str) {
        self.stderr.lock().unwrap().push(line.to_string());
    }

    fn on_scan_start(&self, _command: &str) {
        *self.scans_started.lock().unwrap() += 1;
    }

    fn on_scan_complete(&self, verdict: &PathSafetyVerdict) {
        self.verdicts.lock().unwrap().push(verdict.clone());
    }
}
