//! End-to-end pack and unpack tests against the installed tools.
//!
//! Each test skips itself when a required program is not on `PATH`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

#[macro_use]
mod common;

use std::fs;
use std::path::Path;

use emarch_core::ArchiveError;
use emarch_core::ArchiveFormat;
use emarch_core::OperationReport;
use emarch_core::PackEngine;
use emarch_core::PathSafetyVerdict;
use emarch_core::ToolConfig;
use emarch_core::UnpackEngine;
use emarch_core::UnsafeKind;
use emarch_core::report::NoopReporter;
use tempfile::TempDir;

use common::RecordingReporter;

static QUIET: NoopReporter = NoopReporter;

/// Creates `dirA/inner.txt` and `fileB` in a fresh directory.
fn source_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("dirA")).unwrap();
    fs::write(temp.path().join("dirA/inner.txt"), "inner content").unwrap();
    fs::write(temp.path().join("fileB"), "file b content").unwrap();
    temp
}

fn pack(dir: &Path, format: ArchiveFormat, archive: &str, inputs: &[&str]) {
    PackEngine::new(ToolConfig::default(), &QUIET)
        .in_dir(dir)
        .pack(format, archive, inputs)
        .unwrap();
}

fn unpack(
    dir: &Path,
    format: ArchiveFormat,
    archive: &Path,
) -> emarch_core::Result<OperationReport> {
    UnpackEngine::new(ToolConfig::default(), &QUIET)
        .in_dir(dir)
        .unpack(format, archive, false)
}

fn assert_tree_restored(dir: &Path) {
    assert_eq!(
        fs::read_to_string(dir.join("dirA/inner.txt")).unwrap(),
        "inner content"
    );
    assert_eq!(fs::read_to_string(dir.join("fileB")).unwrap(), "file b content");
}

fn round_trip(format: ArchiveFormat, archive: &str) {
    let src = source_tree();
    pack(src.path(), format, archive, &["dirA", "fileB"]);

    let dest = TempDir::new().unwrap();
    let report = unpack(dest.path(), format, &src.path().join(archive)).unwrap();
    assert!(report.verdict.as_ref().is_some_and(PathSafetyVerdict::is_clear));
    assert_tree_restored(dest.path());
}

#[test]
fn test_tar_round_trip() {
    require_tools!("tar");
    round_trip(ArchiveFormat::Tar, "out.tar");
}

#[test]
fn test_tar_gz_round_trip() {
    require_tools!("tar", "gzip");
    round_trip(ArchiveFormat::TarGz, "out.tar.gz");
}

#[test]
fn test_tar_bz2_round_trip() {
    require_tools!("tar", "bzip2");
    round_trip(ArchiveFormat::TarBz2, "out.tbz2");
}

#[test]
fn test_tar_xz_round_trip() {
    require_tools!("tar", "xz");
    round_trip(ArchiveFormat::TarXz, "out.txz");
}

#[test]
fn test_zip_round_trip() {
    require_tools!("zip", "unzip");
    round_trip(ArchiveFormat::Zip, "out.zip");
}

#[test]
fn test_single_stream_round_trips() {
    for (format, tool, archive) in [
        (ArchiveFormat::Gzip, "gzip", "fileB.gz"),
        (ArchiveFormat::Bzip2, "bzip2", "fileB.bz2"),
        (ArchiveFormat::Xz, "xz", "fileB.xz"),
        (ArchiveFormat::Lzma, "xz", "fileB.lzma"),
    ] {
        if !common::tools_available(&[tool]) {
            eprintln!("skipping {format}: {tool} not installed");
            continue;
        }
        let src = source_tree();
        pack(src.path(), format, archive, &["fileB"]);

        let dest = TempDir::new().unwrap();
        let report = unpack(dest.path(), format, &src.path().join(archive)).unwrap();
        assert!(report.verdict.is_none(), "{format} must not be scanned");
        assert_eq!(report.output.as_deref(), Some(Path::new("fileB")));
        assert_eq!(
            fs::read_to_string(dest.path().join("fileB")).unwrap(),
            "file b content"
        );
    }
}

#[test]
fn test_pack_replaces_stale_archive() {
    require_tools!("tar");
    let src = source_tree();
    fs::write(src.path().join("out.tar"), "not a tar archive").unwrap();

    pack(src.path(), ArchiveFormat::Tar, "out.tar", &["fileB"]);

    let dest = TempDir::new().unwrap();
    unpack(dest.path(), ArchiveFormat::Tar, &src.path().join("out.tar")).unwrap();
    assert!(dest.path().join("fileB").is_file());
    assert!(!dest.path().join("dirA").exists());
}

#[test]
fn test_tar_up_going_path_rejected() {
    require_tools!("tar");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.tar");
    fs::write(
        &archive,
        common::raw_tar(&[("good.txt", "ok"), ("../evil.txt", "pwned")]),
    )
    .unwrap();
    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();

    let err = unpack(&dest, ArchiveFormat::Tar, &archive).unwrap_err();
    match err {
        ArchiveError::UnsafeArchive { kind, line } => {
            assert_eq!(kind, UnsafeKind::IllPath);
            assert_eq!(line, "../evil.txt");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dest.join("good.txt").exists(), "nothing may be extracted");
    assert!(!temp.path().join("evil.txt").exists());
}

#[test]
fn test_tar_gz_drive_letter_rejected() {
    require_tools!("tar", "gzip");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.tgz");
    fs::write(&archive, common::gzip(&common::raw_tar(&[("C:evil.txt", "x")]))).unwrap();

    let err = unpack(temp.path(), ArchiveFormat::TarGz, &archive).unwrap_err();
    assert!(err.is_security_violation());
    assert!(err.to_string().contains("C:evil.txt"));
}

#[test]
fn test_tar_device_name_rejected() {
    require_tools!("tar");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("dev.tar");
    fs::write(&archive, common::raw_tar(&[("docs/AUX.txt", "x")])).unwrap();
    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();

    match unpack(&dest, ArchiveFormat::Tar, &archive).unwrap_err() {
        ArchiveError::UnsafeArchive { kind, line } => {
            assert_eq!(kind, UnsafeKind::DeviceName);
            assert_eq!(line, "docs/AUX.txt");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dest.join("docs").exists());
}

#[test]
fn test_ill_path_reported_before_device_name() {
    require_tools!("tar");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("both.tar");
    fs::write(
        &archive,
        common::raw_tar(&[("nul", "x"), ("../up.txt", "y")]),
    )
    .unwrap();

    match unpack(temp.path(), ArchiveFormat::Tar, &archive).unwrap_err() {
        ArchiveError::UnsafeArchive { kind, line } => {
            assert_eq!(kind, UnsafeKind::IllPath);
            assert_eq!(line, "../up.txt");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_zip_up_going_path_rejected() {
    require_tools!("unzip");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    fs::write(
        &archive,
        common::stored_zip(&[("fine.txt", "ok"), ("../evil.txt", "pwned")]),
    )
    .unwrap();
    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();

    let err = unpack(&dest, ArchiveFormat::Zip, &archive).unwrap_err();
    match err {
        ArchiveError::UnsafeArchive { kind, line } => {
            assert_eq!(kind, UnsafeKind::IllPath);
            assert!(line.ends_with("../evil.txt"), "{line}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dest.join("fine.txt").exists());
}

#[test]
fn test_trust_skips_scan() {
    require_tools!("tar");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("plain.tar");
    fs::write(&archive, common::raw_tar(&[("plain.txt", "plain")])).unwrap();
    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();

    let reporter = RecordingReporter::default();
    let report = UnpackEngine::new(ToolConfig::default(), &reporter)
        .in_dir(&dest)
        .unpack(ArchiveFormat::Tar, &archive, true)
        .unwrap();

    assert!(!report.was_scanned());
    assert_eq!(report.commands.len(), 1);
    assert_eq!(*reporter.scans_started.lock().unwrap(), 0);
    assert_eq!(reporter.commands.lock().unwrap().len(), 1);
    assert_eq!(fs::read_to_string(dest.join("plain.txt")).unwrap(), "plain");
}

#[test]
fn test_trust_unpacks_archive_the_scan_rejects() {
    require_tools!("tar");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("dev.tar");
    fs::write(&archive, common::raw_tar(&[("docs/AUX.txt", "device")])).unwrap();
    let dest = temp.path().join("dest");
    fs::create_dir(&dest).unwrap();

    let err = unpack(&dest, ArchiveFormat::Tar, &archive).unwrap_err();
    assert!(matches!(
        err,
        ArchiveError::UnsafeArchive { kind: UnsafeKind::DeviceName, .. }
    ));
    assert!(!dest.join("docs").exists());

    let reporter = RecordingReporter::default();
    let report = UnpackEngine::new(ToolConfig::default(), &reporter)
        .in_dir(&dest)
        .unpack(ArchiveFormat::Tar, &archive, true)
        .unwrap();

    assert!(report.verdict.is_none());
    assert_eq!(report.commands.len(), 1);
    assert!(report.commands[0].starts_with("tar xvf - < "));
    assert_eq!(*reporter.scans_started.lock().unwrap(), 0);
    assert_eq!(
        fs::read_to_string(dest.join("docs/AUX.txt")).unwrap(),
        "device"
    );
}

#[test]
fn test_scan_events_reported() {
    require_tools!("tar");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("plain.tar");
    fs::write(
        &archive,
        common::raw_tar(&[("a.txt", "a"), ("b.txt", "b")]),
    )
    .unwrap();

    let reporter = RecordingReporter::default();
    let report = UnpackEngine::new(ToolConfig::default(), &reporter)
        .in_dir(temp.path())
        .unpack(ArchiveFormat::Tar, &archive, false)
        .unwrap();

    assert_eq!(report.commands.len(), 2);
    assert!(report.commands[0].starts_with("tar tf - < "));
    assert_eq!(*reporter.scans_started.lock().unwrap(), 1);
    assert_eq!(
        *reporter.verdicts.lock().unwrap(),
        [PathSafetyVerdict::Clear { lines_scanned: 2 }]
    );
    // `tar xvf` names each entry; the listing itself is not relayed.
    let stdout = reporter.stdout.lock().unwrap();
    assert!(stdout.iter().any(|line| line == "a.txt"));
    assert_eq!(stdout.iter().filter(|line| *line == "a.txt").count(), 1);
}

#[test]
fn test_corrupt_archive_propagates_tool_failure() {
    require_tools!("tar", "gzip");
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("broken.tgz");
    fs::write(&archive, "definitely not gzip").unwrap();

    let err = unpack(temp.path(), ArchiveFormat::TarGz, &archive).unwrap_err();
    assert!(matches!(err, ArchiveError::UnpackToolFailed { .. }));
    assert_ne!(err.exit_code(), 0);
    assert!(err.tool_command().unwrap().contains("| tar tf -"));
}

#[test]
fn test_existing_single_stream_target() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("data"), "keep").unwrap();

    let err = unpack(temp.path(), ArchiveFormat::Xz, Path::new("missing/data.xz")).unwrap_err();
    assert!(matches!(err, ArchiveError::TargetAlreadyExists { .. }));
    assert_eq!(fs::read_to_string(temp.path().join("data")).unwrap(), "keep");
}

#[test]
fn test_missing_tool_is_spawn_failure() {
    if common::tools_available(&["arj"]) {
        eprintln!("skipping: arj is installed");
        return;
    }
    let temp = TempDir::new().unwrap();
    let err = unpack(temp.path(), ArchiveFormat::Arj, Path::new("a.arj")).unwrap_err();
    match err {
        ArchiveError::ProcessSpawnFailed { command, .. } => assert_eq!(command, "arj v a.arj"),
        other => panic!("unexpected error: {other:?}"),
    }
}
