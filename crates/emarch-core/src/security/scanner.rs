//! Heuristic scan of archive listings for dangerous paths.
//!
//! Before unpacking, the archive is listed with the same tool family that
//! will extract it, and every listing line is matched against two patterns:
//! one for absolute, up-going or drive-letter paths and one for reserved
//! Windows device names. The patterns are deliberately coarse. Harmless
//! names such as `bla ../bla` are refused too, and callers rely on exactly
//! this accept/reject behavior, so the patterns must not be tightened.

use std::sync::LazyLock;

use regex::Regex;

use crate::ArchiveError;
use crate::Result;
use crate::UnsafeKind;
use crate::process::InvokeError;
use crate::process::ToolChain;
use crate::process::ToolInvoker;

/// Shape of a listing tool's output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStyle {
    /// One bare path per line (`tar tf`).
    PureList,
    /// Columns of sizes, dates and attributes around the path (`unzip -l`,
    /// `7za l`, `arj v`).
    InfoList,
}

/// Boilerplate lines of a listing tool that must not be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingHeader {
    /// Only empty lines (tar, arc, lha).
    Blank,
    /// `7za l` headers naming the archive itself.
    SevenZip,
    /// `arj v` header naming the archive itself.
    Arj,
    /// `unzip -l` header naming the archive itself.
    Unzip,
}

#[allow(clippy::expect_used)]
fn builtin(pattern: &str) -> Regex {
    // Built-in patterns are constants exercised by the unit tests.
    Regex::new(pattern).expect("built-in listing pattern must compile")
}

static PURE_ILL_PATH: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"(^\s*((((.*[\\/])|)\.\.)|)[\\/])|:"));
static PURE_DEVICE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    builtin(r"(?i)((^\s*)|[\\/])(aux|(com[0-9])|con|(lpt[0-9])|nul|prn)(\.|[\\/]|(\s*$))")
});
static INFO_ILL_PATH: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"(^|\s)((((((.*[\\/])|)\.\.)|)[\\/])|(.:))"));
static INFO_DEVICE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    builtin(r"(?i)(^|\s|[\\/])(aux|(com[0-9])|con|(lpt[0-9])|nul|prn)(\.|[\\/]|\s|$)")
});

static IGNORE_BLANK: LazyLock<Regex> = LazyLock::new(|| builtin(r"^$"));
static IGNORE_SEVEN_ZIP: LazyLock<Regex> =
    LazyLock::new(|| builtin(r"^(Listing archive:|Path =)"));
static IGNORE_ARJ: LazyLock<Regex> = LazyLock::new(|| builtin(r"^Processing archive:"));
static IGNORE_UNZIP: LazyLock<Regex> = LazyLock::new(|| builtin(r"^Archive:"));

impl ListingStyle {
    /// Pattern matching absolute, up-going or drive-letter paths.
    #[must_use]
    pub fn ill_path_pattern(self) -> &'static Regex {
        match self {
            Self::PureList => &*PURE_ILL_PATH,
            Self::InfoList => &*INFO_ILL_PATH,
        }
    }

    /// Pattern matching reserved device names as path segments.
    #[must_use]
    pub fn device_name_pattern(self) -> &'static Regex {
        match self {
            Self::PureList => &*PURE_DEVICE_NAME,
            Self::InfoList => &*INFO_DEVICE_NAME,
        }
    }
}

impl ListingHeader {
    /// Pattern matching the lines to skip.
    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Blank => &*IGNORE_BLANK,
            Self::SevenZip => &*IGNORE_SEVEN_ZIP,
            Self::Arj => &*IGNORE_ARJ,
            Self::Unzip => &*IGNORE_UNZIP,
        }
    }
}

/// Outcome of a listing scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSafetyVerdict {
    /// Nothing suspicious was found.
    Clear {
        /// Number of listing lines read.
        lines_scanned: usize,
    },
    /// A dangerous line was found.
    Rejected {
        /// What was found.
        kind: UnsafeKind,
        /// The offending listing line.
        line: String,
    },
}

impl PathSafetyVerdict {
    /// Returns `true` if the archive may be unpacked.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        matches!(self, Self::Clear { .. })
    }

    /// Converts a rejection into `ArchiveError::UnsafeArchive`.
    pub fn into_result(self) -> Result<usize> {
        match self {
            Self::Clear { lines_scanned } => Ok(lines_scanned),
            Self::Rejected { kind, line } => Err(ArchiveError::UnsafeArchive { kind, line }),
        }
    }
}

/// Line-by-line scanner over an archive listing.
///
/// # Examples
///
/// ```
/// use emarch_core::security::ListingHeader;
/// use emarch_core::security::ListingStyle;
/// use emarch_core::security::PathSafetyScanner;
///
/// let mut scanner = PathSafetyScanner::new(ListingStyle::PureList, ListingHeader::Blank);
/// scanner.inspect("docs/readme.txt");
/// scanner.inspect("../../etc/passwd");
/// assert!(!scanner.finish().is_clear());
/// ```
#[derive(Debug, Clone)]
pub struct PathSafetyScanner {
    ignore: Regex,
    ill_path: Regex,
    device_name: Regex,
    first_ill_path: Option<String>,
    first_device_name: Option<String>,
    lines_scanned: usize,
}

impl PathSafetyScanner {
    /// Creates a scanner with the built-in patterns for a listing style.
    #[must_use]
    pub fn new(style: ListingStyle, header: ListingHeader) -> Self {
        Self::with_patterns(
            header.pattern().clone(),
            style.ill_path_pattern().clone(),
            style.device_name_pattern().clone(),
        )
    }

    /// Creates a scanner with caller-supplied patterns.
    #[must_use]
    pub fn with_patterns(ignore: Regex, ill_path: Regex, device_name: Regex) -> Self {
        Self {
            ignore,
            ill_path,
            device_name,
            first_ill_path: None,
            first_device_name: None,
            lines_scanned: 0,
        }
    }

    /// Checks one listing line.
    ///
    /// Only the first offending line of each kind is kept.
    pub fn inspect(&mut self, line: &str) {
        self.lines_scanned += 1;
        if self.ignore.is_match(line) {
            return;
        }
        if self.first_ill_path.is_none() && self.ill_path.is_match(line) {
            self.first_ill_path = Some(line.to_string());
        }
        if self.first_device_name.is_none() && self.device_name.is_match(line) {
            self.first_device_name = Some(line.to_string());
        }
    }

    /// Number of lines inspected so far, ignored ones included.
    #[must_use]
    pub const fn lines_scanned(&self) -> usize {
        self.lines_scanned
    }

    /// Returns the verdict. Ill paths take precedence over device names.
    ///
    /// The whole listing is read, so an ill path is reported even when a
    /// device name appears earlier. For `nul` followed by `../up.txt` the
    /// verdict names `../up.txt`. Either way the archive is rejected.
    #[must_use]
    pub fn finish(self) -> PathSafetyVerdict {
        if let Some(line) = self.first_ill_path {
            PathSafetyVerdict::Rejected {
                kind: UnsafeKind::IllPath,
                line,
            }
        } else if let Some(line) = self.first_device_name {
            PathSafetyVerdict::Rejected {
                kind: UnsafeKind::DeviceName,
                line,
            }
        } else {
            PathSafetyVerdict::Clear {
                lines_scanned: self.lines_scanned,
            }
        }
    }
}

/// Runs a listing chain and scans its standard output.
///
/// The listing's standard error is relayed as usual. A failing listing tool
/// is reported as an error, not as a verdict.
pub fn scan_listing(
    invoker: &ToolInvoker<'_>,
    chain: &ToolChain,
    mut scanner: PathSafetyScanner,
) -> std::result::Result<PathSafetyVerdict, InvokeError> {
    let reporter = invoker.reporter();
    reporter.on_scan_start(&chain.to_string());
    invoker.run_with(chain, |line| {
        scanner.inspect(line);
        reporter.on_scan_progress(scanner.lines_scanned());
    })?;
    let verdict = scanner.finish();
    reporter.on_scan_complete(&verdict);
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(style: ListingStyle, header: ListingHeader, lines: &[&str]) -> PathSafetyVerdict {
        let mut scanner = PathSafetyScanner::new(style, header);
        for line in lines {
            scanner.inspect(line);
        }
        scanner.finish()
    }

    fn pure(lines: &[&str]) -> PathSafetyVerdict {
        scan(ListingStyle::PureList, ListingHeader::Blank, lines)
    }

    #[test]
    fn test_pure_list_benign() {
        let verdict = pure(&["dirA/", "dirA/file.txt", "dirA/sub/deep.bin", "fileB", ""]);
        assert_eq!(verdict, PathSafetyVerdict::Clear { lines_scanned: 5 });
    }

    #[test]
    fn test_pure_list_absolute() {
        let verdict = pure(&["ok.txt", "/etc/passwd"]);
        assert_eq!(
            verdict,
            PathSafetyVerdict::Rejected {
                kind: UnsafeKind::IllPath,
                line: "/etc/passwd".into()
            }
        );
    }

    #[test]
    fn test_pure_list_backslash_root() {
        assert!(!pure(&["\\windows\\system32"]).is_clear());
        assert!(!pure(&["  /leading/space"]).is_clear());
    }

    #[test]
    fn test_pure_list_traversal() {
        assert!(!pure(&["../evil.txt"]).is_clear());
        assert!(!pure(&["a/b/../../../evil.txt"]).is_clear());
        assert!(!pure(&["a\\..\\..\\evil.txt"]).is_clear());
    }

    #[test]
    fn test_pure_list_drive_letter() {
        assert!(!pure(&["C:evil.txt"]).is_clear());
        assert!(!pure(&["C:\\evil.txt"]).is_clear());
    }

    #[test]
    fn test_pure_list_dots_in_names_allowed() {
        assert!(pure(&["a..b/file", "dir/..hidden", "x/y.tar.gz"]).is_clear());
    }

    #[test]
    fn test_info_list_false_positives_kept() {
        // Harmless names with a space before "/" or "../" are refused.
        let style = ListingStyle::InfoList;
        assert!(!scan(style, ListingHeader::Blank, &["bla ../bla"]).is_clear());
        assert!(!scan(style, ListingHeader::Blank, &["bla /bla"]).is_clear());
    }

    #[test]
    fn test_pure_list_device_names() {
        for line in ["aux", "con.txt", "dir/nul", "dir/PRN.log", "com1", "LPT9/x", "a\\con"] {
            let verdict = pure(&[line]);
            assert_eq!(
                verdict,
                PathSafetyVerdict::Rejected {
                    kind: UnsafeKind::DeviceName,
                    line: line.to_string()
                },
                "line {line:?}"
            );
        }
    }

    #[test]
    fn test_pure_list_device_like_names_allowed() {
        assert!(pure(&["auxiliary.txt", "console/", "nullable", "com/x", "dir/prnt"]).is_clear());
    }

    #[test]
    fn test_info_list_benign_unzip() {
        let verdict = scan(
            ListingStyle::InfoList,
            ListingHeader::Unzip,
            &[
                "Archive:  /tmp/x/archive.zip",
                "  Length      Date    Time    Name",
                "---------  ---------- -----   ----",
                "       12  2024-01-01 12:00   dirA/file.txt",
                "        0  2024-01-01 12:00   dirA/",
                "---------                     -------",
                "       12                     2 files",
            ],
        );
        assert!(verdict.is_clear());
    }

    #[test]
    fn test_info_list_header_ignored() {
        // The archive path itself is absolute but lives in an ignored header.
        let verdict = scan(
            ListingStyle::InfoList,
            ListingHeader::SevenZip,
            &["Listing archive: /home/u/a.7z", "Path = /home/u/a.7z", "file.txt"],
        );
        assert!(verdict.is_clear());
    }

    #[test]
    fn test_info_list_absolute_and_traversal() {
        let header = ListingHeader::Unzip;
        let style = ListingStyle::InfoList;
        assert!(!scan(style, header, &["       12  2024-01-01 12:00   /etc/passwd"]).is_clear());
        assert!(!scan(style, header, &["       12  2024-01-01 12:00   ../evil"]).is_clear());
        assert!(!scan(style, header, &["       12  2024-01-01 12:00   x/../../evil"]).is_clear());
        assert!(!scan(style, header, &["       12  2024-01-01 12:00   C:evil"]).is_clear());
    }

    #[test]
    fn test_info_list_device_name() {
        let verdict = scan(
            ListingStyle::InfoList,
            ListingHeader::Unzip,
            &["       12  2024-01-01 12:00   dir/aux.h"],
        );
        assert!(matches!(
            verdict,
            PathSafetyVerdict::Rejected {
                kind: UnsafeKind::DeviceName,
                ..
            }
        ));
    }

    #[test]
    fn test_first_offending_line_kept() {
        let verdict = pure(&["ok", "../first", "../second"]);
        assert_eq!(
            verdict,
            PathSafetyVerdict::Rejected {
                kind: UnsafeKind::IllPath,
                line: "../first".into()
            }
        );
    }

    #[test]
    fn test_ill_path_reported_before_device_name() {
        let verdict = pure(&["nul", "/abs"]);
        assert!(matches!(
            verdict,
            PathSafetyVerdict::Rejected {
                kind: UnsafeKind::IllPath,
                ..
            }
        ));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(pure(&["a", "b"]).into_result().ok(), Some(2));
        let err = pure(&["/x"]).into_result().unwrap_err();
        assert!(err.is_security_violation());
    }

    #[test]
    fn test_custom_patterns() {
        let mut scanner = PathSafetyScanner::with_patterns(
            Regex::new("^#").unwrap(),
            Regex::new("evil").unwrap(),
            Regex::new("^never$").unwrap(),
        );
        scanner.inspect("# evil comment");
        assert!(scanner.clone().finish().is_clear());
        scanner.inspect("evil.txt");
        assert!(!scanner.finish().is_clear());
    }
}
