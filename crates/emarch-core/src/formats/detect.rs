//! Archive format detection from file name suffixes.

use crate::ArchiveError;
use crate::Result;

/// Supported archive formats.
///
/// Resolved once per invocation, either from the archive file name or from
/// an explicit format hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// 7-Zip archive (`.7z`).
    SevenZ,
    /// ARC archive (`.arc`).
    Arc,
    /// ARJ archive (`.arj`).
    Arj,
    /// LHa archive (`.lzh`, `.lha`).
    Lha,
    /// Tar archive, uncompressed (`.tar`).
    Tar,
    /// Bzip2-compressed tar (`.tar.bz2`, `.tbz2`, `.tgj`).
    TarBz2,
    /// Bzip2-compressed tar, legacy suffix (`.tar.bz`, `.tbz`). Unpack only.
    TarBz,
    /// Gzip-compressed tar (`.tar.gz`, `.tgz`).
    TarGz,
    /// Unix-compressed tar (`.tar.Z`, `.taz`). Unpack only.
    TarZ,
    /// LZMA-compressed tar (`.tar.lzma`, `.tlz`).
    TarLzma,
    /// XZ-compressed tar (`.tar.xz`, `.txz`).
    TarXz,
    /// ZIP archive (`.zip`, `.jar`).
    Zip,
    /// Single bzip2-compressed file (`.bz2`).
    Bzip2,
    /// Single bzip2-compressed file, legacy suffix (`.bz`). Unpack only.
    Bz,
    /// Single gzip-compressed file (`.gz`).
    Gzip,
    /// Single Unix-compressed file (`.Z`). Unpack only.
    Compress,
    /// Single LZMA-compressed file (`.lzma`).
    Lzma,
    /// Single XZ-compressed file (`.xz`).
    Xz,
}

/// Suffix table in match order.
///
/// Compound suffixes come before the simple suffixes they end with, so that
/// `a.tar.gz` resolves to `TarGz` rather than `Gzip`.
const SUFFIXES: &[(&str, ArchiveFormat)] = &[
    ("7z", ArchiveFormat::SevenZ),
    ("arc", ArchiveFormat::Arc),
    ("arj", ArchiveFormat::Arj),
    ("lzh", ArchiveFormat::Lha),
    ("lha", ArchiveFormat::Lha),
    ("tar", ArchiveFormat::Tar),
    ("tar.bz2", ArchiveFormat::TarBz2),
    ("tbz2", ArchiveFormat::TarBz2),
    ("tgj", ArchiveFormat::TarBz2),
    ("tar.bz", ArchiveFormat::TarBz),
    ("tbz", ArchiveFormat::TarBz),
    ("tar.gz", ArchiveFormat::TarGz),
    ("tgz", ArchiveFormat::TarGz),
    ("tar.z", ArchiveFormat::TarZ),
    ("taz", ArchiveFormat::TarZ),
    ("tar.lzma", ArchiveFormat::TarLzma),
    ("tlz", ArchiveFormat::TarLzma),
    ("tar.xz", ArchiveFormat::TarXz),
    ("txz", ArchiveFormat::TarXz),
    ("zip", ArchiveFormat::Zip),
    ("jar", ArchiveFormat::Zip),
    ("bz2", ArchiveFormat::Bzip2),
    ("bz", ArchiveFormat::Bz),
    ("gz", ArchiveFormat::Gzip),
    ("z", ArchiveFormat::Compress),
    ("lzma", ArchiveFormat::Lzma),
    ("xz", ArchiveFormat::Xz),
];

impl ArchiveFormat {
    /// All formats, in suffix table order.
    pub const ALL: [Self; 18] = [
        Self::SevenZ,
        Self::Arc,
        Self::Arj,
        Self::Lha,
        Self::Tar,
        Self::TarBz2,
        Self::TarBz,
        Self::TarGz,
        Self::TarZ,
        Self::TarLzma,
        Self::TarXz,
        Self::Zip,
        Self::Bzip2,
        Self::Bz,
        Self::Gzip,
        Self::Compress,
        Self::Lzma,
        Self::Xz,
    ];

    /// Resolves a format from an archive name or an explicit format hint.
    ///
    /// The hint may be a bare suffix (`gz`), a dotted suffix (`.gz`), or any
    /// file name or path carrying the suffix (`dir/a.tar.gz`). Matching is
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::UnsupportedFormat` if no suffix matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use emarch_core::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::resolve("a.tar.gz").unwrap(), ArchiveFormat::TarGz);
    /// assert_eq!(ArchiveFormat::resolve("GZ").unwrap(), ArchiveFormat::Gzip);
    /// assert!(ArchiveFormat::resolve("rar").is_err());
    /// ```
    pub fn resolve(hint: &str) -> Result<Self> {
        let name = format!("x.{hint}");
        SUFFIXES
            .iter()
            .find(|(suffix, _)| has_ending(&name, suffix))
            .map(|(_, format)| *format)
            .ok_or_else(|| ArchiveError::UnsupportedFormat {
                format: hint.to_string(),
            })
    }

    /// Returns the canonical suffix of this format, without leading dot.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SevenZ => "7z",
            Self::Arc => "arc",
            Self::Arj => "arj",
            Self::Lha => "lha",
            Self::Tar => "tar",
            Self::TarBz2 => "tar.bz2",
            Self::TarBz => "tar.bz",
            Self::TarGz => "tar.gz",
            Self::TarZ => "tar.Z",
            Self::TarLzma => "tar.lzma",
            Self::TarXz => "tar.xz",
            Self::Zip => "zip",
            Self::Bzip2 => "bz2",
            Self::Bz => "bz",
            Self::Gzip => "gz",
            Self::Compress => "Z",
            Self::Lzma => "lzma",
            Self::Xz => "xz",
        }
    }

    /// Returns all suffixes recognized for this format.
    #[must_use]
    pub fn suffixes(self) -> Vec<&'static str> {
        SUFFIXES
            .iter()
            .filter(|(_, format)| *format == self)
            .map(|(suffix, _)| *suffix)
            .collect()
    }

    /// Returns `true` if archives of this format can be created.
    #[must_use]
    pub const fn can_pack(self) -> bool {
        !matches!(self, Self::TarBz | Self::TarZ | Self::Bz | Self::Compress)
    }

    /// Returns `true` for formats that hold exactly one compressed file.
    #[must_use]
    pub const fn is_single_stream(self) -> bool {
        matches!(
            self,
            Self::Bzip2 | Self::Bz | Self::Gzip | Self::Compress | Self::Lzma | Self::Xz
        )
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tests whether `name` ends with `.<ending>`, ignoring ASCII case.
///
/// One leading dot of `ending` is ignored. The stem before the dot must not
/// be empty, so `.gz` alone does not end with `gz`.
///
/// # Examples
///
/// ```
/// use emarch_core::formats::detect::has_ending;
///
/// assert!(has_ending("a.TAR.gz", "tar.gz"));
/// assert!(has_ending("a.gz", ".gz"));
/// assert!(!has_ending("a.tgz", "gz"));
/// assert!(!has_ending(".gz", "gz"));
/// ```
#[must_use]
pub fn has_ending(name: &str, ending: &str) -> bool {
    let ending = ending.strip_prefix('.').unwrap_or(ending);
    let Some(i) = name.len().checked_sub(ending.len()) else {
        return false;
    };
    i >= 2
        && name.as_bytes()[i - 1] == b'.'
        && name
            .get(i..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(ending))
}

/// Tests whether a file name carries any suffix at all.
///
/// The first dot must be neither the first nor the last character.
#[must_use]
pub fn has_any_ending(name: &str) -> bool {
    name.find('.')
        .is_some_and(|i| i >= 1 && i + 1 < name.len())
}

/// Tests whether a file name is a DOS 8.3 name.
#[must_use]
pub fn is_dos_file_name(name: &str) -> bool {
    let len = name.chars().count();
    name.chars()
        .position(|c| c == '.')
        .is_some_and(|i| len <= 12 && i + 4 >= len)
}
