//! Tool chains for each archive layout.
//!
//! A format's layout decides which programs pack, list and extract it. The
//! chains built here are plain descriptions; nothing runs until they are
//! handed to a [`ToolInvoker`](crate::process::ToolInvoker).

use std::path::Path;
use std::path::PathBuf;

use super::codec::Codec;
use super::detect::ArchiveFormat;
use crate::config::ToolConfig;
use crate::config::ZipTool;
use crate::process::Stage;
use crate::process::ToolChain;
use crate::security::ListingHeader;
use crate::security::ListingStyle;

/// Self-contained archiver programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archiver {
    /// `7za`.
    SevenZip,
    /// `arc`.
    Arc,
    /// `arj`.
    Arj,
    /// `lha`.
    Lha,
    /// Info-ZIP `zip`/`unzip`, or `7za` in zip mode.
    Zip,
}

/// How a format is produced and consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One archiver program does everything.
    Archiver(Archiver),
    /// `tar` piped through an optional stream codec.
    TarStream(Option<Codec>),
    /// A single compressed file.
    SingleStream(Codec),
}

/// A listing chain together with the way its output is scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Chain printing the archive's entries.
    pub chain: ToolChain,
    /// Shape of the listing lines.
    pub style: ListingStyle,
    /// Boilerplate lines to skip.
    pub header: ListingHeader,
}

impl ArchiveFormat {
    /// Returns the layout of this format.
    #[must_use]
    pub const fn layout(self) -> Layout {
        match self {
            Self::SevenZ => Layout::Archiver(Archiver::SevenZip),
            Self::Arc => Layout::Archiver(Archiver::Arc),
            Self::Arj => Layout::Archiver(Archiver::Arj),
            Self::Lha => Layout::Archiver(Archiver::Lha),
            Self::Zip => Layout::Archiver(Archiver::Zip),
            Self::Tar => Layout::TarStream(None),
            Self::TarBz2 | Self::TarBz => Layout::TarStream(Some(Codec::Bzip2)),
            Self::TarGz => Layout::TarStream(Some(Codec::Gzip)),
            Self::TarZ => Layout::TarStream(Some(Codec::Compress)),
            Self::TarLzma => Layout::TarStream(Some(Codec::Lzma)),
            Self::TarXz => Layout::TarStream(Some(Codec::Xz)),
            Self::Bzip2 | Self::Bz => Layout::SingleStream(Codec::Bzip2),
            Self::Gzip => Layout::SingleStream(Codec::Gzip),
            Self::Compress => Layout::SingleStream(Codec::Compress),
            Self::Lzma => Layout::SingleStream(Codec::Lzma),
            Self::Xz => Layout::SingleStream(Codec::Xz),
        }
    }
}

impl Archiver {
    /// Name used in messages.
    #[must_use]
    pub const fn tool_name(self) -> &'static str {
        match self {
            Self::SevenZip => "7za",
            Self::Arc => "arc",
            Self::Arj => "arj",
            Self::Lha => "lha",
            Self::Zip => "zip",
        }
    }

    /// Builds the chains creating `archive` from `inputs`.
    ///
    /// arj takes one input per call, so it yields one chain per input.
    #[must_use]
    pub fn pack_chains(
        self,
        config: &ToolConfig,
        archive: &Path,
        inputs: &[PathBuf],
    ) -> Vec<ToolChain> {
        match self {
            Self::SevenZip => vec![ToolChain::new(
                Stage::new("7za").args(["a", "--"]).arg(archive).args(inputs),
            )],
            Self::Arc => vec![ToolChain::new(Stage::new("arc").arg("a").arg(archive).args(inputs))],
            Self::Arj => inputs
                .iter()
                .map(|input| {
                    ToolChain::new(
                        Stage::new("arj")
                            .args(["a", "-r", "--"])
                            .arg(archive)
                            .arg(input),
                    )
                })
                .collect(),
            Self::Lha => vec![ToolChain::new(
                Stage::new("lha").arg("av").arg(archive).args(inputs),
            )],
            Self::Zip => match config.zip {
                ZipTool::InfoZip => vec![ToolChain::new(
                    Stage::new("zip")
                        .args(["-r", "-9"])
                        .arg(archive)
                        .arg("--")
                        .args(inputs),
                )],
                ZipTool::SevenZip => vec![ToolChain::new(
                    Stage::new("7za")
                        .args(["a", "-tzip", "--"])
                        .arg(archive)
                        .args(inputs),
                )],
            },
        }
    }

    /// Builds the listing used for the path-safety scan.
    #[must_use]
    pub fn listing(self, config: &ToolConfig, archive: &Path) -> Listing {
        let (stage, header) = match (self, config.zip) {
            (Self::SevenZip, _) | (Self::Zip, ZipTool::SevenZip) => {
                (Stage::new("7za").arg("l"), ListingHeader::SevenZip)
            }
            (Self::Arc, _) => (Stage::new("arc").arg("l"), ListingHeader::Blank),
            (Self::Arj, _) => (Stage::new("arj").arg("v"), ListingHeader::Arj),
            (Self::Lha, _) => (Stage::new("lha").arg("l"), ListingHeader::Blank),
            (Self::Zip, ZipTool::InfoZip) => (Stage::new("unzip").arg("-l"), ListingHeader::Unzip),
        };
        Listing {
            chain: ToolChain::new(stage.arg(archive)),
            style: ListingStyle::InfoList,
            header,
        }
    }

    /// Builds the chain extracting `archive`, overwriting without asking.
    #[must_use]
    pub fn extraction(self, config: &ToolConfig, archive: &Path) -> ToolChain {
        let stage = match (self, config.zip) {
            (Self::SevenZip, _) | (Self::Zip, ZipTool::SevenZip) => {
                Stage::new("7za").args(["x", "-aoa"])
            }
            (Self::Arc, _) => Stage::new("arc").arg("xo"),
            (Self::Arj, _) => Stage::new("arj").args(["x", "-y"]),
            (Self::Lha, _) => Stage::new("lha").arg("xfv"),
            (Self::Zip, ZipTool::InfoZip) => Stage::new("unzip").arg("-o"),
        };
        ToolChain::new(stage.arg(archive))
    }
}

/// `tar cvf - -- <inputs> [| <compress>] > <archive>`.
#[must_use]
pub fn tar_pack_chain(
    codec: Option<Codec>,
    config: &ToolConfig,
    archive: &Path,
    inputs: &[PathBuf],
) -> ToolChain {
    let tar = ToolChain::new(Stage::new("tar").args(["cvf", "-", "--"]).args(inputs));
    let chain = match codec {
        Some(codec) => tar.pipe(codec.compressor(config)),
        None => tar,
    };
    chain.write_to(archive)
}

/// `[<decompress> < <archive> |] tar <mode> -`, reading the archive itself
/// when uncompressed.
fn tar_reading(codec: Option<Codec>, config: &ToolConfig, archive: &Path, mode: &str) -> ToolChain {
    let tar = Stage::new("tar").args([mode, "-"]);
    match codec {
        Some(codec) => ToolChain::new(codec.decompressor(config))
            .read_from(archive)
            .pipe(tar),
        None => ToolChain::new(tar).read_from(archive),
    }
}

/// Listing of a tar stream, one bare path per line.
#[must_use]
pub fn tar_listing(codec: Option<Codec>, config: &ToolConfig, archive: &Path) -> Listing {
    Listing {
        chain: tar_reading(codec, config, archive, "tf"),
        style: ListingStyle::PureList,
        header: ListingHeader::Blank,
    }
}

/// Extraction of a tar stream into the working directory.
#[must_use]
pub fn tar_extraction(codec: Option<Codec>, config: &ToolConfig, archive: &Path) -> ToolChain {
    tar_reading(codec, config, archive, "xvf")
}

/// `<compress> < <input> > <archive>`.
#[must_use]
pub fn stream_pack_chain(
    codec: Codec,
    config: &ToolConfig,
    archive: &Path,
    input: &Path,
) -> ToolChain {
    ToolChain::new(codec.compressor(config))
        .read_from(input)
        .write_to(archive)
}

/// `<decompress> < <archive> > <target>`.
#[must_use]
pub fn stream_extraction(
    codec: Codec,
    config: &ToolConfig,
    archive: &Path,
    target: &Path,
) -> ToolChain {
    ToolChain::new(codec.decompressor(config))
        .read_from(archive)
        .write_to(target)
}

impl Layout {
    /// Builds the chains creating `archive`.
    ///
    /// Single-stream layouts use the first input only; callers reject
    /// multiple inputs beforehand.
    #[must_use]
    pub fn pack_chains(
        self,
        config: &ToolConfig,
        archive: &Path,
        inputs: &[PathBuf],
    ) -> Vec<ToolChain> {
        match self {
            Self::Archiver(archiver) => archiver.pack_chains(config, archive, inputs),
            Self::TarStream(codec) => vec![tar_pack_chain(codec, config, archive, inputs)],
            Self::SingleStream(codec) => inputs
                .first()
                .map(|input| stream_pack_chain(codec, config, archive, input))
                .into_iter()
                .collect(),
        }
    }

    /// Builds the listing to scan before extraction. Single streams have
    /// nothing to list.
    #[must_use]
    pub fn listing(self, config: &ToolConfig, archive: &Path) -> Option<Listing> {
        match self {
            Self::Archiver(archiver) => Some(archiver.listing(config, archive)),
            Self::TarStream(codec) => Some(tar_listing(codec, config, archive)),
            Self::SingleStream(_) => None,
        }
    }
}
