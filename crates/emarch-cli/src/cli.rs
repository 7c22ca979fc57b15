//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use emarch_core::ToolConfig;
use emarch_core::config::Bzip2Tool;
use emarch_core::config::GzipTool;
use emarch_core::config::XzTool;
use emarch_core::config::ZipTool;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Supported formats (by file name suffix, case-insensitive):
  7z                  7za
  arc                 arc
  arj                 arj
  lzh, lha            lha
  tar                 tar
  tar.bz2, tbz2, tgj  tar + bzip2
  tar.bz, tbz         tar + bzip2 (unpack only)
  tar.gz, tgz         tar + gzip
  tar.Z, taz          tar + gzip (unpack only)
  tar.lzma, tlz       tar + xz --format=lzma
  tar.xz, txz         tar + xz
  zip, jar            zip/unzip or 7za
  bz2                 bzip2
  bz                  bzip2 (unpack only)
  gz                  gzip
  Z                   gzip (unpack only)
  lzma                xz --format=lzma
  xz                  xz

Security: before unpacking, the archive listing is scanned for absolute
paths, up-going paths (..), drive letters and Windows device names. If any
is found, nothing is unpacked. Use --trust to skip the scan.
Unpacking always targets the current directory and overwrites existing
files, except that a single compressed file never overwrites its output.";

#[derive(Parser)]
#[command(name = "emarch")]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show the command lines run and a summary
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Program for gzip streams
    #[arg(long, global = true, value_enum, default_value_t = GzipChoice::Gzip)]
    pub gzip_tool: GzipChoice,

    /// Program for bzip2 streams
    #[arg(long, global = true, value_enum, default_value_t = Bzip2Choice::Bzip2)]
    pub bzip2_tool: Bzip2Choice,

    /// Program for xz streams
    #[arg(long, global = true, value_enum, default_value_t = XzChoice::Xz)]
    pub xz_tool: XzChoice,

    /// Programs for zip archives
    #[arg(long, global = true, value_enum, default_value_t = ZipChoice::Zip)]
    pub zip_tool: ZipChoice,
}

impl Cli {
    /// Tool selection requested on the command line.
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig::default()
            .with_gzip(self.gzip_tool.into())
            .with_bzip2(self.bzip2_tool.into())
            .with_xz(self.xz_tool.into())
            .with_zip(self.zip_tool.into())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files and directories into an archive
    #[command(visible_alias = "p")]
    Pack(PackArgs),
    /// Unpack an archive into the current directory
    #[command(visible_alias = "u")]
    Unpack(UnpackArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Archive format, as a suffix or sample file name (default: from ARCHIVE)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Accepted for symmetry with unpack; has no effect
    #[arg(short = 'g', long)]
    pub trust: bool,

    /// Archive file to create
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Files or directories to pack
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Archive format, as a suffix or sample file name (default: from ARCHIVE)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Skip the scan for dangerous paths
    #[arg(short = 'g', long)]
    pub trust: bool,

    /// Archive file to unpack
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GzipChoice {
    Gzip,
    Pigz,
    #[value(name = "7za")]
    SevenZip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Bzip2Choice {
    Bzip2,
    Pbzip2,
    Lbzip2,
    #[value(name = "7za")]
    SevenZip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum XzChoice {
    Xz,
    Pixz,
    Pxz,
    #[value(name = "7za")]
    SevenZip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ZipChoice {
    Zip,
    #[value(name = "7za")]
    SevenZip,
}

impl From<GzipChoice> for GzipTool {
    fn from(choice: GzipChoice) -> Self {
        match choice {
            GzipChoice::Gzip => Self::Gzip,
            GzipChoice::Pigz => Self::Pigz,
            GzipChoice::SevenZip => Self::SevenZip,
        }
    }
}

impl From<Bzip2Choice> for Bzip2Tool {
    fn from(choice: Bzip2Choice) -> Self {
        match choice {
            Bzip2Choice::Bzip2 => Self::Bzip2,
            Bzip2Choice::Pbzip2 => Self::Pbzip2,
            Bzip2Choice::Lbzip2 => Self::Lbzip2,
            Bzip2Choice::SevenZip => Self::SevenZip,
        }
    }
}

impl From<XzChoice> for XzTool {
    fn from(choice: XzChoice) -> Self {
        match choice {
            XzChoice::Xz => Self::Xz,
            XzChoice::Pixz => Self::Pixz,
            XzChoice::Pxz => Self::Pxz,
            XzChoice::SevenZip => Self::SevenZip,
        }
    }
}

impl From<ZipChoice> for ZipTool {
    fn from(choice: ZipChoice) -> Self {
        match choice {
            ZipChoice::Zip => Self::InfoZip,
            ZipChoice::SevenZip => Self::SevenZip,
        }
    }
}
