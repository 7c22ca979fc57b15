//! Stream compressors used for single files and tar pipelines.
//!
//! Every codec compresses standard input to standard output and back, so the
//! same stage works behind `tar cvf -`, in front of `tar xvf -`, and with a
//! file redirected into it.

use crate::config::Bzip2Tool;
use crate::config::GzipTool;
use crate::config::ToolConfig;
use crate::config::XzTool;
use crate::process::Stage;

/// Compression codec of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Deflate (gzip).
    Gzip,
    /// LZW streams of Unix `compress`, decoded by gzip.
    Compress,
    /// Burrows-Wheeler (bzip2).
    Bzip2,
    /// LZMA2 in the xz container.
    Xz,
    /// Legacy LZMA-alone container.
    Lzma,
}

impl Codec {
    /// Returns the codec name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Compress => "compress",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
        }
    }

    /// Builds the stage compressing stdin to stdout.
    #[must_use]
    pub fn compressor(self, config: &ToolConfig) -> Stage {
        match self {
            Self::Gzip => match config.gzip {
                GzipTool::Gzip => Stage::new("gzip").arg("-c"),
                GzipTool::Pigz => Stage::new("pigz").arg("-c"),
                GzipTool::SevenZip => seven_zip_compressor("gzip"),
            },
            Self::Compress => Stage::new("compress").arg("-c"),
            Self::Bzip2 => match config.bzip2 {
                Bzip2Tool::Bzip2 => Stage::new("bzip2").arg("-c"),
                Bzip2Tool::Pbzip2 => Stage::new("pbzip2").arg("-c"),
                Bzip2Tool::Lbzip2 => Stage::new("lbzip2").arg("-c"),
                Bzip2Tool::SevenZip => seven_zip_compressor("bzip2"),
            },
            Self::Xz => match config.xz {
                XzTool::Xz => Stage::new("xz").arg("--stdout"),
                XzTool::Pixz => Stage::new("pixz"),
                XzTool::Pxz => Stage::new("pxz").arg("--stdout"),
                XzTool::SevenZip => seven_zip_compressor("xz"),
            },
            Self::Lzma => Stage::new("xz").args(["--stdout", "--format=lzma"]),
        }
    }

    /// Builds the stage decompressing stdin to stdout.
    #[must_use]
    pub fn decompressor(self, config: &ToolConfig) -> Stage {
        match self {
            Self::Gzip => match config.gzip {
                GzipTool::Gzip => Stage::new("gzip").args(["-d", "-c"]),
                GzipTool::Pigz => Stage::new("pigz").args(["-d", "-c"]),
                GzipTool::SevenZip => seven_zip_decompressor("gzip"),
            },
            // Neither pigz nor 7za's gzip handler reads LZW.
            Self::Compress => Stage::new("gzip").args(["-d", "-c"]),
            Self::Bzip2 => match config.bzip2 {
                Bzip2Tool::Bzip2 => Stage::new("bzip2").args(["-d", "-c"]),
                Bzip2Tool::Pbzip2 => Stage::new("pbzip2").args(["-d", "-c"]),
                Bzip2Tool::Lbzip2 => Stage::new("lbzip2").args(["-d", "-c"]),
                Bzip2Tool::SevenZip => seven_zip_decompressor("bzip2"),
            },
            Self::Xz => match config.xz {
                XzTool::Xz => Stage::new("xz").args(["--decompress", "--stdout"]),
                XzTool::Pixz => Stage::new("pixz").arg("-d"),
                XzTool::Pxz => Stage::new("pxz").args(["--decompress", "--stdout"]),
                XzTool::SevenZip => seven_zip_decompressor("xz"),
            },
            Self::Lzma => Stage::new("xz").args(["--decompress", "--stdout"]),
        }
    }
}

// 7za needs an archive name even when writing to stdout; it is ignored.
fn seven_zip_compressor(kind: &str) -> Stage {
    Stage::new("7za")
        .arg("a")
        .arg(format!("-t{kind}"))
        .args(["-si", "-so", "-bd", "dummy"])
}

fn seven_zip_decompressor(kind: &str) -> Stage {
    Stage::new("7za")
        .arg("x")
        .arg(format!("-t{kind}"))
        .args(["-si", "-so"])
}
