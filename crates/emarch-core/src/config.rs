//! Tool variant selection for pack and unpack operations.

/// Program used for gzip streams (`.gz`, `.Z`, `.tar.gz`, `.tar.Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GzipTool {
    /// GNU gzip.
    #[default]
    Gzip,
    /// Parallel gzip.
    Pigz,
    /// 7-Zip standalone (`7za`).
    SevenZip,
}

/// Program used for bzip2 streams (`.bz2`, `.bz`, `.tar.bz2`, `.tar.bz`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bzip2Tool {
    /// Reference bzip2.
    #[default]
    Bzip2,
    /// Parallel bzip2.
    Pbzip2,
    /// Parallel bzip2 by Mikolaj Izdebski.
    Lbzip2,
    /// 7-Zip standalone (`7za`).
    SevenZip,
}

/// Program used for xz streams (`.xz`, `.tar.xz`).
///
/// Legacy `.lzma` streams always use `xz --format=lzma`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XzTool {
    /// XZ Utils.
    #[default]
    Xz,
    /// Parallel indexing xz.
    Pixz,
    /// Parallel xz.
    Pxz,
    /// 7-Zip standalone (`7za`).
    SevenZip,
}

/// Programs used for zip archives (`.zip`, `.jar`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZipTool {
    /// Info-ZIP `zip` and `unzip`.
    #[default]
    InfoZip,
    /// 7-Zip standalone (`7za`).
    SevenZip,
}

/// Selection of concrete tools for formats with several implementations.
///
/// Exactly one variant is active per family. The rest of each pipeline is
/// the same whichever tool is chosen.
///
/// # Examples
///
/// ```
/// use emarch_core::ToolConfig;
/// use emarch_core::config::GzipTool;
/// use emarch_core::config::ZipTool;
///
/// let config = ToolConfig::default()
///     .with_gzip(GzipTool::Pigz)
///     .with_zip(ZipTool::SevenZip);
/// assert_eq!(config.gzip, GzipTool::Pigz);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolConfig {
    /// Tool for gzip streams.
    pub gzip: GzipTool,
    /// Tool for bzip2 streams.
    pub bzip2: Bzip2Tool,
    /// Tool for xz streams.
    pub xz: XzTool,
    /// Tools for zip archives.
    pub zip: ZipTool,
}

impl ToolConfig {
    /// Sets the gzip tool.
    #[must_use]
    pub const fn with_gzip(mut self, tool: GzipTool) -> Self {
        self.gzip = tool;
        self
    }

    /// Sets the bzip2 tool.
    #[must_use]
    pub const fn with_bzip2(mut self, tool: Bzip2Tool) -> Self {
        self.bzip2 = tool;
        self
    }

    /// Sets the xz tool.
    #[must_use]
    pub const fn with_xz(mut self, tool: XzTool) -> Self {
        self.xz = tool;
        self
    }

    /// Sets the zip tools.
    #[must_use]
    pub const fn with_zip(mut self, tool: ZipTool) -> Self {
        self.zip = tool;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolConfig::default();
        assert_eq!(config.gzip, GzipTool::Gzip);
        assert_eq!(config.bzip2, Bzip2Tool::Bzip2);
        assert_eq!(config.xz, XzTool::Xz);
        assert_eq!(config.zip, ZipTool::InfoZip);
    }

    #[test]
    fn test_builders() {
        let config = ToolConfig::default()
            .with_gzip(GzipTool::SevenZip)
            .with_bzip2(Bzip2Tool::Lbzip2)
            .with_xz(XzTool::Pixz)
            .with_zip(ZipTool::SevenZip);
        assert_eq!(config.gzip, GzipTool::SevenZip);
        assert_eq!(config.bzip2, Bzip2Tool::Lbzip2);
        assert_eq!(config.xz, XzTool::Pixz);
        assert_eq!(config.zip, ZipTool::SevenZip);
    }
}
