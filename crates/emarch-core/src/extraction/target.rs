//! Output file naming for single-stream unpacking.

use crate::formats::Codec;

/// Derives the name of the file a single compressed stream unpacks to.
///
/// The archive name is split at its last dot, unless that dot starts the
/// name. A known suffix of the codec family is dropped, or turned into
/// `.tar` for the short tar forms. Any other name gets `.unpacked` appended,
/// so the output never overwrites the archive.
///
/// # Examples
///
/// ```
/// use emarch_core::extraction::derive_output_name;
/// use emarch_core::formats::Codec;
///
/// assert_eq!(derive_output_name(Codec::Gzip, "notes.txt.gz"), "notes.txt");
/// assert_eq!(derive_output_name(Codec::Gzip, "src.tgz"), "src.tar");
/// assert_eq!(derive_output_name(Codec::Xz, "data.bin"), "data.bin.unpacked");
/// ```
#[must_use]
pub fn derive_output_name(codec: Codec, archive_name: &str) -> String {
    let (stem, suffix) = match archive_name.rfind('.') {
        Some(i) if i > 0 => archive_name.split_at(i),
        _ => (archive_name, ""),
    };

    let replacement = match (codec, suffix.to_ascii_lowercase().as_str()) {
        (Codec::Bzip2, ".bz2" | ".bz")
        | (Codec::Gzip | Codec::Compress, ".gz" | ".z")
        | (Codec::Xz | Codec::Lzma, ".lzma" | ".xz") => "",
        (Codec::Bzip2, ".tbz2" | ".tbz" | ".tgz")
        | (Codec::Gzip | Codec::Compress, ".tgz" | ".taz")
        | (Codec::Xz | Codec::Lzma, ".tlz" | ".txz") => ".tar",
        _ => return format!("{archive_name}.unpacked"),
    };
    format!("{stem}{replacement}")
}
