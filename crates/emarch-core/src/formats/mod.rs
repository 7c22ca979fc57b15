//! Archive formats and the tool chains that handle them.

pub mod codec;
pub mod detect;
pub mod layout;

pub use codec::Codec;
pub use detect::ArchiveFormat;
pub use layout::Archiver;
pub use layout::Layout;
pub use layout::Listing;
