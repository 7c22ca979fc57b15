//! Archive unpacking.

pub mod target;
pub mod unpacker;

pub use target::derive_output_name;
pub use unpacker::UnpackEngine;
