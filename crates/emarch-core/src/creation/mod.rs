//! Archive packing.

pub mod packer;

pub use packer::PackEngine;
