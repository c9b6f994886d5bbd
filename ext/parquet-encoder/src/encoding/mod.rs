//! Integer codecs used by page payloads.
//!
//! Levels are written with the RLE branch of the hybrid RLE/bit-packing
//! encoding, whose run headers are unsigned varints.

pub mod rle;
pub mod varint;

pub use rle::{bit_width, encode_runs, write_levels};
