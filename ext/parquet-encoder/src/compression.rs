//! Block compression applied to each page payload

use crate::Result;
use parquet::format::CompressionCodec;

/// A page compressor.
///
/// Implementations must be deterministic: identical input produces
/// identical output.
pub trait BlockCodec {
    /// Codec identifier recorded in the column chunk metadata
    fn compression(&self) -> CompressionCodec;

    /// Compresses one page payload
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Raw Snappy block compression
#[derive(Debug, Clone, Copy, Default)]
pub struct Snappy;

impl BlockCodec for Snappy {
    fn compression(&self) -> CompressionCodec {
        CompressionCodec::SNAPPY
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(snap::raw::Encoder::new().compress_vec(input)?)
    }
}
