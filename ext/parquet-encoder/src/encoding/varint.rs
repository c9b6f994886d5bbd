//! Unsigned LEB128 ("varint") encoding.

use crate::{ParquetError, Result};

/// Maximum number of bytes a `u64` can occupy once encoded.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` occupies once encoded. Zero still takes one byte.
pub fn byte_count(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(7).max(1)
}

/// Appends the encoding of `value` to `out`.
pub fn encode_into(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value as u8) & 0x7F;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Encodes `value`, low-order groups first.
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(byte_count(value));
    encode_into(value, &mut out);
    out
}

/// Decodes a varint from the front of `data`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode(data: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;

    for (consumed, byte) in data.iter().enumerate() {
        if consumed == MAX_VARINT_LEN {
            break;
        }
        let payload = u64::from(byte & 0x7F);
        if shift == 63 && payload > 1 {
            return Err(ParquetError::data_validation("varint overflows u64"));
        }
        result |= payload << shift;

        if byte & 0x80 == 0 {
            return Ok((result, consumed + 1));
        }
        shift += 7;
    }

    if data.len() >= MAX_VARINT_LEN {
        Err(ParquetError::data_validation(format!(
            "varint longer than {} bytes",
            MAX_VARINT_LEN
        )))
    } else {
        Err(ParquetError::data_validation("truncated varint"))
    }
}
