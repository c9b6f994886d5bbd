//! Run-length half of the RLE/bit-packing hybrid encoding.
//!
//! The encoder only ever emits RLE runs: a varint header `count << 1`
//! followed by the repeated value in `ceil(bit_width / 8)` little-endian
//! bytes. The decoder accepts the full grammar, bit-packed runs included.

use super::varint;
use crate::{ParquetError, Result};

/// Size of the little-endian length prefix in front of a levels block.
pub const LEVELS_LENGTH_PREFIX: usize = 4;

/// Number of bits needed to represent `max`.
pub fn bit_width(max: u64) -> u8 {
    (u64::BITS - max.leading_zeros()) as u8
}

fn value_byte_width(bit_width: u8) -> usize {
    (bit_width as usize).div_ceil(8)
}

/// Encodes `values` as a sequence of RLE runs, one per maximal run of equal
/// values.
pub fn encode_runs(values: &[u16], bit_width: u8) -> Vec<u8> {
    let width = value_byte_width(bit_width);
    let mut out = Vec::new();

    let mut start = 0;
    while start < values.len() {
        let value = values[start];
        let run = values[start..].iter().take_while(|v| **v == value).count();

        varint::encode_into((run as u64) << 1, &mut out);
        let bytes = u64::from(value).to_le_bytes();
        out.extend_from_slice(&bytes[..width.min(bytes.len())]);
        out.resize(out.len() + width.saturating_sub(bytes.len()), 0);

        start += run;
    }
    out
}

/// Appends a levels block (4-byte little-endian length, then RLE runs).
pub fn write_levels(out: &mut Vec<u8>, levels: &[u16], bit_width: u8) {
    let runs = encode_runs(levels, bit_width);
    out.extend_from_slice(&(runs.len() as u32).to_le_bytes());
    out.extend_from_slice(&runs);
}

/// Decodes a complete run stream holding at most `max_values` levels.
///
/// Padding values of a trailing bit-packed group are dropped. Runs that
/// claim more levels than `max_values` are rejected.
pub fn decode_runs(data: &[u8], bit_width: u8, max_values: usize) -> Result<Vec<u16>> {
    if bit_width > 16 {
        return Err(ParquetError::invalid_argument(format!(
            "level bit width {} exceeds 16",
            bit_width
        )));
    }
    let width = value_byte_width(bit_width);
    let mut values = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let (header, used) = varint::decode(&data[pos..])?;
        pos += used;
        let remaining = max_values - values.len();

        if header & 1 == 0 {
            let count = usize::try_from(header >> 1)
                .ok()
                .filter(|count| *count <= remaining)
                .ok_or_else(|| {
                    ParquetError::data_validation(format!(
                        "RLE run of {} levels exceeds the {} remaining",
                        header >> 1,
                        remaining
                    ))
                })?;
            let end = pos + width;
            let bytes = data
                .get(pos..end)
                .ok_or_else(|| ParquetError::data_validation("truncated RLE run value"))?;
            let mut le = [0u8; 8];
            le[..width].copy_from_slice(bytes);
            let value = u64::from_le_bytes(le) as u16;
            values.extend(std::iter::repeat(value).take(count));
            pos = end;
        } else {
            let groups = usize::try_from(header >> 1)
                .ok()
                .filter(|groups| *groups <= remaining.div_ceil(8))
                .ok_or_else(|| {
                    ParquetError::data_validation(format!(
                        "bit-packed run of {} groups exceeds the {} remaining levels",
                        header >> 1,
                        remaining
                    ))
                })?;
            let byte_len = groups * bit_width as usize;
            let packed = pos
                .checked_add(byte_len)
                .and_then(|end| data.get(pos..end))
                .ok_or_else(|| ParquetError::data_validation("truncated bit-packed run"))?;
            unpack_into(packed, bit_width, (groups * 8).min(remaining), &mut values);
            pos += byte_len;
        }
    }
    Ok(values)
}

fn unpack_into(packed: &[u8], bit_width: u8, count: usize, out: &mut Vec<u16>) {
    let bit_width = bit_width as usize;
    for i in 0..count {
        let mut value = 0u16;
        for bit in 0..bit_width {
            let index = i * bit_width + bit;
            if packed[index / 8] & (1 << (index % 8)) != 0 {
                value |= 1 << bit;
            }
        }
        out.push(value);
    }
}

/// Reads a length-prefixed levels block from the front of `data`.
///
/// Returns the decoded levels and the total number of bytes consumed,
/// prefix included.
pub fn read_levels_block(
    data: &[u8],
    bit_width: u8,
    max_values: usize,
) -> Result<(Vec<u16>, usize)> {
    let prefix: [u8; LEVELS_LENGTH_PREFIX] = data
        .get(..LEVELS_LENGTH_PREFIX)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| ParquetError::data_validation("missing levels length prefix"))?;
    let len = u32::from_le_bytes(prefix) as usize;
    let end = LEVELS_LENGTH_PREFIX + len;
    let body = data
        .get(LEVELS_LENGTH_PREFIX..end)
        .ok_or_else(|| ParquetError::data_validation("levels block shorter than its prefix"))?;
    Ok((decode_runs(body, bit_width, max_values)?, end))
}
