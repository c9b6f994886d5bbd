//! Leaf value types and their PLAIN encoding

use crate::{ParquetError, PrimitiveType, Result};

/// A value type that can be stored in a leaf column.
///
/// Encoding works on the whole buffer at once because booleans are
/// bit-packed across values.
pub trait PhysicalValue: Sized {
    /// Physical type recorded in the footer schema
    const PRIMITIVE_TYPE: PrimitiveType;

    /// Appends the PLAIN encoding of `values` to `out`
    fn encode_plain(values: &[Self], out: &mut Vec<u8>) -> Result<()>;
}

macro_rules! impl_fixed_width {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PhysicalValue for $ty {
                const PRIMITIVE_TYPE: PrimitiveType = PrimitiveType::$variant;

                fn encode_plain(values: &[Self], out: &mut Vec<u8>) -> Result<()> {
                    out.reserve(std::mem::size_of_val(values));
                    for value in values {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_fixed_width! {
    i32 => Int32,
    i64 => Int64,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl PhysicalValue for bool {
    const PRIMITIVE_TYPE: PrimitiveType = PrimitiveType::Boolean;

    fn encode_plain(values: &[Self], out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        out.resize(start + values.len().div_ceil(8), 0);
        for (i, value) in values.iter().enumerate() {
            if *value {
                out[start + i / 8] |= 1 << (i % 8);
            }
        }
        Ok(())
    }
}

impl PhysicalValue for String {
    const PRIMITIVE_TYPE: PrimitiveType = PrimitiveType::String;

    fn encode_plain(values: &[Self], out: &mut Vec<u8>) -> Result<()> {
        out.reserve(values.iter().map(|s| s.len() + 4).sum());
        for value in values {
            out.extend_from_slice(&length_prefix(value.len())?);
            out.extend_from_slice(value.as_bytes());
        }
        Ok(())
    }
}

/// Little-endian u32 length in front of a byte array value
fn length_prefix(len: usize) -> Result<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| {
            ParquetError::data_validation(format!(
                "string of {} bytes exceeds the u32 length prefix",
                len
            ))
        })
}
