//! Record-oriented Parquet file encoder
//!
//! `parquet-encoder` turns a sequence of typed records into a Parquet file:
//! column-oriented, compressed, paged storage with a trailing metadata
//! footer that any compliant reader can open.
//!
//! # Key Components
//!
//! - **Fields**: one per leaf column, binding a column path to an accessor
//!   - The accessor's return type mirrors the path: `Option<T>` for optional
//!     steps, `Vec<T>` for repeated ones
//!   - See [`column::Field`] and [`column::Accessor`]
//!
//! - **Levels**: definition and repetition level computation for nested
//!   and repeated values through the [`levels::Shred`] trait
//!
//! - **Encoding**: unsigned varints and the RLE half of the
//!   RLE/bit-packing hybrid used for level streams
//!
//! - **Writer**: fans records out to the columns, splits them into
//!   page-sets of at most `max_rows_per_page` records and lays out the file
//!   - One row group per page-set
//!   - Pages are compressed with Snappy by default, see
//!     [`compression::BlockCodec`]
//!   - Uses `std::io::Write` for output flexibility
//!
//! - **Schema**: column descriptors and the group tree written to the
//!   footer, with introspection through [`traits::SchemaInspector`]
//!
//! # Example Usage
//!
//! ```no_run
//! use parquet_encoder::{Field, Writer};
//!
//! struct Reading {
//!     sensor: String,
//!     value: Option<f64>,
//! }
//!
//! # fn main() -> parquet_encoder::Result<()> {
//! let fields = vec![
//!     Field::new("sensor", |r: &Reading| r.sensor.clone())?,
//!     Field::new("value", |r: &Reading| r.value)?,
//! ];
//!
//! let mut writer = Writer::new(std::fs::File::create("readings.parquet")?, fields)?;
//! writer.add(&Reading { sensor: "a".into(), value: Some(1.5) });
//! writer.add(&Reading { sensor: "b".into(), value: None });
//! writer.write()?;
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod compression;
pub mod encoding;
pub mod error;
pub mod levels;
pub mod metadata;
pub mod page;
pub mod schema;
pub mod traits;
pub mod value;
pub mod writer;

#[cfg(test)]
pub mod test_utils;

pub use column::{Accessor, ColumnEncoder, EncodedPage, Field};
pub use compression::{BlockCodec, Snappy};
pub use error::{ParquetError, Result};
pub use levels::{compute_levels, LevelPair, Shred};
pub use schema::{
    ColumnDescriptor, PathSegment, PrimitiveType, Repetition, Schema, SchemaBuilder, SchemaNode,
};
pub use value::PhysicalValue;
pub use writer::{Writer, WriterBuilder, DEFAULT_MAX_ROWS_PER_PAGE, MAGIC};
