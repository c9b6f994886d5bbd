//! Leaf column encoders.
//!
//! A [`Field`] binds a column descriptor to an accessor that pulls the
//! column's value out of a record. Each page-set gets a fresh
//! [`ColumnEncoder`] per field; the encoder buffers levels and values until
//! it is flushed into a page payload.

use crate::encoding::rle;
use crate::levels::{LevelBuffer, LevelPair, Shred};
use crate::value::PhysicalValue;
use crate::{ColumnDescriptor, ParquetError, PathSegment, Repetition, Result};
use std::marker::PhantomData;
use std::sync::Arc;

/// Extracts one column's value from a record.
///
/// The output type mirrors the column path: `Option<T>` for an optional
/// step, `Vec<T>` for a repeated one.
pub trait Accessor<R> {
    type Output: Shred;

    fn get(&self, record: &R) -> Self::Output;
}

impl<R, T, F> Accessor<R> for F
where
    F: Fn(&R) -> T,
    T: Shred,
{
    type Output = T;

    fn get(&self, record: &R) -> T {
        self(record)
    }
}

/// Uncompressed payload of one data page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPage {
    pub bytes: Vec<u8>,
    /// Level entries in the page (records for flat columns)
    pub num_values: usize,
    /// Records that contributed to the page
    pub num_rows: usize,
}

/// Buffers one column for one page-set
pub trait ColumnEncoder<R> {
    fn descriptor(&self) -> &ColumnDescriptor;

    /// Shreds the column value of `record` into the buffers
    fn add(&mut self, record: &R);

    fn num_levels(&self) -> usize;

    fn num_values(&self) -> usize;

    fn num_rows(&self) -> usize;

    /// Buffered levels projected onto an enclosing group, see
    /// [`LevelBuffer::group_levels`]
    fn group_levels(&self, group_def: u16, group_rep: u16) -> Vec<LevelPair>;

    /// Encodes the buffered levels and values: repetition levels block,
    /// definition levels block, then PLAIN values. Blocks are omitted when
    /// the column has no levels of that kind.
    fn flush(self: Box<Self>) -> Result<EncodedPage>;
}

type EncoderFactory<R> = dyn Fn(Arc<ColumnDescriptor>) -> Box<dyn ColumnEncoder<R>>;

/// A leaf column of the record type `R`
pub struct Field<R> {
    descriptor: Arc<ColumnDescriptor>,
    factory: Arc<EncoderFactory<R>>,
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl<R: 'static> Field<R> {
    /// A top-level column. Its repetition follows from the accessor output:
    /// a plain value is required, `Option<_>` optional and `Vec<_>` repeated.
    pub fn new<S, A>(name: S, accessor: A) -> Result<Self>
    where
        S: Into<String>,
        A: Accessor<R> + 'static,
    {
        let name = name.into();
        let steps = <A::Output as Shred>::nullable_steps();
        let repetition = match steps.as_slice() {
            [] => Repetition::Required,
            [step] => *step,
            _ => {
                return Err(ParquetError::schema(format!(
                    "column '{}' has {} optional or repeated steps; declare its groups with Field::nested",
                    name,
                    steps.len()
                )))
            }
        };
        Self::nested(vec![PathSegment::new(name, repetition)], accessor)
    }

    /// A column below one or more groups. The optional and repeated steps of
    /// `path` must match the shape of the accessor output.
    ///
    /// Every leaf under a group has its own accessor, so sibling accessors
    /// must agree on the group instances they see: the same `None`s for an
    /// optional group and the same element counts for a repeated one.
    /// [`Writer::write`](crate::Writer::write) fails with
    /// [`ParquetError::DataValidation`] when they do not.
    pub fn nested<A>(path: Vec<PathSegment>, accessor: A) -> Result<Self>
    where
        A: Accessor<R> + 'static,
    {
        let primitive_type = <<A::Output as Shred>::Leaf as PhysicalValue>::PRIMITIVE_TYPE;
        let descriptor = ColumnDescriptor::new(path, primitive_type)?;

        let expected = descriptor.nullable_steps();
        let actual = <A::Output as Shred>::nullable_steps();
        if expected != actual {
            return Err(ParquetError::schema(format!(
                "column '{}' declares steps {:?} but its accessor yields {:?}",
                descriptor.name(),
                expected,
                actual
            )));
        }

        let accessor = Arc::new(accessor);
        let factory = move |descriptor: Arc<ColumnDescriptor>| -> Box<dyn ColumnEncoder<R>> {
            Box::new(TypedColumn::new(descriptor, Arc::clone(&accessor)))
        };

        Ok(Self {
            descriptor: Arc::new(descriptor),
            factory: Arc::new(factory),
        })
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Creates an empty encoder for a new page-set
    pub fn encoder(&self) -> Box<dyn ColumnEncoder<R>> {
        (self.factory)(Arc::clone(&self.descriptor))
    }
}

/// Column encoder for any accessor output type
struct TypedColumn<R, A: Accessor<R>> {
    descriptor: Arc<ColumnDescriptor>,
    accessor: Arc<A>,
    buffer: LevelBuffer<<A::Output as Shred>::Leaf>,
    num_rows: usize,
    _record: PhantomData<fn(&R)>,
}

impl<R, A: Accessor<R>> TypedColumn<R, A> {
    fn new(descriptor: Arc<ColumnDescriptor>, accessor: Arc<A>) -> Self {
        let buffer = LevelBuffer::new(descriptor.max_def_level(), descriptor.max_rep_level());
        Self {
            descriptor,
            accessor,
            buffer,
            num_rows: 0,
            _record: PhantomData,
        }
    }
}

impl<R, A: Accessor<R>> ColumnEncoder<R> for TypedColumn<R, A> {
    fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    fn add(&mut self, record: &R) {
        self.accessor.get(record).shred(&mut self.buffer, 0, 0, 0);
        self.num_rows += 1;
    }

    fn num_levels(&self) -> usize {
        self.buffer.num_levels()
    }

    fn num_values(&self) -> usize {
        self.buffer.num_values()
    }

    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn group_levels(&self, group_def: u16, group_rep: u16) -> Vec<LevelPair> {
        self.buffer.group_levels(group_def, group_rep)
    }

    fn flush(self: Box<Self>) -> Result<EncodedPage> {
        let max_def = self.buffer.max_def_level();
        let max_rep = self.buffer.max_rep_level();
        let (rep_levels, def_levels, values, num_levels) = self.buffer.into_parts();

        let mut bytes = Vec::new();
        if max_rep > 0 {
            rle::write_levels(&mut bytes, &rep_levels, rle::bit_width(u64::from(max_rep)));
        }
        if max_def > 0 {
            rle::write_levels(&mut bytes, &def_levels, rle::bit_width(u64::from(max_def)));
        }
        <<A::Output as Shred>::Leaf as PhysicalValue>::encode_plain(&values, &mut bytes)?;

        Ok(EncodedPage {
            bytes,
            num_values: num_levels,
            num_rows: self.num_rows,
        })
    }
}
