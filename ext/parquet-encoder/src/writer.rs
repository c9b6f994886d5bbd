//! Core Parquet writing functionality

use crate::column::{ColumnEncoder, Field};
use crate::compression::{BlockCodec, Snappy};
use crate::metadata::FileMetadata;
use crate::page::{CountingWriter, PageWriter};
use crate::{ParquetError, PathSegment, Repetition, Result, Schema, SchemaBuilder};
use log::debug;
use std::io::Write;
use std::sync::Arc;

/// Leading and trailing file magic
pub const MAGIC: &[u8; 4] = b"PAR1";

// Default configuration constants
pub const DEFAULT_MAX_ROWS_PER_PAGE: usize = 1000;
const DEFAULT_CREATED_BY: &str = concat!("parquet-encoder version ", env!("CARGO_PKG_VERSION"));

/// Builder for creating a configured Writer
pub struct WriterBuilder {
    max_rows_per_page: usize,
    codec: Box<dyn BlockCodec>,
    created_by: Option<String>,
    schema_name: String,
}

impl Default for WriterBuilder {
    fn default() -> Self {
        Self {
            max_rows_per_page: DEFAULT_MAX_ROWS_PER_PAGE,
            codec: Box::new(Snappy),
            created_by: Some(DEFAULT_CREATED_BY.to_string()),
            schema_name: Schema::DEFAULT_ROOT_NAME.to_string(),
        }
    }
}

impl WriterBuilder {
    /// Create a new WriterBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many records go into one page-set (and so one row group)
    pub fn with_max_rows_per_page(mut self, max_rows: usize) -> Self {
        self.max_rows_per_page = max_rows;
        self
    }

    /// Set the page compressor
    pub fn with_codec(mut self, codec: Box<dyn BlockCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Set the application name recorded in the footer
    pub fn with_created_by<S: Into<String>>(mut self, created_by: S) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    /// Set the name of the root schema group
    pub fn with_schema_name<S: Into<String>>(mut self, name: S) -> Self {
        self.schema_name = name.into();
        self
    }

    /// Build a Writer with the configured settings
    pub fn build<R: 'static, W: Write>(
        self,
        output: W,
        fields: Vec<Field<R>>,
    ) -> Result<Writer<R, W>> {
        if self.max_rows_per_page == 0 {
            return Err(ParquetError::invalid_argument(
                "max_rows_per_page must be at least 1",
            ));
        }
        if fields.is_empty() {
            return Err(ParquetError::invalid_argument(
                "a writer needs at least one field",
            ));
        }

        let schema = SchemaBuilder::new()
            .with_name(self.schema_name)
            .with_columns(fields.iter().map(|f| f.descriptor().clone()))
            .build()?;
        let first = PageSet::new(&fields);

        Ok(Writer {
            output,
            fields,
            schema: Arc::new(schema),
            page_sets: vec![first],
            max_rows_per_page: self.max_rows_per_page,
            page_writer: PageWriter::new(self.codec),
            created_by: self.created_by,
        })
    }
}

/// One encoder per column for a bounded run of records
struct PageSet<R> {
    columns: Vec<Box<dyn ColumnEncoder<R>>>,
    num_rows: usize,
}

impl<R: 'static> PageSet<R> {
    fn new(fields: &[Field<R>]) -> Self {
        Self {
            columns: fields.iter().map(Field::encoder).collect(),
            num_rows: 0,
        }
    }

    fn add(&mut self, record: &R) {
        for column in &mut self.columns {
            column.add(record);
        }
        self.num_rows += 1;
    }

    /// Checks that neighbouring columns sharing a group describe the same
    /// group instances. Columns under one group are contiguous, so checking
    /// neighbours covers every pair.
    fn check_group_shapes(&self) -> Result<()> {
        for pair in self.columns.windows(2) {
            let (left, right) = (pair[0].descriptor(), pair[1].descriptor());
            let groups = |path: &[PathSegment]| path.split_last().map_or(0, |(_, g)| g.len());
            let shared: Vec<Repetition> = left.path()[..groups(left.path())]
                .iter()
                .zip(&right.path()[..groups(right.path())])
                .take_while(|(a, b)| a.name == b.name)
                .map(|(a, _)| a.repetition)
                .collect();

            let group_def = shared.iter().filter(|r| **r != Repetition::Required).count() as u16;
            let group_rep = shared.iter().filter(|r| **r == Repetition::Repeated).count() as u16;
            if group_def == 0 {
                continue;
            }

            if pair[0].group_levels(group_def, group_rep)
                != pair[1].group_levels(group_def, group_rep)
            {
                return Err(ParquetError::data_validation(format!(
                    "columns '{}' and '{}' disagree on the shape of their shared groups",
                    left.name(),
                    right.name()
                )));
            }
        }
        Ok(())
    }
}

/// Writes records of type `R` as a Parquet file to `W`.
///
/// Records are buffered in memory until [`Writer::write`] lays out the
/// whole file.
pub struct Writer<R, W> {
    output: W,
    fields: Vec<Field<R>>,
    schema: Arc<Schema>,
    page_sets: Vec<PageSet<R>>,
    max_rows_per_page: usize,
    page_writer: PageWriter,
    created_by: Option<String>,
}

impl<R: 'static, W: Write> Writer<R, W> {
    /// Create a new writer with default settings
    pub fn new(output: W, fields: Vec<Field<R>>) -> Result<Self> {
        WriterBuilder::new().build(output, fields)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Buffer a single record, starting a new page-set when the current one
    /// is full
    pub fn add(&mut self, record: &R) {
        let full = self
            .page_sets
            .last()
            .map_or(true, |set| set.num_rows >= self.max_rows_per_page);
        if full {
            debug!(
                "page-set {} full at {} rows, starting page-set {}",
                self.page_sets.len().saturating_sub(1),
                self.max_rows_per_page,
                self.page_sets.len()
            );
            self.page_sets.push(PageSet::new(&self.fields));
        }

        if let Some(set) = self.page_sets.last_mut() {
            set.add(record);
        }
    }

    /// Buffer every record of `records`
    pub fn add_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a R>,
    {
        for record in records {
            self.add(record);
        }
    }

    /// Total records buffered
    pub fn num_rows(&self) -> usize {
        self.page_sets.iter().map(|set| set.num_rows).sum()
    }

    /// Record count of each page-set, in chain order
    pub fn page_set_row_counts(&self) -> Vec<usize> {
        self.page_sets.iter().map(|set| set.num_rows).collect()
    }

    /// Write the file and hand back the output.
    ///
    /// Pages are emitted column by column: all pages of the first column,
    /// then all pages of the second, and so on. Row group `k` is made of
    /// page `k` of every column.
    ///
    /// Fails before writing anything when sibling columns disagree on the
    /// shape of a shared group.
    pub fn write(self) -> Result<W> {
        let Writer {
            output,
            schema,
            page_sets,
            page_writer,
            created_by,
            ..
        } = self;

        for set in &page_sets {
            set.check_group_shapes()?;
        }

        let mut out = CountingWriter::new(output);
        out.write_all(MAGIC)?;

        let mut metadata =
            FileMetadata::new(Arc::clone(&schema), page_writer.codec().compression());
        if let Some(created_by) = created_by {
            metadata = metadata.with_created_by(created_by);
        }

        let mut columns: Vec<Vec<Box<dyn ColumnEncoder<R>>>> =
            schema.columns().iter().map(|_| Vec::new()).collect();
        for set in page_sets.into_iter().filter(|set| set.num_rows > 0) {
            for (pages, encoder) in columns.iter_mut().zip(set.columns) {
                pages.push(encoder);
            }
        }

        for (descriptor, encoders) in schema.columns().iter().zip(columns) {
            let name = descriptor.name();
            for encoder in encoders {
                page_writer.write(&mut out, &mut metadata, &name, encoder.flush()?)?;
            }
        }

        metadata.write_footer(&mut out)?;
        out.write_all(MAGIC)?;
        out.flush()?;

        debug!(
            "wrote {} bytes in {} row groups",
            out.bytes_written(),
            metadata.num_row_groups()
        );
        Ok(out.into_inner())
    }
}
