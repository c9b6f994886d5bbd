//! Page headers and the file footer.
//!
//! Every page header passes through [`FileMetadata`], which remembers where
//! each page landed so the footer can point readers at the right byte
//! ranges. Both are serialized with the thrift compact protocol using the
//! format definitions shipped by the `parquet` crate.

use crate::traits::SchemaInspector;
use crate::{ParquetError, PrimitiveType, Repetition, Result, Schema, SchemaNode};
use indexmap::IndexMap;
use log::debug;
use parquet::format::{
    ColumnChunk, ColumnMetaData, CompressionCodec, ConvertedType, DataPageHeader, Encoding,
    FieldRepetitionType, FileMetaData, PageHeader, PageType, RowGroup, SchemaElement, Type,
};
use parquet::thrift::TSerializable;
use std::io::Write;
use std::sync::Arc;
use thrift::protocol::TCompactOutputProtocol;

/// Format version written to the footer
pub const FORMAT_VERSION: i32 = 1;

/// What the page writer knows about a page when its header is emitted
#[derive(Debug, Clone, Copy)]
pub struct PageHeaderInfo<'a> {
    /// Dotted column name
    pub column: &'a str,
    /// Position of the header in the output
    pub offset: u64,
    pub uncompressed_size: usize,
    pub compressed_size: usize,
    /// Number of level entries (values for required columns)
    pub num_values: usize,
    /// Records of the page-set the page belongs to
    pub num_rows: usize,
}

/// Location and size of a written page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    pub offset: u64,
    pub header_size: usize,
    pub uncompressed_size: usize,
    pub compressed_size: usize,
    pub num_values: usize,
    pub num_rows: usize,
}

impl PageEntry {
    /// Bytes the page occupies in the output, header included
    pub fn total_compressed_size(&self) -> usize {
        self.header_size + self.compressed_size
    }

    pub fn total_uncompressed_size(&self) -> usize {
        self.header_size + self.uncompressed_size
    }
}

/// Accumulates page locations and writes headers and the footer
#[derive(Debug)]
pub struct FileMetadata {
    schema: Arc<Schema>,
    compression: CompressionCodec,
    created_by: Option<String>,
    pages: IndexMap<String, Vec<PageEntry>>,
}

impl FileMetadata {
    pub fn new(schema: Arc<Schema>, compression: CompressionCodec) -> Self {
        let pages = schema
            .all_column_paths()
            .into_iter()
            .map(|path| (path, Vec::new()))
            .collect();

        Self {
            schema,
            compression,
            created_by: None,
            pages,
        }
    }

    pub fn with_created_by<S: Into<String>>(mut self, created_by: S) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Pages recorded so far for `column`, in write order
    pub fn pages(&self, column: &str) -> Option<&[PageEntry]> {
        self.pages.get(column).map(Vec::as_slice)
    }

    /// Number of row groups described so far
    pub fn num_row_groups(&self) -> usize {
        self.pages.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Writes a data page header to `out` and records the page.
    ///
    /// Returns the size of the serialized header.
    pub fn write_page_header<W: Write>(
        &mut self,
        out: &mut W,
        info: PageHeaderInfo<'_>,
    ) -> Result<usize> {
        let pages = self.pages.get_mut(info.column).ok_or_else(|| {
            ParquetError::invalid_argument(format!("unknown column '{}'", info.column))
        })?;

        let header = PageHeader {
            type_: PageType::DATA_PAGE,
            uncompressed_page_size: to_i32(info.uncompressed_size, "uncompressed page size")?,
            compressed_page_size: to_i32(info.compressed_size, "compressed page size")?,
            crc: None,
            data_page_header: Some(DataPageHeader {
                num_values: to_i32(info.num_values, "page value count")?,
                encoding: Encoding::PLAIN,
                definition_level_encoding: Encoding::RLE,
                repetition_level_encoding: Encoding::RLE,
                statistics: None,
            }),
            index_page_header: None,
            dictionary_page_header: None,
            data_page_header_v2: None,
        };

        let bytes = to_thrift_bytes(&header)?;
        out.write_all(&bytes)?;

        pages.push(PageEntry {
            offset: info.offset,
            header_size: bytes.len(),
            uncompressed_size: info.uncompressed_size,
            compressed_size: info.compressed_size,
            num_values: info.num_values,
            num_rows: info.num_rows,
        });
        Ok(bytes.len())
    }

    /// Writes the footer block: serialized metadata followed by its 4-byte
    /// little-endian length.
    ///
    /// Returns the number of bytes written.
    pub fn write_footer<W: Write>(&self, out: &mut W) -> Result<usize> {
        let metadata = self.to_thrift()?;
        let bytes = to_thrift_bytes(&metadata)?;
        let len = to_i32(bytes.len(), "footer length")?;

        debug!(
            "writing footer: {} row groups, {} rows, {} bytes",
            metadata.row_groups.len(),
            metadata.num_rows,
            bytes.len()
        );

        out.write_all(&bytes)?;
        out.write_all(&len.to_le_bytes())?;
        Ok(bytes.len() + 4)
    }

    /// Builds the thrift file metadata from the recorded pages
    pub fn to_thrift(&self) -> Result<FileMetaData> {
        let num_row_groups = self.num_row_groups();
        if let Some((column, pages)) = self.pages.iter().find(|(_, p)| p.len() != num_row_groups)
        {
            return Err(ParquetError::internal(format!(
                "column '{}' has {} pages, expected {}",
                column,
                pages.len(),
                num_row_groups
            )));
        }

        let row_groups = (0..num_row_groups)
            .map(|index| self.row_group(index))
            .collect::<Result<Vec<_>>>()?;
        let num_rows = row_groups.iter().map(|rg| rg.num_rows).sum();

        Ok(FileMetaData {
            version: FORMAT_VERSION,
            schema: schema_to_thrift(&self.schema),
            num_rows,
            row_groups,
            key_value_metadata: None,
            created_by: self.created_by.clone(),
            column_orders: None,
            encryption_algorithm: None,
            footer_signing_key_metadata: None,
        })
    }

    fn row_group(&self, index: usize) -> Result<RowGroup> {
        let mut columns = Vec::with_capacity(self.pages.len());
        let mut total_byte_size = 0i64;
        let mut total_compressed_size = 0i64;
        let mut num_rows = 0i64;

        for (pages, descriptor) in self.pages.values().zip(self.schema.columns()) {
            let page = pages[index];
            let uncompressed = page.total_uncompressed_size() as i64;
            let compressed = page.total_compressed_size() as i64;
            total_byte_size += uncompressed;
            total_compressed_size += compressed;
            num_rows = page.num_rows as i64;

            let (type_, _) = physical_type(descriptor.primitive_type());
            let mut encodings = vec![Encoding::PLAIN];
            if descriptor.max_def_level() > 0 || descriptor.max_rep_level() > 0 {
                encodings.push(Encoding::RLE);
            }

            columns.push(ColumnChunk {
                file_path: None,
                file_offset: page.offset as i64 + compressed,
                meta_data: Some(ColumnMetaData {
                    type_,
                    encodings,
                    path_in_schema: descriptor.path_in_schema(),
                    codec: self.compression,
                    num_values: page.num_values as i64,
                    total_uncompressed_size: uncompressed,
                    total_compressed_size: compressed,
                    key_value_metadata: None,
                    data_page_offset: page.offset as i64,
                    index_page_offset: None,
                    dictionary_page_offset: None,
                    statistics: None,
                    encoding_stats: None,
                    bloom_filter_offset: None,
                    bloom_filter_length: None,
                    size_statistics: None,
                }),
                offset_index_offset: None,
                offset_index_length: None,
                column_index_offset: None,
                column_index_length: None,
                crypto_metadata: None,
                encrypted_column_metadata: None,
            });
        }

        let file_offset = columns
            .first()
            .and_then(|c| c.meta_data.as_ref())
            .map(|m| m.data_page_offset);

        Ok(RowGroup {
            columns,
            total_byte_size,
            num_rows,
            sorting_columns: None,
            file_offset,
            total_compressed_size: Some(total_compressed_size),
            ordinal: Some(i16::try_from(index).map_err(|_| {
                ParquetError::invalid_argument(format!("too many row groups ({})", index + 1))
            })?),
        })
    }
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| ParquetError::invalid_argument(format!("{} {} exceeds i32", what, value)))
}

fn to_thrift_bytes<T: TSerializable>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut protocol = TCompactOutputProtocol::new(&mut buf);
        value.write_to_out_protocol(&mut protocol)?;
    }
    Ok(buf)
}

fn physical_type(primitive_type: PrimitiveType) -> (Type, Option<ConvertedType>) {
    match primitive_type {
        PrimitiveType::Boolean => (Type::BOOLEAN, None),
        PrimitiveType::Int32 => (Type::INT32, None),
        PrimitiveType::Int64 => (Type::INT64, None),
        PrimitiveType::UInt32 => (Type::INT32, Some(ConvertedType::UINT_32)),
        PrimitiveType::UInt64 => (Type::INT64, Some(ConvertedType::UINT_64)),
        PrimitiveType::Float32 => (Type::FLOAT, None),
        PrimitiveType::Float64 => (Type::DOUBLE, None),
        PrimitiveType::String => (Type::BYTE_ARRAY, Some(ConvertedType::UTF8)),
    }
}

fn repetition_type(repetition: Repetition) -> FieldRepetitionType {
    match repetition {
        Repetition::Required => FieldRepetitionType::REQUIRED,
        Repetition::Optional => FieldRepetitionType::OPTIONAL,
        Repetition::Repeated => FieldRepetitionType::REPEATED,
    }
}

fn element(name: &str) -> SchemaElement {
    SchemaElement {
        type_: None,
        type_length: None,
        repetition_type: None,
        name: name.to_string(),
        num_children: None,
        converted_type: None,
        scale: None,
        precision: None,
        field_id: None,
        logical_type: None,
    }
}

/// Flattens the schema depth-first, root group first
pub fn schema_to_thrift(schema: &Schema) -> Vec<SchemaElement> {
    let mut elements = Vec::with_capacity(1 + schema.columns().len());
    let mut root = element(schema.name());
    root.num_children = Some(schema.roots().len() as i32);
    elements.push(root);

    for node in schema.roots() {
        flatten(node, schema, &mut elements);
    }
    elements
}

fn flatten(node: &SchemaNode, schema: &Schema, out: &mut Vec<SchemaElement>) {
    match node {
        SchemaNode::Group {
            name,
            repetition,
            children,
        } => {
            let mut group = element(name);
            group.repetition_type = Some(repetition_type(*repetition));
            group.num_children = Some(children.len() as i32);
            out.push(group);
            for child in children {
                flatten(child, schema, out);
            }
        }
        SchemaNode::Leaf { column } => {
            let descriptor = &schema.columns()[*column];
            let (physical, converted) = physical_type(descriptor.primitive_type());
            let mut leaf = element(descriptor.leaf_name());
            leaf.type_ = Some(physical);
            leaf.repetition_type = Some(repetition_type(descriptor.repetition()));
            leaf.converted_type = converted;
            out.push(leaf);
        }
    }
}
