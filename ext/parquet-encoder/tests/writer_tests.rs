use parquet::basic::Compression;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::format::CompressionCodec;
use parquet_encoder::*;
use std::io::Write;

use test_helpers::*;

// =============================================================================
// Paging Tests
// =============================================================================

#[test]
fn test_pages_split_at_max_rows_per_page() {
    let people = generate_people(5);
    let mut writer = WriterBuilder::new()
        .with_max_rows_per_page(2)
        .build(Vec::new(), person_fields())
        .unwrap();
    writer.add_all(&people);
    assert_eq!(writer.page_set_row_counts(), vec![2, 2, 1]);

    let reader = open(writer.write().unwrap());
    let metadata = reader.metadata();
    assert_eq!(metadata.num_row_groups(), 3);
    assert_eq!(metadata.file_metadata().num_rows(), 5);

    let rows: Vec<i64> = metadata.row_groups().iter().map(|rg| rg.num_rows()).collect();
    assert_eq!(rows, vec![2, 2, 1]);

    // three pages per column, one in each row group
    for column in 0..10 {
        for row_group in 0..3 {
            let pages = decode_pages(&reader, row_group, column);
            assert_eq!(pages.len(), 1);
            assert_eq!(pages[0].num_values as i64, rows[row_group]);
        }
    }
}

#[test]
fn test_default_page_size() {
    let people = generate_people(2500);
    let mut writer = Writer::new(Vec::new(), person_fields()).unwrap();
    writer.add_all(&people);
    assert_eq!(writer.page_set_row_counts(), vec![1000, 1000, 500]);
    assert_eq!(writer.num_rows(), 2500);
}

#[test]
fn test_pages_are_written_column_major() {
    let people = generate_people(7);
    let bytes = write_records(person_fields(), &people, 3).unwrap();
    let reader = open(bytes);
    let metadata = reader.metadata();

    let mut expected_offset = 4;
    for column in 0..10 {
        for row_group in metadata.row_groups() {
            let chunk = row_group.column(column);
            assert_eq!(chunk.data_page_offset(), expected_offset);
            expected_offset += chunk.compressed_size();
        }
    }
}

// =============================================================================
// File Layout Tests
// =============================================================================

#[test]
fn test_file_framing_and_total_size() {
    let people = generate_people(5);
    let bytes = write_records(person_fields(), &people, 2).unwrap();

    assert_eq!(&bytes[..4], MAGIC);
    assert_eq!(&bytes[bytes.len() - 4..], MAGIC);

    let footer_len =
        u32::from_le_bytes(bytes[bytes.len() - 8..bytes.len() - 4].try_into().unwrap()) as i64;

    let reader = open(bytes.clone());
    let pages: i64 = reader
        .metadata()
        .row_groups()
        .iter()
        .flat_map(|rg| rg.columns())
        .map(|chunk| chunk.compressed_size())
        .sum();

    assert_eq!(pages + footer_len + 4 + 8, bytes.len() as i64);
}

#[test]
fn test_output_is_deterministic() {
    let people = generate_people(50);
    let first = write_records(person_fields(), &people, 16).unwrap();
    let second = write_records(person_fields(), &people, 16).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_footer_metadata() {
    let people = generate_people(3);
    let mut writer = WriterBuilder::new()
        .with_created_by("people-exporter 2.1")
        .build(Vec::new(), person_fields())
        .unwrap();
    writer.add_all(&people);

    let reader = open(writer.write().unwrap());
    let file_metadata = reader.metadata().file_metadata();
    assert_eq!(file_metadata.version(), 1);
    assert_eq!(file_metadata.created_by(), Some("people-exporter 2.1"));

    let schema = file_metadata.schema_descr();
    assert_eq!(schema.num_columns(), 10);
    assert_eq!(schema.column(1).name(), "age");
    assert_eq!(schema.column(1).max_def_level(), 1);
    assert_eq!(schema.column(0).max_def_level(), 0);

    let chunk = reader.metadata().row_group(0).column(0);
    assert_eq!(chunk.compression(), Compression::SNAPPY);
    assert_eq!(chunk.num_values(), 3);
}

#[test]
fn test_schema_name_in_footer() {
    let people = generate_people(2);
    let default_bytes = write_records(person_fields(), &people, 10).unwrap();
    let reader = open(default_bytes);
    assert_eq!(reader.metadata().file_metadata().schema_descr().name(), "root");

    let mut writer = WriterBuilder::new()
        .with_schema_name("person")
        .build(Vec::new(), person_fields())
        .unwrap();
    writer.add_all(&people);

    let bytes = writer.write().unwrap();
    let reader = open(bytes.clone());
    let schema = reader.metadata().file_metadata().schema_descr();
    assert_eq!(schema.name(), "person");
    assert_eq!(schema.num_columns(), 10);
    assert_eq!(read_rows(bytes).len(), 2);
}

// =============================================================================
// Codec Configuration Tests
// =============================================================================

struct Uncompressed;

impl BlockCodec for Uncompressed {
    fn compression(&self) -> CompressionCodec {
        CompressionCodec::UNCOMPRESSED
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

#[test]
fn test_custom_codec() {
    let people = generate_people(20);
    let mut writer = WriterBuilder::new()
        .with_codec(Box::new(Uncompressed))
        .build(Vec::new(), person_fields())
        .unwrap();
    writer.add_all(&people);
    let bytes = writer.write().unwrap();

    let reader = open(bytes.clone());
    let chunk = reader.metadata().row_group(0).column(0);
    assert_eq!(chunk.compression(), Compression::UNCOMPRESSED);
    assert_eq!(chunk.compressed_size(), chunk.uncompressed_size());

    let rows = read_rows(bytes);
    for (row, person) in rows.iter().zip(&people) {
        assert_eq!(row_fields(row), expected_row(person));
    }
}

#[test]
fn test_codec_errors_propagate() {
    struct Failing;

    impl BlockCodec for Failing {
        fn compression(&self) -> CompressionCodec {
            CompressionCodec::SNAPPY
        }

        fn encode(&self, _input: &[u8]) -> Result<Vec<u8>> {
            Err(ParquetError::internal("compressor unavailable"))
        }
    }

    let mut writer = WriterBuilder::new()
        .with_codec(Box::new(Failing))
        .build(Vec::new(), person_fields())
        .unwrap();
    writer.add_all(&generate_people(2));
    assert!(matches!(writer.write(), Err(ParquetError::Internal(_))));
}

// =============================================================================
// Output Tests
// =============================================================================

#[test]
fn test_write_to_file() {
    let people = generate_people(100);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    {
        let mut writer = WriterBuilder::new()
            .with_max_rows_per_page(30)
            .build(file.as_file_mut(), person_fields())
            .unwrap();
        writer.add_all(&people);
        writer.write().unwrap().flush().unwrap();
    }

    let reader = SerializedFileReader::new(file.reopen().unwrap()).unwrap();
    assert_eq!(reader.metadata().num_row_groups(), 4);
    assert_eq!(reader.metadata().file_metadata().num_rows(), 100);

    let ids: Vec<i32> = reader
        .get_row_iter(None)
        .unwrap()
        .map(|row| match row.unwrap().get_column_iter().next() {
            Some((_, parquet::record::Field::Int(id))) => *id,
            other => panic!("unexpected id column {:?}", other),
        })
        .collect();
    assert_eq!(ids, (0..100).collect::<Vec<_>>());
}

#[test]
fn test_write_returns_output() {
    let mut writer = Writer::new(std::io::Cursor::new(Vec::new()), person_fields()).unwrap();
    writer.add(&Person::default());
    let cursor = writer.write().unwrap();
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}
