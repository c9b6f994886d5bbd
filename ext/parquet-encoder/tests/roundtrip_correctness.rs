use parquet::record::{Field as RecordField, RowAccessor};
use parquet_encoder::*;

use test_helpers::*;

#[test]
fn test_roundtrip_people() {
    let people = generate_people(200);
    let bytes = write_records(person_fields(), &people, 64).unwrap();
    let rows = read_rows(bytes);

    assert_eq!(rows.len(), people.len());
    for (i, (row, person)) in rows.iter().zip(&people).enumerate() {
        assert_eq!(row_fields(row), expected_row(person), "row {} mismatch", i);
    }
}

#[test]
fn test_roundtrip_across_page_boundaries() {
    // every page size from one row per page to a single page
    let people = generate_people(13);
    for max_rows in 1..=14 {
        let bytes = write_records(person_fields(), &people, max_rows).unwrap();
        let rows = read_rows(bytes);
        let ids: Vec<i32> = rows.iter().map(|row| row.get_int(0).unwrap()).collect();
        assert_eq!(ids, (0..13).collect::<Vec<_>>(), "max_rows_per_page {}", max_rows);
    }
}

#[derive(Debug, Clone)]
struct Measurement {
    station: String,
    temperature: f64,
    humidity: Option<f64>,
}

#[test]
fn test_roundtrip_doubles() {
    let fields = vec![
        Field::new("station", |m: &Measurement| m.station.clone()).unwrap(),
        Field::new("temperature", |m: &Measurement| m.temperature).unwrap(),
        Field::new("humidity", |m: &Measurement| m.humidity).unwrap(),
    ];
    let measurements = vec![
        Measurement {
            station: "north".to_string(),
            temperature: -12.25,
            humidity: Some(0.81),
        },
        Measurement {
            station: "south".to_string(),
            temperature: f64::MAX,
            humidity: None,
        },
        Measurement {
            station: "east".to_string(),
            temperature: f64::MIN_POSITIVE,
            humidity: Some(0.0),
        },
    ];

    let bytes = write_records(fields, &measurements, 1000).unwrap();
    let rows = read_rows(bytes);

    for (row, m) in rows.iter().zip(&measurements) {
        assert_eq!(row.get_string(0).unwrap(), &m.station);
        assert_eq!(row.get_double(1).unwrap(), m.temperature);
        match (row.get_column_iter().nth(2), m.humidity) {
            (Some((_, RecordField::Double(v))), Some(expected)) => assert_eq!(*v, expected),
            (Some((_, RecordField::Null)), None) => {}
            (other, expected) => panic!("humidity {:?}, expected {:?}", other, expected),
        }
    }
}

#[test]
fn test_roundtrip_unicode_and_empty_strings() {
    let values = vec![
        String::new(),
        "plain".to_string(),
        "日本語のテキスト".to_string(),
        "emoji 🦀🦀".to_string(),
        "x".repeat(100_000),
    ];
    let fields = vec![Field::new("text", |s: &String| s.clone()).unwrap()];
    let bytes = write_records(fields, &values, 2).unwrap();

    let rows = read_rows(bytes);
    let read: Vec<String> = rows
        .iter()
        .map(|row| row.get_string(0).unwrap().clone())
        .collect();
    assert_eq!(read, values);
}

#[test]
fn test_roundtrip_extreme_integers() {
    #[derive(Clone)]
    struct Extremes {
        small: i32,
        big: i64,
        unsigned: u32,
        huge: u64,
    }

    let fields = vec![
        Field::new("small", |e: &Extremes| e.small).unwrap(),
        Field::new("big", |e: &Extremes| e.big).unwrap(),
        Field::new("unsigned", |e: &Extremes| e.unsigned).unwrap(),
        Field::new("huge", |e: &Extremes| e.huge).unwrap(),
    ];
    let records = vec![
        Extremes {
            small: i32::MIN,
            big: i64::MIN,
            unsigned: 0,
            huge: 0,
        },
        Extremes {
            small: i32::MAX,
            big: i64::MAX,
            unsigned: u32::MAX,
            huge: u64::MAX,
        },
    ];

    let rows = read_rows(write_records(fields, &records, 1000).unwrap());
    for (row, e) in rows.iter().zip(&records) {
        assert_eq!(row.get_int(0).unwrap(), e.small);
        assert_eq!(row.get_long(1).unwrap(), e.big);
        assert_eq!(row.get_uint(2).unwrap(), e.unsigned);
        assert_eq!(row.get_ulong(3).unwrap(), e.huge);
    }
}

#[test]
fn test_roundtrip_booleans_across_byte_boundaries() {
    let values: Vec<bool> = (0..37).map(|i| i % 3 == 0 || i % 7 == 0).collect();
    let fields = vec![Field::new("flag", |b: &bool| *b).unwrap()];
    let rows = read_rows(write_records(fields, &values, 1000).unwrap());

    let read: Vec<bool> = rows.iter().map(|row| row.get_bool(0).unwrap()).collect();
    assert_eq!(read, values);
}
