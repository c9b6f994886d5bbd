//! Writes a small people dataset to a Parquet file
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example people -- <output.parquet> [rows] [rows_per_page]

use parquet_encoder::{Field, Result, WriterBuilder};
use std::env;
use std::fs::File;
use std::io::BufWriter;

struct Person {
    id: i32,
    age: Option<i32>,
    happiness: i64,
    sadness: Option<i64>,
    code: String,
    funkiness: f32,
    lameness: Option<f32>,
    keen: Option<bool>,
    birthday: u32,
    anniversary: Option<u64>,
}

fn person(i: usize) -> Person {
    Person {
        id: i as i32,
        age: (i % 7 != 0).then_some(20 + (i % 50) as i32),
        happiness: (i * i) as i64,
        sadness: (i % 2 == 0).then_some(-(i as i64)),
        code: format!("P{:05}", i),
        funkiness: i as f32 / 3.0,
        lameness: (i % 3 == 0).then_some(i as f32 * 0.25),
        keen: (i % 5 != 0).then_some(i % 2 == 1),
        birthday: 19_700_101 + i as u32,
        anniversary: (i % 4 == 0).then_some(1_000_000_000_000 + i as u64),
    }
}

fn fields() -> Result<Vec<Field<Person>>> {
    Ok(vec![
        Field::new("id", |p: &Person| p.id)?,
        Field::new("age", |p: &Person| p.age)?,
        Field::new("happiness", |p: &Person| p.happiness)?,
        Field::new("sadness", |p: &Person| p.sadness)?,
        Field::new("code", |p: &Person| p.code.clone())?,
        Field::new("funkiness", |p: &Person| p.funkiness)?,
        Field::new("lameness", |p: &Person| p.lameness)?,
        Field::new("keen", |p: &Person| p.keen)?,
        Field::new("birthday", |p: &Person| p.birthday)?,
        Field::new("anniversary", |p: &Person| p.anniversary)?,
    ])
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.parquet> [rows] [rows_per_page]", args[0]);
        std::process::exit(1);
    }
    let rows = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let rows_per_page = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1000);

    let output = BufWriter::new(File::create(&args[1])?);
    let mut writer = WriterBuilder::new()
        .with_max_rows_per_page(rows_per_page)
        .build(output, fields()?)?;

    for i in 0..rows {
        writer.add(&person(i));
    }
    let row_groups = writer.page_set_row_counts().len();
    writer.write()?;

    println!("Wrote {} rows in {} row groups to {}", rows, row_groups, args[1]);
    Ok(())
}
