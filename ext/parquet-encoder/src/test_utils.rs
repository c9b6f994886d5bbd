//! Test utilities for parquet-encoder

use crate::Field;

/// Flat record covering every leaf type, required and optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: i32,
    pub age: Option<i32>,
    pub happiness: i64,
    pub sadness: Option<i64>,
    pub code: String,
    pub funkiness: f32,
    pub lameness: Option<f32>,
    pub keen: Option<bool>,
    pub birthday: u32,
    pub anniversary: Option<u64>,
}

/// Create a small set of people with a mix of present and missing values
pub fn sample_people() -> Vec<Person> {
    (1..=5)
        .map(|i| Person {
            id: i,
            age: (i % 2 == 1).then_some(20 + i),
            happiness: i64::from(i) * 1000,
            sadness: (i % 3 == 0).then_some(-i64::from(i)),
            code: format!("code-{}", i),
            funkiness: i as f32 * 0.5,
            lameness: (i != 2).then_some(i as f32),
            keen: if i == 4 { None } else { Some(i % 2 == 0) },
            birthday: 19_900_000 + i as u32,
            anniversary: (i > 3).then_some(u64::MAX - i as u64),
        })
        .collect()
}

/// Fields for all ten [`Person`] columns, in declaration order
pub fn person_fields() -> Vec<Field<Person>> {
    vec![
        Field::new("id", |p: &Person| p.id).unwrap(),
        Field::new("age", |p: &Person| p.age).unwrap(),
        Field::new("happiness", |p: &Person| p.happiness).unwrap(),
        Field::new("sadness", |p: &Person| p.sadness).unwrap(),
        Field::new("code", |p: &Person| p.code.clone()).unwrap(),
        Field::new("funkiness", |p: &Person| p.funkiness).unwrap(),
        Field::new("lameness", |p: &Person| p.lameness).unwrap(),
        Field::new("keen", |p: &Person| p.keen).unwrap(),
        Field::new("birthday", |p: &Person| p.birthday).unwrap(),
        Field::new("anniversary", |p: &Person| p.anniversary).unwrap(),
    ]
}
