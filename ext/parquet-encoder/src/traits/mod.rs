//! Traits shared across the crate

pub mod schema;

pub use schema::SchemaInspector;
