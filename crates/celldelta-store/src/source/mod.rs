//! Raw input sources
//!
//! Provides:
//! - OpenCellID CSV file reader implementing `RawSource`

pub mod csv;

pub use csv::CsvFileSource;
