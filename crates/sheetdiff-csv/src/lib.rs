//! # sheetdiff-csv
//!
//! CSV reader for sheetdiff. A CSV file becomes a workbook with a single
//! sheet; every record is a row, no header treatment.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
