//! # sheetdiff-xlsx
//!
//! XLSX (Office Open XML) reader and exporter for sheetdiff.
//!
//! [`XlsxReader`] turns a workbook package into the tabular model of
//! `sheetdiff-core`: values only, with dates normalized to ISO-8601 text and
//! formulas replaced by their cached results. [`XlsxWriter`] writes that model
//! back out as a minimal package.

pub mod date;
pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
