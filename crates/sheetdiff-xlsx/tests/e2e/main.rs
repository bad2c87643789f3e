//! End-to-end tests for sheetdiff-xlsx.
//!
//! Reading tests build the exact package they need in memory with
//! [`common::Package`], then read it back with `XlsxReader` and assert on the
//! tabular model. Writing tests go through `XlsxWriter` and read the result.

mod common;
mod reading;
mod writing;

// Re-export common utilities for submodules
pub use common::*;
