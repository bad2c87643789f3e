//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The scalar stored in a cell
//! - [`Cell`] - A value plus optional presentation metadata
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod value;

pub use address::CellAddress;
pub use value::{CellValue, SharedString, StringPool};

use crate::format::NumberFormat;

/// A single cell as parsed from a workbook
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Cell {
    /// Cell value
    pub value: CellValue,
    /// Number format applied in the source file (not compared)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub number_format: Option<NumberFormat>,
}

impl Cell {
    /// Create a cell without presentation metadata
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            number_format: None,
        }
    }

    /// Attach a number format
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = Some(format);
        self
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Cell::new(value)
    }
}
