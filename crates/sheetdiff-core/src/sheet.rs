//! Sheet type

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::MAX_SHEET_NAME_LEN;

/// A named, ordered sequence of rows
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sheet {
    name: String,
    rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from plain rows of values, indexing them in order
    pub fn from_values<S, R, V>(name: S, rows: R) -> Self
    where
        S: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<crate::CellValue>,
    {
        let mut sheet = Sheet::new(name);
        for row in rows {
            sheet.push_row(row.into_iter().map(Cell::new).collect());
        }
        sheet
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows in file order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row by position
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows, including empty ones
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row's cell count
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Row::cell_count).max().unwrap_or(0)
    }

    /// Append a row, assigning it the next index. Returns that index.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> u32 {
        let index = self.rows.len() as u32;
        self.rows.push(Row::with_cells(index, cells));
        index
    }

    /// Append `count` empty rows
    pub fn push_empty_rows(&mut self, count: usize) {
        for _ in 0..count {
            self.push_row(Vec::new());
        }
    }

    /// Mutable access to the last row
    pub fn last_row_mut(&mut self) -> Option<&mut Row> {
        self.rows.last_mut()
    }
}

/// Validate a sheet name against spreadsheet naming rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    for c in INVALID_CHARS {
        if name.contains(*c) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }
    }

    Ok(())
}
