//! Row types

use crate::cell::{Cell, CellValue};

/// A row of cells
///
/// `index` is the row's zero-based position in the sheet as parsed. It is
/// assigned once and never renumbered, so it always names the original
/// position rather than a position in some diff.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Row index (0-based)
    pub index: u32,
    /// Cells in column order; position `i` is column `i`
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create an empty row
    pub fn new(index: u32) -> Self {
        Self {
            index,
            cells: Vec::new(),
        }
    }

    /// Create a row from cells
    pub fn with_cells(index: u32, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Value at column `col`, `Empty` when out of range
    pub fn value(&self, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(col).map_or(EMPTY, |c| &c.value)
    }

    /// Place a cell at `col`, padding any gap with empty cells
    pub fn set_cell(&mut self, col: usize, cell: Cell) {
        if col >= self.cells.len() {
            self.cells.resize_with(col + 1, Cell::default);
        }
        self.cells[col] = cell;
    }

    /// Drop trailing cells that carry neither a value nor a format
    pub fn trim_trailing_empty(&mut self) {
        while self
            .cells
            .last()
            .is_some_and(|c| c.value.is_empty() && c.number_format.is_none())
        {
            self.cells.pop();
        }
    }

    /// Check if every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.value.is_empty())
    }

    /// Number of cells in row
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
