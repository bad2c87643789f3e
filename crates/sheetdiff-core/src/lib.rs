//! # sheetdiff-core
//!
//! Core data structures and the comparison engine for sheetdiff.
//!
//! - [`CellValue`], [`Cell`], [`Row`], [`Sheet`], [`Workbook`] - the tabular model
//!   every parser produces
//! - [`compare`] - positional row/cell diff of one sheet across two workbooks
//! - [`DiffNavigator`] - cursor over the changed rows of a set of results
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff_core::{compare, ChangeKind, Sheet, Workbook};
//!
//! let original = Workbook::new("before.xlsx")
//!     .with_sheet(Sheet::from_values("Data", vec![vec!["a", "b"]]))
//!     .unwrap();
//! let modified = Workbook::new("after.xlsx")
//!     .with_sheet(Sheet::from_values("Data", vec![vec!["a", "c"]]))
//!     .unwrap();
//!
//! let result = compare(&original, &modified, "Data").unwrap();
//! assert_eq!(result.row_diffs[0].kind, ChangeKind::Modified);
//! assert_eq!(result.diff_count(), 1);
//! ```

pub mod cell;
pub mod diff;
pub mod error;
pub mod format;
pub mod navigation;
pub mod row;
pub mod sheet;
pub mod workbook;

// Re-exports for convenience
pub use cell::{Cell, CellAddress, CellValue, SharedString, StringPool};
pub use diff::{
    compare, compare_all, compare_cells, compare_sheets, values_equal, CellDiff, ChangeKind,
    DiffResult, DiffSummary, RowDiff, Side,
};
pub use error::{Error, Result};
pub use format::NumberFormat;
pub use navigation::{DiffLocation, DiffNavigator};
pub use row::Row;
pub use sheet::{validate_sheet_name, Sheet};
pub use workbook::{common_sheet_names, Workbook, WorkbookId};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
