//! # sheetdiff
//!
//! Compare spreadsheet workbooks row by row and step through the differences.
//!
//! ## Features
//!
//! - Parse xlsx/xlsm workbooks and CSV files into one tabular model
//! - Positional, cell-level diff of a sheet present in both workbooks
//! - A cursor over the changed rows of one or more diff results
//! - SQLite history of imported workbooks, searchable by name
//! - Export any stored workbook back to xlsx
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff::prelude::*;
//!
//! let original = parse(b"id,qty\n1,10\n2,20\n", &ParseOptions::named("v1.csv")).unwrap();
//! let modified = parse(b"id,qty\n1,10\n2,25\n3,5\n", &ParseOptions::named("v2.csv")).unwrap();
//!
//! let mut session = DiffSession::with_workbooks(original, modified);
//! let summary = session.compare_sheet("Sheet1").unwrap();
//! assert_eq!(summary.modified, 1);
//! assert_eq!(summary.added, 1);
//!
//! let first = session.current().unwrap();
//! assert_eq!(first.row.kind, ChangeKind::Modified);
//! ```

pub mod error;
pub mod flow;
pub mod parse;
pub mod prelude;
pub mod session;

pub use error::{Error, Result};
pub use flow::{
    export_file, import_file, load_workbook, run_comparison, ComparisonRequest, ImportedFile,
};
pub use parse::{parse, read_file, FileFormat, ParseError, ParseOptions};
pub use session::DiffSession;

// Re-export core types
pub use sheetdiff_core::{
    common_sheet_names, compare, compare_all, values_equal, Cell, CellAddress, CellDiff,
    CellValue, ChangeKind, DiffLocation, DiffNavigator, DiffResult, DiffSummary, NumberFormat,
    Row, RowDiff, Sheet, Side, Workbook, WorkbookId, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export I/O and storage types
pub use sheetdiff_csv::{CsvError, CsvReadOptions, CsvReader};
pub use sheetdiff_history::{HistoryFile, HistoryStore, StorageError};
pub use sheetdiff_xlsx::{XlsxError, XlsxReader, XlsxWriter};
