//! Prelude module - common imports for sheetdiff users
//!
//! ```rust
//! use sheetdiff::prelude::*;
//! ```

pub use crate::{
    // Parsing
    parse,
    read_file,
    // Diff types
    CellDiff,
    CellValue,
    ChangeKind,
    ComparisonRequest,
    DiffNavigator,
    DiffResult,
    DiffSession,
    // Errors
    Error,
    FileFormat,
    // History
    HistoryFile,
    HistoryStore,
    ParseOptions,
    Result,
    RowDiff,
    Sheet,
    Workbook,
    WorkbookId,
};
