//! Error type for the sheetdiff facade

use thiserror::Error;

use sheetdiff_core::{Side, WorkbookId};
use sheetdiff_history::StorageError;
use sheetdiff_xlsx::XlsxError;

use crate::parse::ParseError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from parsing, comparing, storing or exporting workbooks
#[derive(Debug, Error)]
pub enum Error {
    /// Input could not be parsed into a workbook
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Comparison or model error (e.g. a sheet missing on one side)
    #[error(transparent)]
    Core(#[from] sheetdiff_core::Error),

    /// History store failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Writing an xlsx export failed
    #[error("export failed: {0}")]
    Export(#[from] XlsxError),

    /// File system error outside parsing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No stored workbook has this id
    #[error("workbook not found: {0}")]
    NotFound(WorkbookId),

    /// A session comparison was requested before both sides were loaded
    #[error("no {0} workbook loaded")]
    WorkbookNotLoaded(Side),
}
