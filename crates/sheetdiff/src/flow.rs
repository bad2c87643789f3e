//! Upload, comparison and export flows over the history store

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use sheetdiff_core::{compare, DiffResult, Workbook, WorkbookId};
use sheetdiff_history::{HistoryFile, HistoryStore};
use sheetdiff_xlsx::XlsxWriter;

use crate::error::{Error, Result};
use crate::parse::{parse, read_input, ParseOptions};

/// A file that was parsed and stored
#[derive(Debug, Clone)]
pub struct ImportedFile {
    /// The parsed workbook
    pub workbook: Workbook,
    /// Its history entry
    pub entry: HistoryFile,
}

/// Read and parse a file, then store the workbook and record its history
///
/// Nothing is written to the store unless parsing succeeds.
pub async fn import_file(
    store: &HistoryStore,
    path: impl AsRef<Path>,
    options: ParseOptions,
) -> Result<ImportedFile> {
    let (bytes, options) = read_input(path.as_ref(), options).await?;
    let workbook = parse(&bytes, &options)?;

    let id = store.save(&workbook).await?;
    let entry = HistoryFile::for_stored(
        id,
        workbook.name(),
        workbook.uploaded_at(),
        bytes.len() as u64,
    );
    store.record_history(&entry).await?;

    info!("Imported '{}' as {}", entry.name, entry.id);
    Ok(ImportedFile { workbook, entry })
}

/// Load a stored workbook, failing when the id is unknown
pub async fn load_workbook(store: &HistoryStore, id: &WorkbookId) -> Result<Workbook> {
    store
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(id.clone()))
}

/// A request to compare one sheet of two stored workbooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    /// Id of the original workbook
    #[serde(rename = "originalWorkbookId")]
    pub original_id: WorkbookId,
    /// Id of the modified workbook
    #[serde(rename = "modifiedWorkbookId")]
    pub modified_id: WorkbookId,
    /// Sheet to compare
    pub sheet_name: String,
}

impl ComparisonRequest {
    /// Build a request
    pub fn new(
        original_id: impl Into<WorkbookId>,
        modified_id: impl Into<WorkbookId>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            original_id: original_id.into(),
            modified_id: modified_id.into(),
            sheet_name: sheet_name.into(),
        }
    }
}

/// Load both workbooks of a request and compare the requested sheet
pub async fn run_comparison(
    store: &HistoryStore,
    request: &ComparisonRequest,
) -> Result<DiffResult> {
    let original = load_workbook(store, &request.original_id).await?;
    let modified = load_workbook(store, &request.modified_id).await?;
    let result = compare(&original, &modified, &request.sheet_name)?;
    debug!(
        "Compared {} and {} on '{}': {} changed rows",
        request.original_id,
        request.modified_id,
        request.sheet_name,
        result.diff_count()
    );
    Ok(result)
}

/// Write a workbook to an xlsx file
pub async fn export_file(workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = XlsxWriter::to_bytes(workbook)?;
    tokio::fs::write(path, &bytes).await?;
    debug!(
        "Exported '{}' to {} ({} bytes)",
        workbook.name(),
        path.display(),
        bytes.len()
    );
    Ok(())
}
