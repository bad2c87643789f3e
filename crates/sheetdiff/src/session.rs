//! Comparison session state

use log::debug;

use sheetdiff_core::{
    common_sheet_names, compare, compare_all, DiffLocation, DiffNavigator, DiffResult, DiffSummary,
    Side, Workbook,
};

use crate::error::{Error, Result};

/// The pair of workbooks being compared, the selected sheet and a cursor
/// over the latest results
///
/// Replacing a workbook keeps the previous results until the next
/// comparison. A failed comparison changes nothing.
#[derive(Debug, Clone, Default)]
pub struct DiffSession {
    original: Option<Workbook>,
    modified: Option<Workbook>,
    selected_sheet: Option<String>,
    navigator: DiffNavigator,
}

impl DiffSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with both workbooks loaded
    pub fn with_workbooks(original: Workbook, modified: Workbook) -> Self {
        Self {
            original: Some(original),
            modified: Some(modified),
            ..Self::default()
        }
    }

    /// Load (or replace) the original workbook
    pub fn set_original(&mut self, workbook: Workbook) {
        self.original = Some(workbook);
    }

    /// Load (or replace) the modified workbook
    pub fn set_modified(&mut self, workbook: Workbook) {
        self.modified = Some(workbook);
    }

    /// The original workbook, if loaded
    pub fn original(&self) -> Option<&Workbook> {
        self.original.as_ref()
    }

    /// The modified workbook, if loaded
    pub fn modified(&self) -> Option<&Workbook> {
        self.modified.as_ref()
    }

    /// Sheet of the last single-sheet comparison
    pub fn selected_sheet(&self) -> Option<&str> {
        self.selected_sheet.as_deref()
    }

    /// Sheets present in both workbooks, in the modified workbook's order.
    /// Empty until both are loaded.
    pub fn common_sheets(&self) -> Vec<String> {
        match (&self.original, &self.modified) {
            (Some(original), Some(modified)) => common_sheet_names(original, modified)
                .into_iter()
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn pair(&self) -> Result<(&Workbook, &Workbook)> {
        let original = self
            .original
            .as_ref()
            .ok_or(Error::WorkbookNotLoaded(Side::Original))?;
        let modified = self
            .modified
            .as_ref()
            .ok_or(Error::WorkbookNotLoaded(Side::Modified))?;
        Ok((original, modified))
    }

    /// Compare one sheet, select it and point the cursor at its first change
    pub fn compare_sheet(&mut self, sheet_name: &str) -> Result<DiffSummary> {
        let (original, modified) = self.pair()?;
        let result = compare(original, modified, sheet_name)?;
        let summary = result.summary();
        debug!("Compared sheet '{}': {}", sheet_name, summary);

        self.selected_sheet = Some(sheet_name.to_string());
        self.navigator.set_results(vec![result]);
        Ok(summary)
    }

    /// Compare every common sheet; the cursor walks their changes in order
    pub fn compare_common_sheets(&mut self) -> Result<&[DiffResult]> {
        let (original, modified) = self.pair()?;
        let results = compare_all(original, modified);
        debug!("Compared {} common sheets", results.len());

        self.selected_sheet = None;
        self.navigator.set_results(results);
        Ok(self.navigator.results())
    }

    /// Results of the last comparison
    pub fn results(&self) -> &[DiffResult] {
        self.navigator.results()
    }

    /// Cursor over the last results
    pub fn navigator(&self) -> &DiffNavigator {
        &self.navigator
    }

    /// Mutable cursor, for stepping
    pub fn navigator_mut(&mut self) -> &mut DiffNavigator {
        &mut self.navigator
    }

    /// The change under the cursor
    pub fn current(&self) -> Option<DiffLocation<'_>> {
        self.navigator.current()
    }

    /// Unload both workbooks and drop all results
    pub fn clear(&mut self) {
        self.original = None;
        self.modified = None;
        self.selected_sheet = None;
        self.navigator.clear();
    }
}
