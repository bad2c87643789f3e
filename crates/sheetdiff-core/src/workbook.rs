//! Workbook type - the main document structure

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::sheet::{validate_sheet_name, Sheet};

/// Identifier of a parsed workbook, stable for the lifetime of a session and
/// reused when a workbook is reloaded from history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct WorkbookId(String);

impl WorkbookId {
    /// Generate a fresh random (v4 UUID) identifier
    pub fn generate() -> Self {
        WorkbookId(Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkbookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WorkbookId {
    fn from(s: String) -> Self {
        WorkbookId(s)
    }
}

impl From<&str> for WorkbookId {
    fn from(s: &str) -> Self {
        WorkbookId(s.to_string())
    }
}

impl AsRef<str> for WorkbookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A workbook (spreadsheet document)
///
/// Holds provenance (id, display name, upload time) and the ordered sheets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Workbook {
    id: WorkbookId,
    name: String,
    uploaded_at: DateTime<Utc>,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook with a fresh id, stamped with the current time
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            id: WorkbookId::generate(),
            name: name.into(),
            uploaded_at: Utc::now(),
            sheets: Vec::new(),
        }
    }

    /// Replace the identifier (reload from history)
    pub fn with_id(mut self, id: WorkbookId) -> Self {
        self.id = id;
        self
    }

    /// Replace the upload timestamp
    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = uploaded_at;
        self
    }

    /// Add a sheet, builder style
    pub fn with_sheet(mut self, sheet: Sheet) -> Result<Self> {
        self.add_sheet(sheet)?;
        Ok(self)
    }

    /// Workbook identifier
    pub fn id(&self) -> &WorkbookId {
        &self.id
    }

    /// Display name (usually the file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the workbook
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Upload timestamp
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Sheets in workbook order
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a sheet by its exact name
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    /// Append a sheet, rejecting invalid or duplicate names
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<usize> {
        validate_sheet_name(sheet.name())?;

        // Spreadsheet applications treat names case-insensitively
        let lower = sheet.name().to_lowercase();
        if self.sheets.iter().any(|s| s.name().to_lowercase() == lower) {
            return Err(Error::DuplicateSheetName(sheet.name().to_string()));
        }

        self.sheets.push(sheet);
        Ok(self.sheets.len() - 1)
    }
}

/// Names of sheets present in both workbooks, in the modified workbook's order
pub fn common_sheet_names<'a>(original: &Workbook, modified: &'a Workbook) -> Vec<&'a str> {
    modified
        .sheets
        .iter()
        .map(Sheet::name)
        .filter(|name| original.sheet_by_name(name).is_some())
        .collect()
}
