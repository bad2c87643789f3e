//! Row- and cell-level difference reports
//!
//! [`compare`] aligns two sheets positionally and produces a [`DiffResult`].
//! The types here are plain data: they own copies of the values and rows they
//! describe so a report stays valid after the workbooks are dropped.

mod compare;

pub use compare::{compare, compare_all, compare_cells, compare_sheets, values_equal};

use std::fmt;

use crate::cell::CellValue;
use crate::row::Row;

/// Classification of a row or cell in a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ChangeKind {
    /// Same on both sides
    Unchanged,
    /// Present on both sides with different content
    Modified,
    /// Only in the modified workbook
    Added,
    /// Only in the original workbook
    Removed,
}

impl ChangeKind {
    /// Lowercase tag used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Unchanged => "unchanged",
            ChangeKind::Modified => "modified",
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
        }
    }

    /// Anything other than `Unchanged`
    pub fn is_change(&self) -> bool {
        !matches!(self, ChangeKind::Unchanged)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which workbook of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Side {
    /// The baseline workbook
    Original,
    /// The newer workbook
    Modified,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => f.write_str("original"),
            Side::Modified => f.write_str("modified"),
        }
    }
}

/// Difference for a single column position
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CellDiff {
    /// Column index (0-based)
    pub index: u32,
    /// Classification
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ChangeKind,
    /// Value on the original side, absent for added rows
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub original_value: Option<CellValue>,
    /// Value on the modified side, absent for removed rows
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub modified_value: Option<CellValue>,
}

/// Difference for a single row position
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RowDiff {
    /// Original-side row index when that side has the row, else modified-side
    pub index: u32,
    /// Classification
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ChangeKind,
    /// Per-column differences
    pub cell_diffs: Vec<CellDiff>,
    /// Contributing original row (modified and removed rows)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub original: Option<Row>,
    /// Contributing modified row (modified and added rows)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub modified: Option<Row>,
}

impl RowDiff {
    /// Whether this row is anything but unchanged
    pub fn is_change(&self) -> bool {
        self.kind.is_change()
    }

    /// Cell diffs that are not unchanged
    pub fn changed_cells(&self) -> impl Iterator<Item = &CellDiff> {
        self.cell_diffs.iter().filter(|c| c.kind.is_change())
    }
}

/// Difference report for one sheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DiffResult {
    /// Compared sheet
    pub sheet_name: String,
    /// Row differences, original rows first then appended rows
    pub row_diffs: Vec<RowDiff>,
}

impl DiffResult {
    /// Row diffs that are not unchanged, in report order
    pub fn changes(&self) -> impl Iterator<Item = &RowDiff> {
        self.row_diffs.iter().filter(|r| r.is_change())
    }

    /// Number of non-unchanged rows
    pub fn diff_count(&self) -> usize {
        self.changes().count()
    }

    /// True when no row differs
    pub fn is_identical(&self) -> bool {
        self.diff_count() == 0
    }

    /// Row counts per classification
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for row in &self.row_diffs {
            match row.kind {
                ChangeKind::Unchanged => summary.unchanged += 1,
                ChangeKind::Modified => summary.modified += 1,
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
            }
        }
        summary
    }
}

/// Row counts per [`ChangeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffSummary {
    /// Rows equal on both sides
    pub unchanged: usize,
    /// Rows with at least one differing cell
    pub modified: usize,
    /// Rows only in the modified sheet
    pub added: usize,
    /// Rows only in the original sheet
    pub removed: usize,
}

impl DiffSummary {
    /// Rows that are not unchanged
    pub fn total_changes(&self) -> usize {
        self.modified + self.added + self.removed
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} modified, {} added, {} removed, {} unchanged",
            self.modified, self.added, self.removed, self.unchanged
        )
    }
}
