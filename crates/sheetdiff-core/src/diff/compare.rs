//! Positional sheet comparison
//!
//! Rows are aligned in lockstep: row `k` of the original is always compared
//! with row `k` of the modified sheet, and whatever is left over on the longer
//! side is reported as removed or added. There is no re-synchronization after
//! an inserted or deleted row, so one inserted row shows up as every following
//! row being modified. That keeps the walk O(rows x columns) with output whose
//! shape depends only on the two row counts.

use super::{ChangeKind, CellDiff, DiffResult, RowDiff, Side};
use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::sheet::Sheet;
use crate::workbook::{common_sheet_names, Workbook};

/// Compare the sheet named `sheet_name` in both workbooks
///
/// Fails with [`Error::SheetNotFound`] when either workbook lacks the sheet;
/// the original side is checked first.
pub fn compare(original: &Workbook, modified: &Workbook, sheet_name: &str) -> Result<DiffResult> {
    let original_sheet = original
        .sheet_by_name(sheet_name)
        .ok_or_else(|| Error::SheetNotFound {
            sheet: sheet_name.to_string(),
            side: Side::Original,
        })?;
    let modified_sheet = modified
        .sheet_by_name(sheet_name)
        .ok_or_else(|| Error::SheetNotFound {
            sheet: sheet_name.to_string(),
            side: Side::Modified,
        })?;

    Ok(compare_sheets(original_sheet, modified_sheet))
}

/// Compare every sheet the two workbooks share, in the modified workbook's order
pub fn compare_all(original: &Workbook, modified: &Workbook) -> Vec<DiffResult> {
    common_sheet_names(original, modified)
        .into_iter()
        .filter_map(|name| compare(original, modified, name).ok())
        .collect()
}

/// Compare two sheets row by row. The report is named after the original sheet.
pub fn compare_sheets(original: &Sheet, modified: &Sheet) -> DiffResult {
    let original_rows = original.rows();
    let modified_rows = modified.rows();
    let mut row_diffs = Vec::with_capacity(original_rows.len().max(modified_rows.len()));

    let paired = original_rows.len().min(modified_rows.len());
    for (i, (o, m)) in original_rows.iter().zip(modified_rows).enumerate() {
        let cell_diffs = compare_cells(o, m);
        let changed = cell_diffs.iter().any(|c| c.kind.is_change());

        row_diffs.push(if changed {
            RowDiff {
                index: i as u32,
                kind: ChangeKind::Modified,
                cell_diffs,
                original: Some(o.clone()),
                modified: Some(m.clone()),
            }
        } else {
            RowDiff {
                index: i as u32,
                kind: ChangeKind::Unchanged,
                cell_diffs,
                original: None,
                modified: None,
            }
        });
    }

    for (i, row) in original_rows.iter().enumerate().skip(paired) {
        row_diffs.push(one_sided(i, row, ChangeKind::Removed));
    }
    for (j, row) in modified_rows.iter().enumerate().skip(paired) {
        row_diffs.push(one_sided(j, row, ChangeKind::Added));
    }

    DiffResult {
        sheet_name: original.name().to_string(),
        row_diffs,
    }
}

fn one_sided(index: usize, row: &Row, kind: ChangeKind) -> RowDiff {
    let removed = kind == ChangeKind::Removed;
    let cell_diffs = row
        .cells
        .iter()
        .enumerate()
        .map(|(col, cell)| CellDiff {
            index: col as u32,
            kind,
            original_value: removed.then(|| cell.value.clone()),
            modified_value: (!removed).then(|| cell.value.clone()),
        })
        .collect();

    RowDiff {
        index: index as u32,
        kind,
        cell_diffs,
        original: removed.then(|| row.clone()),
        modified: (!removed).then(|| row.clone()),
    }
}

/// Compare two rows column by column
///
/// Produces one [`CellDiff`] per column up to the wider row; columns missing
/// on one side read as empty. Cells are only ever `Unchanged` or `Modified`.
pub fn compare_cells(original: &Row, modified: &Row) -> Vec<CellDiff> {
    let width = original.cell_count().max(modified.cell_count());

    (0..width)
        .map(|col| {
            let o = original.value(col);
            let m = modified.value(col);
            CellDiff {
                index: col as u32,
                kind: if values_equal(o, m) {
                    ChangeKind::Unchanged
                } else {
                    ChangeKind::Modified
                },
                original_value: Some(o.clone()),
                modified_value: Some(m.clone()),
            }
        })
        .collect()
}

/// Cell equality used by the diff
///
/// Empty only equals empty. Values of the same type compare directly; values
/// of different types compare by their text, so `1` and `"1"` are equal.
pub fn values_equal(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Empty, CellValue::Empty) => true,
        (CellValue::Empty, _) | (_, CellValue::Empty) => false,
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x == y,
        (CellValue::Number(x), CellValue::Number(y)) => x == y,
        (CellValue::String(x), CellValue::String(y)) => x == y,
        _ => a.comparison_text() == b.comparison_text(),
    }
}
