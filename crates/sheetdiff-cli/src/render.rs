//! Plain-text rendering of diff results

use std::fmt::Write;

use sheetdiff::{CellAddress, CellDiff, CellValue, ChangeKind, DiffResult, RowDiff};

const EMPTY: &str = "(empty)";

/// Render one sheet's result. Unchanged rows are listed only with `all_rows`.
pub fn render_result(result: &DiffResult, all_rows: bool, max_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {}: {}", result.sheet_name, result.summary());

    for row in &result.row_diffs {
        if row.is_change() || all_rows {
            render_row(&mut out, row, max_width);
        }
    }
    out
}

fn marker(kind: ChangeKind) -> char {
    match kind {
        ChangeKind::Unchanged => ' ',
        ChangeKind::Modified => '~',
        ChangeKind::Added => '+',
        ChangeKind::Removed => '-',
    }
}

fn render_row(out: &mut String, row: &RowDiff, max_width: usize) {
    let _ = writeln!(out, "{} row {}", marker(row.kind), row.index + 1);

    for cell in &row.cell_diffs {
        let column = CellAddress::column_to_letters(cell.index);
        match row.kind {
            ChangeKind::Unchanged => {}
            ChangeKind::Modified if cell.kind == ChangeKind::Modified => {
                let _ = writeln!(
                    out,
                    "    {}: {} -> {}",
                    column,
                    value_text(cell.original_value.as_ref(), max_width),
                    value_text(cell.modified_value.as_ref(), max_width)
                );
            }
            ChangeKind::Modified => {}
            ChangeKind::Added | ChangeKind::Removed => {
                if let Some(value) = side_value(cell).filter(|v| !v.is_empty()) {
                    let _ = writeln!(out, "    {}: {}", column, value_text(Some(value), max_width));
                }
            }
        }
    }
}

fn side_value(cell: &CellDiff) -> Option<&CellValue> {
    cell.modified_value.as_ref().or(cell.original_value.as_ref())
}

fn value_text(value: Option<&CellValue>, max_width: usize) -> String {
    match value {
        None | Some(CellValue::Empty) => EMPTY.to_string(),
        Some(value) => truncate(&value.to_string(), max_width),
    }
}

/// Cut text to at most `max_width` characters, marking the cut with `…`
pub fn truncate(text: &str, max_width: usize) -> String {
    let text = text.replace('\n', "\\n");
    if max_width == 0 || text.chars().count() <= max_width {
        return text;
    }
    let mut cut: String = text.chars().take(max_width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
