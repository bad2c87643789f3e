//! Diff engine and navigator behavior on whole workbooks

use pretty_assertions::assert_eq;
use sheetdiff_core::{
    compare, compare_all, CellValue, ChangeKind, DiffNavigator, Error, Sheet, Side, Workbook,
};

fn workbook(name: &str, sheets: Vec<Sheet>) -> Workbook {
    let mut wb = Workbook::new(name);
    for sheet in sheets {
        wb.add_sheet(sheet).unwrap();
    }
    wb
}

fn sheet(name: &str, rows: Vec<Vec<CellValue>>) -> Sheet {
    Sheet::from_values(name, rows)
}

#[test]
fn modified_and_appended_rows() {
    let original = workbook(
        "o.xlsx",
        vec![sheet(
            "Sheet1",
            vec![vec!["a".into(), 1.into()], vec!["b".into(), 2.into()]],
        )],
    );
    let modified = workbook(
        "m.xlsx",
        vec![sheet(
            "Sheet1",
            vec![
                vec!["a".into(), 1.into()],
                vec!["b".into(), 3.into()],
                vec!["c".into(), 4.into()],
            ],
        )],
    );

    let result = compare(&original, &modified, "Sheet1").unwrap();
    assert_eq!(result.sheet_name, "Sheet1");
    assert_eq!(result.row_diffs.len(), 3);

    assert_eq!(result.row_diffs[0].kind, ChangeKind::Unchanged);

    let row1 = &result.row_diffs[1];
    assert_eq!(row1.kind, ChangeKind::Modified);
    assert_eq!(row1.cell_diffs[0].kind, ChangeKind::Unchanged);
    assert_eq!(row1.cell_diffs[1].kind, ChangeKind::Modified);
    assert_eq!(row1.cell_diffs[1].original_value, Some(CellValue::Number(2.0)));
    assert_eq!(row1.cell_diffs[1].modified_value, Some(CellValue::Number(3.0)));
    assert!(row1.original.is_some() && row1.modified.is_some());

    let row2 = &result.row_diffs[2];
    assert_eq!(row2.kind, ChangeKind::Added);
    assert_eq!(row2.index, 2);
    assert_eq!(row2.original, None);
    let added: Vec<_> = row2
        .cell_diffs
        .iter()
        .map(|c| c.modified_value.clone().unwrap())
        .collect();
    assert_eq!(added, vec![CellValue::string("c"), CellValue::Number(4.0)]);

    let mut nav = DiffNavigator::with_results(vec![result]);
    assert_eq!(nav.total_diffs(), 2);
    assert_eq!(nav.cursor(), 0);
    assert!(nav.next());
    assert_eq!(nav.cursor(), 1);
    assert!(!nav.next());
    assert_eq!(nav.cursor(), 1);
    assert_eq!(nav.current().unwrap().row.kind, ChangeKind::Added);
}

#[test]
fn identical_sheets_leave_cursor_unset() {
    let rows = vec![vec![CellValue::from("x"), CellValue::from(true)]];
    let original = workbook("o", vec![sheet("S", rows.clone())]);
    let modified = workbook("m", vec![sheet("S", rows)]);

    let result = compare(&original, &modified, "S").unwrap();
    assert!(result.is_identical());

    let nav = DiffNavigator::with_results(vec![result]);
    assert_eq!(nav.cursor(), -1);
}

#[test]
fn truncated_sheet_reports_removed_rows() {
    let original = workbook(
        "o",
        vec![sheet(
            "S",
            vec![vec!["a".into()], vec!["b".into()], vec!["c".into(), 9.into()]],
        )],
    );
    let modified = workbook("m", vec![sheet("S", vec![vec!["a".into()]])]);

    let result = compare(&original, &modified, "S").unwrap();
    let kinds: Vec<_> = result.row_diffs.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![ChangeKind::Unchanged, ChangeKind::Removed, ChangeKind::Removed]
    );
    let removed = &result.row_diffs[2];
    assert_eq!(removed.index, 2);
    assert_eq!(removed.cell_diffs.len(), 2);
    assert_eq!(removed.cell_diffs[1].original_value, Some(CellValue::Number(9.0)));
    assert_eq!(removed.cell_diffs[1].modified_value, None);

    let summary = result.summary();
    assert_eq!(summary.removed, 2);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.total_changes(), 2);
}

#[test]
fn inserted_row_desynchronizes_following_rows() {
    let original = workbook(
        "o",
        vec![sheet("S", vec![vec!["a".into()], vec!["b".into()]])],
    );
    let modified = workbook(
        "m",
        vec![sheet(
            "S",
            vec![vec!["new".into()], vec!["a".into()], vec!["b".into()]],
        )],
    );

    let result = compare(&original, &modified, "S").unwrap();
    let kinds: Vec<_> = result.row_diffs.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![ChangeKind::Modified, ChangeKind::Modified, ChangeKind::Added]
    );
}

#[test]
fn number_and_numeric_text_are_equal() {
    let original = workbook("o", vec![sheet("S", vec![vec![1.into(), true.into()]])]);
    let modified = workbook("m", vec![sheet("S", vec![vec!["1".into(), "true".into()]])]);

    let result = compare(&original, &modified, "S").unwrap();
    assert_eq!(result.row_diffs[0].kind, ChangeKind::Unchanged);
}

#[test]
fn empty_and_blank_string_differ() {
    let original = workbook("o", vec![sheet("S", vec![vec![CellValue::Empty, "x".into()]])]);
    let modified = workbook("m", vec![sheet("S", vec![vec!["".into(), "x".into()]])]);

    let result = compare(&original, &modified, "S").unwrap();
    assert_eq!(result.row_diffs[0].kind, ChangeKind::Modified);
}

#[test]
fn missing_sheet_names_the_side() {
    let original = workbook("o", vec![sheet("A", vec![])]);
    let modified = workbook("m", vec![sheet("B", vec![])]);

    assert_eq!(
        compare(&original, &modified, "B"),
        Err(Error::SheetNotFound {
            sheet: "B".into(),
            side: Side::Original,
        })
    );
    assert_eq!(
        compare(&original, &modified, "A"),
        Err(Error::SheetNotFound {
            sheet: "A".into(),
            side: Side::Modified,
        })
    );
    // Checked in that order when both lack it
    assert!(matches!(
        compare(&original, &modified, "Z"),
        Err(Error::SheetNotFound {
            side: Side::Original,
            ..
        })
    ));
    assert_eq!(
        compare(&original, &modified, "Z").unwrap_err().to_string(),
        "Sheet \"Z\" not found in original workbook"
    );
}

#[test]
fn compare_all_covers_common_sheets() {
    let original = workbook(
        "o",
        vec![
            sheet("One", vec![vec!["a".into()]]),
            sheet("Two", vec![vec!["b".into()]]),
            sheet("Gone", vec![]),
        ],
    );
    let modified = workbook(
        "m",
        vec![
            sheet("Two", vec![vec!["B".into()]]),
            sheet("One", vec![vec!["a".into()]]),
            sheet("New", vec![]),
        ],
    );

    let results = compare_all(&original, &modified);
    let names: Vec<_> = results.iter().map(|r| r.sheet_name.as_str()).collect();
    assert_eq!(names, vec!["Two", "One"]);

    let nav = DiffNavigator::with_results(results);
    assert_eq!(nav.total_diffs(), 1);
    assert_eq!(nav.current().unwrap().result.sheet_name, "Two");
}
