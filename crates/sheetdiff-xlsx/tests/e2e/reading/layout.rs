//! Row and column placement.

use crate::{first_sheet, Package};
use pretty_assertions::assert_eq;
use sheetdiff_core::CellValue;

#[test]
fn test_omitted_rows_become_empty_rows() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="2"><c r="A2"><v>1</v></c></row><row r="5"><c r="A5"><v>2</v></c></row>"#,
        )
        .read();

    let sheet = first_sheet(&wb);
    assert_eq!(sheet.row_count(), 5);
    let indices: Vec<u32> = sheet.rows().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert!(sheet.rows()[0].is_empty());
    assert_eq!(sheet.rows()[1].value(0), &CellValue::Number(1.0));
    assert!(sheet.rows()[2].is_empty());
    assert_eq!(sheet.rows()[4].value(0), &CellValue::Number(2.0));
}

#[test]
fn test_rows_without_values_still_count() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1"><v>1</v></c></row><row r="2" ht="30" customHeight="1"/><row r="3"><c r="A3" s="0"/></row>"#,
        )
        .read();

    let sheet = first_sheet(&wb);
    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.rows()[1].cell_count(), 0);
    assert_eq!(sheet.rows()[2].cell_count(), 0);
}

#[test]
fn test_column_gaps_are_filled() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="B1"><v>1</v></c><c r="E1"><v>2</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.cell_count(), 5);
    assert_eq!(row.value(0), &CellValue::Empty);
    assert_eq!(row.value(1), &CellValue::Number(1.0));
    assert_eq!(row.value(2), &CellValue::Empty);
    assert_eq!(row.value(3), &CellValue::Empty);
    assert_eq!(row.value(4), &CellValue::Number(2.0));
}

#[test]
fn test_missing_references_follow_document_order() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row><c><v>1</v></c><c><v>2</v></c></row><row><c r="C2"><v>3</v></c><c><v>4</v></c></row>"#,
        )
        .read();

    let sheet = first_sheet(&wb);
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.rows()[0].value(1), &CellValue::Number(2.0));
    assert_eq!(sheet.rows()[1].value(2), &CellValue::Number(3.0));
    assert_eq!(sheet.rows()[1].value(3), &CellValue::Number(4.0));
}

#[test]
fn test_invalid_cell_reference_is_an_error() {
    let bytes = Package::new()
        .sheet("Data", r#"<row r="1"><c r="1A"><v>1</v></c></row>"#)
        .build();
    assert!(sheetdiff_xlsx::XlsxReader::read_bytes(&bytes).is_err());
}
