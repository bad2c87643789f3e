//! Date detection through number formats.

use crate::{first_sheet, Package};
use pretty_assertions::assert_eq;
use sheetdiff_core::{CellValue, NumberFormat};

#[test]
fn test_builtin_date_format() {
    let wb = Package::new()
        .styles(&[], &[0, 14])
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" s="1"><v>45306</v></c><c r="B1"><v>45306</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::string("2024-01-15T00:00:00.000Z"));
    assert_eq!(row.cells[0].number_format, Some(NumberFormat::BuiltIn(14)));
    // Same serial without a date format stays numeric
    assert_eq!(row.value(1), &CellValue::Number(45306.0));
    assert_eq!(row.cells[1].number_format, None);
}

#[test]
fn test_custom_datetime_format() {
    let wb = Package::new()
        .styles(&[(164, "yyyy-mm-dd hh:mm")], &[0, 164])
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" s="1"><v>45306.5</v></c></row>"#,
        )
        .read();

    assert_eq!(
        first_sheet(&wb).rows()[0].value(0),
        &CellValue::string("2024-01-15T12:00:00.000Z")
    );
}

#[test]
fn test_non_date_custom_format_keeps_number() {
    let wb = Package::new()
        .styles(&[(165, "#,##0.00&quot; days&quot;")], &[0, 165])
        .sheet("Data", r#"<row r="1"><c r="A1" s="1"><v>12</v></c></row>"#)
        .read();

    let cell = &first_sheet(&wb).rows()[0].cells[0];
    assert_eq!(cell.value, CellValue::Number(12.0));
    assert!(matches!(cell.number_format, Some(NumberFormat::Custom(_))));
}

#[test]
fn test_1904_date_system() {
    let wb = Package::new()
        .date1904()
        .styles(&[], &[0, 14])
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" s="1"><v>43844</v></c></row>"#,
        )
        .read();

    assert_eq!(
        first_sheet(&wb).rows()[0].value(0),
        &CellValue::string("2024-01-15T00:00:00.000Z")
    );
}

#[test]
fn test_iso_date_cells() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" t="d"><v>2024-01-15T09:30:00</v></c><c r="B1" t="d"><v>2024-01-15</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::string("2024-01-15T09:30:00.000Z"));
    assert_eq!(row.value(1), &CellValue::string("2024-01-15T00:00:00.000Z"));
}
