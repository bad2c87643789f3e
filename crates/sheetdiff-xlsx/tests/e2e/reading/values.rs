//! Cell value normalization.

use crate::{first_sheet, Package};
use pretty_assertions::assert_eq;
use sheetdiff_core::CellValue;

#[test]
fn test_number_and_boolean_values() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1"><v>42</v></c><c r="B1" t="n"><v>-3.5</v></c><c r="C1" t="b"><v>1</v></c><c r="D1" t="b"><v>0</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::Number(42.0));
    assert_eq!(row.value(1), &CellValue::Number(-3.5));
    assert_eq!(row.value(2), &CellValue::Boolean(true));
    assert_eq!(row.value(3), &CellValue::Boolean(false));
}

#[test]
fn test_string_kinds() {
    let wb = Package::new()
        .shared_strings(&["shared", "line1_x000a_line2"])
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="inlineStr"><is><t>inline &amp; more</t></is></c><c r="D1" t="inlineStr"><is><r><t>rich </t></r><r><t>text</t></r></is></c><c r="E1" t="str"><f>A1&amp;"!"</f><v>shared!</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::string("shared"));
    assert_eq!(row.value(1), &CellValue::string("line1\nline2"));
    assert_eq!(row.value(2), &CellValue::string("inline & more"));
    assert_eq!(row.value(3), &CellValue::string("rich text"));
    assert_eq!(row.value(4), &CellValue::string("shared!"));
}

#[test]
fn test_error_cells_become_text() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" t="e"><f>1/0</f><v>#DIV/0!</v></c><c r="B1" t="e"><v>#N/A</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::string("#DIV/0!"));
    assert_eq!(row.value(1), &CellValue::string("#N/A"));
}

#[test]
fn test_formula_uses_cached_value_only() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1"><v>2</v></c><c r="B1"><f>A1*2</f><v>4</v></c><c r="C1"><f>A1*3</f></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(1), &CellValue::Number(4.0));
    // No cached value: nothing to compare
    assert_eq!(row.value(2), &CellValue::Empty);
    assert_eq!(row.cell_count(), 2);
}

#[test]
fn test_valueless_cells_are_empty() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1" s="0"/><c r="B1"><v>1</v></c><c r="C1"></c><c r="D1" s="0"/></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::Empty);
    assert_eq!(row.value(1), &CellValue::Number(1.0));
    // Trailing valueless cells are not materialized
    assert_eq!(row.cell_count(), 2);
}

#[test]
fn test_non_finite_numbers_stay_text() {
    let wb = Package::new()
        .sheet(
            "Data",
            r#"<row r="1"><c r="A1"><v>1e999</v></c><c r="B1" t="n"><v>NaN</v></c><c r="C1"><v>-inf</v></c><c r="D1"><v>1e308</v></c></row>"#,
        )
        .read();

    let row = &first_sheet(&wb).rows()[0];
    assert_eq!(row.value(0), &CellValue::string("1e999"));
    assert_eq!(row.value(1), &CellValue::string("NaN"));
    assert_eq!(row.value(2), &CellValue::string("-inf"));
    assert_eq!(row.value(3), &CellValue::Number(1e308));

    // Reading the same file twice compares clean
    let result = sheetdiff_core::compare(&wb, &wb, "Data").unwrap();
    assert!(result.is_identical());
}

#[test]
fn test_sheets_keep_workbook_order() {
    let wb = Package::new()
        .sheet("Zeta", "")
        .sheet("Alpha", "")
        .sheet("Middle", "")
        .read();

    assert_eq!(wb.sheet_names(), vec!["Zeta", "Alpha", "Middle"]);
}
