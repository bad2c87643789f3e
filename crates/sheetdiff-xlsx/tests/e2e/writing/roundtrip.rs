//! Exporter round trips.

use pretty_assertions::assert_eq;
use sheetdiff_core::{CellValue, Sheet, Workbook};
use sheetdiff_xlsx::{XlsxReader, XlsxWriter};

fn sample() -> Workbook {
    let mut data = Sheet::from_values(
        "Data & Notes",
        vec![
            vec![CellValue::from("name"), CellValue::from("qty"), CellValue::from("ok")],
            vec![CellValue::from("widget"), CellValue::from(3), CellValue::from(true)],
            vec![CellValue::from("  spaced  "), CellValue::from(0.1 + 0.2), CellValue::from(false)],
            vec![CellValue::from("a<b>&\"c\""), CellValue::Empty, CellValue::from(-1e-9)],
            vec![CellValue::from("cr\rlf\n_x0041_"), CellValue::from("2024-01-15T00:00:00.000Z")],
        ],
    );
    data.push_empty_rows(2);
    data.push_row(vec![sheetdiff_core::Cell::new("after gap")]);

    let mut wb = Workbook::new("sample.xlsx");
    wb.add_sheet(data).unwrap();
    wb.add_sheet(Sheet::new("Empty")).unwrap();
    wb
}

#[test]
fn test_roundtrip_preserves_tabular_model() {
    let original = sample();
    let bytes = XlsxWriter::to_bytes(&original).unwrap();
    let read = XlsxReader::read_bytes(&bytes).unwrap();

    assert_eq!(read.sheet_names(), original.sheet_names());
    for (a, b) in original.sheets().iter().zip(read.sheets()) {
        assert_eq!(a.rows(), b.rows(), "sheet '{}'", a.name());
    }
}

#[test]
fn test_write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");

    let original = sample();
    XlsxWriter::write_file(&original, &path).unwrap();

    let read = XlsxReader::read_file(&path).unwrap();
    assert_eq!(read.name(), "out.xlsx");
    assert_eq!(read.sheet(0).unwrap().rows(), original.sheet(0).unwrap().rows());
}
