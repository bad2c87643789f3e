//! CSV reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sheetdiff_core::{Cell, CellValue, Sheet, StringPool, Workbook};

const BOM: char = '\u{feff}';

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a single-sheet workbook named after the file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut workbook = Self::read(BufReader::new(file), options)?;
        if let Some(name) = path.file_name() {
            workbook.set_name(name.to_string_lossy());
        }
        Ok(workbook)
    }

    /// Read CSV from a reader into a single-sheet workbook
    pub fn read<R: Read>(mut reader: R, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        Self::read_bytes(&input, options)
    }

    /// Read CSV from memory into a single-sheet workbook
    ///
    /// Blank lines between records become empty rows so row positions match
    /// line positions. Ragged records are allowed.
    pub fn read_bytes(input: &[u8], options: &CsvReadOptions) -> CsvResult<Workbook> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut sheet = Sheet::new(options.sheet_name.clone());
        let mut pool = StringPool::new();
        let mut record = csv::StringRecord::new();

        loop {
            let before = csv_reader.position().byte() as usize;
            if !csv_reader.read_record(&mut record)? {
                break;
            }

            // The csv crate skips blank lines silently
            sheet.push_empty_rows(blank_lines_at(input, before));

            let first_row = sheet.row_count() == 0;
            let cells = record
                .iter()
                .enumerate()
                .map(|(col, field)| {
                    let field = if first_row && col == 0 {
                        field.trim_start_matches(BOM)
                    } else {
                        field
                    };
                    Cell::new(Self::field_value(field, options, &mut pool))
                })
                .collect();

            sheet.push_row(cells);
            if let Some(row) = sheet.last_row_mut() {
                row.trim_trailing_empty();
            }
        }

        debug!(
            "Read CSV sheet '{}': {} rows, {} columns",
            sheet.name(),
            sheet.row_count(),
            sheet.column_count()
        );

        let mut workbook = Workbook::new("");
        workbook.add_sheet(sheet)?;
        Ok(workbook)
    }

    fn field_value(field: &str, options: &CsvReadOptions, pool: &mut StringPool) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }
        if options.auto_detect_types {
            if let Some(value) = Self::detect_type(field) {
                return value;
            }
        }
        CellValue::String(pool.intern(field))
    }

    /// Detect a boolean or numeric field. Text stays as written.
    fn detect_type(field: &str) -> Option<CellValue> {
        let trimmed = field.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return Some(CellValue::Boolean(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Some(CellValue::Boolean(false));
        }

        // f64 parsing also accepts "inf" and "NaN"; those stay text
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
            _ => None,
        }
    }
}

/// Count the blank lines starting at `offset`, the end of the previous record.
///
/// A `\r\n` terminator may have been consumed only up to the `\r`; its
/// trailing `\n` is not a blank line.
fn blank_lines_at(input: &[u8], offset: usize) -> usize {
    let mut i = offset;
    if i > 0 && input.get(i - 1) == Some(&b'\r') && input.get(i) == Some(&b'\n') {
        i += 1;
    }

    let mut lines = 0;
    loop {
        match input.get(i) {
            Some(b'\n') => i += 1,
            Some(b'\r') => {
                i += 1;
                if input.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            _ => return lines,
        }
        lines += 1;
    }
}
