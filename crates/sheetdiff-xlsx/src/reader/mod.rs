//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::date::{normalize_iso, serial_to_iso, DateSystem};
use crate::error::{XlsxError, XlsxResult};
use crate::styles::{read_styles_xml, ParsedStyles};
use sheetdiff_core::{
    Cell, CellAddress, CellValue, NumberFormat, SharedString, Sheet, StringPool, Workbook,
    MAX_ROWS,
};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses these to carry characters XML cannot hold directly, e.g.
/// `_x000d_` for CR and `_x005f_` for a literal underscore. Anything that is
/// not exactly `_x` + four hex digits + `_` is left as written.
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match decode_escape(candidate) {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push('_');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one escape at the start of `s`
fn decode_escape(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || bytes[6] != b'_' {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Workbook-wide lookup tables needed while reading cells
struct ReadContext {
    shared_strings: Vec<SharedString>,
    styles: ParsedStyles,
    date_system: DateSystem,
}

/// Sheet entry from workbook.xml
struct SheetEntry {
    name: String,
    r_id: String,
}

/// Cell being assembled from `<c>` and its children
#[derive(Default)]
struct PendingCell {
    col: u32,
    cell_type: Option<String>,
    style: Option<u32>,
    value: Option<String>,
    inline: Option<String>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path, naming it after the file
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut workbook = Self::read(BufReader::new(file))?;
        if let Some(name) = path.file_name() {
            workbook.set_name(name.to_string_lossy());
        }
        Ok(workbook)
    }

    /// Read a workbook from an in-memory package
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<Workbook> {
        Self::read(std::io::Cursor::new(bytes))
    }

    /// Read a workbook from a reader
    ///
    /// The result has a fresh id and an empty name; callers supply provenance.
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let styles = Self::read_styles(&mut archive)?;
        let (sheet_entries, date1904) = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let ctx = ReadContext {
            shared_strings,
            styles,
            date_system: DateSystem::from_date1904(date1904),
        };

        let mut workbook = Workbook::new("");

        for entry in &sheet_entries {
            let Some(path) = sheet_paths.get(&entry.r_id) else {
                warn!(
                    "Sheet '{}' has no worksheet relationship ({}), skipping",
                    entry.name, entry.r_id
                );
                continue;
            };
            let sheet = Self::read_worksheet(&mut archive, path, &entry.name, &ctx)?;
            debug!(
                "Read sheet '{}': {} rows, {} columns",
                sheet.name(),
                sheet.row_count(),
                sheet.column_count()
            );
            workbook.add_sheet(sheet)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SharedString>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Whitespace inside <t> is significant
        xml_reader.trim_text(false);

        let mut pool = StringPool::new();
        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs duplicate the text in another script
        let mut in_rph = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_rph = true,
                    b"t" if in_si && !in_rph => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(pool.intern(""));
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(pool.intern(decode_excel_escapes(&current)));
                        current.clear();
                        in_si = false;
                    }
                    b"rPh" => in_rph = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        debug!(
            "Read {} shared strings ({} unique)",
            strings.len(),
            pool.len()
        );
        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<ParsedStyles> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(ParsedStyles::default()),
        }
    }

    /// Read workbook.xml for the sheet list and the date system
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<SheetEntry>, bool)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date1904 = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"workbookPr" => {
                        date1904 = attr_string(&e, b"date1904").is_some_and(|v| is_truthy(&v));
                    }
                    b"sheet" => {
                        let name = attr_string(&e, b"name");
                        let r_id = attr_string(&e, b"r:id");
                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            sheets.push(SheetEntry { name, r_id });
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date1904))
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_string(&e, b"Id");
                    let target = attr_string(&e, b"Target");
                    let rel_type = attr_string(&e, b"Type");

                    // Only worksheet relationships; chartsheets etc. carry no rows
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Start a new row, filling any gap left by omitted rows
    fn begin_row(sheet: &mut Sheet, e: &BytesStart<'_>) -> XlsxResult<()> {
        let next = sheet.row_count() as u32;
        let target = match attr_string(e, b"r") {
            Some(r) => {
                let r: u32 = r
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r)))?;
                if r == 0 || r > MAX_ROWS {
                    return Err(XlsxError::Parse(format!("Row number {} out of range", r)));
                }
                r - 1
            }
            None => next,
        };

        if target < next {
            warn!(
                "Row {} in sheet '{}' is out of order, appending as row {}",
                target + 1,
                sheet.name(),
                next + 1
            );
        } else {
            sheet.push_empty_rows((target - next) as usize);
        }
        sheet.push_row(Vec::new());
        Ok(())
    }

    /// Read a worksheet from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        name: &str,
        ctx: &ReadContext,
    ) -> XlsxResult<Sheet> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut sheet = Sheet::new(name);
        let mut buf = Vec::new();

        let mut pending: Option<PendingCell> = None;
        // Column used by cells that omit their `r` attribute
        let mut next_col = 0u32;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_rph = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        Self::begin_row(&mut sheet, &e)?;
                        next_col = 0;
                    }
                    b"c" => {
                        let cell = Self::begin_cell(&e, next_col)?;
                        next_col = cell.col + 1;
                        pending = Some(cell);
                    }
                    b"v" if pending.is_some() => in_value = true,
                    b"is" => {
                        if let Some(cell) = pending.as_mut() {
                            cell.inline.get_or_insert_with(String::new);
                            in_inline_str = true;
                        }
                    }
                    b"rPh" => in_rph = true,
                    b"t" if in_inline_str && !in_rph => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        Self::begin_row(&mut sheet, &e)?;
                        next_col = 0;
                    }
                    // A self-closing cell carries no value
                    b"c" => {
                        next_col = Self::begin_cell(&e, next_col)?.col + 1;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some(cell) = pending.as_mut() {
                        if in_value {
                            cell.value.get_or_insert_with(String::new).push_str(&e.unescape()?);
                        } else if in_inline_text {
                            cell.inline.get_or_insert_with(String::new).push_str(&e.unescape()?);
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(cell) = pending.take() {
                            let col = cell.col;
                            if let Some(cell) = Self::process_cell(cell, ctx)? {
                                match sheet.last_row_mut() {
                                    Some(row) => row.set_cell(col as usize, cell),
                                    None => warn!(
                                        "Cell outside of any row in sheet '{}', ignoring",
                                        sheet.name()
                                    ),
                                }
                            }
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_rph = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    fn begin_cell(e: &BytesStart<'_>, next_col: u32) -> XlsxResult<PendingCell> {
        let col = match attr_string(e, b"r") {
            Some(cell_ref) => {
                CellAddress::parse(&cell_ref)
                    .map_err(|err| {
                        XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
                    })?
                    .col
            }
            None => next_col,
        };

        Ok(PendingCell {
            col,
            cell_type: attr_string(e, b"t"),
            style: attr_string(e, b"s").and_then(|s| s.parse().ok()),
            ..PendingCell::default()
        })
    }

    /// Turn a finished `<c>` into a cell. Cells without a value yield `None`.
    fn process_cell(cell: PendingCell, ctx: &ReadContext) -> XlsxResult<Option<Cell>> {
        let cell_type = cell.cell_type.as_deref();

        let raw = match (cell_type, cell.inline, cell.value) {
            (Some("inlineStr"), Some(text), _) => text,
            (_, _, Some(value)) => value,
            // Formula without a cached result, or no <v> at all
            _ => return Ok(None),
        };

        const GENERAL: &NumberFormat = &NumberFormat::General;
        let format = cell
            .style
            .map_or(GENERAL, |s| ctx.styles.format_for(s));

        let value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", raw))
                })?;
                let s = ctx.shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }

            Some("b") => CellValue::Boolean(is_truthy(raw.trim())),

            // Error literal such as #DIV/0! kept as text
            Some("e") => CellValue::string(raw),

            Some("str") | Some("inlineStr") => CellValue::string(decode_excel_escapes(&raw)),

            // ISO 8601 date cell
            Some("d") => CellValue::string(normalize_iso(&raw)),

            // Number (default type or explicit "n"). Overflowing or NaN text
            // stays text.
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) if !n.is_finite() => CellValue::string(raw),
                Ok(n) if format.is_date_format() => serial_to_iso(n, ctx.date_system)
                    .map(CellValue::string)
                    .unwrap_or(CellValue::Number(n)),
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(raw),
            },

            // Unknown type - treat as string
            Some(_) => CellValue::string(raw),
        };

        let mut parsed = Cell::new(value);
        if *format != NumberFormat::General {
            parsed = parsed.with_number_format(format.clone());
        }
        Ok(Some(parsed))
    }
}
