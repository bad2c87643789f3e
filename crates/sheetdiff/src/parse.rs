//! Format detection and parsing of uploaded files

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;

use sheetdiff_core::{Workbook, WorkbookId};
use sheetdiff_csv::{CsvError, CsvReadOptions, CsvReader};
use sheetdiff_xlsx::{XlsxError, XlsxReader};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Errors that can occur while turning file bytes into a [`Workbook`]
#[derive(Debug, Error)]
pub enum ParseError {
    /// Recognized, but not a format this crate reads
    #[error("unsupported file format: {0}")]
    Unsupported(String),

    /// Neither the content nor the file name identify a supported format
    #[error("unrecognized file format")]
    UnrecognizedFormat,

    /// Malformed xlsx package
    #[error("invalid xlsx file: {0}")]
    Xlsx(#[from] XlsxError),

    /// Malformed CSV
    #[error("invalid CSV file: {0}")]
    Csv(#[from] CsvError),

    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input formats understood by [`parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Office Open XML workbook (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Comma (or otherwise) separated values, read as one sheet
    Csv,
}

impl FileFormat {
    /// Identify a format from the leading bytes. Only zip packages carry a
    /// reliable signature; CSV has none.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        bytes.starts_with(ZIP_MAGIC).then_some(FileFormat::Xlsx)
    }

    /// Identify a format from a file name's extension
    pub fn from_extension(name: impl AsRef<Path>) -> Option<Self> {
        let ext = name.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(FileFormat::Xlsx),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Xlsx => f.write_str("xlsx"),
            FileFormat::Csv => f.write_str("csv"),
        }
    }
}

/// How to parse an input and what provenance to stamp on the result
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Force a format instead of detecting it
    pub format: Option<FileFormat>,
    /// Display name of the workbook, usually the file name
    pub name: String,
    /// Reuse an id (reloading a workbook from history); a fresh id otherwise
    pub id: Option<WorkbookId>,
    /// Upload time; now when not given
    pub uploaded_at: Option<DateTime<Utc>>,
    /// CSV reader settings
    pub csv: CsvReadOptions,
}

impl ParseOptions {
    /// Options for a file of the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Force the input format
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    fn resolve_format(&self, bytes: &[u8]) -> Result<FileFormat, ParseError> {
        if bytes.starts_with(OLE_MAGIC) {
            return Err(ParseError::Unsupported(
                "legacy .xls (OLE compound file)".to_string(),
            ));
        }
        self.format
            .or_else(|| FileFormat::sniff(bytes))
            .or_else(|| FileFormat::from_extension(&self.name))
            .ok_or(ParseError::UnrecognizedFormat)
    }
}

/// Parse file contents into a workbook
///
/// The format comes from [`ParseOptions::format`], then the content signature,
/// then the extension of [`ParseOptions::name`]. On failure nothing partial is
/// returned.
pub fn parse(bytes: &[u8], options: &ParseOptions) -> Result<Workbook, ParseError> {
    let format = options.resolve_format(bytes)?;

    let mut workbook = match format {
        FileFormat::Xlsx => XlsxReader::read_bytes(bytes)?,
        FileFormat::Csv => CsvReader::read_bytes(bytes, &options.csv)?,
    };

    workbook.set_name(options.name.clone());
    if let Some(id) = &options.id {
        workbook = workbook.with_id(id.clone());
    }
    if let Some(uploaded_at) = options.uploaded_at {
        workbook = workbook.with_uploaded_at(uploaded_at);
    }

    debug!(
        "Parsed {} workbook '{}' ({}): {} sheets",
        format,
        workbook.name(),
        workbook.id(),
        workbook.sheet_count()
    );
    Ok(workbook)
}

/// Read and parse a file
///
/// An empty [`ParseOptions::name`] is replaced by the file name.
pub async fn read_file(
    path: impl AsRef<Path>,
    options: ParseOptions,
) -> Result<Workbook, ParseError> {
    let (bytes, options) = read_input(path.as_ref(), options).await?;
    parse(&bytes, &options)
}

/// Load a file's bytes and fill in its name
pub(crate) async fn read_input(
    path: &Path,
    mut options: ParseOptions,
) -> Result<(Vec<u8>, ParseOptions), ParseError> {
    let bytes = tokio::fs::read(path).await?;
    if options.name.is_empty() {
        if let Some(name) = path.file_name() {
            options.name = name.to_string_lossy().into_owned();
        }
    }
    Ok((bytes, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetdiff_core::CellValue;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::sniff(b"PK\x03\x04rest"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::sniff(b"a,b\n"), None);
        assert_eq!(FileFormat::from_extension("Q1.XLSX"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_extension("macro.xlsm"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_extension("data.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("notes.txt"), None);
        assert_eq!(FileFormat::from_extension("noext"), None);
    }

    #[test]
    fn test_legacy_xls_is_unsupported() {
        let bytes = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        let err = parse(&bytes, &ParseOptions::named("old.xls")).unwrap_err();
        assert!(matches!(err, ParseError::Unsupported(_)));

        // Forcing CSV does not make an OLE file readable
        let options = ParseOptions::named("old.xls").with_format(FileFormat::Csv);
        assert!(matches!(
            parse(&bytes, &options),
            Err(ParseError::Unsupported(_))
        ));
    }

    #[test]
    fn test_unknown_content_is_unrecognized() {
        let err = parse(b"hello", &ParseOptions::named("notes.txt")).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedFormat));
        assert!(matches!(
            parse(b"", &ParseOptions::default()),
            Err(ParseError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn test_csv_by_extension_or_forced() {
        let workbook = parse(b"a,1\n", &ParseOptions::named("data.csv")).unwrap();
        assert_eq!(workbook.name(), "data.csv");
        assert_eq!(workbook.sheet_names(), vec!["Sheet1"]);
        assert_eq!(workbook.sheets()[0].rows()[0].value(1), &CellValue::Number(1.0));

        let forced = ParseOptions::named("upload").with_format(FileFormat::Csv);
        assert_eq!(parse(b"x\n", &forced).unwrap().sheet_count(), 1);
    }

    #[test]
    fn test_corrupt_zip_is_xlsx_error() {
        let err = parse(b"PK\x03\x04garbage", &ParseOptions::named("bad.xlsx")).unwrap_err();
        assert!(matches!(err, ParseError::Xlsx(_)));
    }

    #[test]
    fn test_provenance_options() {
        let uploaded_at = DateTime::parse_from_rfc3339("2024-01-15T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let options = ParseOptions {
            id: Some(WorkbookId::from("fixed-id")),
            uploaded_at: Some(uploaded_at),
            ..ParseOptions::named("data.csv")
        };
        let workbook = parse(b"a\n", &options).unwrap();
        assert_eq!(workbook.id().as_str(), "fixed-id");
        assert_eq!(workbook.uploaded_at(), uploaded_at);

        // Without an id every parse gets a fresh one
        let a = parse(b"a\n", &ParseOptions::named("a.csv")).unwrap();
        let b = parse(b"a\n", &ParseOptions::named("a.csv")).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
