//! Common utilities for E2E tests.

use std::io::{Cursor, Write};

use sheetdiff_core::{Sheet, Workbook};
use sheetdiff_xlsx::XlsxReader;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// In-memory xlsx package builder.
///
/// ```rust,ignore
/// let wb = Package::new()
///     .sheet("Data", r#"<row r="1"><c r="A1"><v>1</v></c></row>"#)
///     .read();
/// ```
#[derive(Default)]
pub struct Package {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    styles: Option<String>,
    date1904: bool,
}

#[allow(dead_code)]
impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose `<sheetData>` content is `rows_xml`
    pub fn sheet(mut self, name: &str, rows_xml: &str) -> Self {
        self.sheets.push((name.to_string(), rows_xml.to_string()));
        self
    }

    /// Set the shared string table (plain `<t>` entries)
    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set `xl/styles.xml` from custom numFmts and cellXfs numFmtIds.
    /// Index 0 of `xf_num_fmts` is the default style.
    pub fn styles(mut self, num_fmts: &[(u32, &str)], xf_num_fmts: &[u32]) -> Self {
        let mut xml = format!(r#"<?xml version="1.0"?><styleSheet xmlns="{}">"#, MAIN_NS);
        if !num_fmts.is_empty() {
            xml.push_str(&format!(r#"<numFmts count="{}">"#, num_fmts.len()));
            for (id, code) in num_fmts {
                xml.push_str(&format!(r#"<numFmt numFmtId="{}" formatCode="{}"/>"#, id, code));
            }
            xml.push_str("</numFmts>");
        }
        xml.push_str(&format!(r#"<cellXfs count="{}">"#, xf_num_fmts.len()));
        for id in xf_num_fmts {
            xml.push_str(&format!(r#"<xf numFmtId="{}" fontId="0" fillId="0" borderId="0"/>"#, id));
        }
        xml.push_str("</cellXfs></styleSheet>");
        self.styles = Some(xml);
        self
    }

    /// Use the 1904 date system
    pub fn date1904(mut self) -> Self {
        self.date1904 = true;
        self
    }

    /// Serialize the package
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            let mut workbook = format!(
                r#"<?xml version="1.0"?><workbook xmlns="{}" xmlns:r="{}">"#,
                MAIN_NS, REL_NS
            );
            if self.date1904 {
                workbook.push_str(r#"<workbookPr date1904="1"/>"#);
            }
            workbook.push_str("<sheets>");
            let mut rels = String::from(
                r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            );
            for (i, (name, _)) in self.sheets.iter().enumerate() {
                workbook.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    i + 1,
                    i + 1
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i + 1,
                    REL_NS,
                    i + 1
                ));
            }
            workbook.push_str("</sheets></workbook>");
            rels.push_str("</Relationships>");

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(workbook.as_bytes()).unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(rels.as_bytes()).unwrap();

            if !self.shared_strings.is_empty() {
                let mut sst = format!(
                    r#"<?xml version="1.0"?><sst xmlns="{}" count="{}">"#,
                    MAIN_NS,
                    self.shared_strings.len()
                );
                for s in &self.shared_strings {
                    sst.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, s));
                }
                sst.push_str("</sst>");
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }

            if let Some(styles) = &self.styles {
                zip.start_file("xl/styles.xml", options).unwrap();
                zip.write_all(styles.as_bytes()).unwrap();
            }

            for (i, (_, rows)) in self.sheets.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(
                    format!(
                        r#"<?xml version="1.0"?><worksheet xmlns="{}"><sheetData>{}</sheetData></worksheet>"#,
                        MAIN_NS, rows
                    )
                    .as_bytes(),
                )
                .unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    /// Build and read back
    pub fn read(&self) -> Workbook {
        XlsxReader::read_bytes(&self.build()).expect("package should read")
    }
}

/// First sheet of a workbook
#[allow(dead_code)]
pub fn first_sheet(workbook: &Workbook) -> &Sheet {
    workbook.sheet(0).expect("workbook should have a sheet")
}
