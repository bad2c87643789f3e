//! XLSX styles (styles.xml) read/write helpers
//!
//! Only number formats matter here: a cell's `s` attribute indexes `cellXfs`,
//! and the xf's `numFmtId` decides whether a numeric value is a date.

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetdiff_core::NumberFormat;

// === Reading ===

/// Number format per cellXfs index
#[derive(Debug, Clone)]
pub(crate) struct ParsedStyles {
    pub(crate) cell_formats: Vec<NumberFormat>,
}

impl Default for ParsedStyles {
    fn default() -> Self {
        Self {
            cell_formats: vec![NumberFormat::General],
        }
    }
}

impl ParsedStyles {
    /// Format for a cell's style index. Unknown indices fall back to General.
    pub(crate) fn format_for(&self, style_idx: u32) -> &NumberFormat {
        const GENERAL: &NumberFormat = &NumberFormat::General;
        match self.cell_formats.get(style_idx as usize) {
            Some(format) => format,
            None => {
                log::warn!("Style index {} out of bounds, using General", style_idx);
                GENERAL
            }
        }
    }
}

fn num_fmt_id(e: &BytesStart<'_>) -> u32 {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"numFmtId")
        .and_then(|attr| attr.unescape_value().ok().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut numfmts: HashMap<u32, String> = HashMap::new();
    let mut xf_ids: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"cellXfs" => {
                    in_cell_xfs = true;
                }
                // xf with alignment/protection children
                b"xf" if in_cell_xfs => {
                    xf_ids.push(num_fmt_id(&e));
                }
                _ => {}
            },

            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"numFmt" => {
                    let mut id = None;
                    let mut code = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => {
                                id = attr.unescape_value().ok().and_then(|s| s.parse().ok())
                            }
                            b"formatCode" => {
                                code = attr.unescape_value().ok().map(|s| s.to_string())
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(code)) = (id, code) {
                        numfmts.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    xf_ids.push(num_fmt_id(&e));
                }
                _ => {}
            },

            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"cellXfs" {
                    in_cell_xfs = false;
                }
            }

            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }

        buf.clear();
    }

    if xf_ids.is_empty() {
        return Ok(ParsedStyles::default());
    }

    let cell_formats = xf_ids
        .into_iter()
        .map(|id| NumberFormat::from_id(id, numfmts.get(&id).map(String::as_str)))
        .collect();

    Ok(ParsedStyles { cell_formats })
}

// === Writing ===

/// Minimal styles part: one font, the two mandatory fills, one border and a
/// single General cell format.
pub(crate) fn minimal_styles_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_number_formats() {
        let xml = br#"<?xml version="1.0"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" applyNumberFormat="1"/>
    <xf numFmtId="164" fontId="0" fillId="0" borderId="0"><alignment horizontal="left"/></xf>
    <xf numFmtId="4" fontId="0" fillId="0" borderId="0"/>
  </cellXfs>
</styleSheet>"#;

        let styles = read_styles_xml(&xml[..]).unwrap();
        assert_eq!(styles.cell_formats.len(), 4);
        assert_eq!(styles.format_for(0), &NumberFormat::General);
        assert!(styles.format_for(1).is_date_format());
        assert_eq!(
            styles.format_for(2),
            &NumberFormat::Custom("yyyy-mm-dd".into())
        );
        assert!(!styles.format_for(3).is_date_format());
        assert_eq!(styles.format_for(99), &NumberFormat::General);
    }

    #[test]
    fn test_minimal_styles_readable() {
        let styles = read_styles_xml(minimal_styles_xml().as_bytes()).unwrap();
        assert_eq!(styles.cell_formats, vec![NumberFormat::General]);
    }
}
