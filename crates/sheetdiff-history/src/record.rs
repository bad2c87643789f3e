//! History metadata records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sheetdiff_core::WorkbookId;

/// Scheme of the locator stored in [`HistoryFile::path`]
pub const LOCATOR_SCHEME: &str = "history://";

/// Provenance of one imported file
///
/// Serialized as `{ id, name, path, uploadedAt, size }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFile {
    /// Id of the workbook parsed from the file
    pub id: WorkbookId,
    /// Original file name
    pub name: String,
    /// Storage locator, `history://<id>` for stored workbooks
    pub path: String,
    /// When the file was imported
    pub uploaded_at: DateTime<Utc>,
    /// Size of the imported file in bytes
    pub size: u64,
}

impl HistoryFile {
    /// Build a record whose locator points at the stored workbook blob
    pub fn for_stored(
        id: WorkbookId,
        name: impl Into<String>,
        uploaded_at: DateTime<Utc>,
        size: u64,
    ) -> Self {
        let path = locator_for(&id);
        Self {
            id,
            name: name.into(),
            path,
            uploaded_at,
            size,
        }
    }

    /// Id named by a `history://` locator, if `path` is one
    pub fn stored_id(&self) -> Option<WorkbookId> {
        parse_locator(&self.path)
    }
}

/// Locator of a stored workbook
pub fn locator_for(id: &WorkbookId) -> String {
    format!("{}{}", LOCATOR_SCHEME, id)
}

/// Extract the workbook id from a `history://<id>` locator
pub fn parse_locator(path: &str) -> Option<WorkbookId> {
    path.strip_prefix(LOCATOR_SCHEME)
        .filter(|id| !id.is_empty())
        .map(WorkbookId::from)
}

/// Timestamps are stored as fixed-width RFC 3339 text (nanosecond precision)
/// so that ordering by the column is chronological.
pub(crate) fn timestamp_to_sql(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn timestamp_from_sql(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_locator() {
        let id = WorkbookId::from("abc");
        assert_eq!(locator_for(&id), "history://abc");
        assert_eq!(parse_locator("history://abc"), Some(id));
        assert_eq!(parse_locator("history://"), None);
        assert_eq!(parse_locator("/tmp/abc.xlsx"), None);
    }

    #[test]
    fn test_json_keys() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let file = HistoryFile::for_stored("abc".into(), "q1.xlsx", ts, 2048);
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["path"], "history://abc");
        assert_eq!(json["uploadedAt"], "2024-01-15T09:30:00Z");
        assert_eq!(json["size"], 2048);

        let back: HistoryFile = serde_json::from_value(json).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_timestamp_text_sorts_chronologically() {
        let a = Utc.with_ymd_and_hms(2024, 1, 9, 23, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 10, 1, 0, 0).unwrap();
        assert!(timestamp_to_sql(a) < timestamp_to_sql(b));
        assert_eq!(timestamp_to_sql(a), "2024-01-09T23:00:00.000000000Z");
        assert_eq!(timestamp_from_sql(&timestamp_to_sql(a)), Some(a));

        let precise = Utc::now();
        assert_eq!(timestamp_from_sql(&timestamp_to_sql(precise)), Some(precise));
    }
}
