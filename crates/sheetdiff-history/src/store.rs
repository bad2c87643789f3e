//! SQLite-backed history store

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::debug;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use sheetdiff_core::{Workbook, WorkbookId};

use crate::error::{StorageError, StorageResult};
use crate::record::{timestamp_from_sql, timestamp_to_sql, HistoryFile};
use crate::schema;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistent store of parsed workbooks and their upload history
///
/// Cloning is cheap; clones share one connection. Every call runs on tokio's
/// blocking pool and holds the connection for its whole duration.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryStore {
    /// Open (or create) a store in a database file
    pub fn open_path(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open a store from an SQLite URI (e.g. `file:history?mode=memory&cache=shared`)
    pub fn open_uri(uri: &str) -> StorageResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI;
        Self::from_connection(Connection::open_with_flags(uri, flags)?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StorageError::Poisoned)?;
            f(&mut guard)
        })
        .await?
    }

    // === Workbook blobs ===

    /// Store a workbook under its id, replacing any previous blob
    ///
    /// The workbook is serialized before the database is touched, so a
    /// serialization failure writes nothing.
    pub async fn save(&self, workbook: &Workbook) -> StorageResult<WorkbookId> {
        let id = workbook.id().clone();
        let data = serde_json::to_vec(workbook)?;
        let name = workbook.name().to_string();
        let uploaded_at = timestamp_to_sql(workbook.uploaded_at());
        let size = data.len();

        let key = id.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                r#"
                INSERT INTO workbooks (id, name, uploaded_at, data)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                  name = excluded.name,
                  uploaded_at = excluded.uploaded_at,
                  data = excluded.data
                "#,
                params![key, name, uploaded_at, data],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await?;

        debug!("Saved workbook {} ({} bytes)", id, size);
        Ok(id)
    }

    /// Load a stored workbook
    pub async fn get(&self, id: &WorkbookId) -> StorageResult<Option<Workbook>> {
        let key = id.to_string();
        let data: Option<Vec<u8>> = self
            .with_conn(move |conn| {
                let data = conn
                    .query_row(
                        "SELECT data FROM workbooks WHERE id = ?1",
                        params![key],
                        |r| r.get::<_, Vec<u8>>(0),
                    )
                    .optional()?;
                Ok(data)
            })
            .await?;

        let Some(data) = data else {
            debug!("Workbook {} not in store", id);
            return Ok(None);
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }

    /// Delete a stored workbook blob; history metadata is left alone
    pub async fn delete_workbook(&self, id: &WorkbookId) -> StorageResult<bool> {
        let key = id.to_string();
        let deleted = self
            .with_conn(move |conn| {
                Ok(conn.execute("DELETE FROM workbooks WHERE id = ?1", params![key])?)
            })
            .await?;
        debug!("Deleted workbook {}: {}", id, deleted > 0);
        Ok(deleted > 0)
    }

    // === History metadata ===

    /// Insert or replace the history entry with the record's id
    pub async fn record_history(&self, file: &HistoryFile) -> StorageResult<()> {
        let file = file.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"
                INSERT INTO history (id, name, path, uploaded_at, size)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(id) DO UPDATE SET
                  name = excluded.name,
                  path = excluded.path,
                  uploaded_at = excluded.uploaded_at,
                  size = excluded.size
                "#,
                params![
                    file.id.as_str(),
                    &file.name,
                    &file.path,
                    timestamp_to_sql(file.uploaded_at),
                    file.size
                ],
            )?;
            debug!("Recorded history entry {} ({})", file.id, file.name);
            Ok(())
        })
        .await
    }

    /// History entries whose name contains `query`, ignoring case
    ///
    /// The empty query matches everything. Newest entries come first; entries
    /// uploaded at the same instant are ordered by id.
    pub async fn search(&self, query: &str) -> StorageResult<Vec<HistoryFile>> {
        let needle = query.to_lowercase();
        let entries = self.with_conn(load_history).await?;
        let matches: Vec<HistoryFile> = if needle.is_empty() {
            entries
        } else {
            entries
                .into_iter()
                .filter(|f| f.name.to_lowercase().contains(&needle))
                .collect()
        };
        debug!("History search {:?}: {} matches", query, matches.len());
        Ok(matches)
    }

    /// All history entries, newest first
    pub async fn list(&self) -> StorageResult<Vec<HistoryFile>> {
        self.search("").await
    }

    /// Look up one history entry by id
    pub async fn history_entry(&self, id: &WorkbookId) -> StorageResult<Option<HistoryFile>> {
        let key = id.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, path, uploaded_at, size FROM history WHERE id = ?1",
                    params![key],
                    raw_history_row,
                )
                .optional()?;
            row.map(RawHistoryRow::decode).transpose()
        })
        .await
    }

    /// Remove a history entry; the stored workbook is left alone
    pub async fn remove(&self, id: &WorkbookId) -> StorageResult<bool> {
        let key = id.to_string();
        let removed = self
            .with_conn(move |conn| {
                Ok(conn.execute("DELETE FROM history WHERE id = ?1", params![key])?)
            })
            .await?;
        debug!("Removed history entry {}: {}", id, removed > 0);
        Ok(removed > 0)
    }
}

struct RawHistoryRow {
    id: String,
    name: String,
    path: String,
    uploaded_at: String,
    size: u64,
}

impl RawHistoryRow {
    fn decode(self) -> StorageResult<HistoryFile> {
        let uploaded_at =
            timestamp_from_sql(&self.uploaded_at).ok_or_else(|| StorageError::Corrupt {
                id: self.id.clone(),
                reason: format!("invalid upload timestamp {:?}", self.uploaded_at),
            })?;
        Ok(HistoryFile {
            id: WorkbookId::from(self.id),
            name: self.name,
            path: self.path,
            uploaded_at,
            size: self.size,
        })
    }
}

fn raw_history_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawHistoryRow> {
    Ok(RawHistoryRow {
        id: r.get(0)?,
        name: r.get(1)?,
        path: r.get(2)?,
        uploaded_at: r.get(3)?,
        size: r.get(4)?,
    })
}

fn load_history(conn: &mut Connection) -> StorageResult<Vec<HistoryFile>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, path, uploaded_at, size
        FROM history
        ORDER BY uploaded_at DESC, id ASC
        "#,
    )?;

    let rows = stmt.query_map([], raw_history_row)?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.decode()?);
    }
    Ok(entries)
}
