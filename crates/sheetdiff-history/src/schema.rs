use rusqlite::Connection;

/// Schema version written to `user_version`
pub(crate) const SCHEMA_VERSION: i64 = 1;

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    // Blobs and metadata are independent: removing a history entry keeps the
    // workbook and vice versa, so there is no foreign key between them.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS workbooks (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          uploaded_at TEXT NOT NULL,
          data BLOB NOT NULL
        );

        CREATE TABLE IF NOT EXISTS history (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          path TEXT NOT NULL,
          uploaded_at TEXT NOT NULL,
          size INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_uploaded_at ON history(uploaded_at);
        "#,
    )?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
