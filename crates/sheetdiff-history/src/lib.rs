//! # sheetdiff-history
//!
//! Persistent history of imported workbooks, backed by SQLite.
//!
//! Two independent tables are kept: serialized workbook blobs keyed by
//! [`WorkbookId`](sheetdiff_core::WorkbookId), and [`HistoryFile`] metadata
//! describing where each workbook came from. Removing a history entry does not
//! delete its workbook, and deleting a workbook does not touch its history.
//!
//! ```no_run
//! use sheetdiff_core::Workbook;
//! use sheetdiff_history::HistoryStore;
//!
//! # async fn demo() -> sheetdiff_history::StorageResult<()> {
//! let store = HistoryStore::open_path("history.db")?;
//! let id = store.save(&Workbook::new("q1.xlsx")).await?;
//! let loaded = store.get(&id).await?;
//! assert!(loaded.is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod record;
mod schema;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use record::{locator_for, parse_locator, HistoryFile, LOCATOR_SCHEME};
pub use store::HistoryStore;
