// crates/wish-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Wish Store
// Description: Append-only wish entry store backed by SQLite.
// Purpose: Persist wish entries and serve derived per-child and trending reads.
// Dependencies: rusqlite, serde, thiserror, tokio, wish-ledger-core
// ============================================================================

//! ## Overview
//! This module implements the append-only wish entry store on `SQLite`. One
//! table plus two non-unique indexes (`child_hash`, `wish`) are created with
//! `IF NOT EXISTS` semantics, so schema setup is idempotent to re-creation
//! attempts. Every operation is funneled through the single-writer runtime in
//! [`crate::writer`]; once a worker owns a [`Connection`], it is the only
//! code that touches it. Entries are immutable: no update or delete statement
//! exists in this module.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::oneshot;
use wish_ledger_core::ChildHash;
use wish_ledger_core::NewWishEntry;
use wish_ledger_core::StoreError;
use wish_ledger_core::TrendingTotals;
use wish_ledger_core::TrendingWish;
use wish_ledger_core::WishId;
use wish_ledger_core::WishRecord;

use crate::writer::WriterCommand;
use crate::writer::WriterRuntime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default writer queue capacity.
const DEFAULT_QUEUE_CAPACITY: usize = 128;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Location of the backing database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    /// Private in-memory database; data lives as long as the worker thread.
    #[default]
    Memory,
    /// On-disk database file.
    File(PathBuf),
}

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` wish store.
///
/// # Invariants
/// - A file location must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
/// - `queue_capacity` bounds the writer queue; zero is rejected at open time.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Database location.
    #[serde(default)]
    pub location: StoreLocation,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Writer queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            location: StoreLocation::Memory,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteJournalMode::default(),
            sync_mode: SqliteSyncMode::default(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Returns the default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default writer queue capacity.
const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding wish text or identity material.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid: {0}")]
    Invalid(String),
    /// Store is overloaded and the caller should retry.
    #[error("sqlite store overloaded: {message}")]
    Overloaded {
        /// Retryable overload message.
        message: String,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        Self::Query(error.to_string())
    }
}

// ============================================================================
// SECTION: Connection Provider
// ============================================================================

/// Opens low-level store handles for the writer runtime.
///
/// The returned [`Connection`] is moved into the dedicated worker thread and
/// never used on the opening thread again.
pub trait ConnectionProvider: Send + Sync {
    /// Opens one configured connection.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened.
    fn open(&self) -> Result<Connection, SqliteStoreError>;
}

/// Default provider opening connections per [`SqliteStoreConfig`].
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    /// Store configuration applied to every opened connection.
    config: SqliteStoreConfig,
}

impl SqliteConnectionProvider {
    /// Creates a provider for the given configuration.
    #[must_use]
    pub const fn new(config: SqliteStoreConfig) -> Self {
        Self {
            config,
        }
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn open(&self) -> Result<Connection, SqliteStoreError> {
        open_connection(&self.config)
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed wish entry store.
///
/// # Invariants
/// - All database access happens on the single writer thread.
/// - The store is append-only: entries are never updated or deleted.
#[derive(Clone)]
pub struct SqliteWishStore {
    /// Single-writer execution context owning the connection.
    runtime: Arc<WriterRuntime>,
}

impl SqliteWishStore {
    /// Creates a store for the given configuration.
    ///
    /// No I/O happens here; the worker thread, connection, and schema are
    /// established lazily on first use.
    #[must_use]
    pub fn new(config: SqliteStoreConfig) -> Self {
        let queue_capacity = config.queue_capacity.max(1);
        Self::with_provider(Arc::new(SqliteConnectionProvider::new(config)), queue_capacity)
    }

    /// Creates a store over a custom connection provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ConnectionProvider>, queue_capacity: usize) -> Self {
        Self {
            runtime: Arc::new(WriterRuntime::new(provider, queue_capacity.max(1))),
        }
    }

    /// Establishes the worker (when absent) and runs the idempotent DDL.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the provider fails or the DDL cannot
    /// be applied; nothing is cached on failure.
    pub async fn initialize(&self) -> Result<(), SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::Initialize {
                respond,
            })
            .await?;
        await_response(outcome).await
    }

    /// Returns true while a live worker holds the store handle.
    pub async fn is_attached(&self) -> bool {
        self.runtime.is_attached().await
    }

    /// Inserts one prepared entry and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the insert fails.
    pub async fn insert_entry(&self, entry: NewWishEntry) -> Result<WishId, SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::InsertEntry {
                entry,
                respond,
            })
            .await?;
        await_response(outcome).await
    }

    /// Counts all entries sharing one child hash.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub async fn count_for_child(&self, child_hash: &ChildHash) -> Result<u64, SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::CountForChild {
                child_hash: child_hash.clone(),
                respond,
            })
            .await?;
        await_response(outcome).await
    }

    /// Fetches the most recent entries for one child hash, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub async fn recent_for_child(
        &self,
        child_hash: &ChildHash,
        limit: u32,
    ) -> Result<Vec<WishRecord>, SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::RecentForChild {
                child_hash: child_hash.clone(),
                limit,
                respond,
            })
            .await?;
        await_response(outcome).await
    }

    /// Fetches the full history for one child hash, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub async fn entries_for_child(
        &self,
        child_hash: &ChildHash,
    ) -> Result<Vec<WishRecord>, SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::EntriesForChild {
                child_hash: child_hash.clone(),
                respond,
            })
            .await?;
        await_response(outcome).await
    }

    /// Ranks distinct wishes recorded at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub async fn trending_since(
        &self,
        since: &str,
        limit: u32,
    ) -> Result<Vec<TrendingWish>, SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::TrendingSince {
                since: since.to_string(),
                limit,
                respond,
            })
            .await?;
        await_response(outcome).await
    }

    /// Aggregates totals for entries recorded at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub async fn window_totals(&self, since: &str) -> Result<TrendingTotals, SqliteStoreError> {
        let (respond, outcome) = oneshot::channel();
        self.runtime
            .dispatch(WriterCommand::WindowTotals {
                since: since.to_string(),
                respond,
            })
            .await?;
        await_response(outcome).await
    }
}

/// Awaits one worker response, mapping a dropped channel to a store error.
async fn await_response<T>(
    outcome: oneshot::Receiver<Result<T, SqliteStoreError>>,
) -> Result<T, SqliteStoreError> {
    outcome
        .await
        .map_err(|_| SqliteStoreError::Db("sqlite writer dropped the response".to_string()))?
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for an on-disk store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates an on-disk store path.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let connection = match &config.location {
        StoreLocation::Memory => {
            Connection::open_in_memory().map_err(|err| SqliteStoreError::Db(err.to_string()))?
        }
        StoreLocation::File(path) => {
            validate_store_path(path)?;
            ensure_parent_dir(path)?;
            let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
            Connection::open_with_flags(path, flags)
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?
        }
    };
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: SQL Operations
// ============================================================================

/// Row-level SQL executed exclusively on the writer thread.
pub(crate) mod sql {
    use rusqlite::Connection;
    use rusqlite::params;
    use wish_ledger_core::ChildHash;
    use wish_ledger_core::NewWishEntry;
    use wish_ledger_core::TrendingTotals;
    use wish_ledger_core::TrendingWish;
    use wish_ledger_core::WishId;
    use wish_ledger_core::WishRecord;

    use super::SqliteStoreError;

    /// Creates the entry table and both indexes when absent.
    pub(crate) fn run_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS wishlist_entries (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    child_hash TEXT NOT NULL,
                    child_name TEXT NOT NULL,
                    age INTEGER,
                    wish TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    owning_scope TEXT,
                    locale TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_wishlist_entries_child_hash
                    ON wishlist_entries (child_hash);
                CREATE INDEX IF NOT EXISTS idx_wishlist_entries_wish
                    ON wishlist_entries (wish);",
            )
            .map_err(db_error)
    }

    /// Inserts one entry and returns the assigned rowid.
    pub(crate) fn insert_entry(
        connection: &mut Connection,
        entry: &NewWishEntry,
    ) -> Result<WishId, SqliteStoreError> {
        connection
            .execute(
                "INSERT INTO wishlist_entries
                    (child_hash, child_name, age, wish, created_at, owning_scope, locale)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.child_hash.as_str(),
                    entry.child_name,
                    entry.age,
                    entry.wish,
                    entry.created_at,
                    entry.owning_scope.as_str(),
                    entry.locale.as_str(),
                ],
            )
            .map_err(db_error)?;
        Ok(WishId::new(connection.last_insert_rowid()))
    }

    /// Counts all entries sharing one child hash.
    pub(crate) fn count_for_child(
        connection: &mut Connection,
        child_hash: &ChildHash,
    ) -> Result<u64, SqliteStoreError> {
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM wishlist_entries WHERE child_hash = ?1",
                params![child_hash.as_str()],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Fetches the most recent entries for one child hash, newest first.
    ///
    /// Rowid breaks ties between entries recorded in the same second.
    pub(crate) fn recent_for_child(
        connection: &mut Connection,
        child_hash: &ChildHash,
        limit: u32,
    ) -> Result<Vec<WishRecord>, SqliteStoreError> {
        let mut statement = connection
            .prepare(
                "SELECT wish, created_at FROM wishlist_entries
                 WHERE child_hash = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )
            .map_err(db_error)?;
        let rows = statement
            .query_map(params![child_hash.as_str(), limit], record_from_row)
            .map_err(db_error)?;
        rows.collect::<rusqlite::Result<Vec<WishRecord>>>().map_err(db_error)
    }

    /// Fetches the full history for one child hash, newest first.
    pub(crate) fn entries_for_child(
        connection: &mut Connection,
        child_hash: &ChildHash,
    ) -> Result<Vec<WishRecord>, SqliteStoreError> {
        let mut statement = connection
            .prepare(
                "SELECT wish, created_at FROM wishlist_entries
                 WHERE child_hash = ?1
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(db_error)?;
        let rows = statement
            .query_map(params![child_hash.as_str()], record_from_row)
            .map_err(db_error)?;
        rows.collect::<rusqlite::Result<Vec<WishRecord>>>().map_err(db_error)
    }

    /// Ranks distinct wish texts recorded at or after `since`.
    pub(crate) fn trending_since(
        connection: &mut Connection,
        since: &str,
        limit: u32,
    ) -> Result<Vec<TrendingWish>, SqliteStoreError> {
        let mut statement = connection
            .prepare(
                "SELECT wish, COUNT(*) AS total, MAX(created_at) AS last_seen
                 FROM wishlist_entries
                 WHERE created_at >= ?1
                 GROUP BY wish
                 ORDER BY total DESC, last_seen DESC
                 LIMIT ?2",
            )
            .map_err(db_error)?;
        let rows = statement
            .query_map(params![since, limit], |row| {
                let total: i64 = row.get(1)?;
                Ok(TrendingWish {
                    wish: row.get(0)?,
                    total: u64::try_from(total).unwrap_or_default(),
                    last_seen: row.get(2)?,
                })
            })
            .map_err(db_error)?;
        rows.collect::<rusqlite::Result<Vec<TrendingWish>>>().map_err(db_error)
    }

    /// Aggregates window totals: entry count and distinct child hashes.
    pub(crate) fn window_totals(
        connection: &mut Connection,
        since: &str,
    ) -> Result<TrendingTotals, SqliteStoreError> {
        connection
            .query_row(
                "SELECT COUNT(*), COUNT(DISTINCT child_hash)
                 FROM wishlist_entries
                 WHERE created_at >= ?1",
                params![since],
                |row| {
                    let total: i64 = row.get(0)?;
                    let distinct: i64 = row.get(1)?;
                    Ok(TrendingTotals {
                        total_wishes: u64::try_from(total).unwrap_or_default(),
                        unique_children: u64::try_from(distinct).unwrap_or_default(),
                    })
                },
            )
            .map_err(db_error)
    }

    /// Maps one history row into a [`WishRecord`].
    fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WishRecord> {
        Ok(WishRecord {
            wish: row.get(0)?,
            created_at: row.get(1)?,
        })
    }

    /// Converts a `rusqlite` error into the store error type.
    fn db_error(err: rusqlite::Error) -> SqliteStoreError {
        SqliteStoreError::Db(err.to_string())
    }
}
