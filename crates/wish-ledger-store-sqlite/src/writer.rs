// crates/wish-ledger-store-sqlite/src/writer.rs
// ============================================================================
// Module: SQLite Single-Writer Runtime
// Description: Dedicated writer thread funneling every store operation.
// Purpose: Guarantee exactly one logical thread ever touches the database.
// Dependencies: rusqlite, tokio, tracing, wish-ledger-core
// ============================================================================

//! ## Overview
//! The underlying engine is treated as unsafe for arbitrary concurrent
//! access, so all store operations execute on one dedicated OS thread owning
//! the only [`Connection`]. Callers submit typed [`WriterCommand`]s over a
//! bounded queue and suspend on a `oneshot` response; the queue has exactly
//! one consumer and commands run strictly one at a time. Worker creation and
//! enqueue both happen under the runtime's own lock (distinct from the
//! connection guard's lock), so duplicate worker creation under concurrent
//! first use collapses and queue order matches lock-acquisition order.
//! Establishment runs the idempotent schema DDL on the fresh connection
//! before the worker thread takes ownership of it, so a worker re-established
//! after death never serves a schema-less database. A dead worker is never
//! reused: the next submission re-establishes it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::SyncSender;
use std::sync::mpsc::TrySendError;
use std::thread;

use rusqlite::Connection;
use tokio::sync::Mutex;
use tokio::sync::oneshot;
use wish_ledger_core::ChildHash;
use wish_ledger_core::NewWishEntry;
use wish_ledger_core::TrendingTotals;
use wish_ledger_core::TrendingWish;
use wish_ledger_core::WishId;
use wish_ledger_core::WishRecord;

use crate::store::ConnectionProvider;
use crate::store::SqliteStoreError;
use crate::store::sql;

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Typed operation envelope queued to the writer thread.
pub(crate) enum WriterCommand {
    /// Run the idempotent schema DDL.
    Initialize {
        /// Result channel for schema setup.
        respond: oneshot::Sender<Result<(), SqliteStoreError>>,
    },
    /// Insert one prepared wish entry.
    InsertEntry {
        /// Fully validated entry to persist.
        entry: NewWishEntry,
        /// Result channel carrying the assigned rowid.
        respond: oneshot::Sender<Result<WishId, SqliteStoreError>>,
    },
    /// Count all entries for one child hash.
    CountForChild {
        /// Partition key to count.
        child_hash: ChildHash,
        /// Result channel for the running total.
        respond: oneshot::Sender<Result<u64, SqliteStoreError>>,
    },
    /// Fetch the most recent entries for one child hash.
    RecentForChild {
        /// Partition key to read.
        child_hash: ChildHash,
        /// Maximum rows returned.
        limit: u32,
        /// Result channel for the newest-first records.
        respond: oneshot::Sender<Result<Vec<WishRecord>, SqliteStoreError>>,
    },
    /// Fetch the full history for one child hash.
    EntriesForChild {
        /// Partition key to read.
        child_hash: ChildHash,
        /// Result channel for the newest-first records.
        respond: oneshot::Sender<Result<Vec<WishRecord>, SqliteStoreError>>,
    },
    /// Rank distinct wishes inside the trending window.
    TrendingSince {
        /// Inclusive lower bound in canonical timestamp form.
        since: String,
        /// Maximum ranked rows returned.
        limit: u32,
        /// Result channel for the ranked rows.
        respond: oneshot::Sender<Result<Vec<TrendingWish>, SqliteStoreError>>,
    },
    /// Aggregate totals inside the trending window.
    WindowTotals {
        /// Inclusive lower bound in canonical timestamp form.
        since: String,
        /// Result channel for the totals.
        respond: oneshot::Sender<Result<TrendingTotals, SqliteStoreError>>,
    },
}

// ============================================================================
// SECTION: Runtime
// ============================================================================

/// Live worker state: the submission side of the queue plus a liveness flag.
struct WriterHandle {
    /// Bounded submission channel into the worker thread.
    sender: SyncSender<WriterCommand>,
    /// Cleared by the worker thread when its loop exits.
    alive: Arc<AtomicBool>,
}

impl WriterHandle {
    /// Returns true while the worker thread is still draining the queue.
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// Lazily spawned single-writer execution context.
pub(crate) struct WriterRuntime {
    /// Provider opening the connection moved into the worker thread.
    provider: Arc<dyn ConnectionProvider>,
    /// Capacity of the bounded command queue.
    queue_capacity: usize,
    /// Queuing lock; held across the check-then-spawn section and the
    /// enqueue, never across a command's execution.
    handle: Mutex<Option<WriterHandle>>,
}

impl WriterRuntime {
    /// Creates a runtime with no worker; the first submission spawns one.
    pub(crate) fn new(provider: Arc<dyn ConnectionProvider>, queue_capacity: usize) -> Self {
        Self {
            provider,
            queue_capacity,
            handle: Mutex::new(None),
        }
    }

    /// Submits one command to the worker, establishing it first when needed.
    ///
    /// The enqueue happens inside the queuing lock's critical section, so
    /// commands enter the queue in lock-acquisition order. The caller's task
    /// suspends on the lock and, after this returns, on the command's own
    /// response channel; neither wait blocks the caller's scheduler thread.
    pub(crate) async fn dispatch(&self, command: WriterCommand) -> Result<(), SqliteStoreError> {
        let mut slot = self.handle.lock().await;
        let sender = self.ensure_worker(&mut slot)?;
        match sender.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SqliteStoreError::Overloaded {
                message: "sqlite writer queue saturated".to_string(),
            }),
            Err(TrySendError::Disconnected(_)) => {
                *slot = None;
                Err(SqliteStoreError::Db("sqlite writer terminated".to_string()))
            }
        }
    }

    /// Returns true when a live worker currently holds the store handle.
    pub(crate) async fn is_attached(&self) -> bool {
        self.handle.lock().await.as_ref().is_some_and(WriterHandle::is_alive)
    }

    /// Returns a queue sender for a live worker, establishing one if absent.
    ///
    /// Establishment opens a connection, runs the idempotent schema DDL on
    /// it, and only then moves it into a fresh worker thread; a worker
    /// re-established after death therefore always has the schema in place.
    /// On failure nothing is cached, so the next submission retries from
    /// scratch.
    fn ensure_worker(
        &self,
        slot: &mut Option<WriterHandle>,
    ) -> Result<SyncSender<WriterCommand>, SqliteStoreError> {
        if let Some(handle) = slot.as_ref() {
            if handle.is_alive() {
                return Ok(handle.sender.clone());
            }
            // A handle bound to a dead worker must never be reused.
            tracing::warn!("sqlite writer thread is gone; re-establishing worker");
            *slot = None;
        }
        let mut connection = self.provider.open()?;
        sql::run_schema(&mut connection)?;
        let (sender, receiver) = mpsc::sync_channel(self.queue_capacity);
        let alive = Arc::new(AtomicBool::new(true));
        let worker_alive = Arc::clone(&alive);
        thread::Builder::new()
            .name("wish-sqlite-writer".to_string())
            .spawn(move || writer_loop(connection, receiver, &worker_alive))
            .map_err(|err| {
                SqliteStoreError::Io(format!("failed to spawn sqlite writer thread: {err}"))
            })?;
        *slot = Some(WriterHandle {
            sender: sender.clone(),
            alive,
        });
        Ok(sender)
    }
}

// ============================================================================
// SECTION: Worker Loop
// ============================================================================

/// Clears the liveness flag when the worker unwinds or returns.
struct LivenessGuard<'a> {
    /// Flag shared with cached worker handles.
    alive: &'a AtomicBool,
}

impl Drop for LivenessGuard<'_> {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// Drains commands one at a time until every sender is dropped.
fn writer_loop(mut connection: Connection, receiver: Receiver<WriterCommand>, alive: &AtomicBool) {
    let _liveness = LivenessGuard {
        alive,
    };
    while let Ok(command) = receiver.recv() {
        execute_command(&mut connection, command);
    }
}

/// Executes one command against the worker-owned connection and responds.
///
/// Response sends ignore failure: a caller that abandoned interest does not
/// interrupt or fail in-flight store work.
fn execute_command(connection: &mut Connection, command: WriterCommand) {
    match command {
        WriterCommand::Initialize {
            respond,
        } => {
            let _ = respond.send(sql::run_schema(connection));
        }
        WriterCommand::InsertEntry {
            entry,
            respond,
        } => {
            let _ = respond.send(sql::insert_entry(connection, &entry));
        }
        WriterCommand::CountForChild {
            child_hash,
            respond,
        } => {
            let _ = respond.send(sql::count_for_child(connection, &child_hash));
        }
        WriterCommand::RecentForChild {
            child_hash,
            limit,
            respond,
        } => {
            let _ = respond.send(sql::recent_for_child(connection, &child_hash, limit));
        }
        WriterCommand::EntriesForChild {
            child_hash,
            respond,
        } => {
            let _ = respond.send(sql::entries_for_child(connection, &child_hash));
        }
        WriterCommand::TrendingSince {
            since,
            limit,
            respond,
        } => {
            let _ = respond.send(sql::trending_since(connection, &since, limit));
        }
        WriterCommand::WindowTotals {
            since,
            respond,
        } => {
            let _ = respond.send(sql::window_totals(connection, &since));
        }
    }
}
