// crates/wish-ledger-service/src/guard.rs
// ============================================================================
// Module: Store Connection Guard
// Description: Double-checked lazy initialization of the store handle.
// Purpose: Collapse concurrent first use into one establishment and recover from worker death.
// Dependencies: tokio, wish-ledger-core, wish-ledger-store-sqlite
// ============================================================================

//! ## Overview
//! Operations never construct store handles directly; they go through
//! [`StoreGuard::acquire`]. The fast path is an atomic readiness flag plus a
//! live-worker check and takes no lock. The slow path holds the guard's
//! `tokio::sync::Mutex` across check-then-init and re-checks readiness after
//! acquiring it, so concurrent first users collapse into exactly one worker
//! spawn and one schema run. A handle whose writer thread has died is never
//! returned: the slow path re-establishes the worker and re-runs the
//! idempotent schema transparently. Establishment failure caches nothing and
//! surfaces as [`StoreError::Unavailable`]; the next acquire retries from
//! scratch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;
use wish_ledger_core::StoreError;
use wish_ledger_store_sqlite::SqliteWishStore;

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Concurrency-safe lazy gate in front of the store handle.
///
/// # Invariants
/// - The guard lock is held only across the check-then-init section, never
///   across a store operation.
/// - `ready` flips to true only after worker spawn and schema setup succeed.
pub struct StoreGuard {
    /// The guarded store; operations flow through it only after `acquire`.
    store: Arc<SqliteWishStore>,
    /// True once worker and schema were established at least once.
    ready: AtomicBool,
    /// Serializes the check-then-init slow path.
    init_lock: Mutex<()>,
}

impl StoreGuard {
    /// Wraps a store without touching it; establishment is deferred to the
    /// first `acquire`.
    #[must_use]
    pub fn new(store: SqliteWishStore) -> Self {
        Self {
            store: Arc::new(store),
            ready: AtomicBool::new(false),
            init_lock: Mutex::new(()),
        }
    }

    /// Returns a ready store handle, establishing worker and schema when
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store cannot be opened or
    /// its schema cannot be prepared; nothing is cached on failure.
    pub async fn acquire(&self) -> Result<Arc<SqliteWishStore>, StoreError> {
        if self.ready.load(Ordering::Acquire) && self.store.is_attached().await {
            return Ok(Arc::clone(&self.store));
        }
        let _section = self.init_lock.lock().await;
        // Another task may have finished establishment while we waited.
        if self.ready.load(Ordering::Acquire) && self.store.is_attached().await {
            return Ok(Arc::clone(&self.store));
        }
        self.store
            .initialize()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        self.ready.store(true, Ordering::Release);
        Ok(Arc::clone(&self.store))
    }

    /// Returns true while an established, live store handle is cached.
    pub async fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && self.store.is_attached().await
    }
}
