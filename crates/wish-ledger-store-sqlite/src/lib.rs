// crates/wish-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: Wish Ledger SQLite Store Crate
// Description: Single-writer SQLite persistence for wish entries.
// Purpose: Expose the async store API over the dedicated writer thread.
// Dependencies: rusqlite, serde, thiserror, tokio, tracing, wish-ledger-core
// ============================================================================

//! ## Overview
//! `SQLite`-backed persistence for the wish ledger. The crate exposes one
//! async store type, [`SqliteWishStore`], whose every operation is executed
//! on a dedicated single-writer OS thread owning the only database
//! connection. The worker is established lazily on first use and
//! re-established when it dies; a handle to a dead worker is never reused.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Store configuration, errors, connection opening, and the async API.
pub mod store;
/// Single-writer execution context funneling all store operations.
mod writer;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::store::ConnectionProvider;
pub use crate::store::SqliteConnectionProvider;
pub use crate::store::SqliteJournalMode;
pub use crate::store::SqliteStoreConfig;
pub use crate::store::SqliteStoreError;
pub use crate::store::SqliteSyncMode;
pub use crate::store::SqliteWishStore;
pub use crate::store::StoreLocation;
