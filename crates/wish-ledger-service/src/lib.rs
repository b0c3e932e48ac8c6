// crates/wish-ledger-service/src/lib.rs
// ============================================================================
// Module: Wish Ledger Service Crate
// Description: Domain operations over the guarded single-writer store.
// Purpose: Expose register, list, and trending with lazy store establishment.
// Dependencies: serde, tokio, tracing, wish-ledger-core, wish-ledger-store-sqlite
// ============================================================================

//! ## Overview
//! The operation layer of the wish ledger. [`WishlistService`] validates
//! caller input, acquires the store handle through the double-checked
//! [`StoreGuard`], and shapes typed results or status/message envelopes.
//! Store failures never leak internal detail to callers; they are logged and
//! published to the notification sink instead.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Deployment configuration with fallback scope derivation.
pub mod config;
/// Double-checked lazy store initialization gate.
pub mod guard;
/// Domain operations, results, and response envelopes.
pub mod service;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::config::WishlistConfig;
pub use crate::guard::StoreGuard;
pub use crate::service::ListResponse;
pub use crate::service::RegisterReceipt;
pub use crate::service::RegisterResponse;
pub use crate::service::ResponseStatus;
pub use crate::service::TrendingReport;
pub use crate::service::TrendingResponse;
pub use crate::service::WishHistory;
pub use crate::service::WishlistService;
