// crates/wish-ledger-service/src/config.rs
// ============================================================================
// Module: Wishlist Service Configuration
// Description: Deployment configuration for the wishlist service.
// Purpose: Bind scope, locale, and store settings with safe defaults.
// Dependencies: serde, wish-ledger-core, wish-ledger-store-sqlite
// ============================================================================

//! ## Overview
//! Deployment configuration for the service layer. Every field has a default,
//! so an empty configuration yields a working in-memory instance. A missing
//! or blank `scope` is not an error: the service derives a stable fallback
//! from `host_instance_id` (or from the system name when that is also absent)
//! and logs one warning at construction time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use wish_ledger_core::Locale;
use wish_ledger_store_sqlite::SqliteStoreConfig;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Service-level configuration.
///
/// # Invariants
/// - A blank `scope` is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishlistConfig {
    /// Tenant/installation scope; derived from `host_instance_id` when absent.
    #[serde(default)]
    pub scope: Option<String>,
    /// Host instance identifier seeding fallback scope derivation.
    #[serde(default)]
    pub host_instance_id: Option<String>,
    /// Informational locale tag stamped on every entry.
    #[serde(default)]
    pub locale: Locale,
    /// Backing store configuration.
    #[serde(default)]
    pub store: SqliteStoreConfig,
}
