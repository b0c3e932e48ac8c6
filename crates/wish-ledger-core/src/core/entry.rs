// crates/wish-ledger-core/src/core/entry.rs
// ============================================================================
// Module: Wish Ledger Entry Model
// Description: Append-only wish entry records and derived query rows.
// Purpose: Define the persisted record shape and the aggregate row types.
// Dependencies: serde, crate::core::identifiers
// ============================================================================

//! ## Overview
//! [`NewWishEntry`] is the fully prepared record handed to the store for
//! insertion; entries are immutable once inserted (no update or delete path
//! exists anywhere in the system). The remaining types are row shapes for the
//! derived read queries: per-child history and the rolling trending window.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ChildHash;
use crate::core::identifiers::Locale;
use crate::core::identifiers::ScopeId;

// ============================================================================
// SECTION: Entry Records
// ============================================================================

/// Fully validated wish entry prepared for insertion.
///
/// # Invariants
/// - `child_hash` is a pure function of (`child_name` lowered, `age`,
///   `owning_scope`) and never changes after insert.
/// - `wish` is sanitized and within the configured character bounds.
/// - `created_at` is UTC ISO-8601 at second precision, assigned by the
///   operation layer (not the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWishEntry {
    /// Pseudonymous partition key for the owning individual.
    pub child_hash: ChildHash,
    /// Normalized display name.
    pub child_name: String,
    /// Optional age; `None` is a distinct identity partition.
    pub age: Option<u8>,
    /// Sanitized wish text.
    pub wish: String,
    /// UTC ISO-8601 timestamp at second precision.
    pub created_at: String,
    /// Owning tenant/installation scope.
    pub owning_scope: ScopeId,
    /// Informational locale tag.
    pub locale: Locale,
}

// ============================================================================
// SECTION: Derived Query Rows
// ============================================================================

/// One recorded wish as returned by per-child history queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishRecord {
    /// Sanitized wish text.
    pub wish: String,
    /// UTC ISO-8601 timestamp at second precision.
    pub created_at: String,
}

/// One ranked row of the trending window.
///
/// # Invariants
/// - Rows are ordered by `total` descending, ties by `last_seen` descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingWish {
    /// Distinct wish text.
    pub wish: String,
    /// Occurrence count inside the window.
    pub total: u64,
    /// Most recent occurrence timestamp inside the window.
    pub last_seen: String,
}

/// Aggregate totals for the trending window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendingTotals {
    /// Total entries with `created_at` inside the window.
    pub total_wishes: u64,
    /// Distinct child hashes inside the window.
    pub unique_children: u64,
}
