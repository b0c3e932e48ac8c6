// crates/wish-ledger-core/src/core/identifiers.rs
// ============================================================================
// Module: Wish Ledger Identifiers
// Description: Canonical opaque identifiers for wish ledger records.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout the wish
//! ledger. Identifiers are opaque and serialize transparently as numbers or
//! strings on the wire. `ChildHash` values are produced exclusively by
//! [`crate::core::identity::child_hash`] and are never displayed to callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Store-assigned identifier of a persisted wish entry.
///
/// # Invariants
/// - Assigned by the store at insert time; monotonic, unique, immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishId(i64);

impl WishId {
    /// Creates a wish identifier from a store rowid.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deterministic pseudonymous partition key for one individual in one scope.
///
/// # Invariants
/// - Lowercase hex digest; fixed length for a given digest algorithm.
/// - Equality-only usage: never parsed, ordered semantically, or displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildHash(String);

impl ChildHash {
    /// Creates a child hash from a precomputed hex digest.
    #[must_use]
    pub const fn new(digest: String) -> Self {
        Self(digest)
    }

    /// Returns the hex digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tenant/installation identifier isolating one deployment's records.
///
/// # Invariants
/// - Non-empty once constructed; fallback derivation handles absent config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Creates a scope identifier from a configured value.
    #[must_use]
    pub const fn new(scope: String) -> Self {
        Self(scope)
    }

    /// Returns the scope identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Informational locale tag carried on entries.
///
/// # Invariants
/// - Never participates in identity or queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Creates a locale tag.
    #[must_use]
    pub const fn new(tag: String) -> Self {
        Self(tag)
    }

    /// Returns the locale tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}
