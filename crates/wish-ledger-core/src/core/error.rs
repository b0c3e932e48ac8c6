// crates/wish-ledger-core/src/core/error.rs
// ============================================================================
// Module: Wish Ledger Error Taxonomy
// Description: Validation and store error types shared across layers.
// Purpose: Separate caller-input problems from store availability and query failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Two disjoint failure families: [`ValidationError`] covers caller-input
//! problems produced before any store access, and [`StoreError`] covers
//! provider/connection/schema failures ([`StoreError::Unavailable`]) and
//! query failures after a handle was obtained ([`StoreError::Query`]).
//! [`WishlistError`] is the operation-level union. Store error messages carry
//! internal detail for logs only; the operation layer replaces them with a
//! generic caller-visible message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Caller-input validation errors.
///
/// # Invariants
/// - Produced locally before any store access; never logged as system errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name was absent or blank after normalization.
    #[error("a name is required")]
    MissingName,
    /// Wish text was absent or blank after sanitization.
    #[error("a wish is required")]
    MissingWish,
    /// Wish text was shorter than the minimum after sanitization.
    #[error("wish text is too short")]
    WishTooShort,
    /// Age was required by the operation but absent or blank.
    #[error("an age is required")]
    MissingAge,
    /// Age was present but not an integer in the accepted range.
    #[error("age must be a whole number in range")]
    InvalidAge,
}

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Persistent store failures.
///
/// # Invariants
/// - Messages may carry internal detail; they are log-facing, not caller-facing.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// The store handle could not be established or its schema prepared.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A query failed after a handle was obtained.
    #[error("store query failed: {0}")]
    Query(String),
}

// ============================================================================
// SECTION: Operation Errors
// ============================================================================

/// Union of failures an operation can surface.
#[derive(Debug, Error, Clone)]
pub enum WishlistError {
    /// Caller-input validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Persistent store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WishlistError {
    /// Returns true when the failure originated in the store layer.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
