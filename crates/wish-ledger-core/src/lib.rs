// crates/wish-ledger-core/src/lib.rs
// ============================================================================
// Module: Wish Ledger Core
// Description: Domain model, validation, and collaborator interfaces.
// Purpose: Define the storage-agnostic contract surfaces for the wish ledger.
// Dependencies: serde, sha2, thiserror, time
// ============================================================================

//! ## Overview
//! Core types for the wish ledger: strongly typed identifiers, the append-only
//! wish entry model, input validation and normalization, deterministic
//! pseudonymous identity hashing, canonical UTC timestamps, the error
//! taxonomy, and the interfaces toward external collaborators (notification
//! sink, localized text resolver). This crate performs no I/O; the SQLite
//! access layer and the operation layer build on top of it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::core::entry::NewWishEntry;
pub use crate::core::entry::TrendingTotals;
pub use crate::core::entry::TrendingWish;
pub use crate::core::entry::WishRecord;
pub use crate::core::error::StoreError;
pub use crate::core::error::ValidationError;
pub use crate::core::error::WishlistError;
pub use crate::core::identifiers::ChildHash;
pub use crate::core::identifiers::Locale;
pub use crate::core::identifiers::ScopeId;
pub use crate::core::identifiers::WishId;
pub use crate::core::identity::SYSTEM_NAME;
pub use crate::core::identity::child_hash;
pub use crate::core::identity::derive_fallback_scope;
pub use crate::core::time::TREND_WINDOW_DAYS;
pub use crate::core::time::format_utc_iso;
pub use crate::core::time::humanize_timestamp;
pub use crate::core::time::now_utc_iso;
pub use crate::core::time::trend_cutoff_iso;
pub use crate::core::validate::AGE_MAX;
pub use crate::core::validate::AGE_MIN;
pub use crate::core::validate::AgeInput;
pub use crate::core::validate::AgeRequirement;
pub use crate::core::validate::MAX_WISH_CHARS;
pub use crate::core::validate::MIN_WISH_CHARS;
pub use crate::core::validate::normalize_name;
pub use crate::core::validate::resolve_age;
pub use crate::core::validate::sanitize_wish;
pub use crate::interfaces::DefaultTexts;
pub use crate::interfaces::MessageKey;
pub use crate::interfaces::NotificationSink;
pub use crate::interfaces::NullNotificationSink;
pub use crate::interfaces::TextResolver;
pub use crate::interfaces::WishlistEvent;
