// crates/wish-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Wish Ledger Interfaces
// Description: Contract surfaces toward external collaborators.
// Purpose: Define the notification sink and localized text resolver traits.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! The ledger publishes domain events to a [`NotificationSink`] on a
//! fire-and-forget basis: publication is infallible from the ledger's point
//! of view and can never roll back a completed insert. User-facing message
//! fragments resolve through a [`TextResolver`]; every key carries a built-in
//! English fallback so a missing or partial resolver degrades gracefully.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::identifiers::ScopeId;
use crate::core::identifiers::WishId;

// ============================================================================
// SECTION: Notification Sink
// ============================================================================

/// Domain events published to the notification sink.
///
/// # Invariants
/// - Payloads carry already-normalized values; sinks must not re-validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WishlistEvent {
    /// A wish entry was inserted.
    WishRegistered {
        /// Normalized display name.
        child_name: String,
        /// Optional validated age.
        age: Option<u8>,
        /// Sanitized wish text.
        wish: String,
        /// Store-assigned entry identifier.
        wish_id: WishId,
        /// Insert timestamp in canonical UTC form.
        registered_at: String,
        /// Owning scope of the entry.
        scope: ScopeId,
    },
    /// A store-layer failure occurred while serving an operation.
    OperationFailed {
        /// Operation tag ("register", "list", or "trending").
        operation: &'static str,
        /// Internal failure detail for diagnostics.
        detail: String,
    },
}

/// Fire-and-forget event publication toward the host's event bus.
pub trait NotificationSink: Send + Sync {
    /// Publishes one event. Implementations must not block the caller on
    /// delivery; failures stay inside the sink.
    fn publish(&self, event: WishlistEvent);
}

/// Sink that discards every event; the default when no host bus is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotificationSink;

impl NotificationSink for NullNotificationSink {
    fn publish(&self, _event: WishlistEvent) {}
}

// ============================================================================
// SECTION: Localized Text
// ============================================================================

/// Keys for caller-visible message fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Name missing or blank.
    MissingName,
    /// Wish missing or blank.
    MissingWish,
    /// Wish shorter than the minimum after sanitization.
    WishTooShort,
    /// Age required but missing or blank.
    MissingAge,
    /// Age present but invalid.
    InvalidAge,
    /// Generic try-again-later message for store failures.
    StoreUnavailable,
    /// No wishes recorded yet for the requested individual.
    NoWishesYet,
    /// No entries inside the trending window.
    TrendingEmpty,
    /// Header line above the trending ranking.
    TrendingHeader,
}

impl MessageKey {
    /// Returns the built-in English fallback text for this key.
    #[must_use]
    pub const fn default_text(self) -> &'static str {
        match self {
            Self::MissingName => "Please provide the name of the person.",
            Self::MissingWish => "A wish is required to register.",
            Self::WishTooShort => "The wish is too short; please use at least 3 characters.",
            Self::MissingAge => "Please provide both name and age to see recorded wishes.",
            Self::InvalidAge => "Age must be a whole number between 1 and 150.",
            Self::StoreUnavailable => {
                "The wish ledger is unavailable right now. Please try again later."
            }
            Self::NoWishesYet => "No wishes have been recorded yet for",
            Self::TrendingEmpty => "No trending wishes yet.",
            Self::TrendingHeader => "Trending wishes this season:",
        }
    }
}

/// Message-key to human string resolution with fallback.
pub trait TextResolver: Send + Sync {
    /// Returns the localized text for a key, or `None` to use the built-in
    /// English fallback.
    fn resolve(&self, key: MessageKey) -> Option<String>;

    /// Returns the localized text for a key, falling back to English.
    fn resolve_or_default(&self, key: MessageKey) -> String {
        self.resolve(key).unwrap_or_else(|| key.default_text().to_string())
    }
}

/// Resolver that always falls back to the built-in English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTexts;

impl TextResolver for DefaultTexts {
    fn resolve(&self, _key: MessageKey) -> Option<String> {
        None
    }
}
