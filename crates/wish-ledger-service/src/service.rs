// crates/wish-ledger-service/src/service.rs
// ============================================================================
// Module: Wishlist Operations
// Description: Register, list, and trending operations over the guarded store.
// Purpose: Validate input, run store work through the guard, and shape responses.
// Dependencies: serde, tracing, wish-ledger-core, wish-ledger-store-sqlite
// ============================================================================

//! ## Overview
//! The three domain operations. Each validates its input first and never
//! touches the store on validation failure; store access always goes through
//! the [`StoreGuard`]. Every operation comes in two forms: a fallible typed
//! form (`try_*`) returning domain results, and an envelope form returning a
//! `status` plus a caller-facing message, with store-failure detail kept out
//! of the message and routed to `tracing` and the notification sink instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use wish_ledger_core::AgeInput;
use wish_ledger_core::AgeRequirement;
use wish_ledger_core::DefaultTexts;
use wish_ledger_core::Locale;
use wish_ledger_core::MessageKey;
use wish_ledger_core::NewWishEntry;
use wish_ledger_core::NotificationSink;
use wish_ledger_core::NullNotificationSink;
use wish_ledger_core::ScopeId;
use wish_ledger_core::StoreError;
use wish_ledger_core::TREND_WINDOW_DAYS;
use wish_ledger_core::TextResolver;
use wish_ledger_core::TrendingTotals;
use wish_ledger_core::TrendingWish;
use wish_ledger_core::ValidationError;
use wish_ledger_core::WishId;
use wish_ledger_core::WishRecord;
use wish_ledger_core::WishlistError;
use wish_ledger_core::WishlistEvent;
use wish_ledger_core::child_hash;
use wish_ledger_core::derive_fallback_scope;
use wish_ledger_core::humanize_timestamp;
use wish_ledger_core::normalize_name;
use wish_ledger_core::now_utc_iso;
use wish_ledger_core::resolve_age;
use wish_ledger_core::sanitize_wish;
use wish_ledger_core::trend_cutoff_iso;
use wish_ledger_store_sqlite::SqliteWishStore;

use crate::config::WishlistConfig;
use crate::guard::StoreGuard;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Recent records returned with a register receipt.
const RECENT_LIMIT: u32 = 5;
/// Preview lines rendered by the list operation.
const PREVIEW_LIMIT: usize = 10;
/// Ranked rows returned by the trending operation.
const TRENDING_LIMIT: u32 = 5;

// ============================================================================
// SECTION: Results
// ============================================================================

/// Typed result of a successful register operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterReceipt {
    /// Store-assigned identifier of the inserted entry.
    pub wish_id: WishId,
    /// Normalized display name.
    pub child_name: String,
    /// Validated age, when provided.
    pub age: Option<u8>,
    /// Sanitized wish text as persisted.
    pub wish: String,
    /// Insert timestamp in canonical UTC form.
    pub registered_at: String,
    /// Running entry total for the same identity after this insert.
    pub total_for_child: u64,
    /// Most recent records for the same identity, newest first.
    pub recent_wishes: Vec<WishRecord>,
}

/// Typed result of a successful list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishHistory {
    /// Normalized display name.
    pub child_name: String,
    /// Validated age; list requires it.
    pub age: u8,
    /// Total recorded entries for this identity.
    pub total: u64,
    /// Full history, newest first.
    pub wishes: Vec<WishRecord>,
    /// Rendered preview lines, capped at ten.
    pub preview: Vec<String>,
}

/// Typed result of a successful trending operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingReport {
    /// Inclusive window start in canonical UTC form.
    pub window_start: String,
    /// Ranked distinct wishes, most wished first.
    pub ranked: Vec<TrendingWish>,
    /// Window totals across all entries.
    pub totals: TrendingTotals,
}

// ============================================================================
// SECTION: Envelopes
// ============================================================================

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The operation completed.
    Success,
    /// The operation was rejected or failed.
    Error,
}

/// Envelope form of the register operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponse {
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Caller-facing message; never carries internal store detail.
    pub message: String,
    /// Receipt on success.
    pub receipt: Option<RegisterReceipt>,
}

/// Envelope form of the list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResponse {
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Caller-facing message; never carries internal store detail.
    pub message: String,
    /// History on success; an empty history is still a success.
    pub history: Option<WishHistory>,
}

/// Envelope form of the trending operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingResponse {
    /// Outcome marker.
    pub status: ResponseStatus,
    /// Caller-facing message; never carries internal store detail.
    pub message: String,
    /// Report on success; an empty ranking is still a success.
    pub report: Option<TrendingReport>,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Wishlist domain operations over a guarded single-writer store.
///
/// # Invariants
/// - Validation always runs before any store access.
/// - Register mutates at most once; there are no automatic retries.
pub struct WishlistService {
    /// Lazy-initialization gate in front of the store.
    guard: StoreGuard,
    /// Scope stamped on and hashed into every entry.
    scope: ScopeId,
    /// Informational locale tag stamped on every entry.
    locale: Locale,
    /// Fire-and-forget event publication.
    sink: Arc<dyn NotificationSink>,
    /// Caller-facing message resolution.
    texts: Arc<dyn TextResolver>,
}

impl WishlistService {
    /// Creates a service with the default sink and built-in English texts.
    #[must_use]
    pub fn new(config: WishlistConfig) -> Self {
        Self::with_collaborators(config, Arc::new(NullNotificationSink), Arc::new(DefaultTexts))
    }

    /// Creates a service with explicit collaborators, building the store from
    /// the configuration.
    #[must_use]
    pub fn with_collaborators(
        config: WishlistConfig,
        sink: Arc<dyn NotificationSink>,
        texts: Arc<dyn TextResolver>,
    ) -> Self {
        let store = SqliteWishStore::new(config.store.clone());
        Self::from_parts(store, &config, sink, texts)
    }

    /// Creates a service over an already constructed store. The `store`
    /// section of the configuration is ignored in this form.
    #[must_use]
    pub fn from_parts(
        store: SqliteWishStore,
        config: &WishlistConfig,
        sink: Arc<dyn NotificationSink>,
        texts: Arc<dyn TextResolver>,
    ) -> Self {
        Self {
            guard: StoreGuard::new(store),
            scope: resolve_scope(config),
            locale: config.locale.clone(),
            sink,
            texts,
        }
    }

    /// Returns the scope every entry is recorded under.
    #[must_use]
    pub const fn scope(&self) -> &ScopeId {
        &self.scope
    }

    /// Registers one wish and returns the receipt with follow-up reads.
    ///
    /// The entry is stamped with a fresh timestamp; the running total and the
    /// recent records are read back through the same single-writer path.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Validation`] before any store access, or
    /// [`WishlistError::Store`] when the store is unavailable or a query
    /// fails. A store failure before the insert means nothing was persisted.
    pub async fn try_register(
        &self,
        name: Option<&str>,
        wish: Option<&str>,
        age: Option<&AgeInput>,
    ) -> Result<RegisterReceipt, WishlistError> {
        let child_name = normalize_name(name)?;
        let wish_text = sanitize_wish(wish)?;
        let resolved_age = resolve_age(age, AgeRequirement::Optional)?;

        let store = self.guard.acquire().await?;
        let hash = child_hash(&child_name, resolved_age, &self.scope);
        let registered_at = now_utc_iso();
        let entry = NewWishEntry {
            child_hash: hash.clone(),
            child_name: child_name.clone(),
            age: resolved_age,
            wish: wish_text.clone(),
            created_at: registered_at.clone(),
            owning_scope: self.scope.clone(),
            locale: self.locale.clone(),
        };
        let wish_id = store.insert_entry(entry).await.map_err(StoreError::from)?;
        let total_for_child = store.count_for_child(&hash).await.map_err(StoreError::from)?;
        let recent_wishes =
            store.recent_for_child(&hash, RECENT_LIMIT).await.map_err(StoreError::from)?;

        self.sink.publish(WishlistEvent::WishRegistered {
            child_name: child_name.clone(),
            age: resolved_age,
            wish: wish_text.clone(),
            wish_id,
            registered_at: registered_at.clone(),
            scope: self.scope.clone(),
        });

        Ok(RegisterReceipt {
            wish_id,
            child_name,
            age: resolved_age,
            wish: wish_text,
            registered_at,
            total_for_child,
            recent_wishes,
        })
    }

    /// Envelope form of [`Self::try_register`].
    pub async fn register(
        &self,
        name: Option<&str>,
        wish: Option<&str>,
        age: Option<&AgeInput>,
    ) -> RegisterResponse {
        match self.try_register(name, wish, age).await {
            Ok(receipt) => RegisterResponse {
                status: ResponseStatus::Success,
                message: register_message(&receipt),
                receipt: Some(receipt),
            },
            Err(error) => RegisterResponse {
                status: ResponseStatus::Error,
                message: self.error_message("register", &error),
                receipt: None,
            },
        }
    }

    /// Lists all recorded wishes for one named, aged individual.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Validation`] when name or age is missing or
    /// invalid, or [`WishlistError::Store`] on store failure.
    pub async fn try_list(
        &self,
        name: Option<&str>,
        age: Option<&AgeInput>,
    ) -> Result<WishHistory, WishlistError> {
        let child_name = normalize_name(name)?;
        let Some(age_value) = resolve_age(age, AgeRequirement::Required)? else {
            return Err(ValidationError::MissingAge.into());
        };

        let store = self.guard.acquire().await?;
        let hash = child_hash(&child_name, Some(age_value), &self.scope);
        let wishes = store.entries_for_child(&hash).await.map_err(StoreError::from)?;
        let preview = wishes
            .iter()
            .take(PREVIEW_LIMIT)
            .enumerate()
            .map(|(index, record)| {
                let position = index + 1;
                let stamp = humanize_timestamp(&record.created_at);
                format!("{position}. {} (added {stamp})", record.wish)
            })
            .collect();

        Ok(WishHistory {
            child_name,
            age: age_value,
            total: u64::try_from(wishes.len()).unwrap_or_default(),
            wishes,
            preview,
        })
    }

    /// Envelope form of [`Self::try_list`].
    pub async fn list(&self, name: Option<&str>, age: Option<&AgeInput>) -> ListResponse {
        match self.try_list(name, age).await {
            Ok(history) => ListResponse {
                status: ResponseStatus::Success,
                message: self.list_message(&history),
                history: Some(history),
            },
            Err(error) => ListResponse {
                status: ResponseStatus::Error,
                message: self.error_message("list", &error),
                history: None,
            },
        }
    }

    /// Ranks the most wished texts inside the rolling trending window.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Store`] on store failure.
    pub async fn try_trending(&self) -> Result<TrendingReport, WishlistError> {
        let store = self.guard.acquire().await?;
        let window_start = trend_cutoff_iso(TREND_WINDOW_DAYS);
        let ranked =
            store.trending_since(&window_start, TRENDING_LIMIT).await.map_err(StoreError::from)?;
        let totals = store.window_totals(&window_start).await.map_err(StoreError::from)?;
        Ok(TrendingReport {
            window_start,
            ranked,
            totals,
        })
    }

    /// Envelope form of [`Self::try_trending`].
    pub async fn trending(&self) -> TrendingResponse {
        match self.try_trending().await {
            Ok(report) => TrendingResponse {
                status: ResponseStatus::Success,
                message: self.trending_message(&report),
                report: Some(report),
            },
            Err(error) => TrendingResponse {
                status: ResponseStatus::Error,
                message: self.error_message("trending", &error),
                report: None,
            },
        }
    }

    /// Renders the list success message, numbered preview included.
    fn list_message(&self, history: &WishHistory) -> String {
        let display = display_name(&history.child_name, Some(history.age));
        if history.wishes.is_empty() {
            let none_yet = self.texts.resolve_or_default(MessageKey::NoWishesYet);
            return format!("{none_yet} {display}.");
        }
        let total = history.total;
        let lines = history.preview.join("\n");
        format!("{display} has {total} recorded wish(es):\n{lines}")
    }

    /// Renders the trending success message, numbered ranking included.
    fn trending_message(&self, report: &TrendingReport) -> String {
        if report.ranked.is_empty() {
            return self.texts.resolve_or_default(MessageKey::TrendingEmpty);
        }
        let header = self.texts.resolve_or_default(MessageKey::TrendingHeader);
        let mut message = header;
        for (index, row) in report.ranked.iter().enumerate() {
            let position = index + 1;
            let total = row.total;
            message.push('\n');
            message.push_str(&format!("{position}. \"{}\" wished {total} time(s)", row.wish));
        }
        message
    }

    /// Maps an operation failure to its caller-facing message.
    ///
    /// Validation failures resolve directly to their message key. Store
    /// failures are logged, reported to the sink tagged with the operation,
    /// and replaced with a generic try-again-later message.
    fn error_message(&self, operation: &'static str, error: &WishlistError) -> String {
        match error {
            WishlistError::Validation(validation) => {
                self.texts.resolve_or_default(validation_key(*validation))
            }
            WishlistError::Store(store) => {
                tracing::error!(operation, detail = %store, "store failure while serving operation");
                self.sink.publish(WishlistEvent::OperationFailed {
                    operation,
                    detail: store.to_string(),
                });
                self.texts.resolve_or_default(MessageKey::StoreUnavailable)
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the configured scope, deriving a stable fallback when absent.
fn resolve_scope(config: &WishlistConfig) -> ScopeId {
    let configured = config.scope.as_deref().map(str::trim).filter(|value| !value.is_empty());
    configured.map_or_else(
        || {
            // One warning per service instance; operations proceed normally.
            tracing::warn!("no scope configured; deriving a stable fallback scope");
            derive_fallback_scope(config.host_instance_id.as_deref())
        },
        |value| ScopeId::new(value.to_string()),
    )
}

/// Renders a display name with an age suffix when the age is known.
fn display_name(child_name: &str, age: Option<u8>) -> String {
    age.map_or_else(|| child_name.to_string(), |value| format!("{child_name} ({value} yrs)"))
}

/// Renders the register success message.
fn register_message(receipt: &RegisterReceipt) -> String {
    let display = display_name(&receipt.child_name, receipt.age);
    let total = receipt.total_for_child;
    format!("Wish recorded for {display}. {total} wish(es) on file.")
}

/// Maps a validation error to its message key.
const fn validation_key(error: ValidationError) -> MessageKey {
    match error {
        ValidationError::MissingName => MessageKey::MissingName,
        ValidationError::MissingWish => MessageKey::MissingWish,
        ValidationError::WishTooShort => MessageKey::WishTooShort,
        ValidationError::MissingAge => MessageKey::MissingAge,
        ValidationError::InvalidAge => MessageKey::InvalidAge,
    }
}
