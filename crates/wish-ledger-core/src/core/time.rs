// crates/wish-ledger-core/src/core/time.rs
// ============================================================================
// Module: Wish Ledger Time Model
// Description: Canonical UTC timestamps for entries and trending cutoffs.
// Purpose: Provide one second-precision ISO-8601 rendering shared by all layers.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Entries carry UTC timestamps rendered as `YYYY-MM-DDTHH:MM:SSZ`. The fixed
//! width makes lexicographic comparison equal to chronological comparison, so
//! the store can filter the trending window with a plain string comparison.
//! The operation layer assigns timestamps at insert time; the store never
//! reads the clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Duration;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Rolling lookback window for trending queries, in days.
pub const TREND_WINDOW_DAYS: i64 = 30;

/// Parse description matching the canonical second-precision rendering.
const ISO_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Returns the current UTC moment in canonical second-precision form.
#[must_use]
pub fn now_utc_iso() -> String {
    format_utc_iso(OffsetDateTime::now_utc())
}

/// Returns the trending cutoff (`now - window_days`) in canonical form.
#[must_use]
pub fn trend_cutoff_iso(window_days: i64) -> String {
    format_utc_iso(OffsetDateTime::now_utc() - Duration::days(window_days))
}

/// Renders a UTC moment in canonical second-precision form.
#[must_use]
pub fn format_utc_iso(moment: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        moment.year(),
        u8::from(moment.month()),
        moment.day(),
        moment.hour(),
        moment.minute(),
        moment.second()
    )
}

/// Renders a stored timestamp for human-oriented previews.
///
/// Falls back to the raw stored value when it does not parse, so a damaged
/// row degrades a preview line instead of failing the whole operation.
#[must_use]
pub fn humanize_timestamp(value: &str) -> String {
    PrimitiveDateTime::parse(value, ISO_SECONDS).map_or_else(
        |_| value.to_string(),
        |parsed| {
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02}",
                parsed.year(),
                u8::from(parsed.month()),
                parsed.day(),
                parsed.hour(),
                parsed.minute()
            )
        },
    )
}
