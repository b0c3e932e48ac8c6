// crates/wish-ledger-core/src/core/validate.rs
// ============================================================================
// Module: Wish Ledger Input Validation
// Description: Name normalization, wish sanitization, and age resolution.
// Purpose: Shape caller input deterministically before any store access.
// Dependencies: serde, thiserror (via crate::core::error)
// ============================================================================

//! ## Overview
//! Every operation funnels its raw input through these functions before
//! touching the store. Name tokens are capitalized and whitespace collapsed;
//! wish text is whitespace-collapsed and truncated (never rejected) above the
//! character cap; ages accept integer, integer-valued float, and ASCII-digit
//! string representations. Validation failures are returned immediately and
//! never reach the store layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

use crate::core::error::ValidationError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum accepted wish length in characters, after sanitization.
pub const MIN_WISH_CHARS: usize = 3;
/// Maximum stored wish length in characters; longer input is truncated.
pub const MAX_WISH_CHARS: usize = 280;
/// Minimum accepted age.
pub const AGE_MIN: u8 = 1;
/// Maximum accepted age.
pub const AGE_MAX: u8 = 150;

// ============================================================================
// SECTION: Age Input
// ============================================================================

/// Raw age value as supplied by a caller.
///
/// # Invariants
/// - Deserializes untagged: JSON integers, fractional numbers, and strings
///   all arrive here unmodified; [`resolve_age`] decides validity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    /// An integer representation.
    Integer(i64),
    /// A fractional representation; valid only when integer-valued.
    Float(f64),
    /// A textual representation; valid only when all ASCII digits.
    Text(String),
}

/// Whether the calling operation treats age as required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeRequirement {
    /// Absent or blank age resolves to `None`.
    Optional,
    /// Absent or blank age is a [`ValidationError::MissingAge`] failure.
    Required,
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a display name: capitalized tokens joined by single spaces.
///
/// # Errors
///
/// Returns [`ValidationError::MissingName`] when the name is absent or blank.
pub fn normalize_name(name: Option<&str>) -> Result<String, ValidationError> {
    let raw = name.unwrap_or_default();
    let cleaned =
        raw.split_whitespace().map(capitalize_token).collect::<Vec<String>>().join(" ");
    if cleaned.is_empty() {
        return Err(ValidationError::MissingName);
    }
    Ok(cleaned)
}

/// Sanitizes wish text: whitespace collapsed, trimmed, capped in characters.
///
/// Input longer than [`MAX_WISH_CHARS`] is truncated rather than rejected.
///
/// # Errors
///
/// Returns [`ValidationError::MissingWish`] when the wish is absent or blank,
/// and [`ValidationError::WishTooShort`] when fewer than [`MIN_WISH_CHARS`]
/// characters remain after sanitization.
pub fn sanitize_wish(wish: Option<&str>) -> Result<String, ValidationError> {
    let raw = wish.unwrap_or_default();
    let collapsed = raw.split_whitespace().collect::<Vec<&str>>().join(" ");
    if collapsed.is_empty() {
        return Err(ValidationError::MissingWish);
    }
    let truncated: String = collapsed.chars().take(MAX_WISH_CHARS).collect();
    if truncated.chars().count() < MIN_WISH_CHARS {
        return Err(ValidationError::WishTooShort);
    }
    Ok(truncated)
}

/// Resolves a raw age input to a validated age.
///
/// Absent input (or a blank string) counts as "no age" and resolves to
/// `None` under [`AgeRequirement::Optional`]. Any non-blank input must
/// resolve to an integer in `[AGE_MIN, AGE_MAX]` regardless of requiredness.
///
/// # Errors
///
/// Returns [`ValidationError::MissingAge`] when age is required but absent,
/// and [`ValidationError::InvalidAge`] for non-numeric, out-of-range, or
/// fractional input.
pub fn resolve_age(
    age: Option<&AgeInput>,
    requirement: AgeRequirement,
) -> Result<Option<u8>, ValidationError> {
    let Some(input) = age else {
        return absent_age(requirement);
    };
    match input {
        AgeInput::Integer(value) => in_range(*value).map(Some),
        AgeInput::Float(value) => {
            if value.is_finite() && value.fract() == 0.0 {
                in_range(to_i64(*value)).map(Some)
            } else {
                Err(ValidationError::InvalidAge)
            }
        }
        AgeInput::Text(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return absent_age(requirement);
            }
            if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(ValidationError::InvalidAge);
            }
            let parsed: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidAge)?;
            in_range(parsed).map(Some)
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the absent-age case for the given requirement.
const fn absent_age(requirement: AgeRequirement) -> Result<Option<u8>, ValidationError> {
    match requirement {
        AgeRequirement::Optional => Ok(None),
        AgeRequirement::Required => Err(ValidationError::MissingAge),
    }
}

/// Checks that a candidate age sits inside the accepted range.
fn in_range(value: i64) -> Result<u8, ValidationError> {
    if !(i64::from(AGE_MIN)..=i64::from(AGE_MAX)).contains(&value) {
        return Err(ValidationError::InvalidAge);
    }
    u8::try_from(value).map_err(|_| ValidationError::InvalidAge)
}

/// Converts an integer-valued finite float to `i64` without precision loss
/// concerns inside the accepted age range.
#[allow(clippy::cast_possible_truncation, reason = "caller verified fract() == 0.0")]
fn to_i64(value: f64) -> i64 {
    if value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        value as i64
    } else {
        // Out-of-range floats collapse to a value in_range() rejects.
        i64::MIN
    }
}

/// Capitalizes one whitespace-delimited token: first character uppercased,
/// remainder lowercased.
fn capitalize_token(token: &str) -> String {
    let mut chars = token.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}
