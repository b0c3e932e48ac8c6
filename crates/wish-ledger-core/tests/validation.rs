// crates/wish-ledger-core/tests/validation.rs
// ============================================================================
// Module: Input Validation Tests
// Description: Verifies name normalization, wish sanitization, and age resolution.
// ============================================================================
//! ## Overview
//! Ensures input shaping is deterministic: token capitalization, whitespace
//! collapsing, character-based truncation, and the accepted age
//! representations with their required/optional semantics.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use wish_ledger_core::AgeInput;
use wish_ledger_core::AgeRequirement;
use wish_ledger_core::MAX_WISH_CHARS;
use wish_ledger_core::ValidationError;
use wish_ledger_core::normalize_name;
use wish_ledger_core::resolve_age;
use wish_ledger_core::sanitize_wish;

#[test]
fn normalize_name_capitalizes_each_token() {
    let normalized = normalize_name(Some("  charlie   van  HOUTEN ")).expect("valid name");
    assert_eq!(normalized, "Charlie Van Houten");
}

#[test]
fn normalize_name_rejects_absent_and_blank() {
    assert_eq!(normalize_name(None), Err(ValidationError::MissingName));
    assert_eq!(normalize_name(Some("")), Err(ValidationError::MissingName));
    assert_eq!(normalize_name(Some("   \t ")), Err(ValidationError::MissingName));
}

#[test]
fn sanitize_wish_collapses_whitespace() {
    let sanitized = sanitize_wish(Some("  a   new\t\tsled \n ")).expect("valid wish");
    assert_eq!(sanitized, "a new sled");
}

#[test]
fn sanitize_wish_truncates_to_character_cap() {
    let long_wish = "x".repeat(300);
    let sanitized = sanitize_wish(Some(&long_wish)).expect("valid wish");
    assert_eq!(sanitized.chars().count(), MAX_WISH_CHARS);
    assert_eq!(sanitized, "x".repeat(MAX_WISH_CHARS));
}

#[test]
fn sanitize_wish_counts_characters_not_bytes() {
    let long_wish = "ö".repeat(300);
    let sanitized = sanitize_wish(Some(&long_wish)).expect("valid wish");
    assert_eq!(sanitized.chars().count(), MAX_WISH_CHARS);
}

#[test]
fn sanitize_wish_distinguishes_absent_from_too_short() {
    assert_eq!(sanitize_wish(None), Err(ValidationError::MissingWish));
    assert_eq!(sanitize_wish(Some("   ")), Err(ValidationError::MissingWish));
    assert_eq!(sanitize_wish(Some("ab")), Err(ValidationError::WishTooShort));
    assert_eq!(sanitize_wish(Some(" a  b ")), Err(ValidationError::WishTooShort));
}

#[test]
fn resolve_age_accepts_integer_forms() {
    let integer = AgeInput::Integer(7);
    let float = AgeInput::Float(7.0);
    let text = AgeInput::Text("7".to_string());
    for input in [&integer, &float, &text] {
        let resolved = resolve_age(Some(input), AgeRequirement::Required).expect("valid age");
        assert_eq!(resolved, Some(7));
    }
}

#[test]
fn resolve_age_rejects_fractional_and_non_numeric() {
    let cases = [
        AgeInput::Float(7.5),
        AgeInput::Float(f64::NAN),
        AgeInput::Text("seven".to_string()),
        AgeInput::Text("7.5".to_string()),
        AgeInput::Text("-7".to_string()),
        AgeInput::Integer(0),
        AgeInput::Integer(151),
        AgeInput::Integer(-3),
    ];
    for input in &cases {
        // Invalid non-blank input stays invalid regardless of requiredness.
        for requirement in [AgeRequirement::Optional, AgeRequirement::Required] {
            assert_eq!(
                resolve_age(Some(input), requirement),
                Err(ValidationError::InvalidAge),
                "expected InvalidAge for {input:?}"
            );
        }
    }
}

#[test]
fn resolve_age_absent_depends_on_requirement() {
    assert_eq!(resolve_age(None, AgeRequirement::Optional), Ok(None));
    assert_eq!(resolve_age(None, AgeRequirement::Required), Err(ValidationError::MissingAge));
    let blank = AgeInput::Text("  ".to_string());
    assert_eq!(resolve_age(Some(&blank), AgeRequirement::Optional), Ok(None));
    assert_eq!(
        resolve_age(Some(&blank), AgeRequirement::Required),
        Err(ValidationError::MissingAge)
    );
}

#[test]
fn resolve_age_accepts_range_bounds() {
    let low = AgeInput::Integer(1);
    let high = AgeInput::Integer(150);
    assert_eq!(resolve_age(Some(&low), AgeRequirement::Required), Ok(Some(1)));
    assert_eq!(resolve_age(Some(&high), AgeRequirement::Required), Ok(Some(150)));
}

proptest::proptest! {
    #[test]
    fn sanitized_wishes_are_bounded_and_collapsed(raw in "[ a-zA-Z0-9]{0,400}") {
        if let Ok(sanitized) = sanitize_wish(Some(&raw)) {
            proptest::prop_assert!(sanitized.chars().count() <= MAX_WISH_CHARS);
            proptest::prop_assert!(!sanitized.contains("  "));
            proptest::prop_assert_eq!(sanitized.trim(), sanitized.as_str());
        }
    }
}

#[test]
fn age_input_deserializes_untagged() {
    let integer: AgeInput = serde_json::from_str("7").expect("integer form");
    assert_eq!(integer, AgeInput::Integer(7));
    let float: AgeInput = serde_json::from_str("7.0").expect("float form");
    assert_eq!(float, AgeInput::Float(7.0));
    let text: AgeInput = serde_json::from_str("\"7\"").expect("text form");
    assert_eq!(text, AgeInput::Text("7".to_string()));
}
