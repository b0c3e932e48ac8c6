// crates/wish-ledger-core/tests/identity.rs
// ============================================================================
// Module: Identity Derivation Tests
// Description: Verifies identity hash purity and fallback scope stability.
// ============================================================================
//! ## Overview
//! Ensures the identity hash is deterministic, partition-sensitive to every
//! input component (including the absent-age case), and that fallback scope
//! derivation is stable across invocations.

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

use wish_ledger_core::ScopeId;
use wish_ledger_core::child_hash;
use wish_ledger_core::derive_fallback_scope;
use wish_ledger_core::format_utc_iso;
use wish_ledger_core::humanize_timestamp;

fn scope(value: &str) -> ScopeId {
    ScopeId::new(value.to_string())
}

#[test]
fn child_hash_is_deterministic() {
    let first = child_hash("Alex", Some(7), &scope("scope-a"));
    let second = child_hash("Alex", Some(7), &scope("scope-a"));
    assert_eq!(first, second);
}

#[test]
fn child_hash_is_case_insensitive_on_name() {
    let lower = child_hash("alex", Some(7), &scope("scope-a"));
    let mixed = child_hash("Alex", Some(7), &scope("scope-a"));
    assert_eq!(lower, mixed);
}

#[test]
fn child_hash_partitions_absent_age_from_specific_age() {
    let unknown_age = child_hash("Alex", None, &scope("scope-a"));
    let aged_seven = child_hash("Alex", Some(7), &scope("scope-a"));
    assert_ne!(unknown_age, aged_seven);
}

#[test]
fn child_hash_changes_with_every_component() {
    let base = child_hash("Alex", Some(7), &scope("scope-a"));
    assert_ne!(base, child_hash("Alexa", Some(7), &scope("scope-a")));
    assert_ne!(base, child_hash("Alex", Some(8), &scope("scope-a")));
    assert_ne!(base, child_hash("Alex", Some(7), &scope("scope-b")));
}

#[test]
fn child_hash_renders_as_fixed_length_hex() {
    let hash = child_hash("Alex", Some(7), &scope("scope-a"));
    assert_eq!(hash.as_str().len(), 64);
    assert!(hash.as_str().bytes().all(|byte| byte.is_ascii_hexdigit()));
}

#[test]
fn fallback_scope_is_stable_per_seed() {
    let from_host = derive_fallback_scope(Some("host-123"));
    assert_eq!(from_host, derive_fallback_scope(Some("host-123")));
    assert_ne!(from_host, derive_fallback_scope(Some("host-456")));
}

#[test]
fn fallback_scope_uses_system_name_when_host_absent() {
    let unseeded = derive_fallback_scope(None);
    let blank_seed = derive_fallback_scope(Some("  "));
    assert_eq!(unseeded, blank_seed);
    assert_eq!(unseeded, derive_fallback_scope(None));
}

#[test]
fn timestamps_render_at_second_precision() {
    let moment = time::macros::datetime!(2026-01-05 09:07:03 UTC);
    assert_eq!(format_utc_iso(moment), "2026-01-05T09:07:03Z");
}

#[test]
fn humanize_drops_seconds_and_marker() {
    assert_eq!(humanize_timestamp("2026-01-05T09:07:03Z"), "2026-01-05 09:07");
}

#[test]
fn humanize_falls_back_to_raw_value() {
    assert_eq!(humanize_timestamp("not-a-timestamp"), "not-a-timestamp");
}
