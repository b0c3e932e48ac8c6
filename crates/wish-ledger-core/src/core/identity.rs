// crates/wish-ledger-core/src/core/identity.rs
// ============================================================================
// Module: Wish Ledger Identity Derivation
// Description: Deterministic pseudonymous identity and fallback scope digests.
// Purpose: Partition entries by individual without storing reversible identity.
// Dependencies: sha2, crate::core::identifiers
// ============================================================================

//! ## Overview
//! The identity hash is a one-way SHA-256 digest over the lowercased
//! normalized name, the age rendered as a decimal string (empty when absent),
//! and the owning scope, joined by a literal separator. Recomputing the hash
//! for the same triple always yields the same value; an absent age is a
//! distinct partition from any specific age for the same name. The same
//! digest primitive derives a stable fallback scope when deployments omit a
//! scope identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

use crate::core::identifiers::ChildHash;
use crate::core::identifiers::ScopeId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// System name used as the last-resort seed for fallback scope derivation.
pub const SYSTEM_NAME: &str = "wish_ledger";

/// Literal separator between identity hash components.
const IDENTITY_SEPARATOR: char = '|';

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Computes the pseudonymous identity hash for one individual in one scope.
///
/// Pure and side-effect free: equal `(normalized_name, age, scope)` triples
/// always produce equal hashes, and changing any component changes the hash.
#[must_use]
pub fn child_hash(normalized_name: &str, age: Option<u8>, scope: &ScopeId) -> ChildHash {
    let age_part = age.map(|value| value.to_string()).unwrap_or_default();
    let base = format!(
        "{}{IDENTITY_SEPARATOR}{age_part}{IDENTITY_SEPARATOR}{}",
        normalized_name.to_lowercase(),
        scope.as_str()
    );
    ChildHash::new(hex_digest(base.as_bytes()))
}

/// Derives a stable fallback scope from a host instance identifier.
///
/// When no host identifier is available the system's own name seeds the
/// digest, so repeated instantiations of the same deployment converge on the
/// same scope.
#[must_use]
pub fn derive_fallback_scope(host_instance_id: Option<&str>) -> ScopeId {
    let seed = host_instance_id.filter(|value| !value.trim().is_empty()).unwrap_or(SYSTEM_NAME);
    ScopeId::new(hex_digest(seed.as_bytes()))
}

/// Returns the lowercase hex SHA-256 digest of the input bytes.
fn hex_digest(input: &[u8]) -> String {
    let digest = Sha256::digest(input);
    let mut rendered = String::with_capacity(digest.len() * 2);
    for byte in digest {
        rendered.push_str(&format!("{byte:02x}"));
    }
    rendered
}
