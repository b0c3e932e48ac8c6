// crates/wish-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Wish Ledger Core Model
// Description: Domain model modules for the wish ledger.
// Purpose: Group identifiers, entries, validation, identity, time, and errors.
// Dependencies: crate-internal
// ============================================================================

//! ## Overview
//! Submodules composing the storage-agnostic domain model.

pub mod entry;
pub mod error;
pub mod identifiers;
pub mod identity;
pub mod time;
pub mod validate;
