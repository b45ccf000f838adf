//! Nullable infrastructure for deterministic testing.
//!
//! The host ledger's clock and keyed state are abstracted behind
//! [`dpos_types::Clock`] and [`dpos_store::StateStore`]. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
