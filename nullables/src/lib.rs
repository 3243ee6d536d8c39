//! Nullable infrastructure for deterministic testing.
//!
//! The random source and the external lookup services are abstracted behind
//! traits. This crate provides test-friendly implementations that:
//! - Return scripted or fixed values
//! - Can be made to fail on demand
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod lookup;
pub mod random;

pub use lookup::{NullReputation, NullVotingHistory};
pub use random::NullRandom;
