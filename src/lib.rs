//! Two-party proof-of-work ledger.
//!
//! Alice and Bob exchange signed amounts; every transfer is sealed into a
//! block whose SHA-256 digest starts with three zero bytes and references the
//! digest of the block before it.

pub mod blockchain;
pub mod config;
pub mod driver;
