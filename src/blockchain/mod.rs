// Blockchain module
//
// This module contains the ledger core:
// - Digest value and difficulty predicate
// - Block structure and proof of work search
// - Chain structure with append, removal and validation
// - Alice/Bob balance bookkeeping

pub mod balance;
pub mod block;
pub mod chain;
pub mod digest;

// Re-export main components for easier access
pub use balance::{within_genesis_bounds, Balances};
pub use block::Block;
pub use chain::{Chain, ChainError};
pub use digest::{DigestError, DigestValue};
