// Driver module
//
// This module contains the interactive command loop around the ledger

pub mod command;
pub mod session;

// Re-export main components for easier access
pub use command::{Command, CommandError};
pub use session::Session;
