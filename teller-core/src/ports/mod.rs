//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The bank depends
//! only on these traits, not on the file format or the terminal.

mod prompter;
mod store;

pub use prompter::Prompter;
pub use store::{AccountStore, LoadedAccounts};
