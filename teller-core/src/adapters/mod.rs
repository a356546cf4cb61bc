//! Adapter implementations (hexagonal architecture)
//!
//! Adapters are concrete implementations of port traits:
//! - FlatFileStore: implements AccountStore over the accounts text file
//! - MemoryStore: implements AccountStore in memory (tests)

pub mod flat_file;
pub mod memory;

pub use flat_file::FlatFileStore;
pub use memory::MemoryStore;
