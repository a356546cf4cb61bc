//! Core domain entities
//!
//! Pure data structures with their validation rules - no I/O.

mod account;
pub mod result;

pub use account::{format_amount, Account, AccountType};
