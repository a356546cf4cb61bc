//! Account store port - persistence abstraction

use crate::domain::result::Result;
use crate::domain::Account;

/// Result of reading every persisted account
#[derive(Debug, Default)]
pub struct LoadedAccounts {
    pub accounts: Vec<Account>,
    /// Human readable notes about records that were skipped
    pub warnings: Vec<String>,
}

/// Persistence abstraction for the account registry
///
/// Implementations always read and write the complete set of accounts;
/// there is no incremental update.
pub trait AccountStore: Send + Sync {
    /// Read all accounts. A missing backing file is an empty store, not an error.
    fn load(&self) -> Result<LoadedAccounts>;

    /// Replace the stored accounts with `accounts`, in the given order
    fn save(&self, accounts: &[&Account]) -> Result<()>;
}
