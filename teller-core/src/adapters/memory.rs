//! In-memory account store
//!
//! Used by tests and by anything that wants a bank without touching disk.
//! Saves can be made to fail on demand to exercise storage error handling.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::{AccountStore, LoadedAccounts};

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<Account>>,
    warnings: Vec<String>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with some accounts already "on disk"
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Self::default()
        }
    }

    /// Report these warnings on every load
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Make subsequent saves fail with a storage error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Copy of what was last saved
    pub fn snapshot(&self) -> Result<Vec<Account>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        Ok(accounts.clone())
    }
}

impl AccountStore for MemoryStore {
    fn load(&self) -> Result<LoadedAccounts> {
        Ok(LoadedAccounts {
            accounts: self.snapshot()?,
            warnings: self.warnings.clone(),
        })
    }

    fn save(&self, accounts: &[&Account]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::storage("memory store is read-only"));
        }

        let mut stored = self
            .accounts
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        *stored = accounts.iter().map(|a| (*a).clone()).collect();
        self.save_count.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
