//! Bank service - the account registry
//!
//! Owns every account in memory, keyed by account number, and writes the
//! complete set back through the store after each mutation. A mutation whose
//! save fails is rolled back in memory, so the registry always matches the
//! last successful save.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountType};
use crate::ports::{AccountStore, Prompter};

/// Account numbers are 9-digit numerals
const ACCOUNT_NUMBER_RANGE: RangeInclusive<u32> = 100_000_000..=999_999_999;

/// Passwords are 4-digit numerals
const PASSWORD_RANGE: RangeInclusive<u32> = 1_000..=9_999;

/// Credentials handed to the holder when an account is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub number: String,
    pub password: String,
}

/// Outcome of loading the registry from its store
#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub warnings: Vec<String>,
}

/// The account registry
pub struct Bank {
    store: Arc<dyn AccountStore>,
    accounts: BTreeMap<String, Account>,
}

impl Bank {
    /// Create an empty bank on top of `store` without reading it
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            accounts: BTreeMap::new(),
        }
    }

    /// Create a bank and load whatever the store already holds
    pub fn open(store: Arc<dyn AccountStore>) -> Result<(Self, LoadReport)> {
        let mut bank = Self::new(store);
        let report = bank.load_accounts()?;
        Ok((bank, report))
    }

    // === Persistence ===

    /// Replace the in-memory registry with the store's contents
    pub fn load_accounts(&mut self) -> Result<LoadReport> {
        let loaded = self.store.load()?;
        let mut warnings = loaded.warnings;

        self.accounts.clear();
        for account in loaded.accounts {
            if self.accounts.insert(account.number.clone(), account).is_some() {
                warnings.push(
                    "Duplicate account number found; keeping the later record".to_string(),
                );
            }
        }

        Ok(LoadReport {
            loaded: self.accounts.len(),
            warnings,
        })
    }

    /// Write every account back to the store in account-number order
    pub fn save_accounts(&self) -> Result<()> {
        let accounts: Vec<&Account> = self.accounts.values().collect();
        self.store.save(&accounts)
    }

    fn persist_or_rollback(
        &mut self,
        rollback: impl FnOnce(&mut BTreeMap<String, Account>),
    ) -> Result<()> {
        if let Err(e) = self.save_accounts() {
            rollback(&mut self.accounts);
            return Err(e);
        }
        Ok(())
    }

    // === Accounts ===

    /// Open a new zero-balance account, asking the prompter for the holder name
    pub fn create_account(
        &mut self,
        account_type: AccountType,
        prompter: &mut dyn Prompter,
    ) -> Result<Credentials> {
        let holder = prompter.holder_name()?;
        self.open_account(holder.trim(), account_type, &mut rand::thread_rng())
    }

    /// Open a new zero-balance account with credentials drawn from `rng`
    ///
    /// Account numbers are redrawn until one is free, so numbers stay unique.
    pub fn open_account<R: Rng>(
        &mut self,
        holder: &str,
        account_type: AccountType,
        rng: &mut R,
    ) -> Result<Credentials> {
        let number = loop {
            let candidate = rng.gen_range(ACCOUNT_NUMBER_RANGE).to_string();
            if !self.accounts.contains_key(&candidate) {
                break candidate;
            }
        };
        let password = rng.gen_range(PASSWORD_RANGE).to_string();

        let account = Account::new(holder, number.clone(), password.clone(), account_type);
        self.accounts.insert(number.clone(), account);

        let key = number.clone();
        self.persist_or_rollback(move |accounts| {
            accounts.remove(&key);
        })?;

        Ok(Credentials { number, password })
    }

    /// Look up an account by number and check its password
    pub fn login(&self, number: &str, password: &str) -> Result<&Account> {
        let account = self.account(number).ok_or_else(|| Error::not_found(number))?;
        if !account.verify_password(password) {
            return Err(Error::InvalidPassword);
        }
        Ok(account)
    }

    /// Remove an account and persist the registry without it
    pub fn delete_account(&mut self, number: &str) -> Result<Account> {
        let removed = self
            .accounts
            .remove(number)
            .ok_or_else(|| Error::not_found(number))?;

        let restored = removed.clone();
        self.persist_or_rollback(move |accounts| {
            accounts.insert(restored.number.clone(), restored);
        })?;

        Ok(removed)
    }

    pub fn account(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    /// All accounts in account-number order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    // === Money ===

    pub fn check_balance(&self, number: &str) -> Result<f64> {
        self.account(number)
            .map(Account::check_balance)
            .ok_or_else(|| Error::not_found(number))
    }

    /// Deposit into an account and persist. Returns the new balance.
    pub fn deposit(&mut self, number: &str, amount: f64) -> Result<f64> {
        let account = self
            .accounts
            .get_mut(number)
            .ok_or_else(|| Error::not_found(number))?;

        let previous = account.balance;
        if !account.deposit(amount) {
            return Err(Error::InvalidAmount(amount));
        }
        let balance = account.balance;

        self.persist_or_rollback(restore_balance(number, previous))?;
        Ok(balance)
    }

    /// Withdraw from an account and persist. Returns the new balance.
    pub fn withdraw(&mut self, number: &str, amount: f64) -> Result<f64> {
        let account = self
            .accounts
            .get_mut(number)
            .ok_or_else(|| Error::not_found(number))?;

        let previous = account.balance;
        if !account.withdraw(amount) {
            return Err(rejected_withdrawal(account, amount));
        }
        let balance = account.balance;

        self.persist_or_rollback(restore_balance(number, previous))?;
        Ok(balance)
    }

    /// Move money between two accounts after the sender re-confirms their password
    ///
    /// The destination must exist before the sender is asked anything. The
    /// source is debited before the destination is credited, and the registry
    /// is saved once, after both.
    pub fn transfer_money(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
        prompter: &mut dyn Prompter,
    ) -> Result<()> {
        if !self.accounts.contains_key(to) {
            return Err(Error::not_found(to));
        }
        if !self.accounts.contains_key(from) {
            return Err(Error::not_found(from));
        }

        let confirmation = prompter.confirm_password()?;

        let source = self
            .accounts
            .get_mut(from)
            .ok_or_else(|| Error::not_found(from))?;
        if !source.verify_password(&confirmation) {
            return Err(Error::InvalidPassword);
        }

        let source_before = source.balance;
        if !source.withdraw(amount) {
            return Err(rejected_withdrawal(source, amount));
        }

        let destination = self
            .accounts
            .get_mut(to)
            .ok_or_else(|| Error::not_found(to))?;
        let destination_before = destination.balance;
        if !destination.deposit(amount) {
            if let Some(source) = self.accounts.get_mut(from) {
                source.balance = source_before;
            }
            return Err(Error::InvalidAmount(amount));
        }

        let (from, to) = (from.to_string(), to.to_string());
        self.persist_or_rollback(move |accounts| {
            if let Some(account) = accounts.get_mut(&to) {
                account.balance = destination_before;
            }
            if let Some(account) = accounts.get_mut(&from) {
                account.balance = source_before;
            }
        })
    }

    /// Sum of every balance held by the bank
    pub fn total_balance(&self) -> f64 {
        self.accounts.values().map(Account::check_balance).sum()
    }
}

fn restore_balance(number: &str, previous: f64) -> impl FnOnce(&mut BTreeMap<String, Account>) {
    let number = number.to_string();
    move |accounts| {
        if let Some(account) = accounts.get_mut(&number) {
            account.balance = previous;
        }
    }
}

fn rejected_withdrawal(account: &Account, amount: f64) -> Error {
    if amount > 0.0 {
        Error::InsufficientFunds {
            balance: account.balance,
            requested: amount,
        }
    } else {
        Error::InvalidAmount(amount)
    }
}
