//! Integration tests for teller-core
//!
//! These tests drive the Bank through the real flat file store on disk.
//! The terminal is replaced by a scripted prompter.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use teller_core::adapters::FlatFileStore;
use teller_core::domain::result::Result;
use teller_core::ports::Prompter;
use teller_core::{Account, AccountType, Bank, Error, TellerContext};

// ============================================================================
// Test Helpers
// ============================================================================

/// Prompter that answers from queues of scripted replies
#[derive(Default)]
struct ScriptedPrompter {
    names: Vec<String>,
    passwords: Vec<String>,
}

impl ScriptedPrompter {
    fn names(names: &[&str]) -> Self {
        Self {
            names: names.iter().rev().map(|s| s.to_string()).collect(),
            passwords: Vec::new(),
        }
    }

    fn passwords(passwords: &[&str]) -> Self {
        Self {
            names: Vec::new(),
            passwords: passwords.iter().rev().map(|s| s.to_string()).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn holder_name(&mut self) -> Result<String> {
        self.names
            .pop()
            .ok_or_else(|| Error::prompt("no scripted name left"))
    }

    fn confirm_password(&mut self) -> Result<String> {
        self.passwords
            .pop()
            .ok_or_else(|| Error::prompt("no scripted password left"))
    }
}

fn open_bank(path: &Path) -> Bank {
    let (bank, report) =
        Bank::open(Arc::new(FlatFileStore::new(path))).expect("Failed to open bank");
    assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
    bank
}

fn by_number(bank: &Bank) -> HashMap<String, Account> {
    bank.accounts()
        .map(|a| (a.number.clone(), a.clone()))
        .collect()
}

// ============================================================================
// Persistence Round Trip
// ============================================================================

#[test]
fn test_save_then_load_reproduces_accounts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accounts.txt");

    let mut bank = open_bank(&path);
    let mut prompter = ScriptedPrompter::names(&["Karma", "Dorji Enterprises", "Pema"]);
    let karma = bank.create_account(AccountType::Personal, &mut prompter).unwrap();
    let dorji = bank.create_account(AccountType::Business, &mut prompter).unwrap();
    bank.create_account(AccountType::Personal, &mut prompter).unwrap();

    bank.deposit(&karma.number, 100.0).unwrap();
    bank.deposit(&dorji.number, 0.1).unwrap();
    bank.deposit(&dorji.number, 0.2).unwrap();

    let reopened = open_bank(&path);
    assert_eq!(by_number(&reopened), by_number(&bank));
    assert_eq!(
        reopened.account(&dorji.number).unwrap().balance,
        0.1 + 0.2
    );
    assert_eq!(
        reopened.account(&dorji.number).unwrap().account_type,
        AccountType::Business
    );
}

#[test]
fn test_every_mutation_is_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accounts.txt");

    let mut bank = open_bank(&path);
    let mut names = ScriptedPrompter::names(&["Alice", "Bob"]);
    let alice = bank.create_account(AccountType::Personal, &mut names).unwrap();
    let bob = bank.create_account(AccountType::Personal, &mut names).unwrap();
    assert_eq!(open_bank(&path).len(), 2);

    bank.deposit(&alice.number, 60.0).unwrap();
    assert_eq!(open_bank(&path).check_balance(&alice.number).unwrap(), 60.0);

    let mut confirm = ScriptedPrompter::passwords(&[alice.password.as_str()]);
    bank.transfer_money(&alice.number, &bob.number, 60.0, &mut confirm)
        .unwrap();
    let on_disk = open_bank(&path);
    assert_eq!(on_disk.check_balance(&alice.number).unwrap(), 0.0);
    assert_eq!(on_disk.check_balance(&bob.number).unwrap(), 60.0);

    bank.withdraw(&bob.number, 15.5).unwrap();
    assert_eq!(open_bank(&path).check_balance(&bob.number).unwrap(), 44.5);

    bank.delete_account(&alice.number).unwrap();
    let on_disk = open_bank(&path);
    assert!(on_disk.account(&alice.number).is_none());
    assert_eq!(on_disk.len(), 1);
}

#[test]
fn test_wrong_confirmation_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accounts.txt");

    let mut bank = open_bank(&path);
    let mut names = ScriptedPrompter::names(&["Alice", "Bob"]);
    let alice = bank.create_account(AccountType::Personal, &mut names).unwrap();
    let bob = bank.create_account(AccountType::Personal, &mut names).unwrap();
    bank.deposit(&alice.number, 60.0).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let wrong = if alice.password == "1000" { "1001" } else { "1000" };
    let mut confirm = ScriptedPrompter::passwords(&[wrong]);
    let err = bank
        .transfer_money(&alice.number, &bob.number, 60.0, &mut confirm)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidPassword));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

// ============================================================================
// Existing Files
// ============================================================================

#[test]
fn test_reads_existing_accounts_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accounts.txt");
    std::fs::write(
        &path,
        "account holder: Sonam\n\
         account number: 482913570\n\
         account password: 5821\n\
         account type: Business\n\
         balance: 1250.5\n\
         \n\
         account holder: Tashi\n\
         account number: 100000001\n\
         account password: 1000\n\
         account type: Personal\n\
         balance: 0.0\n\
         \n",
    )
    .unwrap();

    let bank = open_bank(&path);
    assert_eq!(bank.len(), 2);

    let sonam = bank.login("482913570", "5821").unwrap();
    assert_eq!(sonam.holder, "Sonam");
    assert_eq!(sonam.account_type, AccountType::Business);
    assert_eq!(sonam.balance, 1250.5);

    // Rewriting sorts by account number
    bank.save_accounts().unwrap();
    let rewritten = std::fs::read_to_string(&path).unwrap();
    assert!(rewritten.starts_with("account holder: Tashi\n"));
    assert!(rewritten.ends_with("balance: 1250.5\n\n"));
}

#[test]
fn test_malformed_records_are_reported_and_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("accounts.txt");
    std::fs::write(
        &path,
        "account holder: Broken\n\
         account number 482913570\n\
         account password: 5821\n\
         account type: Business\n\
         balance: 1250.5\n\
         \n\
         account holder: Tashi\n\
         account number: 100000001\n\
         account password: 1000\n\
         account type: Personal\n\
         balance: 0.0\n",
    )
    .unwrap();

    let (bank, report) = Bank::open(Arc::new(FlatFileStore::new(&path))).unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("line 1"));
    assert!(bank.account("100000001").is_some());
}

// ============================================================================
// Storage Failures
// ============================================================================

#[test]
fn test_unwritable_file_aborts_operation() {
    let temp_dir = TempDir::new().unwrap();
    // A directory where the accounts file should be makes every save fail
    let path = temp_dir.path().join("accounts.txt");
    std::fs::create_dir(&path).unwrap();

    let mut bank = Bank::new(Arc::new(FlatFileStore::new(&path)));
    let mut prompter = ScriptedPrompter::names(&["Karma"]);

    let err = bank
        .create_account(AccountType::Personal, &mut prompter)
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(err.is_recoverable());
    assert!(bank.is_empty());
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn test_context_uses_settings_and_override() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"accountsFile": "bank.txt"}"#,
    )
    .unwrap();

    let ctx = TellerContext::new(temp_dir.path(), None).unwrap();
    assert_eq!(ctx.accounts_path(), temp_dir.path().join("bank.txt"));
    assert!(ctx.bank.is_empty());

    let ctx = TellerContext::new(temp_dir.path(), Some(Path::new("other.txt"))).unwrap();
    assert_eq!(ctx.accounts_path(), temp_dir.path().join("other.txt"));
    assert_eq!(ctx.config.bank_name, "Bank of CST");
}

#[test]
fn test_context_fails_on_unreadable_accounts_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("accounts.txt"), [0xff, 0xfe, 0x00]).unwrap();

    assert!(TellerContext::new(temp_dir.path(), None).is_err());
}
