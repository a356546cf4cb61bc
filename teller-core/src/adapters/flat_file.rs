//! Flat text file account store
//!
//! Every account is written as a fixed five-line block followed by a blank
//! line:
//!
//! ```text
//! account holder: Karma
//! account number: 123456789
//! account password: 4321
//! account type: Personal
//! balance: 100.0
//!
//! ```
//!
//! Saving rewrites the whole file. There is no temp-file rename, so a crash
//! mid-write can leave a truncated file behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::domain::{format_amount, Account, AccountType};
use crate::ports::{AccountStore, LoadedAccounts};

const HOLDER: &str = "account holder";
const NUMBER: &str = "account number";
const PASSWORD: &str = "account password";
const TYPE: &str = "account type";
const BALANCE: &str = "balance";

/// Field labels in the order they appear in a block
const FIELDS: [&str; 5] = [HOLDER, NUMBER, PASSWORD, TYPE, BALANCE];

/// Account store backed by a single text file
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccountStore for FlatFileStore {
    fn load(&self) -> Result<LoadedAccounts> {
        if !self.path.exists() {
            return Ok(LoadedAccounts::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        Ok(parse_accounts(&content))
    }

    fn save(&self, accounts: &[&Account]) -> Result<()> {
        let content = render_accounts(accounts);

        let file = File::create(&self.path).map_err(|e| {
            Error::storage(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| {
                Error::storage(format!("Failed to write {}: {}", self.path.display(), e))
            })?;

        Ok(())
    }
}

/// Parse the full contents of an accounts file
///
/// Blocks are separated by blank lines. A block that does not hold exactly
/// the five expected fields is skipped with a warning naming the line it
/// starts on. Warnings never include field values.
pub fn parse_accounts(content: &str) -> LoadedAccounts {
    let mut result = LoadedAccounts::default();
    let mut block: Vec<(usize, &str)> = Vec::with_capacity(FIELDS.len());

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            flush_block(&mut block, &mut result);
        } else {
            block.push((index + 1, line));
        }
    }
    flush_block(&mut block, &mut result);

    result
}

fn flush_block(block: &mut Vec<(usize, &str)>, result: &mut LoadedAccounts) {
    let Some(&(start_line, _)) = block.first() else {
        return;
    };

    match parse_block(block) {
        Ok(account) => result.accounts.push(account),
        Err(reason) => result.warnings.push(format!(
            "Skipping malformed record at line {}: {}",
            start_line, reason
        )),
    }

    block.clear();
}

fn parse_block(lines: &[(usize, &str)]) -> std::result::Result<Account, String> {
    if lines.len() != FIELDS.len() {
        return Err(format!(
            "expected {} fields, found {}",
            FIELDS.len(),
            lines.len()
        ));
    }

    let mut values = [""; 5];
    for (slot, (&(_, line), label)) in values.iter_mut().zip(lines.iter().zip(FIELDS)) {
        *slot = field_value(line, label)?;
    }
    let [holder, number, password, account_type, balance] = values;

    if number.is_empty() {
        return Err("empty account number".to_string());
    }

    let account_type: AccountType = account_type
        .parse()
        .map_err(|_| "unknown account type".to_string())?;

    let balance: f64 = balance
        .parse()
        .map_err(|_| "balance is not a number".to_string())?;
    if !balance.is_finite() || balance < 0.0 {
        return Err("balance must be a non-negative number".to_string());
    }

    Ok(Account::new(holder, number, password, account_type).with_balance(balance))
}

/// Extract the value of a `label: value` line
fn field_value<'a>(line: &'a str, label: &str) -> std::result::Result<&'a str, String> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| format!("missing '{}' field", label))?;

    if key.trim() != label {
        return Err(format!("missing '{}' field", label));
    }

    Ok(value.trim())
}

/// Render accounts in the on-disk block format
pub fn render_accounts(accounts: &[&Account]) -> String {
    let mut out = String::new();

    for account in accounts {
        out.push_str(&format!("{}: {}\n", HOLDER, account.holder));
        out.push_str(&format!("{}: {}\n", NUMBER, account.number));
        out.push_str(&format!("{}: {}\n", PASSWORD, account.password));
        out.push_str(&format!("{}: {}\n", TYPE, account.account_type));
        out.push_str(&format!("{}: {}\n\n", BALANCE, format_amount(account.balance)));
    }

    out
}
