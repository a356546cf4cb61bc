//! Configuration management
//!
//! Optional settings.json in the teller directory:
//! ```json
//! {
//!   "bank": { "name": "Bank of CST", "currencyLabel": "Nu." },
//!   "accountsFile": "accounts.txt"
//! }
//! ```
//! Every key is optional. A missing or unparsable file means defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_BANK_NAME: &str = "Bank of CST";
const DEFAULT_CURRENCY_LABEL: &str = "Nu.";
const DEFAULT_ACCOUNTS_FILE: &str = "accounts.txt";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    bank: BankSettings,
    #[serde(default)]
    accounts_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankSettings {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    currency_label: Option<String>,
}

/// Teller configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bank_name: String,
    pub currency_label: String,
    /// Accounts file; relative paths resolve against the teller directory
    pub accounts_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_name: DEFAULT_BANK_NAME.to_string(),
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            accounts_file: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
        }
    }
}

impl Config {
    /// Load config from the teller directory
    pub fn load(teller_dir: &Path) -> Result<Self> {
        let settings_path = teller_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let defaults = Self::default();
        Ok(Self {
            bank_name: raw.bank.name.unwrap_or(defaults.bank_name),
            currency_label: raw.bank.currency_label.unwrap_or(defaults.currency_label),
            accounts_file: raw.accounts_file.unwrap_or(defaults.accounts_file),
        })
    }

    /// Use a different accounts file (command line / environment override)
    pub fn with_accounts_file(mut self, accounts_file: impl Into<PathBuf>) -> Self {
        self.accounts_file = accounts_file.into();
        self
    }

    /// Resolve the accounts file against the teller directory
    pub fn accounts_path(&self, teller_dir: &Path) -> PathBuf {
        if self.accounts_file.is_absolute() {
            self.accounts_file.clone()
        } else {
            teller_dir.join(&self.accounts_file)
        }
    }

    /// Format an amount with the configured currency label, e.g. `Nu.100.0`
    pub fn format_money(&self, amount: f64) -> String {
        format!("{}{}", self.currency_label, crate::domain::format_amount(amount))
    }
}
