//! Teller Core - Business logic for the Teller banking simulator
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, AccountType, errors)
//! - **ports**: Trait definitions for external dependencies (AccountStore, Prompter)
//! - **services**: Business logic orchestration (Bank registry, status, logging)
//! - **adapters**: Concrete implementations (flat text file, in-memory)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::FlatFileStore;
use config::Config;

// Re-export commonly used types at crate root
pub use domain::{format_amount, Account, AccountType};
pub use domain::result::Error;
pub use services::{
    Bank, Credentials, EntryPoint, LoadReport, LogEntry, LogEvent, LoggingService,
    StatusSummary, SKIPPED_RECORD_EVENT,
};

/// Main context for Teller operations
///
/// Built once at startup: loads the configuration and the account registry.
/// Dropping it ends the session; every mutation has already been saved.
pub struct TellerContext {
    pub config: Config,
    pub bank: Bank,
    pub load_report: LoadReport,
    accounts_path: PathBuf,
}

impl TellerContext {
    /// Create a new Teller context
    ///
    /// `accounts_file` overrides the accounts file named in settings.json.
    pub fn new(teller_dir: &Path, accounts_file: Option<&Path>) -> Result<Self> {
        let mut config = Config::load(teller_dir)?;
        if let Some(path) = accounts_file {
            config = config.with_accounts_file(path);
        }

        let accounts_path = config.accounts_path(teller_dir);
        let store = Arc::new(FlatFileStore::new(&accounts_path));
        let (bank, load_report) = Bank::open(store).with_context(|| {
            format!("Failed to load accounts from {}", accounts_path.display())
        })?;

        Ok(Self {
            config,
            bank,
            load_report,
            accounts_path,
        })
    }

    /// Path of the accounts file backing the bank
    pub fn accounts_path(&self) -> &Path {
        &self.accounts_path
    }
}
