//! CLI command implementations

pub mod logs;
pub mod menu;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use teller_core::{EntryPoint, LogEvent, LoggingService, TellerContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(entry_point: EntryPoint) -> Option<LoggingService> {
    let teller_dir = get_teller_dir().ok()?;
    std::fs::create_dir_all(&teller_dir).ok()?;
    LoggingService::new(&teller_dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the teller directory from the environment, defaulting to the current directory
pub fn get_teller_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TELLER_DIR") {
        Ok(PathBuf::from(dir))
    } else {
        std::env::current_dir().context("Could not determine the current directory")
    }
}

/// Build the teller context, loading every account
pub fn get_context(accounts_file: Option<&Path>) -> Result<TellerContext> {
    let teller_dir = get_teller_dir()?;

    std::fs::create_dir_all(&teller_dir)
        .with_context(|| format!("Failed to create teller directory: {:?}", teller_dir))?;

    TellerContext::new(&teller_dir, accounts_file).context("Failed to initialize teller context")
}
