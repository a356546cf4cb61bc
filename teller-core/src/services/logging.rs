//! Logging service - structured event logging to a JSON lines file
//!
//! Provides a privacy-safe event log stored in logs.jsonl next to the
//! accounts file. No user data (holder names, account numbers, passwords,
//! balances) is ever logged.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const LOG_FILENAME: &str = "logs.jsonl";

/// Event logged for each accounts-file block skipped at load
pub const SKIPPED_RECORD_EVENT: &str = "record_skipped";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    let timestamp = now_ms() as u64;

    // Lower 16 bits hold the counter (65536 unique IDs per millisecond)
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Current unix timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// How the application was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    /// Interactive banking menu
    Menu,
    /// One-shot subcommand (status, logs)
    Command,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Menu => "menu",
            EntryPoint::Command => "command",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    /// Create a new log event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    /// Set the command context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set error details (additional context)
    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A log entry as stored on disk, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl LogEntry {
    /// A failed banking operation or a record skipped while loading
    pub fn is_failure(&self) -> bool {
        self.event.ends_with("_failed") || self.event == SKIPPED_RECORD_EVENT
    }

    /// Error kind recorded with a failure
    ///
    /// Skipped records log the loader warning rather than a kind.
    pub fn failure_kind(&self) -> &str {
        if self.event == SKIPPED_RECORD_EVENT {
            return "malformed_record";
        }
        self.error_message.as_deref().unwrap_or("unknown")
    }
}

/// Service for structured event logging
pub struct LoggingService {
    log_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Create a new logging service writing to logs.jsonl in `teller_dir`
    ///
    /// The file is created lazily on the first logged event.
    pub fn new(
        teller_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        if !teller_dir.is_dir() {
            anyhow::bail!("Log directory does not exist: {}", teller_dir.display());
        }

        Ok(Self {
            log_path: teller_dir.join(LOG_FILENAME),
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    /// Log an event
    ///
    /// The entry_point, app_version, and platform are added from the
    /// service configuration.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: generate_id(),
            timestamp: now_ms(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            command: event.command,
            error_message: event.error_message,
            error_details: event.error_details,
        };

        let line = serde_json::to_string(&entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file {}", self.log_path.display()))?;
        writeln!(file, "{}", line)?;

        Ok(())
    }

    /// Log a CLI command execution
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    /// Raw lines of the log file, blank lines dropped
    fn read_lines(&self) -> Result<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read log file {}", self.log_path.display()))?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// All entries in the order they were written. Unreadable lines are skipped.
    fn read_entries(&self) -> Result<Vec<LogEntry>> {
        Ok(self
            .read_lines()?
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }

    /// Most recent entries first, up to `limit`
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self.read_entries()?.into_iter().rev().take(limit).collect())
    }

    /// Most recent failed operations and skipped records, up to `limit`
    pub fn get_failures(&self, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self
            .read_entries()?
            .into_iter()
            .rev()
            .filter(LogEntry::is_failure)
            .take(limit)
            .collect())
    }

    /// Number of entries per event name
    pub fn event_counts(&self) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for entry in self.read_entries()? {
            *counts.entry(entry.event).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Number of failures per error kind
    pub fn failure_kinds(&self) -> Result<BTreeMap<String, u64>> {
        let mut kinds = BTreeMap::new();
        for entry in self.read_entries()?.into_iter().filter(LogEntry::is_failure) {
            let kind = entry.failure_kind().to_string();
            *kinds.entry(kind).or_insert(0) += 1;
        }
        Ok(kinds)
    }

    /// Get the total number of log entries
    pub fn count(&self) -> Result<u64> {
        Ok(self.read_entries()?.len() as u64)
    }

    /// Delete entries older than the given timestamp (unix ms)
    ///
    /// Lines that do not parse as entries have no timestamp and are kept.
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let lines = self.read_lines()?;
        let before = lines.len();

        let kept: Vec<&String> = lines
            .iter()
            .filter(|line| match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => entry.timestamp >= timestamp_ms,
                Err(_) => true,
            })
            .collect();

        if kept.len() < before {
            let mut content = String::new();
            for line in &kept {
                content.push_str(line);
                content.push('\n');
            }
            fs::write(&self.log_path, content)
                .with_context(|| format!("Failed to rewrite {}", self.log_path.display()))?;
        }

        Ok((before - kept.len()) as u64)
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        assert_eq!(service.log_path(), dir.path().join("logs.jsonl"));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(LoggingService::new(&dir.path().join("nope"), EntryPoint::Menu, "1.0.0").is_err());
    }

    #[test]
    fn test_log_event() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        service.log(LogEvent::new("account_created")).unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "account_created");
        assert_eq!(entries[0].entry_point, "menu");
        assert_eq!(entries[0].app_version, "1.0.0");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Command, "1.0.0").unwrap();

        service.log(LogEvent::new("first")).unwrap();
        service.log(LogEvent::new("second")).unwrap();
        service.log_command("status").unwrap();

        let entries = service.get_recent(2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "command_executed");
        assert_eq!(entries[0].command, Some("status".to_string()));
        assert_eq!(entries[1].event, "second");
    }

    #[test]
    fn test_failures_cover_failed_operations_and_skipped_records() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        let skipped = LogEvent::new(SKIPPED_RECORD_EVENT).with_error("Skipping record at line 1");
        service.log(skipped).unwrap();
        service.log(LogEvent::new("login_succeeded")).unwrap();
        service
            .log(LogEvent::new("deposit_failed").with_error("invalid_amount"))
            .unwrap();
        service
            .log(
                LogEvent::new("transfer_failed")
                    .with_error("storage")
                    .with_error_details("Failed to open accounts.txt"),
            )
            .unwrap();

        let failures = service.get_failures(10).unwrap();
        let events: Vec<&str> = failures.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, ["transfer_failed", "deposit_failed", SKIPPED_RECORD_EVENT]);
        assert_eq!(failures[0].failure_kind(), "storage");
        assert_eq!(failures[2].failure_kind(), "malformed_record");

        assert_eq!(service.get_failures(1).unwrap().len(), 1);
    }

    #[test]
    fn test_event_counts_and_failure_kinds() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        service.log(LogEvent::new("deposit_completed")).unwrap();
        service.log(LogEvent::new("deposit_completed")).unwrap();
        service
            .log(LogEvent::new("withdrawal_failed").with_error("insufficient_funds"))
            .unwrap();
        service
            .log(LogEvent::new("transfer_failed").with_error("insufficient_funds"))
            .unwrap();
        service
            .log(LogEvent::new("login_failed").with_error("invalid_password"))
            .unwrap();

        let counts = service.event_counts().unwrap();
        assert_eq!(counts.get("deposit_completed"), Some(&2));
        assert_eq!(counts.get("login_failed"), Some(&1));
        assert_eq!(counts.len(), 4);

        let kinds = service.failure_kinds().unwrap();
        assert_eq!(kinds.get("insufficient_funds"), Some(&2));
        assert_eq!(kinds.get("invalid_password"), Some(&1));
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        service.log(LogEvent::new("good")).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(service.log_path())
            .unwrap();
        writeln!(file, "{{not json").unwrap();

        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_count_and_delete() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        service.log(LogEvent::new("event1")).unwrap();
        service.log(LogEvent::new("event2")).unwrap();
        service.log(LogEvent::new("event3")).unwrap();

        assert_eq!(service.count().unwrap(), 3);

        // Nothing is older than a timestamp in the past
        assert_eq!(service.delete_before(0).unwrap(), 0);
        assert_eq!(service.count().unwrap(), 3);

        // Delete all logs (using future timestamp)
        let deleted = service.delete_before(now_ms() + 1000).unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_keeps_unparseable_lines() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Menu, "1.0.0").unwrap();

        service.log(LogEvent::new("old")).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(service.log_path())
            .unwrap();
        writeln!(file, "{{half written").unwrap();

        assert_eq!(service.delete_before(now_ms() + 1000).unwrap(), 1);

        let content = fs::read_to_string(service.log_path()).unwrap();
        assert_eq!(content, "{half written\n");
        assert_eq!(service.count().unwrap(), 0);
    }
}
