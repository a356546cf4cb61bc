//! Logs command - review banking activity recorded by the menu
//!
//! The event log never holds account data, so everything here is safe to
//! show: event names, error kinds and when they happened.

use anyhow::{bail, Result};
use chrono::{Local, TimeZone};
use clap::Subcommand;
use colored::Colorize;

use teller_core::services::logging::now_ms;
use teller_core::{EntryPoint, LogEntry, LoggingService};

use super::get_teller_dir;
use crate::output;
use crate::prompt::{Console, TerminalConsole};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent banking events, newest first
    Recent {
        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only failed operations and skipped account records
        #[arg(long)]
        failures: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count events by name and failures by error kind
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove events older than a number of days
    Prune {
        #[arg(long, default_value = "30")]
        days: i64,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let teller_dir = get_teller_dir()?;
    let service =
        LoggingService::new(&teller_dir, EntryPoint::Command, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::Recent {
            limit,
            failures,
            json,
        } => recent(&service, limit, failures, json),
        LogsCommands::Summary { json } => summary(&service, json),
        LogsCommands::Prune { days, yes } => prune(&service, days, yes),
    }
}

fn recent(service: &LoggingService, limit: usize, failures: bool, json: bool) -> Result<()> {
    let entries = if failures {
        service.get_failures(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No banking activity recorded yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["When", "From", "Event", "Outcome"]);
    for entry in &entries {
        table.add_row(vec![
            local_time(entry.timestamp),
            entry.entry_point.clone(),
            entry.event.clone(),
            outcome(entry),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn summary(service: &LoggingService, json: bool) -> Result<()> {
    let events = service.event_counts()?;
    let failures = service.failure_kinds()?;

    if json {
        let summary = serde_json::json!({
            "events": events,
            "failures": failures,
            "log_path": service.log_path().to_string_lossy(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let total: u64 = events.values().sum();
    println!("{}", format!("{} events recorded", total).bold());
    println!();

    if !events.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Event", "Count"]);
        for (event, count) in &events {
            table.add_row(vec![event.clone(), count.to_string()]);
        }
        println!("{}", table);
    }

    if failures.is_empty() {
        output::info("No failed operations.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Failure", "Count"]);
        for (kind, count) in &failures {
            table.add_row(vec![kind.clone(), count.to_string()]);
        }
        println!("{}", table);
    }

    println!();
    println!("{}", format!("Log file: {}", service.log_path().display()).dimmed());

    Ok(())
}

fn prune(service: &LoggingService, days: i64, yes: bool) -> Result<()> {
    if days < 0 {
        bail!("--days must not be negative");
    }

    if !yes {
        if atty::isnt(atty::Stream::Stdin) {
            bail!("Refusing to prune without a terminal; pass --yes to confirm");
        }
        let question = format!("Remove banking events older than {} days?", days);
        if !TerminalConsole.confirm(&question)? {
            println!("Nothing removed.");
            return Ok(());
        }
    }

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let removed = service.delete_before(now_ms() - days.saturating_mul(DAY_MS))?;
    output::info(&format!("Removed {} events", removed));

    Ok(())
}

/// What happened, without any account data
fn outcome(entry: &LogEntry) -> String {
    if entry.is_failure() {
        format!("failed: {}", entry.failure_kind())
    } else if let Some(command) = &entry.command {
        format!("ran '{}'", command)
    } else {
        "ok".to_string()
    }
}

fn local_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teller_core::SKIPPED_RECORD_EVENT;

    fn entry(event: &str, error: Option<&str>, command: Option<&str>) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: 0,
            entry_point: "menu".to_string(),
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: event.to_string(),
            command: command.map(str::to_string),
            error_message: error.map(str::to_string),
            error_details: None,
        }
    }

    #[test]
    fn test_outcome_names_failure_kind() {
        let failed = entry("transfer_failed", Some("insufficient_funds"), None);
        assert_eq!(outcome(&failed), "failed: insufficient_funds");

        let skipped = entry(SKIPPED_RECORD_EVENT, Some("Skipping malformed record"), None);
        assert_eq!(outcome(&skipped), "failed: malformed_record");
    }

    #[test]
    fn test_outcome_of_successful_events() {
        assert_eq!(outcome(&entry("deposit_completed", None, None)), "ok");
        assert_eq!(
            outcome(&entry("command_executed", None, Some("status"))),
            "ran 'status'"
        );
    }
}
