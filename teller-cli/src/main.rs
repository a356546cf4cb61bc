//! Teller CLI - a banking simulator in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;
mod prompt;

use commands::{logs, menu, status};

/// Teller - open accounts, move money, all from a text menu
///
/// Run without a subcommand to start the interactive banking menu.
#[derive(Parser)]
#[command(name = "teller", version, about, long_about = None)]
struct Cli {
    /// Accounts file (relative paths resolve against TELLER_DIR or the current directory)
    #[arg(long, env = "TELLER_ACCOUNTS_FILE", global = true)]
    accounts_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of every account
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review banking activity from the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let accounts_file = cli.accounts_file.as_deref();

    match cli.command {
        None => menu::run(accounts_file),
        Some(Commands::Status { json }) => status::run(accounts_file, json),
        Some(Commands::Logs { command }) => logs::run(command),
    }
}
