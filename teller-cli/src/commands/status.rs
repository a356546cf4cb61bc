//! Status command - show account summary

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use teller_core::services::status::get_status;
use teller_core::EntryPoint;

use super::{get_context, get_logger};
use crate::output;

pub fn run(accounts_file: Option<&Path>, json: bool) -> Result<()> {
    if let Some(logger) = get_logger(EntryPoint::Command) {
        let _ = logger.log_command("status");
    }

    let ctx = get_context(accounts_file)?;
    let status = get_status(&ctx.bank);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    for warning in &ctx.load_report.warnings {
        output::warning(warning);
    }

    println!("{}", ctx.config.bank_name.bold());
    println!();

    // Vertical key-value summary
    let mut summary = output::create_table();
    summary.add_row(vec!["Accounts".to_string(), status.total_accounts.to_string()]);
    summary.add_row(vec!["Personal".to_string(), status.personal_accounts.to_string()]);
    summary.add_row(vec!["Business".to_string(), status.business_accounts.to_string()]);
    summary.add_row(vec![
        "Total balance".to_string(),
        ctx.config.format_money(status.total_balance),
    ]);
    println!("{}", summary);
    println!();

    if status.accounts.is_empty() {
        output::info("No accounts yet. Run 'teller' and choose 'Open Account' to create one.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Holder", "Account Number", "Type", "Balance"]);
        for account in &status.accounts {
            table.add_row(vec![
                account.holder.clone(),
                account.number.clone(),
                account.account_type.to_string(),
                ctx.config.format_money(account.balance),
            ]);
        }
        println!("{}", table);
    }

    println!();
    println!(
        "{}",
        format!("Accounts file: {}", ctx.accounts_path().display()).dimmed()
    );

    Ok(())
}
