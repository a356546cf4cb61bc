//! Status service - registry summaries

use serde::Serialize;

use crate::domain::AccountType;
use crate::services::Bank;

/// Summarize the accounts held by `bank`. Passwords are never included.
pub fn get_status(bank: &Bank) -> StatusSummary {
    let accounts: Vec<AccountSummary> = bank
        .accounts()
        .map(|a| AccountSummary {
            holder: a.holder.clone(),
            number: a.number.clone(),
            account_type: a.account_type,
            balance: a.balance,
        })
        .collect();

    let business_accounts = accounts
        .iter()
        .filter(|a| a.account_type == AccountType::Business)
        .count();

    StatusSummary {
        total_accounts: accounts.len(),
        personal_accounts: accounts.len() - business_accounts,
        business_accounts,
        total_balance: bank.total_balance(),
        accounts,
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: usize,
    pub personal_accounts: usize,
    pub business_accounts: usize,
    pub total_balance: f64,
    pub accounts: Vec<AccountSummary>,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub holder: String,
    pub number: String,
    pub account_type: AccountType,
    pub balance: f64,
}
