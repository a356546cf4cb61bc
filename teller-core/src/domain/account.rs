//! Account domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account type label. Personal and business accounts behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    Personal,
    Business,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Personal => "Personal",
            AccountType::Business => "Business",
        }
    }

    /// Interpret free-form menu input
    ///
    /// "business" or "b" (any case) selects a business account; anything
    /// else falls back to personal.
    pub fn from_input(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "business" | "b" => AccountType::Business,
            _ => AccountType::Personal,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Strict parse of the persisted label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Personal" => Ok(AccountType::Personal),
            "Business" => Ok(AccountType::Business),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

/// A bank account record
///
/// Passwords are stored and compared in plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub holder: String,
    pub number: String,
    pub password: String,
    pub balance: f64,
    pub account_type: AccountType,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        holder: impl Into<String>,
        number: impl Into<String>,
        password: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            holder: holder.into(),
            number: number.into(),
            password: password.into(),
            balance: 0.0,
            account_type,
        }
    }

    /// Set the starting balance (used when loading persisted records)
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Deposit money
    ///
    /// Only strictly positive amounts are accepted, and only when the new
    /// balance is still a finite number the accounts file can store.
    pub fn deposit(&mut self, amount: f64) -> bool {
        let balance = self.balance + amount;
        if amount > 0.0 && balance.is_finite() {
            self.balance = balance;
            return true;
        }
        false
    }

    /// Withdraw money if `0 < amount <= balance`
    pub fn withdraw(&mut self, amount: f64) -> bool {
        if amount > 0.0 && amount <= self.balance {
            self.balance -= amount;
            return true;
        }
        false
    }

    pub fn check_balance(&self) -> f64 {
        self.balance
    }

    /// Exact comparison against the stored password
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Render an amount the way the accounts file has always stored it
///
/// Whole numbers keep a single decimal place (`100.0`); everything else uses
/// the shortest representation that parses back to the same value.
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
