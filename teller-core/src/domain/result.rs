//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Insufficient funds: balance is {balance}, requested {requested}")]
    InsufficientFunds { balance: f64, requested: f64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl Error {
    /// Create an account-not-found error
    pub fn not_found(number: impl Into<String>) -> Self {
        Self::AccountNotFound(number.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a prompt error
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Stable, value-free name of the error, safe to write to the event log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "account_not_found",
            Self::InvalidPassword => "invalid_password",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::Storage(_) => "storage",
            Self::Prompt(_) => "prompt",
        }
    }

    /// Whether the interactive loop can report this error and keep going.
    ///
    /// Prompt failures mean the console itself is gone, so there is nothing
    /// left to ask the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Prompt(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
