//! Prompter port - questions the bank asks in the middle of an operation

use crate::domain::result::Result;

/// Interactive input needed by bank operations
///
/// Account creation asks for the holder's name and transfers ask the sender
/// to re-enter their password. The CLI answers from the terminal; tests
/// answer from a script.
pub trait Prompter {
    /// Ask for the new account holder's name
    fn holder_name(&mut self) -> Result<String>;

    /// Ask the sender to re-enter their password before a transfer
    fn confirm_password(&mut self) -> Result<String>;
}
