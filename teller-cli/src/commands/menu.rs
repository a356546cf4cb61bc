//! Menu command - the interactive banking session
//!
//! Two nested menus: the bank menu (open account, login, exit) and, once
//! logged in, the account menu. Every bank operation persists on its own;
//! failures are reported and the menu comes back. Only losing the input
//! ends the session early.

use std::io;
use std::path::Path;

use anyhow::{anyhow, Result};
use colored::Colorize;

use teller_core::{
    AccountType, EntryPoint, Error, LogEvent, LoggingService, TellerContext, SKIPPED_RECORD_EVENT,
};

use super::{get_context, get_logger, log_event};
use crate::prompt::{Console, ConsolePrompter, LineConsole, TerminalConsole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BankOption {
    OpenAccount,
    Login,
    Exit,
}

impl BankOption {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::OpenAccount),
            "2" => Some(Self::Login),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountOption {
    CheckBalance,
    Deposit,
    Withdraw,
    Transfer,
    Delete,
    Logout,
}

impl AccountOption {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::CheckBalance),
            "2" => Some(Self::Deposit),
            "3" => Some(Self::Withdraw),
            "4" => Some(Self::Transfer),
            "5" => Some(Self::Delete),
            "6" => Some(Self::Logout),
            _ => None,
        }
    }
}

/// Whether the account menu keeps running after an action
enum Session {
    Continue,
    End,
}

type Logger = Option<LoggingService>;

pub fn run(accounts_file: Option<&Path>) -> Result<()> {
    let logger = get_logger(EntryPoint::Menu);
    let mut ctx = get_context(accounts_file)?;

    if atty::is(atty::Stream::Stdin) {
        session(&mut ctx, &mut TerminalConsole, &logger)
    } else {
        let stdin = io::stdin();
        let mut console = LineConsole::new(stdin.lock(), io::stdout());
        session(&mut ctx, &mut console, &logger)
    }
}

fn session(ctx: &mut TellerContext, console: &mut dyn Console, logger: &Logger) -> Result<()> {
    for warning in &ctx.load_report.warnings {
        console.warning(warning)?;
        log_event(logger, LogEvent::new(SKIPPED_RECORD_EVENT).with_error(warning.as_str()));
    }
    log_event(logger, LogEvent::new("session_started"));

    loop {
        console.say("")?;
        let title = format!("Welcome to the {}", ctx.config.bank_name);
        console.say(&title.bold().to_string())?;
        console.say("1. Open Account")?;
        console.say("2. Login")?;
        console.say("3. Exit")?;

        match BankOption::parse(&console.choice("Choose an option")?) {
            Some(BankOption::OpenAccount) => open_account(ctx, console, logger)?,
            Some(BankOption::Login) => login(ctx, console, logger)?,
            Some(BankOption::Exit) => {
                log_event(logger, LogEvent::new("session_ended"));
                console.say(&format!("Thank you for using {}.", ctx.config.bank_name))?;
                return Ok(());
            }
            None => console.warning("Invalid option! Please choose again.")?,
        }
    }
}

/// Report a failed operation, or give up if the input is gone
///
/// Only the error kind goes to the event log; storage errors also carry
/// their message, which names the file but no account data.
fn fail(
    err: Error,
    message: &str,
    event: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<()> {
    if !err.is_recoverable() {
        return Err(anyhow!(err));
    }

    let mut log = LogEvent::new(event).with_error(err.kind());
    if let Error::Storage(details) = &err {
        log = log.with_error_details(details.as_str());
        console.error(&err.to_string())?;
    } else {
        console.error(message)?;
    }
    log_event(logger, log);

    Ok(())
}

fn open_account(ctx: &mut TellerContext, console: &mut dyn Console, logger: &Logger) -> Result<()> {
    let input = console.text("Enter account type (Business/Personal)")?;
    let account_type = AccountType::from_input(&input);

    let created = ctx
        .bank
        .create_account(account_type, &mut ConsolePrompter::new(&mut *console));
    match created {
        Ok(credentials) => {
            console.success("Account created successfully!")?;
            console.say(&format!("Account Number: {}", credentials.number))?;
            console.say(&format!("Password: {}", credentials.password))?;
            log_event(logger, LogEvent::new("account_created"));
            Ok(())
        }
        Err(e) => fail(e, "Account creation failed", "account_create_failed", console, logger),
    }
}

fn login(ctx: &mut TellerContext, console: &mut dyn Console, logger: &Logger) -> Result<()> {
    let number = console.text("Enter your account number")?;
    let password = console.password("Enter your password")?;

    let holder = match ctx.bank.login(&number, &password) {
        Ok(account) => account.holder.clone(),
        Err(e) => return fail(e, "Invalid login credentials", "login_failed", console, logger),
    };

    console.success("Login successful!")?;
    log_event(logger, LogEvent::new("login_succeeded"));

    account_menu(ctx, &number, &holder, console, logger)
}

fn account_menu(
    ctx: &mut TellerContext,
    number: &str,
    holder: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<()> {
    loop {
        console.say("")?;
        let title = format!("Welcome to your account {}", holder);
        console.say(&title.bold().to_string())?;
        console.say("")?;
        console.say("1. Check Balance")?;
        console.say("2. Deposit Money")?;
        console.say("3. Withdraw Money")?;
        console.say("4. Transfer Money")?;
        console.say("5. Delete Account")?;
        console.say("6. Logout")?;

        let session = match AccountOption::parse(&console.choice("Choose an option")?) {
            Some(AccountOption::CheckBalance) => check_balance(ctx, number, console, logger)?,
            Some(AccountOption::Deposit) => deposit(ctx, number, console, logger)?,
            Some(AccountOption::Withdraw) => withdraw(ctx, number, console, logger)?,
            Some(AccountOption::Transfer) => transfer(ctx, number, console, logger)?,
            Some(AccountOption::Delete) => delete(ctx, number, console, logger)?,
            Some(AccountOption::Logout) => {
                console.success("Logged out successfully")?;
                log_event(logger, LogEvent::new("logout"));
                Session::End
            }
            None => {
                console.warning("Invalid option! Please choose again.")?;
                Session::Continue
            }
        };

        if let Session::End = session {
            return Ok(());
        }
    }
}

fn check_balance(
    ctx: &TellerContext,
    number: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<Session> {
    match ctx.bank.check_balance(number) {
        Ok(balance) => {
            console.say(&format!("Your balance is: {}", ctx.config.format_money(balance)))?
        }
        Err(e) => fail(e, "Account not found", "balance_failed", console, logger)?,
    }
    Ok(Session::Continue)
}

fn deposit(
    ctx: &mut TellerContext,
    number: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<Session> {
    let amount = console.amount("Enter amount to deposit")?;

    match ctx.bank.deposit(number, amount) {
        Ok(_) => {
            let money = ctx.config.format_money(amount);
            console.success(&format!("{} deposited successfully", money))?;
            log_event(logger, LogEvent::new("deposit_completed"));
        }
        Err(e) => fail(e, "Invalid deposit amount", "deposit_failed", console, logger)?,
    }
    Ok(Session::Continue)
}

fn withdraw(
    ctx: &mut TellerContext,
    number: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<Session> {
    let amount = console.amount("Enter amount to withdraw")?;

    match ctx.bank.withdraw(number, amount) {
        Ok(_) => {
            let money = ctx.config.format_money(amount);
            console.success(&format!("{} withdrawn successfully", money))?;
            log_event(logger, LogEvent::new("withdrawal_completed"));
        }
        Err(e) => {
            let message = match e {
                Error::InvalidAmount(_) => "Invalid withdrawal amount",
                _ => "Insufficient funds",
            };
            fail(e, message, "withdrawal_failed", console, logger)?;
        }
    }
    Ok(Session::Continue)
}

fn transfer(
    ctx: &mut TellerContext,
    number: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<Session> {
    let recipient = console.text("Enter recipient account number")?;
    let amount = console.amount("Enter amount to transfer")?;

    let transferred = ctx.bank.transfer_money(
        number,
        &recipient,
        amount,
        &mut ConsolePrompter::new(&mut *console),
    );
    match transferred {
        Ok(()) => {
            let money = ctx.config.format_money(amount);
            console.success(&format!("{} transferred successfully", money))?;
            log_event(logger, LogEvent::new("transfer_completed"));
        }
        Err(e) => {
            let message = match e {
                Error::InvalidPassword => "Invalid password! Transfer failed.",
                Error::AccountNotFound(_) => "Transfer failed! Recipient account not found.",
                Error::InvalidAmount(_) => "Transfer failed! Invalid amount.",
                _ => "Transfer failed! Insufficient funds.",
            };
            fail(e, message, "transfer_failed", console, logger)?;
        }
    }
    Ok(Session::Continue)
}

fn delete(
    ctx: &mut TellerContext,
    number: &str,
    console: &mut dyn Console,
    logger: &Logger,
) -> Result<Session> {
    if !console.confirm("Are you sure you want to delete your account?")? {
        console.say("Account deletion canceled.")?;
        return Ok(Session::Continue);
    }

    match ctx.bank.delete_account(number) {
        Ok(_) => {
            console.success("Account deleted successfully")?;
            log_event(logger, LogEvent::new("account_deleted"));
            Ok(Session::End)
        }
        Err(e) => {
            fail(e, "Account deletion failed", "account_delete_failed", console, logger)?;
            Ok(Session::Continue)
        }
    }
}
