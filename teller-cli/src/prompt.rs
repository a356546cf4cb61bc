//! Console input and output for the interactive menu
//!
//! `TerminalConsole` drives dialoguer when stdin is a terminal. `LineConsole`
//! reads plain lines, so scripted sessions can be piped in. Numeric prompts
//! re-ask until the input parses, so a typo never ends the session.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};

use teller_core::domain::result::Result as CoreResult;
use teller_core::ports::Prompter;
use teller_core::Error;

use crate::output;

const NOT_A_NUMBER: &str = "Please enter a number";

/// Everything the menu asks or tells the user
pub trait Console {
    /// Menu selection; empty input is allowed and treated as an invalid option
    fn choice(&mut self, prompt: &str) -> Result<String>;

    /// Non-empty free text
    fn text(&mut self, prompt: &str) -> Result<String>;

    /// A finite monetary amount
    fn amount(&mut self, prompt: &str) -> Result<f64>;

    fn password(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question, defaulting to no
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Print a line as-is
    fn say(&mut self, line: &str) -> Result<()>;

    fn success(&mut self, msg: &str) -> Result<()> {
        self.say(&msg.green().to_string())
    }

    fn warning(&mut self, msg: &str) -> Result<()> {
        self.say(&msg.yellow().to_string())
    }

    fn error(&mut self, msg: &str) -> Result<()> {
        self.say(&msg.red().to_string())
    }
}

/// Interactive terminal prompts
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn choice(&mut self, prompt: &str) -> Result<String> {
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    fn text(&mut self, prompt: &str) -> Result<String> {
        let value: String = Input::new().with_prompt(prompt).interact_text()?;
        Ok(value.trim().to_string())
    }

    fn amount(&mut self, prompt: &str) -> Result<f64> {
        let value: f64 = Input::new()
            .with_prompt(prompt)
            .validate_with(|value: &f64| -> std::result::Result<(), &'static str> {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(NOT_A_NUMBER)
                }
            })
            .interact_text()?;
        Ok(value)
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        Ok(Password::new().with_prompt(prompt).interact()?)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }

    fn say(&mut self, line: &str) -> Result<()> {
        println!("{}", line);
        Ok(())
    }

    fn error(&mut self, msg: &str) -> Result<()> {
        output::error(msg);
        Ok(())
    }
}

/// Line-oriented prompts over any reader and writer
///
/// Used when stdin is piped. Passwords are read in the clear.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write the prompt and read one trimmed line
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Input ended while waiting for: {}", prompt);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn choice(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)
    }

    fn text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.ask(prompt)?;
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }

    fn amount(&mut self, prompt: &str) -> Result<f64> {
        loop {
            match self.ask(prompt)?.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => self.say(NOT_A_NUMBER)?,
            }
        }
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", prompt))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}

/// Answers the bank's mid-operation questions through a console
pub struct ConsolePrompter<'a, C: Console + ?Sized> {
    console: &'a mut C,
}

impl<'a, C: Console + ?Sized> ConsolePrompter<'a, C> {
    pub fn new(console: &'a mut C) -> Self {
        Self { console }
    }
}

impl<C: Console + ?Sized> Prompter for ConsolePrompter<'_, C> {
    fn holder_name(&mut self) -> CoreResult<String> {
        self.console
            .text("Enter your name")
            .map_err(|e| Error::prompt(e.to_string()))
    }

    fn confirm_password(&mut self) -> CoreResult<String> {
        self.console
            .password("Enter your password to confirm the transfer")
            .map_err(|e| Error::prompt(e.to_string()))
    }
}
