//! Terminal implementation of the interaction port.
//!
//! Uses dialoguer prompts when attached to a terminal and plain line reads
//! otherwise, so piped answers keep working.

use std::io::{self, BufRead, ErrorKind};

use console::{Term, style};
use dialoguer::{Input, Password, theme::ColorfulTheme};

use siteprov_core::console::Console;
use siteprov_core::error::ConsoleError;

pub struct TerminalConsole {
    theme: ColorfulTheme,
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            interactive: Term::stdout().is_term() && Term::stderr().is_term(),
        }
    }

    fn read_line(&self) -> Result<String, ConsoleError> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(ConsoleError::Closed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

fn map_dialoguer(err: dialoguer::Error) -> ConsoleError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == ErrorKind::UnexpectedEof => ConsoleError::Closed,
        dialoguer::Error::IO(e) => ConsoleError::Io(e),
    }
}

impl Console for TerminalConsole {
    fn say(&mut self, line: &str) {
        if line.starts_with("Error") || line.starts_with("Unable") {
            println!("{}", style(line).yellow());
        } else if line.starts_with("Installation") {
            println!("{}", style(line).bold());
        } else {
            println!("{}", line);
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        if !self.interactive {
            println!("{}:", prompt);
            return self.read_line();
        }
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(map_dialoguer)
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        if !self.interactive {
            println!("{}:", prompt);
            return self.read_line();
        }
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(map_dialoguer)
    }

    fn pause(&mut self) -> Result<(), ConsoleError> {
        println!();
        println!("{}", style("Press enter to exit").dim());
        match self.read_line() {
            Ok(_) | Err(ConsoleError::Closed) => Ok(()),
            Err(err) => Err(err),
        }
    }
}
