//! Interaction port used for prompts and the operator transcript.

use std::collections::VecDeque;

use crate::error::ConsoleError;

/// Line-oriented console the provisioning steps talk to.
///
/// Frontends implement this over a terminal; tests use [`ScriptedConsole`].
pub trait Console {
    /// Print one transcript line.
    fn say(&mut self, line: &str);

    /// Ask for one line of input. An empty answer is valid.
    fn ask(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Ask for a secret. Implementations must not echo the input.
    fn ask_secret(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Block until the operator acknowledges the transcript.
    fn pause(&mut self) -> Result<(), ConsoleError>;
}

/// Console that answers prompts from a fixed script and records everything.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            transcript: Vec::new(),
        }
    }

    /// Prompts asked so far, secrets included (the prompt, not the answer).
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// True if any transcript line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(ConsoleError::Closed)
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.next_answer(prompt)
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.next_answer(prompt)
    }

    fn pause(&mut self) -> Result<(), ConsoleError> {
        Ok(())
    }
}
