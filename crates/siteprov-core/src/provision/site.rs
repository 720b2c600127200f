//! Interactive resolution of the target site.

use std::num::NonZeroU32;

use thiserror::Error;
use tracing::debug;

use crate::console::Console;
use crate::error::ConsoleError;
use crate::types::SiteSelection;

const SITE_HINT: &str = "Enter the id of the site the applications should be added to. \
You can find it in IIS Manager: right-click the site > Advanced Settings > ID.";
const SITE_PROMPT: &str = "Site id";

#[derive(Debug, Error)]
pub enum SiteResolutionError {
    #[error("no valid site id after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error(transparent)]
    Console(#[from] ConsoleError),
}

/// Parsed operator answer to the site prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteInput {
    /// Nothing entered
    Default,
    Id(u32),
    /// A number no site can have: negative or beyond the id range
    OutOfRange(i64),
    /// Not a number, or zero
    Invalid,
}

impl SiteInput {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Default;
        }
        match trimmed.parse::<i64>() {
            Ok(0) | Err(_) => Self::Invalid,
            Ok(n) => u32::try_from(n).map_or(Self::OutOfRange(n), Self::Id),
        }
    }
}

/// Prompts until the operator names a site that exists.
///
/// Retries are unbounded unless `max_attempts` is set.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    default_id: u32,
    max_attempts: Option<NonZeroU32>,
}

impl Default for SiteResolver {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl SiteResolver {
    /// `max_attempts == 0` means keep asking.
    pub fn new(default_id: u32, max_attempts: u32) -> Self {
        Self {
            default_id,
            max_attempts: NonZeroU32::new(max_attempts),
        }
    }

    pub fn resolve(
        &self,
        console: &mut dyn Console,
        site_ids: &[u32],
    ) -> Result<SiteSelection, SiteResolutionError> {
        let mut attempts = 0u32;
        loop {
            if let Some(max) = self.max_attempts
                && attempts >= max.get()
            {
                return Err(SiteResolutionError::AttemptsExhausted { attempts });
            }
            attempts += 1;

            console.say(SITE_HINT);
            console.say(&format!(
                "Defaults to the Default Web Site (id = {}).",
                self.default_id
            ));
            let answer = console.ask(SITE_PROMPT)?;

            let site_id = match SiteInput::parse(&answer) {
                SiteInput::Default => {
                    console.say(&format!(
                        "No number entered, will continue with Default Site with id {}.",
                        self.default_id
                    ));
                    self.default_id
                }
                SiteInput::Id(id) => id,
                SiteInput::OutOfRange(n) => {
                    console.say(&format!("Site with id {} not found, try again", n));
                    continue;
                }
                SiteInput::Invalid => {
                    console.say("Site is no number, try again");
                    continue;
                }
            };

            if site_ids.contains(&site_id) {
                debug!(site_id, attempts, "resolved target site");
                return Ok(SiteSelection { site_id });
            }
            console.say(&format!("Site with id {} not found, try again", site_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_input() {
        assert_eq!(SiteInput::parse(""), SiteInput::Default);
        assert_eq!(SiteInput::parse("  "), SiteInput::Default);
        assert_eq!(SiteInput::parse("3"), SiteInput::Id(3));
        assert_eq!(SiteInput::parse(" 12 "), SiteInput::Id(12));
        assert_eq!(SiteInput::parse("0"), SiteInput::Invalid);
        assert_eq!(SiteInput::parse("-2"), SiteInput::OutOfRange(-2));
        assert_eq!(
            SiteInput::parse("4294967296"),
            SiteInput::OutOfRange(4_294_967_296)
        );
        assert_eq!(SiteInput::parse("abc"), SiteInput::Invalid);
    }
}
