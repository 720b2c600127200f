//! Interactive collection of the pool run-as identity.

use crate::console::Console;
use crate::error::ConsoleError;
use crate::types::ImpersonatedCredential;

const NAME_PROMPT: &str = "User name the application pools run as (DOMAIN\\user)";
const SECRET_PROMPT: &str = "Password";

/// Asks for a user name, then a secret. No local validation: the host decides
/// whether the identity is usable when the pools are created.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialCollector;

impl CredentialCollector {
    pub fn collect(
        &self,
        console: &mut dyn Console,
    ) -> Result<ImpersonatedCredential, ConsoleError> {
        let name = console.ask(NAME_PROMPT)?;
        let secret = console.ask_secret(SECRET_PROMPT)?;
        Ok(ImpersonatedCredential::new(name.trim(), secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn test_collects_name_then_secret() {
        let mut console = ScriptedConsole::new([" CORP\\svc ", " pa ss "]);

        let credential = CredentialCollector.collect(&mut console).unwrap();

        assert_eq!(credential.name(), "CORP\\svc");
        assert_eq!(credential.secret(), " pa ss ");
        assert_eq!(console.prompts().len(), 2);
        assert!(!console.printed("pa ss"));
    }

    #[test]
    fn test_closed_console_fails() {
        let mut console = ScriptedConsole::new(["svc"]);

        let err = CredentialCollector.collect(&mut console).unwrap_err();
        assert!(matches!(err, ConsoleError::Closed));
    }
}
