//! Error types for host capabilities and console interaction.

use thiserror::Error;

/// Errors surfaced by the management API and the host backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    /// A site or application the operation refers to does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The item is already configured on the host
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// The configuration section is locked at a higher level
    #[error("section '{0}' is locked at a parent level")]
    SectionLocked(String),

    /// An application was assigned to a pool the host does not know
    #[error("application pool '{0}' does not exist")]
    UnknownPool(String),

    /// Another session holds the host configuration
    #[error("host configuration is in use: {0}")]
    SessionBusy(String),

    /// Pending changes failed validation or could not be persisted
    #[error("commit failed: {0}")]
    Commit(String),

    /// Filesystem error while reading or writing host state
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Host state could not be parsed or serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl HostError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn already_exists(what: impl Into<String>) -> Self {
        Self::AlreadyExists(what.into())
    }

    pub fn commit(msg: impl Into<String>) -> Self {
        Self::Commit(msg.into())
    }
}

impl From<serde_json::Error> for HostError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors from the interaction port.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Input ended while a response was expected
    #[error("console input closed")]
    Closed,

    #[error("console io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_item() {
        let err = HostError::SectionLocked(
            "system.webServer/security/authentication/anonymousAuthentication".to_string(),
        );
        assert!(err.to_string().contains("anonymousAuthentication"));

        let err = HostError::UnknownPool("MissingPool".to_string());
        assert_eq!(err.to_string(), "application pool 'MissingPool' does not exist");
    }
}
