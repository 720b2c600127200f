//! Capability interfaces to the web-server host, plus the shipped backends.
//!
//! - [`VersionProbe`]: read-only lookup of the installed server version
//! - [`ManagementApi`] / [`ManagementSession`]: session-scoped configuration changes
//! - [`SectionUnlocker`]: privileged unlock of server-level sections

pub mod appcmd;
pub mod file;
pub mod registry;
pub mod state;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::types::{AuthSection, HostVersion, ImpersonatedCredential, PipelineMode};

pub use appcmd::AppCmdUnlocker;
pub use file::{FileHost, StateFileUnlocker};
pub use registry::RegistryProbe;

/// Reads the host's installed capability descriptor.
pub trait VersionProbe {
    /// `None` when the descriptor is absent or malformed.
    fn probe(&self) -> Option<HostVersion>;
}

/// Settings for a pool about to be created.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings<'a> {
    pub name: &'a str,
    pub runtime_version: &'a str,
    pub auto_start: bool,
    pub pipeline_mode: PipelineMode,
    /// `None` keeps the host default identity
    pub identity: Option<&'a ImpersonatedCredential>,
}

/// Opens management sessions against the host.
pub trait ManagementApi {
    fn open_session(&self) -> Result<Box<dyn ManagementSession>, HostError>;
}

/// One management session.
///
/// Mutations are provisional until [`commit`](ManagementSession::commit)
/// persists them as a unit. Dropping the session releases it.
pub trait ManagementSession {
    /// Whether a pool with this name exists, using the host's name rules.
    fn pool_exists(&mut self, name: &str) -> Result<bool, HostError>;

    fn add_pool(&mut self, settings: &PoolSettings<'_>) -> Result<(), HostError>;

    fn site_ids(&mut self) -> Result<Vec<u32>, HostError>;

    /// Register an application. [`HostError::AlreadyExists`] if the path is taken.
    fn add_application(
        &mut self,
        site_id: u32,
        url_path: &str,
        physical_path: &str,
    ) -> Result<(), HostError>;

    fn set_application_pool(
        &mut self,
        site_id: u32,
        url_path: &str,
        pool: &str,
    ) -> Result<(), HostError>;

    /// Set `enabled` on an authentication section of the application's web
    /// configuration. [`HostError::SectionLocked`] if the section is locked.
    fn set_section_enabled(
        &mut self,
        site_id: u32,
        url_path: &str,
        section: AuthSection,
        enabled: bool,
    ) -> Result<(), HostError>;

    fn commit(&mut self) -> Result<(), HostError>;
}

/// Result of invoking the unlock tool.
///
/// `launched` only says the tool could be started. It does not mean the
/// section is actually unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockAttempt {
    pub launched: bool,
    /// Tool output on launch, or the launch error otherwise
    pub output: String,
}

impl UnlockAttempt {
    pub fn launched(output: impl Into<String>) -> Self {
        Self {
            launched: true,
            output: output.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            launched: false,
            output: reason.into(),
        }
    }
}

/// Privileged unlock of a configuration section.
pub trait SectionUnlocker {
    fn unlock(&self, section_name: &str) -> UnlockAttempt;
}
