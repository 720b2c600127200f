//! Siteprov Core Library
//!
//! Provisions a web-server host: application pools, applications under a
//! chosen site, and authentication toggles on a designated application.
//! The management API, version probe, unlock tool and console are reached
//! through capability traits so frontends and tests can supply their own.

pub mod catalog;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod host;
pub mod provision;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Data model
    pub use crate::types::{
        ApplicationSpec, AuthSection, AuthToggle, HostVersion, ImpersonatedCredential,
        PipelineMode, PoolIdentity, PoolSpec, SiteSelection, StepKind, StepOutcome,
    };

    // Catalog and configuration
    pub use crate::catalog::Catalog;
    pub use crate::config::{HostSettings, ProvisionConfig, SiteSettings};

    // Capabilities
    pub use crate::console::{Console, ScriptedConsole};
    pub use crate::error::{ConsoleError, HostError};
    pub use crate::host::{
        ManagementApi, ManagementSession, PoolSettings, SectionUnlocker, UnlockAttempt,
        VersionProbe,
    };

    // Provisioning
    pub use crate::provision::{
        ApplicationPassReport, ApplicationProvisioner, CompatibilityGate, ConfigSectionUnlocker,
        CredentialCollector, InstallReport, InstallStatus, InstallationOrchestrator, PassStatus,
        PoolPassReport, PoolProvisioner, SiteResolver, UnlockResults,
    };
}
