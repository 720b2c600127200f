//! Provisioning steps and the orchestrator that sequences them.

pub mod apps;
pub mod credential;
pub mod gate;
pub mod orchestrator;
pub mod pools;
pub mod report;
pub mod site;
pub mod unlock;

pub use apps::{ApplicationPassReport, ApplicationProvisioner};
pub use credential::CredentialCollector;
pub use gate::CompatibilityGate;
pub use orchestrator::InstallationOrchestrator;
pub use pools::{PoolPassReport, PoolProvisioner};
pub use report::{InstallReport, InstallStatus, PassStatus};
pub use site::{SiteInput, SiteResolutionError, SiteResolver};
pub use unlock::{ConfigSectionUnlocker, UnlockResult, UnlockResults};
