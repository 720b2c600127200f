//! Run-level and pass-level outcome types.

use serde::{Deserialize, Serialize};

use super::apps::ApplicationPassReport;
use super::pools::PoolPassReport;
use super::unlock::UnlockResults;
use crate::types::HostVersion;

/// Whether a provisioning pass reached a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassStatus {
    Committed,
    Aborted { reason: String },
}

impl PassStatus {
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Final status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallStatus {
    Completed,
    Aborted { reason: String },
    /// Host below the minimum version; nothing was touched
    Incompatible,
}

impl InstallStatus {
    pub fn summary_line(&self) -> &'static str {
        match self {
            Self::Completed => "Installation Completed.",
            Self::Aborted { .. } => "Installation aborted",
            Self::Incompatible => "Installation Aborted.",
        }
    }
}

/// Everything a run did, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallReport {
    pub version: HostVersion,
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pools: Option<PoolPassReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocks: Option<UnlockResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<ApplicationPassReport>,
    pub status: InstallStatus,
}

impl InstallReport {
    pub(crate) fn incompatible(version: HostVersion) -> Self {
        Self {
            version,
            compatible: false,
            pools: None,
            unlocks: None,
            applications: None,
            status: InstallStatus::Incompatible,
        }
    }
}
