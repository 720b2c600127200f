//! Configuration schema for siteprov.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, builtin_applications, builtin_pools};
use crate::types::{ApplicationSpec, PoolSpec};

/// Root configuration structure for siteprov.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub host: HostSettings,

    #[serde(default)]
    pub site: SiteSettings,

    /// Replaces the built-in pool catalog when non-empty
    #[serde(default, rename = "pool", skip_serializing_if = "Vec::is_empty")]
    pub pools: Vec<PoolSpec>,

    /// Replaces the built-in application catalog when non-empty
    #[serde(default, rename = "application", skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<ApplicationSpec>,
}

/// Where the version probe reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Version recorded in the host state file
    #[default]
    State,
    /// `reg query` against the InetStp key
    Registry,
}

/// How locked sections are unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockKind {
    /// Clear the lock in the host state file
    #[default]
    State,
    /// Run the external appcmd tool
    Appcmd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Host state document backing the management API
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default)]
    pub version_probe: ProbeKind,

    #[serde(default)]
    pub unlock: UnlockKind,

    /// Executable invoked when `unlock = "appcmd"`
    #[serde(default = "default_unlock_tool")]
    pub unlock_tool: PathBuf,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            version_probe: ProbeKind::default(),
            unlock: UnlockKind::default(),
            unlock_tool: default_unlock_tool(),
        }
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("host.json")
}

fn default_unlock_tool() -> PathBuf {
    PathBuf::from(r"C:\Windows\System32\inetsrv\appcmd.exe")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Site id used when the operator enters nothing
    #[serde(default = "default_site_id")]
    pub default_id: u32,

    /// Prompt attempts before giving up (0 = keep asking)
    #[serde(default)]
    pub max_attempts: u32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_id: default_site_id(),
            max_attempts: 0,
        }
    }
}

fn default_site_id() -> u32 {
    1
}

impl ProvisionConfig {
    /// Effective catalog: each list falls back to the built-in one when empty.
    pub fn catalog(&self) -> Catalog {
        let pools = if self.pools.is_empty() {
            builtin_pools()
        } else {
            self.pools.clone()
        };
        let applications = if self.applications.is_empty() {
            builtin_applications()
        } else {
            self.applications.clone()
        };
        Catalog::new(pools, applications)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.site.default_id == 0 {
            anyhow::bail!("site.default_id must be a non-zero site id");
        }
        self.catalog().validate()
    }

    /// Resolve relative paths against the directory holding the config file.
    pub(crate) fn resolve_paths(&mut self, base: &Path) {
        if self.host.state_file.is_relative() {
            self.host.state_file = base.join(&self.host.state_file);
        }
    }
}
