//! Shared data model for provisioning runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest host major version the provisioning flow supports.
pub const MIN_SUPPORTED_MAJOR: u32 = 7;

/// Installed web-server version as reported by the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
}

impl HostVersion {
    /// Version used when the host reports no capability data.
    pub const ABSENT: Self = Self { major: 0, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Identity the identity-bound pools run under.
///
/// Never serialized and never logged: `Debug` redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ImpersonatedCredential {
    name: String,
    secret: String,
}

impl ImpersonatedCredential {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ImpersonatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpersonatedCredential")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Managed pipeline mode of an application pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    #[default]
    Integrated,
    Classic,
}

/// Which process identity a pool is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolIdentity {
    /// Host default identity.
    #[default]
    Default,
    /// The credential collected interactively at the start of the run.
    Collected,
}

/// One entry of the pool catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub name: String,
    #[serde(default = "default_runtime_version")]
    pub runtime_version: String,
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
    #[serde(default)]
    pub pipeline_mode: PipelineMode,
    #[serde(default)]
    pub identity: PoolIdentity,
}

fn default_runtime_version() -> String {
    "v4.0".to_string()
}

fn default_auto_start() -> bool {
    true
}

/// Authentication mechanisms whose sections are locked at server level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthSection {
    Anonymous,
    Windows,
}

impl AuthSection {
    /// Sections in the order they are unlocked and toggled.
    pub const ALL: [AuthSection; 2] = [AuthSection::Anonymous, AuthSection::Windows];

    /// Full configuration section path.
    pub fn section_name(self) -> &'static str {
        match self {
            AuthSection::Anonymous => {
                "system.webServer/security/authentication/anonymousAuthentication"
            }
            AuthSection::Windows => "system.webServer/security/authentication/windowsAuthentication",
        }
    }

    /// Short label used in transcript lines and outcome keys.
    pub fn label(self) -> &'static str {
        match self {
            AuthSection::Anonymous => "anonymous",
            AuthSection::Windows => "windows",
        }
    }
}

impl fmt::Display for AuthSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Section", self.label())
    }
}

/// Desired `enabled` values for the two authentication sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToggle {
    pub enable_anonymous: bool,
    pub enable_windows: bool,
}

impl AuthToggle {
    pub fn enabled_for(&self, section: AuthSection) -> bool {
        match section {
            AuthSection::Anonymous => self.enable_anonymous,
            AuthSection::Windows => self.enable_windows,
        }
    }
}

/// One entry of the application catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    pub url_path: String,
    pub physical_path: String,
    pub pool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthToggle>,
}

impl ApplicationSpec {
    /// Last segment of the URL path, used in transcript lines.
    pub fn display_name(&self) -> &str {
        self.url_path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.url_path)
    }
}

/// Site the applications are registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSelection {
    pub site_id: u32,
}

/// What an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Pool,
    Application,
    Authentication,
}

/// Result of a single provisioning step. Accumulated, never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub kind: StepKind,
    pub item_key: String,
    pub succeeded: bool,
    pub message: String,
}

impl StepOutcome {
    pub fn succeeded(
        kind: StepKind,
        item_key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            item_key: item_key.into(),
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn failed(
        kind: StepKind,
        item_key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            item_key: item_key.into(),
            succeeded: false,
            message: message.into(),
        }
    }
}
