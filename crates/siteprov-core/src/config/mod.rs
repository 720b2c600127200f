//! Run configuration: host backends, site prompt policy, catalog overrides.
//!
//! Loaded from `siteprov.toml`. Every field has a default, so a missing
//! default-location file simply yields the built-in configuration.

pub mod parser;
pub mod schema;

use std::path::{Path, PathBuf};

pub use schema::{HostSettings, ProbeKind, ProvisionConfig, SiteSettings, UnlockKind};

/// File name looked up in the user config directory.
pub const CONFIG_FILE_NAME: &str = "siteprov.toml";

/// Default config location: `<config_dir>/siteprov/siteprov.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("siteprov").join(CONFIG_FILE_NAME))
}

impl ProvisionConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                parser::parse_config(path)
            }
            None => match default_config_path() {
                Some(path) if path.exists() => parser::parse_config(&path),
                _ => {
                    tracing::debug!("no config file found, using built-in defaults");
                    Ok(Self::default())
                }
            },
        }
    }
}
