//! Pool and application catalogs: what a run provisions.
//!
//! The built-in catalog describes the deployment this tool was written for.
//! A config file may replace either list; see [`crate::config`].

mod builtin;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{ApplicationSpec, PoolSpec};

pub use builtin::{builtin_applications, builtin_pools};

/// Ordered pool and application specs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub pools: Vec<PoolSpec>,
    pub applications: Vec<ApplicationSpec>,
}

impl Catalog {
    pub fn new(pools: Vec<PoolSpec>, applications: Vec<ApplicationSpec>) -> Self {
        Self {
            pools,
            applications,
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_pools(), builtin_applications())
    }

    /// Check structural well-formedness.
    ///
    /// Application pool references are not checked here: a dangling reference
    /// surfaces as an assignment failure for that application.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for pool in &self.pools {
            if pool.name.trim().is_empty() {
                anyhow::bail!("Pool name cannot be empty");
            }
            if !seen.insert(pool.name.to_lowercase()) {
                anyhow::bail!("Duplicate pool name in catalog: '{}'", pool.name);
            }
        }

        let mut paths = HashSet::new();
        for app in &self.applications {
            if !app.url_path.starts_with('/') {
                anyhow::bail!(
                    "Application path must start with '/': '{}'",
                    app.url_path
                );
            }
            if app.physical_path.trim().is_empty() {
                anyhow::bail!(
                    "Application '{}' has an empty physical path",
                    app.url_path
                );
            }
            if !paths.insert(app.url_path.to_lowercase()) {
                anyhow::bail!("Duplicate application path in catalog: '{}'", app.url_path);
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
