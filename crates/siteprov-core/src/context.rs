//! Run context: wires configured backends into the orchestrator.

use anyhow::Context;

use crate::catalog::Catalog;
use crate::config::{ProbeKind, ProvisionConfig, UnlockKind};
use crate::host::{
    AppCmdUnlocker, FileHost, RegistryProbe, SectionUnlocker, StateFileUnlocker, VersionProbe,
};
use crate::provision::{InstallationOrchestrator, SiteResolver};

/// Backends and catalog for one run.
///
/// Frontends build this once from the loaded config and ask it for an
/// orchestrator.
pub struct HostContext {
    config: ProvisionConfig,
    catalog: Catalog,
    host: FileHost,
    probe: Box<dyn VersionProbe>,
    unlocker: Box<dyn SectionUnlocker>,
}

impl HostContext {
    pub fn from_config(config: ProvisionConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;

        let catalog = config.catalog();
        let host = FileHost::new(config.host.state_file.clone());
        let probe: Box<dyn VersionProbe> = match config.host.version_probe {
            ProbeKind::State => Box::new(host.clone()),
            ProbeKind::Registry => Box::new(RegistryProbe::default()),
        };
        let unlocker: Box<dyn SectionUnlocker> = match config.host.unlock {
            UnlockKind::State => Box::new(StateFileUnlocker::new(host.clone())),
            UnlockKind::Appcmd => Box::new(AppCmdUnlocker::new(config.host.unlock_tool.clone())),
        };

        Ok(Self {
            config,
            catalog,
            host,
            probe,
            unlocker,
        })
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn host(&self) -> &FileHost {
        &self.host
    }

    pub fn probe(&self) -> &dyn VersionProbe {
        self.probe.as_ref()
    }

    pub fn site_resolver(&self) -> SiteResolver {
        SiteResolver::new(self.config.site.default_id, self.config.site.max_attempts)
    }

    pub fn orchestrator(&self) -> InstallationOrchestrator<'_> {
        InstallationOrchestrator::new(
            self.probe.as_ref(),
            &self.host,
            self.unlocker.as_ref(),
            &self.catalog,
        )
        .with_site_resolver(self.site_resolver())
    }
}
