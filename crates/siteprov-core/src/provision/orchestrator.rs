//! Top-level provisioning flow.
//!
//! gate -> credential -> pools -> unlock -> applications. A failed gate stops
//! before any session is opened; a failed pool pass stops before applications.

use tracing::{info, warn};

use super::apps::ApplicationProvisioner;
use super::credential::CredentialCollector;
use super::gate::CompatibilityGate;
use super::pools::PoolProvisioner;
use super::report::{InstallReport, InstallStatus, PassStatus};
use super::site::SiteResolver;
use super::unlock::ConfigSectionUnlocker;
use crate::catalog::Catalog;
use crate::console::Console;
use crate::host::{ManagementApi, SectionUnlocker, VersionProbe};

pub struct InstallationOrchestrator<'a> {
    probe: &'a dyn VersionProbe,
    api: &'a dyn ManagementApi,
    unlocker: &'a dyn SectionUnlocker,
    catalog: &'a Catalog,
    site_resolver: SiteResolver,
}

impl<'a> InstallationOrchestrator<'a> {
    pub fn new(
        probe: &'a dyn VersionProbe,
        api: &'a dyn ManagementApi,
        unlocker: &'a dyn SectionUnlocker,
        catalog: &'a Catalog,
    ) -> Self {
        Self {
            probe,
            api,
            unlocker,
            catalog,
            site_resolver: SiteResolver::default(),
        }
    }

    pub fn with_site_resolver(mut self, resolver: SiteResolver) -> Self {
        self.site_resolver = resolver;
        self
    }

    pub fn run(&self, console: &mut dyn Console) -> InstallReport {
        let gate = CompatibilityGate::new(self.probe);
        let version = gate.probe();
        console.say(&format!("Major Version = {}", version.major));
        console.say(&format!("Minor Version = {}", version.minor));

        if !CompatibilityGate::decide(version) {
            console.say(&format!(
                "IIS version is {}. This does not meet the minimum requirements.",
                version
            ));
            let report = InstallReport::incompatible(version);
            console.say(report.status.summary_line());
            return report;
        }
        console.say("IIS 7 or higher found. Proceeding with installation...");

        let mut report = InstallReport {
            version,
            compatible: true,
            pools: None,
            unlocks: None,
            applications: None,
            status: InstallStatus::Completed,
        };
        let status = self.install(console, &mut report);
        report.status = status;

        match &report.status {
            InstallStatus::Aborted { reason } => {
                warn!(%reason, "installation aborted");
                console.say(&format!("Some error occurred: {}", reason));
            }
            _ => info!("installation completed"),
        }
        console.say(report.status.summary_line());
        report
    }

    fn install(&self, console: &mut dyn Console, report: &mut InstallReport) -> InstallStatus {
        let credential = match CredentialCollector.collect(console) {
            Ok(credential) => credential,
            Err(err) => return aborted(err),
        };

        let pools =
            PoolProvisioner.ensure_pools(self.api, &self.catalog.pools, &credential, console);
        drop(credential);
        let pool_status = pools.status.clone();
        report.pools = Some(pools);
        if let PassStatus::Aborted { reason } = pool_status {
            return InstallStatus::Aborted { reason };
        }

        let unlocks = ConfigSectionUnlocker::new(self.unlocker).unlock_all(console);
        let applications = ApplicationProvisioner::new(&self.site_resolver).provision(
            self.api,
            &self.catalog.applications,
            &unlocks,
            console,
        );
        let app_status = applications.status.clone();
        report.unlocks = Some(unlocks);
        report.applications = Some(applications);

        match app_status {
            PassStatus::Committed => InstallStatus::Completed,
            PassStatus::Aborted { reason } => InstallStatus::Aborted { reason },
        }
    }
}

fn aborted(err: impl std::fmt::Display) -> InstallStatus {
    InstallStatus::Aborted {
        reason: err.to_string(),
    }
}
