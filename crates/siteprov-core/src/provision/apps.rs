//! Application pass.
//!
//! Each application is registered independently: a failure is recorded and
//! the loop moves on. The pass commits once at the end.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::report::PassStatus;
use super::site::SiteResolver;
use super::unlock::UnlockResults;
use crate::console::Console;
use crate::host::{ManagementApi, ManagementSession};
use crate::types::{
    ApplicationSpec, AuthSection, AuthToggle, SiteSelection, StepKind, StepOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPassReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteSelection>,
    pub outcomes: Vec<StepOutcome>,
    pub status: PassStatus,
}

impl ApplicationPassReport {
    fn aborted(reason: String) -> Self {
        Self {
            site: None,
            outcomes: Vec::new(),
            status: PassStatus::Aborted { reason },
        }
    }

    pub fn passed(&self) -> bool {
        self.status.is_committed()
    }

    pub fn outcomes_of(&self, kind: StepKind) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(move |o| o.kind == kind)
    }
}

pub struct ApplicationProvisioner<'a> {
    resolver: &'a SiteResolver,
}

impl<'a> ApplicationProvisioner<'a> {
    pub fn new(resolver: &'a SiteResolver) -> Self {
        Self { resolver }
    }

    /// Open a session, resolve the target site, then register `specs`.
    pub fn provision(
        &self,
        api: &dyn ManagementApi,
        specs: &[ApplicationSpec],
        unlocks: &UnlockResults,
        console: &mut dyn Console,
    ) -> ApplicationPassReport {
        let mut session = match api.open_session() {
            Ok(session) => session,
            Err(err) => return ApplicationPassReport::aborted(err.to_string()),
        };
        console.say("Adding Applications...");

        let site_ids = match session.site_ids() {
            Ok(ids) => ids,
            Err(err) => return ApplicationPassReport::aborted(err.to_string()),
        };
        let site = match self.resolver.resolve(console, &site_ids) {
            Ok(site) => site,
            Err(err) => return ApplicationPassReport::aborted(err.to_string()),
        };

        self.ensure_applications(session.as_mut(), specs, site, unlocks, console)
    }

    /// Register every application under `site` and commit once.
    pub fn ensure_applications(
        &self,
        session: &mut dyn ManagementSession,
        specs: &[ApplicationSpec],
        site: SiteSelection,
        unlocks: &UnlockResults,
        console: &mut dyn Console,
    ) -> ApplicationPassReport {
        let mut outcomes = Vec::new();
        for spec in specs {
            register(session, site, spec, unlocks, console, &mut outcomes);
        }

        let status = match session.commit() {
            Ok(()) => {
                info!(site_id = site.site_id, "application pass committed");
                PassStatus::Committed
            }
            Err(err) => {
                warn!(error = %err, "application commit failed");
                PassStatus::aborted(err.to_string())
            }
        };

        ApplicationPassReport {
            site: Some(site),
            outcomes,
            status,
        }
    }
}

fn register(
    session: &mut dyn ManagementSession,
    site: SiteSelection,
    spec: &ApplicationSpec,
    unlocks: &UnlockResults,
    console: &mut dyn Console,
    outcomes: &mut Vec<StepOutcome>,
) {
    let name = spec.display_name();
    let result = session
        .add_application(site.site_id, &spec.url_path, &spec.physical_path)
        .and_then(|()| session.set_application_pool(site.site_id, &spec.url_path, &spec.pool));

    if let Err(err) = result {
        console.say(&format!("Error {}: {}", name, err));
        outcomes.push(StepOutcome::failed(
            StepKind::Application,
            &spec.url_path,
            err.to_string(),
        ));
        return;
    }

    console.say(&format!(
        "Converted {} to application and added it to {}",
        name, spec.pool
    ));
    outcomes.push(StepOutcome::succeeded(
        StepKind::Application,
        &spec.url_path,
        format!("registered in {}", spec.pool),
    ));

    if let Some(toggle) = spec.auth {
        for section in AuthSection::ALL {
            outcomes.push(toggle_section(
                session, site, spec, toggle, section, unlocks, console,
            ));
        }
    }
}

fn toggle_section(
    session: &mut dyn ManagementSession,
    site: SiteSelection,
    spec: &ApplicationSpec,
    toggle: AuthToggle,
    section: AuthSection,
    unlocks: &UnlockResults,
    console: &mut dyn Console,
) -> StepOutcome {
    let key = format!("{}#{}", spec.url_path, section.label());

    if !unlocks.is_unlocked(section) {
        console.say(&format!("Unable to unlock {}", section));
        return StepOutcome::failed(StepKind::Authentication, key, "unable to unlock");
    }

    let enabled = toggle.enabled_for(section);
    match session.set_section_enabled(site.site_id, &spec.url_path, section, enabled) {
        Ok(()) => {
            let verb = if enabled { "Activated" } else { "Deactivated" };
            console.say(&format!("{} {} authentication", verb, section.label()));
            let state = if enabled { "enabled" } else { "disabled" };
            StepOutcome::succeeded(StepKind::Authentication, key, state)
        }
        Err(err) => {
            console.say(&format!("Error {}: {}", spec.display_name(), err));
            StepOutcome::failed(StepKind::Authentication, key, err.to_string())
        }
    }
}
