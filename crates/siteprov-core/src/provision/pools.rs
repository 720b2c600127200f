//! Application pool pass.
//!
//! All pools share one session and one commit. Any failure aborts the whole
//! pass, and pools created in it are then reported as not persisted.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::report::PassStatus;
use crate::console::Console;
use crate::error::HostError;
use crate::host::{ManagementApi, ManagementSession, PoolSettings};
use crate::types::{ImpersonatedCredential, PoolIdentity, PoolSpec, StepKind, StepOutcome};

const CREATED: &str = "created";
const ALREADY_EXISTS: &str = "already exists";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPassReport {
    pub outcomes: Vec<StepOutcome>,
    pub status: PassStatus,
}

impl PoolPassReport {
    pub fn passed(&self) -> bool {
        self.status.is_committed()
    }

    pub fn created(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.succeeded && o.message == CREATED)
    }

    pub fn already_present(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.succeeded && o.message == ALREADY_EXISTS)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PoolProvisioner;

impl PoolProvisioner {
    /// Ensure every pool in `specs` exists. Existing pools are left untouched.
    pub fn ensure_pools(
        &self,
        api: &dyn ManagementApi,
        specs: &[PoolSpec],
        identity: &ImpersonatedCredential,
        console: &mut dyn Console,
    ) -> PoolPassReport {
        console.say("Creating Application Pools...");
        let mut outcomes = Vec::with_capacity(specs.len());

        let result = match api.open_session() {
            Ok(mut session) => {
                self.create_missing(session.as_mut(), specs, identity, console, &mut outcomes)
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!(pools = specs.len(), "pool pass committed");
                PoolPassReport {
                    outcomes,
                    status: PassStatus::Committed,
                }
            }
            Err(err) => {
                warn!(error = %err, "pool pass aborted");
                console.say(&format!("Error Adding Application Pools: {}", err));
                let reason = err.to_string();
                for outcome in outcomes.iter_mut().filter(|o| o.message == CREATED) {
                    outcome.succeeded = false;
                    outcome.message = format!("not persisted: {}", reason);
                }
                PoolPassReport {
                    outcomes,
                    status: PassStatus::aborted(reason),
                }
            }
        }
    }

    fn create_missing(
        &self,
        session: &mut dyn ManagementSession,
        specs: &[PoolSpec],
        identity: &ImpersonatedCredential,
        console: &mut dyn Console,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Result<(), HostError> {
        for spec in specs {
            if session.pool_exists(&spec.name)? {
                outcomes.push(StepOutcome::succeeded(
                    StepKind::Pool,
                    &spec.name,
                    ALREADY_EXISTS,
                ));
                continue;
            }

            console.say(&format!("Creating {}...", spec.name));
            let settings = PoolSettings {
                name: &spec.name,
                runtime_version: &spec.runtime_version,
                auto_start: spec.auto_start,
                pipeline_mode: spec.pipeline_mode,
                identity: match spec.identity {
                    PoolIdentity::Collected => Some(identity),
                    PoolIdentity::Default => None,
                },
            };
            session.add_pool(&settings)?;
            outcomes.push(StepOutcome::succeeded(StepKind::Pool, &spec.name, CREATED));
        }

        session.commit()
    }
}
