#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use siteprov_core::error::HostError;
use siteprov_core::host::{
    ManagementApi, ManagementSession, PoolSettings, SectionUnlocker, UnlockAttempt, VersionProbe,
};
use siteprov_core::types::{AuthSection, HostVersion};

/// Recorded state behind a [`FakeHost`].
#[derive(Debug, Default)]
pub struct HostSpy {
    pub pools: Vec<String>,
    pub site_ids: Vec<u32>,
    pub conflicting_paths: Vec<String>,
    pub locked: Vec<AuthSection>,
    pub fail_open: bool,
    pub fail_commit: bool,

    pub calls: Vec<String>,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub commits: usize,
    pub section_values: HashMap<(String, AuthSection), bool>,
}

/// In-memory management API that records every call.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    spy: Rc<RefCell<HostSpy>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default().with_sites(&[1])
    }

    pub fn with_pools(self, names: &[&str]) -> Self {
        self.spy.borrow_mut().pools = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_sites(self, ids: &[u32]) -> Self {
        self.spy.borrow_mut().site_ids = ids.to_vec();
        self
    }

    pub fn with_conflict(self, url_path: &str) -> Self {
        self.spy
            .borrow_mut()
            .conflicting_paths
            .push(url_path.to_string());
        self
    }

    pub fn with_locked(self, section: AuthSection) -> Self {
        self.spy.borrow_mut().locked.push(section);
        self
    }

    pub fn failing_open(self) -> Self {
        self.spy.borrow_mut().fail_open = true;
        self
    }

    pub fn failing_commit(self) -> Self {
        self.spy.borrow_mut().fail_commit = true;
        self
    }

    pub fn spy(&self) -> std::cell::Ref<'_, HostSpy> {
        self.spy.borrow()
    }

    pub fn calls(&self) -> Vec<String> {
        self.spy.borrow().calls.clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    /// Calls that change host state.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                ["add_pool", "add_application", "set_application_pool", "set_section", "commit"]
                    .iter()
                    .any(|p| c.starts_with(p))
            })
            .collect()
    }

    pub fn open_sessions(&self) -> usize {
        let spy = self.spy.borrow();
        spy.sessions_opened - spy.sessions_closed
    }
}

impl ManagementApi for FakeHost {
    fn open_session(&self) -> Result<Box<dyn ManagementSession>, HostError> {
        let mut spy = self.spy.borrow_mut();
        spy.calls.push("open_session".to_string());
        if spy.fail_open {
            return Err(HostError::SessionBusy("fake".to_string()));
        }
        spy.sessions_opened += 1;
        Ok(Box::new(FakeSession {
            spy: Rc::clone(&self.spy),
            pending_pools: Vec::new(),
        }))
    }
}

struct FakeSession {
    spy: Rc<RefCell<HostSpy>>,
    pending_pools: Vec<String>,
}

impl FakeSession {
    fn record(&self, call: String) {
        self.spy.borrow_mut().calls.push(call);
    }

    fn knows_pool(&self, name: &str) -> bool {
        self.pending_pools.iter().any(|p| p == name)
            || self.spy.borrow().pools.iter().any(|p| p == name)
    }
}

impl ManagementSession for FakeSession {
    fn pool_exists(&mut self, name: &str) -> Result<bool, HostError> {
        Ok(self.knows_pool(name))
    }

    fn add_pool(&mut self, settings: &PoolSettings<'_>) -> Result<(), HostError> {
        let identity = settings.identity.map(|c| c.name().to_string());
        self.record(format!(
            "add_pool {} identity={}",
            settings.name,
            identity.as_deref().unwrap_or("default")
        ));
        self.pending_pools.push(settings.name.to_string());
        Ok(())
    }

    fn site_ids(&mut self) -> Result<Vec<u32>, HostError> {
        Ok(self.spy.borrow().site_ids.clone())
    }

    fn add_application(
        &mut self,
        site_id: u32,
        url_path: &str,
        _physical_path: &str,
    ) -> Result<(), HostError> {
        self.record(format!("add_application {} {}", site_id, url_path));
        if self.spy.borrow().conflicting_paths.iter().any(|p| p == url_path) {
            return Err(HostError::already_exists(format!("application '{}'", url_path)));
        }
        Ok(())
    }

    fn set_application_pool(
        &mut self,
        _site_id: u32,
        url_path: &str,
        pool: &str,
    ) -> Result<(), HostError> {
        self.record(format!("set_application_pool {} {}", url_path, pool));
        if !self.knows_pool(pool) {
            return Err(HostError::UnknownPool(pool.to_string()));
        }
        Ok(())
    }

    fn set_section_enabled(
        &mut self,
        _site_id: u32,
        url_path: &str,
        section: AuthSection,
        enabled: bool,
    ) -> Result<(), HostError> {
        self.record(format!("set_section {} {} {}", url_path, section.label(), enabled));
        let mut spy = self.spy.borrow_mut();
        if spy.locked.contains(&section) {
            return Err(HostError::SectionLocked(section.section_name().to_string()));
        }
        spy.section_values.insert((url_path.to_string(), section), enabled);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), HostError> {
        self.record("commit".to_string());
        let mut spy = self.spy.borrow_mut();
        if spy.fail_commit {
            return Err(HostError::commit("configuration validation failed"));
        }
        spy.commits += 1;
        spy.pools.append(&mut self.pending_pools);
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.spy.borrow_mut().sessions_closed += 1;
    }
}

pub struct FakeProbe(pub Option<HostVersion>);

impl FakeProbe {
    pub fn version(major: u32, minor: u32) -> Self {
        Self(Some(HostVersion::new(major, minor)))
    }
}

impl VersionProbe for FakeProbe {
    fn probe(&self) -> Option<HostVersion> {
        self.0
    }
}

/// Unlock tool stub: launches for the given sections only.
#[derive(Debug, Default)]
pub struct FakeUnlocker {
    launches: Vec<AuthSection>,
    pub attempts: RefCell<Vec<String>>,
}

impl FakeUnlocker {
    pub fn all() -> Self {
        Self::only(&AuthSection::ALL)
    }

    pub fn only(sections: &[AuthSection]) -> Self {
        Self {
            launches: sections.to_vec(),
            attempts: RefCell::new(Vec::new()),
        }
    }
}

impl SectionUnlocker for FakeUnlocker {
    fn unlock(&self, section_name: &str) -> UnlockAttempt {
        self.attempts.borrow_mut().push(section_name.to_string());
        if self
            .launches
            .iter()
            .any(|s| s.section_name() == section_name)
        {
            UnlockAttempt::launched(format!("Unlocked section \"{}\"", section_name))
        } else {
            UnlockAttempt::failed("The system cannot find the file specified.")
        }
    }
}
