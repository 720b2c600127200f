//! File-backed host: the management API over a JSON state document.
//!
//! A session holds an OS lock on `<state>.lock` for its lifetime, works on an
//! in-memory copy and writes the whole document on commit (temp file, then
//! rename).

use std::fs::{File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::state::HostState;
use super::{
    ManagementApi, ManagementSession, PoolSettings, SectionUnlocker, UnlockAttempt, VersionProbe,
};
use crate::error::HostError;
use crate::types::{AuthSection, HostVersion};

/// Host whose configuration lives in a JSON file.
#[derive(Debug, Clone)]
pub struct FileHost {
    state_path: PathBuf,
}

impl FileHost {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.state_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Read the state document. A missing file is an empty host.
    pub fn load(&self) -> Result<HostState, HostError> {
        if !self.state_path.exists() {
            return Ok(HostState::default());
        }
        let bytes = std::fs::read(&self.state_path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the state document in one step.
    pub fn save(&self, state: &HostState) -> Result<(), HostError> {
        if let Some(parent) = self.state_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        let mut tmp = self.state_path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.state_path)?;
        Ok(())
    }

    fn acquire(&self) -> Result<SessionLock, HostError> {
        SessionLock::acquire(self.lock_path())
    }
}

impl VersionProbe for FileHost {
    fn probe(&self) -> Option<HostVersion> {
        match self.load() {
            Ok(state) => state.version,
            Err(err) => {
                warn!(path = %self.state_path.display(), error = %err, "host state unreadable");
                None
            }
        }
    }
}

impl ManagementApi for FileHost {
    fn open_session(&self) -> Result<Box<dyn ManagementSession>, HostError> {
        let lock = self.acquire()?;
        let state = self.load()?;
        debug!(path = %self.state_path.display(), "opened management session");
        Ok(Box::new(FileSession {
            host: self.clone(),
            state,
            _lock: lock,
        }))
    }
}

/// Exclusive lock on the lock file, held while the handle is open.
///
/// The lock belongs to the open handle, not to the file on disk. The OS drops
/// it when the owning process exits, so a lock file left behind by a killed
/// run does not block later sessions. The file itself is never removed and
/// only records the pid of the last owner.
#[derive(Debug)]
struct SessionLock {
    path: PathBuf,
    file: File,
}

impl SessionLock {
    fn acquire(path: PathBuf) -> Result<Self, HostError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(HostError::SessionBusy(path.display().to_string()));
            }
            Err(TryLockError::Error(err)) => return Err(err.into()),
        }

        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;
        Ok(Self { path, file })
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            warn!(path = %self.path.display(), error = %err, "failed to release session lock");
        } else {
            debug!(path = %self.path.display(), "released management session");
        }
    }
}

struct FileSession {
    host: FileHost,
    state: HostState,
    _lock: SessionLock,
}

impl ManagementSession for FileSession {
    fn pool_exists(&mut self, name: &str) -> Result<bool, HostError> {
        Ok(self.state.pool_exists(name))
    }

    fn add_pool(&mut self, settings: &PoolSettings<'_>) -> Result<(), HostError> {
        self.state.add_pool(settings)
    }

    fn site_ids(&mut self) -> Result<Vec<u32>, HostError> {
        Ok(self.state.site_ids())
    }

    fn add_application(
        &mut self,
        site_id: u32,
        url_path: &str,
        physical_path: &str,
    ) -> Result<(), HostError> {
        self.state.add_application(site_id, url_path, physical_path)
    }

    fn set_application_pool(
        &mut self,
        site_id: u32,
        url_path: &str,
        pool: &str,
    ) -> Result<(), HostError> {
        self.state.set_application_pool(site_id, url_path, pool)
    }

    fn set_section_enabled(
        &mut self,
        site_id: u32,
        url_path: &str,
        section: AuthSection,
        enabled: bool,
    ) -> Result<(), HostError> {
        self.state.set_section_enabled(site_id, url_path, section, enabled)
    }

    fn commit(&mut self) -> Result<(), HostError> {
        self.state.validate()?;
        self.host
            .save(&self.state)
            .map_err(|err| HostError::commit(err.to_string()))?;
        debug!(path = %self.host.state_path.display(), "committed host changes");
        Ok(())
    }
}

/// Unlock capability for a [`FileHost`]: clears the server-level lock.
#[derive(Debug, Clone)]
pub struct StateFileUnlocker {
    host: FileHost,
}

impl StateFileUnlocker {
    pub fn new(host: FileHost) -> Self {
        Self { host }
    }

    fn try_unlock(&self, section_name: &str) -> Result<String, HostError> {
        let _lock = self.host.acquire()?;
        let mut state = self.host.load()?;
        if state.unlock_section(section_name) {
            self.host.save(&state)?;
        }
        Ok(format!(
            "Unlocked section \"{}\" at configuration path \"MACHINE/WEBROOT/APPHOST\".",
            section_name
        ))
    }
}

impl SectionUnlocker for StateFileUnlocker {
    fn unlock(&self, section_name: &str) -> UnlockAttempt {
        match self.try_unlock(section_name) {
            Ok(output) => UnlockAttempt::launched(output),
            Err(err) => UnlockAttempt::failed(err.to_string()),
        }
    }
}
