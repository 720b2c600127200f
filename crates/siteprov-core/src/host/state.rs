//! Serializable host configuration document used by [`super::FileHost`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::PoolSettings;
use crate::error::HostError;
use crate::types::{AuthSection, HostVersion, PipelineMode};

/// Whole host configuration: version, pools, sites and section locks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<HostVersion>,

    #[serde(default)]
    pub pools: Vec<PoolRecord>,

    #[serde(default)]
    pub sites: Vec<SiteRecord>,

    /// Section names locked at server level
    #[serde(default)]
    pub locked_sections: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub name: String,
    pub runtime_version: String,
    pub auto_start: bool,
    pub pipeline_mode: PipelineMode,
    #[serde(default)]
    pub identity: IdentityRecord,
}

/// Process identity of a pool. Passwords are never written to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentityRecord {
    #[default]
    ApplicationPoolIdentity,
    SpecificUser {
        user_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub path: String,
    pub physical_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    /// Application-level `enabled` overrides keyed by section name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, bool>,
}

impl HostState {
    pub fn pool(&self, name: &str) -> Option<&PoolRecord> {
        self.pools.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn pool_exists(&self, name: &str) -> bool {
        self.pool(name).is_some()
    }

    pub fn add_pool(&mut self, settings: &PoolSettings<'_>) -> Result<(), HostError> {
        if self.pool_exists(settings.name) {
            return Err(HostError::already_exists(format!(
                "application pool '{}'",
                settings.name
            )));
        }
        let identity = match settings.identity {
            Some(credential) => IdentityRecord::SpecificUser {
                user_name: credential.name().to_string(),
            },
            None => IdentityRecord::ApplicationPoolIdentity,
        };
        self.pools.push(PoolRecord {
            name: settings.name.to_string(),
            runtime_version: settings.runtime_version.to_string(),
            auto_start: settings.auto_start,
            pipeline_mode: settings.pipeline_mode,
            identity,
        });
        Ok(())
    }

    pub fn site_ids(&self) -> Vec<u32> {
        self.sites.iter().map(|s| s.id).collect()
    }

    pub fn site(&self, site_id: u32) -> Option<&SiteRecord> {
        self.sites.iter().find(|s| s.id == site_id)
    }

    fn site_mut(&mut self, site_id: u32) -> Result<&mut SiteRecord, HostError> {
        self.sites
            .iter_mut()
            .find(|s| s.id == site_id)
            .ok_or_else(|| HostError::not_found(format!("site with id {}", site_id)))
    }

    pub fn application(&self, site_id: u32, path: &str) -> Option<&ApplicationRecord> {
        self.site(site_id)?
            .applications
            .iter()
            .find(|a| a.path.eq_ignore_ascii_case(path))
    }

    fn application_mut(
        &mut self,
        site_id: u32,
        path: &str,
    ) -> Result<&mut ApplicationRecord, HostError> {
        self.site_mut(site_id)?
            .applications
            .iter_mut()
            .find(|a| a.path.eq_ignore_ascii_case(path))
            .ok_or_else(|| HostError::not_found(format!("application '{}'", path)))
    }

    pub fn add_application(
        &mut self,
        site_id: u32,
        path: &str,
        physical_path: &str,
    ) -> Result<(), HostError> {
        let site = self.site_mut(site_id)?;
        if site
            .applications
            .iter()
            .any(|a| a.path.eq_ignore_ascii_case(path))
        {
            return Err(HostError::already_exists(format!("application '{}'", path)));
        }
        site.applications.push(ApplicationRecord {
            path: path.to_string(),
            physical_path: physical_path.to_string(),
            pool: None,
            sections: BTreeMap::new(),
        });
        Ok(())
    }

    pub fn set_application_pool(
        &mut self,
        site_id: u32,
        path: &str,
        pool: &str,
    ) -> Result<(), HostError> {
        if !self.pool_exists(pool) {
            return Err(HostError::UnknownPool(pool.to_string()));
        }
        self.application_mut(site_id, path)?.pool = Some(pool.to_string());
        Ok(())
    }

    pub fn set_section_enabled(
        &mut self,
        site_id: u32,
        path: &str,
        section: AuthSection,
        enabled: bool,
    ) -> Result<(), HostError> {
        let name = section.section_name();
        if self.locked_sections.contains(name) {
            return Err(HostError::SectionLocked(name.to_string()));
        }
        self.application_mut(site_id, path)?
            .sections
            .insert(name.to_string(), enabled);
        Ok(())
    }

    /// Remove a server-level lock. Returns whether the section was locked.
    pub fn unlock_section(&mut self, section_name: &str) -> bool {
        self.locked_sections.remove(section_name)
    }

    /// Consistency checks run before a commit is persisted.
    pub fn validate(&self) -> Result<(), HostError> {
        let mut pools = HashSet::new();
        for pool in &self.pools {
            if !pools.insert(pool.name.to_lowercase()) {
                return Err(HostError::commit(format!(
                    "duplicate application pool '{}'",
                    pool.name
                )));
            }
        }

        let mut sites = HashSet::new();
        for site in &self.sites {
            if !sites.insert(site.id) {
                return Err(HostError::commit(format!("duplicate site id {}", site.id)));
            }
            for app in &site.applications {
                if let Some(pool) = &app.pool
                    && !pools.contains(&pool.to_lowercase())
                {
                    return Err(HostError::commit(format!(
                        "application '{}' references missing pool '{}'",
                        app.path, pool
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImpersonatedCredential;

    fn state_with_site() -> HostState {
        HostState {
            version: Some(HostVersion::new(10, 0)),
            sites: vec![SiteRecord {
                id: 1,
                name: "Default Web Site".to_string(),
                applications: Vec::new(),
            }],
            locked_sections: [AuthSection::Anonymous.section_name().to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    fn settings<'a>(
        name: &'a str,
        identity: Option<&'a ImpersonatedCredential>,
    ) -> PoolSettings<'a> {
        PoolSettings {
            name,
            runtime_version: "v4.0",
            auto_start: true,
            pipeline_mode: PipelineMode::Integrated,
            identity,
        }
    }

    #[test]
    fn test_pool_names_are_case_insensitive() {
        let mut state = state_with_site();
        state.add_pool(&settings("VergunningenPool", None)).unwrap();

        assert!(state.pool_exists("vergunningenpool"));
        let err = state.add_pool(&settings("VERGUNNINGENPOOL", None)).unwrap_err();
        assert!(matches!(err, HostError::AlreadyExists(_)));
    }

    #[test]
    fn test_specific_user_identity_keeps_no_secret() {
        let mut state = state_with_site();
        let credential = ImpersonatedCredential::new("svc", "s3cret");
        state.add_pool(&settings("P", Some(&credential))).unwrap();

        assert_eq!(
            state.pool("P").unwrap().identity,
            IdentityRecord::SpecificUser {
                user_name: "svc".to_string()
            }
        );
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("s3cret"));
    }

    #[test]
    fn test_duplicate_application_already_exists() {
        let mut state = state_with_site();
        state.add_application(1, "/app", r"C:\app").unwrap();

        let err = state.add_application(1, "/APP", r"C:\app").unwrap_err();
        assert!(matches!(err, HostError::AlreadyExists(_)));
    }

    #[test]
    fn test_add_application_to_missing_site() {
        let mut state = state_with_site();

        let err = state.add_application(9, "/app", r"C:\app").unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
    }

    #[test]
    fn test_assigning_unknown_pool_fails() {
        let mut state = state_with_site();
        state.add_application(1, "/app", r"C:\app").unwrap();

        let err = state.set_application_pool(1, "/app", "Nope").unwrap_err();
        assert!(matches!(err, HostError::UnknownPool(_)));
    }

    #[test]
    fn test_locked_section_rejects_mutation_until_unlocked() {
        let mut state = state_with_site();
        state.add_application(1, "/app", r"C:\app").unwrap();

        let err = state
            .set_section_enabled(1, "/app", AuthSection::Anonymous, false)
            .unwrap_err();
        assert!(matches!(err, HostError::SectionLocked(_)));

        assert!(state.unlock_section(AuthSection::Anonymous.section_name()));
        state
            .set_section_enabled(1, "/app", AuthSection::Anonymous, false)
            .unwrap();
        let app = state.application(1, "/app").unwrap();
        assert_eq!(
            app.sections.get(AuthSection::Anonymous.section_name()),
            Some(&false)
        );
    }

    #[test]
    fn test_validate_rejects_dangling_pool() {
        let mut state = state_with_site();
        state.add_application(1, "/app", r"C:\app").unwrap();
        state.sites[0].applications[0].pool = Some("Ghost".to_string());

        let err = state.validate().unwrap_err();
        assert!(matches!(err, HostError::Commit(_)));
    }
}
