//! Unlocking the authentication sections before they are toggled.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::console::Console;
use crate::host::SectionUnlocker;
use crate::types::AuthSection;

/// Outcome of one unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockResult {
    pub section: AuthSection,
    pub unlocked: bool,
}

/// Per-section unlock flags gating the authentication toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockResults {
    pub results: Vec<UnlockResult>,
}

impl UnlockResults {
    pub fn from_flags(anonymous: bool, windows: bool) -> Self {
        Self {
            results: vec![
                UnlockResult {
                    section: AuthSection::Anonymous,
                    unlocked: anonymous,
                },
                UnlockResult {
                    section: AuthSection::Windows,
                    unlocked: windows,
                },
            ],
        }
    }

    /// A section without a recorded attempt counts as locked.
    pub fn is_unlocked(&self, section: AuthSection) -> bool {
        self.results
            .iter()
            .any(|r| r.section == section && r.unlocked)
    }
}

/// Drives the unlock capability and prints what the tool said.
pub struct ConfigSectionUnlocker<'a> {
    unlocker: &'a dyn SectionUnlocker,
}

impl<'a> ConfigSectionUnlocker<'a> {
    pub fn new(unlocker: &'a dyn SectionUnlocker) -> Self {
        Self { unlocker }
    }

    /// True when the tool could be started. That is all it tells us.
    pub fn unlock(&self, section_name: &str, console: &mut dyn Console) -> bool {
        let attempt = self.unlocker.unlock(section_name);
        if attempt.launched {
            if !attempt.output.is_empty() {
                console.say(&attempt.output);
            }
        } else {
            console.say(&format!(
                "Error unlocking section {}: {}",
                section_name, attempt.output
            ));
        }
        info!(section = section_name, launched = attempt.launched, "unlock attempted");
        attempt.launched
    }

    /// Attempt every authentication section independently.
    pub fn unlock_all(&self, console: &mut dyn Console) -> UnlockResults {
        let results = AuthSection::ALL
            .into_iter()
            .map(|section| UnlockResult {
                section,
                unlocked: self.unlock(section.section_name(), console),
            })
            .collect();
        UnlockResults { results }
    }
}
