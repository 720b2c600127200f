//! Section unlock through the external `appcmd` tool.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::{SectionUnlocker, UnlockAttempt};

/// Runs `<tool> unlock config /section:<name>` and captures its output.
///
/// Stdout comes first, followed by anything the tool wrote to stderr.
///
/// Only a failure to start the process counts as failure. The exit status is
/// logged but otherwise ignored.
#[derive(Debug, Clone)]
pub struct AppCmdUnlocker {
    tool: PathBuf,
}

impl AppCmdUnlocker {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }
}

impl SectionUnlocker for AppCmdUnlocker {
    fn unlock(&self, section_name: &str) -> UnlockAttempt {
        let section_arg = format!("/section:{}", section_name);
        let result = Command::new(&self.tool)
            .args(["unlock", "config", section_arg.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        match result {
            Ok(output) => {
                debug!(section = section_name, status = ?output.status, "unlock tool finished");
                UnlockAttempt::launched(combined_output(&output.stdout, &output.stderr))
            }
            Err(err) => {
                warn!(tool = %self.tool.display(), error = %err, "unlock tool could not start");
                UnlockAttempt::failed(err.to_string())
            }
        }
    }
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    [stdout.trim_end(), stderr.trim_end()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
