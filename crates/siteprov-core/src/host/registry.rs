//! Version probe reading the InetStp registry key through `reg query`.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use super::VersionProbe;
use crate::types::HostVersion;

const INETSTP_KEY: &str = r"HKLM\Software\Microsoft\InetStp";

/// Probe that shells out to `reg.exe`.
#[derive(Debug, Clone)]
pub struct RegistryProbe {
    program: PathBuf,
}

impl Default for RegistryProbe {
    fn default() -> Self {
        Self::new("reg")
    }
}

impl RegistryProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn query(&self, value_name: &str) -> Option<u32> {
        let output = Command::new(&self.program)
            .args(["query", INETSTP_KEY, "/v", value_name])
            .output();
        let output = match output {
            Ok(output) => output,
            Err(err) => {
                debug!(value = value_name, error = %err, "registry query could not start");
                return None;
            }
        };
        if !output.status.success() {
            debug!(value = value_name, status = ?output.status, "registry value missing");
            return None;
        }
        parse_reg_dword(&String::from_utf8_lossy(&output.stdout), value_name)
    }
}

impl VersionProbe for RegistryProbe {
    fn probe(&self) -> Option<HostVersion> {
        let major = self.query("MajorVersion")?;
        let minor = self.query("MinorVersion")?;
        Some(HostVersion::new(major, minor))
    }
}

/// Extract a REG_DWORD value from `reg query` output.
///
/// Expects a line of the form `    MajorVersion    REG_DWORD    0xa`.
pub fn parse_reg_dword(output: &str, value_name: &str) -> Option<u32> {
    output.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let kind = parts.next()?;
        let data = parts.next()?;
        if !name.eq_ignore_ascii_case(value_name) || kind != "REG_DWORD" {
            return None;
        }
        match data.strip_prefix("0x").or_else(|| data.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => data.parse().ok(),
        }
    })
}
