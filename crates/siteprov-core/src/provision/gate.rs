//! Host version gate.

use tracing::info;

use crate::host::VersionProbe;
use crate::types::{HostVersion, MIN_SUPPORTED_MAJOR};

/// Decides whether the host is new enough to provision.
pub struct CompatibilityGate<'a> {
    probe: &'a dyn VersionProbe,
}

impl<'a> CompatibilityGate<'a> {
    pub fn new(probe: &'a dyn VersionProbe) -> Self {
        Self { probe }
    }

    /// Probe the host. Missing or malformed data yields 0.0.
    pub fn probe(&self) -> HostVersion {
        let version = self.probe.probe().unwrap_or(HostVersion::ABSENT);
        info!(%version, "probed host version");
        version
    }

    pub fn decide(version: HostVersion) -> bool {
        version.major >= MIN_SUPPORTED_MAJOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<HostVersion>);

    impl VersionProbe for Fixed {
        fn probe(&self) -> Option<HostVersion> {
            self.0
        }
    }

    #[test]
    fn test_absent_version_is_zero() {
        let probe = Fixed(None);
        let gate = CompatibilityGate::new(&probe);

        assert_eq!(gate.probe(), HostVersion::ABSENT);
        assert!(!CompatibilityGate::decide(gate.probe()));
    }

    #[test]
    fn test_decide_threshold() {
        assert!(!CompatibilityGate::decide(HostVersion::new(6, 9)));
        assert!(CompatibilityGate::decide(HostVersion::new(7, 0)));
        assert!(CompatibilityGate::decide(HostVersion::new(10, 0)));
    }
}
