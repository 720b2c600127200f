use crate::types::{ApplicationSpec, AuthToggle, PipelineMode, PoolIdentity, PoolSpec};

const WWWROOT: &str = r"C:\inetpub\wwwroot";

/// Pools for the Cevi permit deployment, in creation order.
pub fn builtin_pools() -> Vec<PoolSpec> {
    vec![
        PoolSpec {
            name: "VergunningenPool".to_string(),
            runtime_version: "v4.0".to_string(),
            auto_start: true,
            pipeline_mode: PipelineMode::Integrated,
            identity: PoolIdentity::Collected,
        },
        PoolSpec {
            name: "DBAImportPool".to_string(),
            runtime_version: "v4.0".to_string(),
            auto_start: true,
            pipeline_mode: PipelineMode::Integrated,
            identity: PoolIdentity::Collected,
        },
        PoolSpec {
            name: "PlanregisterPool".to_string(),
            runtime_version: "v4.0".to_string(),
            auto_start: true,
            pipeline_mode: PipelineMode::Integrated,
            identity: PoolIdentity::Default,
        },
    ]
}

/// Applications for the Cevi permit deployment, in registration order.
pub fn builtin_applications() -> Vec<ApplicationSpec> {
    vec![
        application(
            "/Cevi/Services/WCF/Vergunningen.Service",
            r"Cevi\Services\WCF\Vergunningen.Service",
            "VergunningenPool",
        ),
        // Reporting is served from the Planregister.Service folder.
        application(
            "/Cevi/Services/WCF/Vergunningen.Reporting",
            r"Cevi\Services\WCF\Planregister.Service",
            "VergunningenPool",
        ),
        application(
            "/Cevi/Services/WCF/Planregister.Service",
            r"Cevi\Services\WCF\Planregister.Service",
            "PlanregisterPool",
        ),
        application(
            "/Cevi/Services/WCF/DBA.Service",
            r"Cevi\Services\WCF\DBA.Service",
            "DBAImportPool",
        ),
        ApplicationSpec {
            auth: Some(AuthToggle {
                enable_anonymous: false,
                enable_windows: true,
            }),
            ..application(
                "/Cevi/Vergunningen.Web",
                r"Cevi\Vergunningen.Web",
                "VergunningenPool",
            )
        },
    ]
}

fn application(url_path: &str, relative_dir: &str, pool: &str) -> ApplicationSpec {
    ApplicationSpec {
        url_path: url_path.to_string(),
        physical_path: format!(r"{}\{}", WWWROOT, relative_dir),
        pool: pool.to_string(),
        auth: None,
    }
}
