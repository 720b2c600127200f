//! siteprov - web host provisioning
//!
//! Usage:
//!   siteprov              # Provision pools and applications (default)
//!   siteprov catalog      # Show what would be provisioned
//!   siteprov probe        # Show host version and gate decision

mod interactive;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siteprov_core::catalog::Catalog;
use siteprov_core::config::{ProbeKind, ProvisionConfig, UnlockKind};
use siteprov_core::console::Console;
use siteprov_core::context::HostContext;
use siteprov_core::provision::{CompatibilityGate, InstallReport, PassStatus};
use siteprov_core::types::StepKind;

use crate::interactive::TerminalConsole;

#[derive(Parser)]
#[command(name = "siteprov")]
#[command(about = "Provision application pools and applications on a web host", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/siteprov/siteprov.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Host state document backing the management API
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Where to read the host version from
    #[arg(long, global = true)]
    probe: Option<ProbeArg>,

    /// How locked authentication sections are unlocked
    #[arg(long, global = true)]
    unlock: Option<UnlockArg>,

    /// Unlock tool executable (with --unlock appcmd)
    #[arg(long, global = true)]
    unlock_tool: Option<PathBuf>,

    /// Give up on the site prompt after this many attempts (0 = never)
    #[arg(long)]
    max_site_attempts: Option<u32>,

    /// Output format for the final report
    #[arg(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Exit without waiting for enter
    #[arg(long)]
    no_pause: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision pools and applications
    Install,

    /// Show the effective pool and application catalog
    Catalog,

    /// Show the host version and whether it passes the gate
    Probe,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProbeArg {
    State,
    Registry,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnlockArg {
    State,
    Appcmd,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siteprov=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let ctx = HostContext::from_config(config)?;

    match cli.command.unwrap_or(Commands::Install) {
        Commands::Install => run_install(&ctx, cli.format, cli.no_pause),
        Commands::Catalog => print_catalog(ctx.catalog(), cli.format),
        Commands::Probe => run_probe(&ctx, cli.format),
    }
}

fn load_config(cli: &Cli) -> Result<ProvisionConfig> {
    let mut config = ProvisionConfig::load(cli.config.as_deref())?;

    if let Some(path) = &cli.state_file {
        config.host.state_file = path.clone();
    }
    if let Some(probe) = cli.probe {
        config.host.version_probe = match probe {
            ProbeArg::State => ProbeKind::State,
            ProbeArg::Registry => ProbeKind::Registry,
        };
    }
    if let Some(unlock) = cli.unlock {
        config.host.unlock = match unlock {
            UnlockArg::State => UnlockKind::State,
            UnlockArg::Appcmd => UnlockKind::Appcmd,
        };
    }
    if let Some(tool) = &cli.unlock_tool {
        config.host.unlock_tool = tool.clone();
    }
    if let Some(attempts) = cli.max_site_attempts {
        config.site.max_attempts = attempts;
    }

    tracing::debug!(
        state_file = %config.host.state_file.display(),
        probe = ?config.host.version_probe,
        unlock = ?config.host.unlock,
        "effective configuration"
    );
    Ok(config)
}

fn run_install(ctx: &HostContext, format: OutputFormat, no_pause: bool) -> Result<()> {
    let mut console = TerminalConsole::new();
    let report = ctx.orchestrator().run(&mut console);

    print_report(&report, format)?;

    if !no_pause {
        console.pause()?;
    }
    Ok(())
}

fn print_report(report: &InstallReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!();
            println!("  Summary");
            println!("  ───────────────────────────");
            println!("  Host version:  {}", report.version);

            if let Some(pools) = &report.pools {
                println!(
                    "  Pools:         {} created, {} already present{}",
                    pools.created().count(),
                    pools.already_present().count(),
                    pass_suffix(&pools.status)
                );
            }

            if let Some(apps) = &report.applications {
                let registered = apps
                    .outcomes_of(StepKind::Application)
                    .filter(|o| o.succeeded)
                    .count();
                let failed = apps
                    .outcomes_of(StepKind::Application)
                    .filter(|o| !o.succeeded)
                    .count();
                if let Some(site) = apps.site {
                    println!("  Site:          {}", site.site_id);
                }
                println!(
                    "  Applications:  {} registered, {} failed{}",
                    registered,
                    failed,
                    pass_suffix(&apps.status)
                );
                for outcome in apps.outcomes_of(StepKind::Authentication) {
                    let mark = if outcome.succeeded { "✓" } else { "⚠" };
                    println!("  {} {}: {}", mark, outcome.item_key, outcome.message);
                }
            }

            println!("  Result:        {}", report.status.summary_line());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

fn pass_suffix(status: &PassStatus) -> String {
    match status {
        PassStatus::Committed => String::new(),
        PassStatus::Aborted { reason } => format!(" (not committed: {})", reason),
    }
}

fn print_catalog(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("Application pools:");
            for pool in &catalog.pools {
                println!(
                    "  {:<20} {}  {:?}  auto_start={}  identity={:?}",
                    pool.name, pool.runtime_version, pool.pipeline_mode, pool.auto_start, pool.identity
                );
            }
            println!();
            println!("Applications:");
            for app in &catalog.applications {
                println!("  {:<45} -> {}", app.url_path, app.pool);
                println!("  {:<45}    {}", "", app.physical_path);
                if let Some(auth) = app.auth {
                    println!(
                        "  {:<45}    anonymous={} windows={}",
                        "", auth.enable_anonymous, auth.enable_windows
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(catalog)?);
        }
    }
    Ok(())
}

fn run_probe(ctx: &HostContext, format: OutputFormat) -> Result<()> {
    let version = CompatibilityGate::new(ctx.probe()).probe();
    let compatible = CompatibilityGate::decide(version);

    match format {
        OutputFormat::Table => {
            println!("Major Version = {}", version.major);
            println!("Minor Version = {}", version.minor);
            if compatible {
                println!("✓ Host meets the minimum requirements");
            } else {
                println!("⚠ Host does not meet the minimum requirements");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "version": version,
                "compatible": compatible,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
