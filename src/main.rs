// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gcdns::{
    api::client::CloudDnsClient,
    constants::SWEEPER_TEST_PREFIX,
    data_sources::{read_compute_network, read_managed_zone},
    metrics::gather_metrics,
    model::RecordSetConfig,
    provider::ProviderConfig,
    reconcilers::RecordSetReconciler,
    state::StateFile,
    sweeper::sweep_record_sets,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Declarative Google Cloud DNS record-set reconciler.
#[derive(Parser, Debug)]
#[command(name = "gcdns", version, about)]
struct Cli {
    /// YAML provider configuration file
    #[arg(long, env = "GCDNS_PROVIDER_CONFIG")]
    provider_config: Option<PathBuf>,

    /// Default project, overriding the provider configuration
    #[arg(long)]
    project: Option<String>,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converge a record set to a YAML configuration
    Apply {
        /// Record-set configuration file
        #[arg(long)]
        config: PathBuf,
        /// State file
        #[arg(long)]
        state: PathBuf,
    },
    /// Re-read the record set in a state file
    Refresh {
        /// State file
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete the record set in a state file
    Destroy {
        /// State file
        #[arg(long)]
        state: PathBuf,
    },
    /// Adopt an existing record set into a state file
    Import {
        /// `projects/{p}/managedZones/{z}/rrsets/{name}/{type}`, `{p}/{z}/{name}/{type}` or `{z}/{name}/{type}`
        id: String,
        /// State file
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete record sets left behind by test runs
    Sweep {
        /// Managed zone name
        #[arg(long)]
        zone: String,
        /// Name prefix of record sets to delete
        #[arg(long, default_value = SWEEPER_TEST_PREFIX)]
        prefix: String,
    },
    /// Show a managed zone
    Zone {
        /// Managed zone name
        name: String,
    },
    /// Show a compute network
    Network {
        /// Network name
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("gcdns")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

/// Initialize logging on stderr so stdout carries only YAML output.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT` (`text` or `json`).
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

fn load_provider_config(cli: &Cli) -> Result<ProviderConfig> {
    let mut config = match &cli.provider_config {
        Some(path) => ProviderConfig::from_yaml_file(path)?,
        None => ProviderConfig::default(),
    };
    if let Some(project) = &cli.project {
        config.project = Some(project.clone());
    }
    config.apply_process_env();
    config.validate().context("Invalid provider configuration")?;
    Ok(config)
}

fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value).context("Failed to render output")?;
    print!("{yaml}");
    Ok(())
}

fn load_state(path: &Path) -> Result<StateFile> {
    match StateFile::load(path)? {
        Some(state) => Ok(state),
        None => bail!("No state file at {}", path.display()),
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_tracing();
    debug!("Logging initialized with file and line number tracking");

    let provider = load_provider_config(&cli)?;
    let client = Arc::new(
        CloudDnsClient::new(&provider).context("Failed to create Google API client")?,
    );
    let reconciler = RecordSetReconciler::new(client.clone(), provider.compute_base_path.clone());
    let default_project = provider.project.as_deref();
    let require_project = || {
        default_project
            .context("A project is required: set --project, the provider config or GOOGLE_PROJECT")
    };

    match &cli.command {
        Command::Apply { config, state } => {
            let contents = std::fs::read_to_string(config)
                .with_context(|| format!("Failed to read {}", config.display()))?;
            let desired_config: RecordSetConfig = serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", config.display()))?;
            let desired = desired_config.resolve(default_project)?;

            let prior = StateFile::load(state)?
                .map(|s| s.record_set())
                .transpose()?;
            let applied = reconciler.apply(prior.as_ref(), &desired).await?;

            let new_state = StateFile::new(&applied);
            new_state.save(state)?;
            info!(id = %new_state.id, "Applied record set");
            print_yaml(&new_state)?;
        }
        Command::Refresh { state } => {
            let current = load_state(state)?.record_set()?;
            match reconciler.read(&current.key).await? {
                Some(refreshed) => {
                    let new_state = StateFile::new(&refreshed);
                    new_state.save(state)?;
                    print_yaml(&new_state)?;
                }
                None => {
                    warn!(id = %current.key, "Record set no longer exists; removing it from state");
                    StateFile::remove(state)?;
                }
            }
        }
        Command::Destroy { state } => {
            let Some(existing) = StateFile::load(state)? else {
                info!(path = %state.display(), "Nothing to destroy");
                return Ok(());
            };
            let outcome = reconciler.delete(&existing.record_set()?).await?;
            StateFile::remove(state)?;
            print_yaml(&outcome)?;
        }
        Command::Import { id, state } => {
            let imported = reconciler.import(id, default_project).await?;
            let new_state = StateFile::new(&imported);
            new_state.save(state)?;
            print_yaml(&new_state)?;
        }
        Command::Sweep { zone, prefix } => {
            let report = sweep_record_sets(&reconciler, require_project()?, zone, prefix).await?;
            print_yaml(&report)?;
        }
        Command::Zone { name } => {
            let zone = read_managed_zone(&*client, require_project()?, name).await?;
            print_yaml(&zone)?;
        }
        Command::Network { name } => {
            let network = read_compute_network(&*client, require_project()?, name).await?;
            print_yaml(&network)?;
        }
    }

    if cli.print_metrics {
        eprint!("{}", gather_metrics()?);
    }

    Ok(())
}

#[cfg(test)]
mod main_tests;
