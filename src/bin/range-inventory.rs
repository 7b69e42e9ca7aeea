// Copyright (c) 2025 - Cowboy AI, Inc.
//! Range Inventory
//!
//! Compiles a scenario description and prints its inventory as JSON.
//! When a machine query is given through the environment, prints the
//! resolved machine names instead.
//!
//! Run with: cargo run --bin range-inventory -- scenario.json
//!
//! Environment:
//! - `SCENARIO_PATH`: scenario file, when no argument is given
//! - `EDITION_PATH`: optional edition overrides file
//! - `RANGE_INSTANCES`, `RANGE_GUESTS`, `RANGE_COPIES`, `RANGE_EXCLUDE`:
//!   comma-separated query filters
//! - `RANGE_ALL_MACHINES`: include infrastructure machines in the query
//! - `RUST_LOG`: log filter (logs go to stderr)

use anyhow::{Context, Result};
use cyber_range_topology::{EditionOverrides, Inventory, MachineQuery, ScenarioDescription};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Configuration for one run
#[derive(Debug, Clone)]
struct RunConfig {
    /// Scenario description file
    scenario_path: PathBuf,
    /// Edition overrides file
    edition_path: Option<PathBuf>,
    /// Query to resolve, if any filter was set
    query: Option<MachineQuery>,
}

impl RunConfig {
    /// Load configuration from arguments and environment variables
    fn from_env() -> Result<Self> {
        let scenario_path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("SCENARIO_PATH").ok())
            .map(PathBuf::from)
            .context("No scenario given. Usage: range-inventory <scenario.json>")?;

        let edition_path = std::env::var("EDITION_PATH").ok().map(PathBuf::from);

        let instances: Vec<u32> = list_var("RANGE_INSTANCES")?;
        let guests: Vec<String> = list_var("RANGE_GUESTS")?;
        let copies: Vec<u32> = list_var("RANGE_COPIES")?;
        let exclude: Vec<String> = list_var("RANGE_EXCLUDE")?;
        let all_machines = std::env::var("RANGE_ALL_MACHINES")
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let has_filter = all_machines
            || !instances.is_empty()
            || !guests.is_empty()
            || !copies.is_empty()
            || !exclude.is_empty();
        let query = has_filter.then(|| {
            MachineQuery::new()
                .instances(instances)
                .guests(guests)
                .copies(copies)
                .only_instances(!all_machines)
                .exclude(exclude)
        });

        Ok(Self {
            scenario_path,
            edition_path,
            query,
        })
    }
}

/// Comma-separated list from an environment variable; unset means empty
fn list_var<T>(name: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(raw) = std::env::var(name) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<T>()
                .with_context(|| format!("Invalid value {item:?} in {name}"))
        })
        .collect()
}

fn load_description(config: &RunConfig) -> Result<ScenarioDescription> {
    let json = std::fs::read_to_string(&config.scenario_path)
        .with_context(|| format!("Failed to read {}", config.scenario_path.display()))?;
    let description = ScenarioDescription::from_json_str(&json)
        .with_context(|| format!("Failed to parse {}", config.scenario_path.display()))?;

    let Some(edition_path) = &config.edition_path else {
        return Ok(description);
    };
    let json = std::fs::read_to_string(edition_path)
        .with_context(|| format!("Failed to read {}", edition_path.display()))?;
    let overrides = EditionOverrides::from_json_str(&json)
        .with_context(|| format!("Failed to parse {}", edition_path.display()))?;
    debug!(?overrides, "applying edition overrides");
    Ok(description.with_overrides(&overrides))
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = RunConfig::from_env()?;
    info!("📋 Scenario: {}", config.scenario_path.display());

    let description = load_description(&config)?;
    let inventory = Inventory::compile(&description).context("Failed to compile scenario")?;
    info!(
        "✅ Compiled {} guests on {} networks",
        inventory.guests().len(),
        inventory.networks().len()
    );

    let output = match &config.query {
        Some(query) => {
            let names = inventory.resolve(query).context("Failed to resolve machines")?;
            serde_json::to_string_pretty(&names)?
        }
        None => inventory.to_json()?,
    };
    println!("{output}");

    Ok(())
}
