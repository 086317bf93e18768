//! Command-line front end for the backend selection strategies.
//!
//! Loads backend groups from a TOML file and drives their strategies, either
//! to validate a config, to print a selection sequence, or to measure the
//! distribution across concurrent callers.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use balancer::config::load_config;
use balancer::observability::logging::init_logging;
use balancer::{BackendManager, LoadBalancer};

/// Label used for calls that returned no backend.
const NONE_LABEL: &str = "<none>";

#[derive(Parser)]
#[command(name = "balancer")]
#[command(about = "Backend selection strategies driven from a TOML pool file", long_about = None)]
struct Cli {
    /// Path to the pool configuration.
    #[arg(short, long, default_value = "balancer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and list groups
    Check,
    /// Print the first selections of a group in order
    Sequence {
        #[arg(short, long)]
        group: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        calls: usize,
    },
    /// Count selections spread over concurrent threads
    Simulate {
        #[arg(short, long)]
        group: String,
        #[arg(short = 'n', long, default_value_t = 10_000)]
        calls: usize,
        #[arg(short, long, default_value_t = 4)]
        threads: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;
    tracing::info!(path = ?cli.config, groups = config.groups.len(), "Configuration loaded");

    let manager = BackendManager::from_config(&config)?;

    let output = match cli.command {
        Commands::Check => {
            let groups: BTreeMap<&str, _> = config
                .groups
                .iter()
                .map(|g| {
                    (
                        g.name.as_str(),
                        json!({
                            "strategy": manager.strategy_name(&g.name),
                            "backends": g.backends.len(),
                        }),
                    )
                })
                .collect();
            json!({ "status": "ok", "groups": groups })
        }
        Commands::Sequence { group, calls } => {
            let lb = lookup(&manager, &group)?;
            let picks: Vec<String> = (0..calls).map(|_| label(lb.next_server())).collect();
            json!({ "group": group, "sequence": picks })
        }
        Commands::Simulate { group, calls, threads } => {
            let lb = lookup(&manager, &group)?;
            let threads = worker_count(threads);
            let counts = simulate(lb.as_ref(), calls, threads);
            json!({ "group": group, "calls": calls, "threads": threads, "counts": counts })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn lookup(manager: &BackendManager, group: &str) -> Result<Arc<dyn LoadBalancer>, String> {
    manager
        .strategy(group)
        .ok_or_else(|| format!("unknown group '{}'", group))
}

fn label(picked: Option<Arc<str>>) -> String {
    picked.map_or_else(|| NONE_LABEL.to_string(), |a| a.to_string())
}

/// Number of threads `simulate` actually runs.
fn worker_count(requested: usize) -> usize {
    requested.max(1)
}

/// Split `calls` across `threads` scoped threads and merge their counts.
fn simulate(lb: &dyn LoadBalancer, calls: usize, threads: usize) -> BTreeMap<String, usize> {
    let per_thread = calls / threads;
    let remainder = calls % threads;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let share = per_thread + usize::from(t < remainder);
                scope.spawn(move || {
                    let mut counts = BTreeMap::new();
                    for _ in 0..share {
                        *counts.entry(label(lb.next_server())).or_insert(0) += 1;
                    }
                    counts
                })
            })
            .collect();

        let mut merged = BTreeMap::new();
        for handle in handles {
            let counts: BTreeMap<String, usize> = match handle.join() {
                Ok(counts) => counts,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            for (address, count) in counts {
                *merged.entry(address).or_insert(0) += count;
            }
        }
        merged
    })
}
