use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use rts_agent::{Worker, WorkerConfig, WorkerStatus};
use rts_kernel::{Bounds, Forest, ForestEvent};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rts-cli", about = "Headless runner for the lumberjack worker")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default worker tunables
    Info,
    /// Scatter trees and run the worker until it goes idle or the tick limit is hit
    Simulate {
        /// Number of trees to scatter
        #[arg(short, long, default_value = "20")]
        trees: usize,
        /// Seed for tree placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Give up after this many ticks
        #[arg(long, default_value = "1000000")]
        max_ticks: u64,
        /// Worker config file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// End-of-run report.
#[derive(Debug, Serialize)]
struct Report {
    ticks: u64,
    simulated_seconds: f32,
    trees_felled: usize,
    trees_standing: usize,
    final_state: String,
    final_position: [f32; 3],
    finished: bool,
}

fn load_config(path: &Path) -> anyhow::Result<WorkerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => WorkerConfig::from_json_str(&text),
        _ => WorkerConfig::from_yaml_str(&text),
    }
    .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn simulate(
    trees: usize,
    seed: u64,
    dt: f32,
    max_ticks: u64,
    config: WorkerConfig,
) -> anyhow::Result<Report> {
    anyhow::ensure!(
        dt.is_finite() && dt > 0.0,
        "dt must be finite and positive, got {dt}"
    );

    let mut forest = Forest::scatter(trees, seed, Bounds::default());
    tracing::debug!("{}", forest.summary());
    forest.drain_events();
    let mut worker = Worker::new(Vec3::new(0.0, 2.5, 0.0), config, &mut forest)?;
    tracing::info!(trees, seed, dt, "starting simulation");

    let mut ticks = 0;
    while ticks < max_ticks {
        worker.tick(dt, &mut forest);
        ticks += 1;
        // Stand-in for the render pass: mirror removals between ticks.
        for event in forest.drain_events() {
            if let ForestEvent::Felled { id, position } = event {
                tracing::debug!(tick = ticks, tree = %id.short(), ?position, "tree removed");
            }
        }
        if worker.status() == WorkerStatus::Idle {
            break;
        }
    }

    let p = worker.position();
    Ok(Report {
        ticks,
        simulated_seconds: ticks as f32 * dt,
        trees_felled: worker.trees_felled(),
        trees_standing: forest.len(),
        final_state: worker.state_name().to_owned(),
        final_position: [p.x, p.y, p.z],
        finished: worker.status() == WorkerStatus::Idle,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = WorkerConfig::default();
            println!("rts-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "worker: speed={} arrival_threshold={} chop_duration={} report_interval={}",
                config.speed, config.arrival_threshold, config.chop_duration, config.report_interval
            );
            let bounds = Bounds::default();
            println!(
                "forest bounds: x=[{}, {}] z=[{}, {}] height={}",
                bounds.min.x, bounds.max.x, bounds.min.y, bounds.max.y, bounds.height
            );
        }
        Commands::Simulate {
            trees,
            seed,
            dt,
            max_ticks,
            config,
            json,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => WorkerConfig::default(),
            };
            let report = simulate(trees, seed, dt, max_ticks, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Ticks: {} ({:.1}s simulated)",
                    report.ticks, report.simulated_seconds
                );
                println!(
                    "Trees: felled={} standing={}",
                    report.trees_felled, report.trees_standing
                );
                println!(
                    "Worker: state={} pos=({:.2}, {:.2}, {:.2})",
                    report.final_state,
                    report.final_position[0],
                    report.final_position[1],
                    report.final_position[2]
                );
                println!(
                    "Result: {}",
                    if report.finished { "OK" } else { "TICK LIMIT" }
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from(["rts-cli", "simulate", "--trees", "3", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Simulate {
                trees: 3,
                json: true,
                ..
            }
        ));
    }

    #[test]
    fn simulate_clears_small_forest() {
        let config = WorkerConfig {
            chop_duration: 0.5,
            ..WorkerConfig::default()
        };
        let report = simulate(3, 1, 0.02, 1_000_000, config).unwrap();
        assert!(report.finished);
        assert_eq!(report.trees_felled, 3);
        assert_eq!(report.trees_standing, 0);
        assert_eq!(report.final_state, "idle");
    }

    #[test]
    fn simulate_respects_tick_limit() {
        let report = simulate(5, 1, 0.016, 10, WorkerConfig::default()).unwrap();
        assert_eq!(report.ticks, 10);
        assert!(!report.finished);
        assert_eq!(report.trees_standing, 5);
    }

    #[test]
    fn simulate_zero_ticks_reports_pick_target() {
        let report = simulate(2, 1, 0.016, 0, WorkerConfig::default()).unwrap();
        assert_eq!(report.ticks, 0);
        assert_eq!(report.final_state, "pick_target");
        assert!(!report.finished);
    }

    #[test]
    fn simulate_rejects_bad_dt() {
        assert!(simulate(1, 1, -1.0, 10, WorkerConfig::default()).is_err());
    }
}
