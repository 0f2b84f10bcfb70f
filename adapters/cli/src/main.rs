#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless zombie horde simulation.

mod autopilot;
mod config;
mod layout_transfer;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use horde_core::{Health, Material, NpcId, NpcVariant, ObstacleId};
use horde_simulation::{Config, Observer, Simulation};
use horde_world::query;
use layout_transfer::ArenaLayout;

/// Runs a headless zombie horde simulation with an autopilot player.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed overriding the configuration
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Arena width in world units
    #[arg(long)]
    width: Option<f32>,
    /// Arena height in world units
    #[arg(long)]
    height: Option<f32>,
    /// Arena layout transfer string to replay
    #[arg(long)]
    layout: Option<String>,
    /// Print the arena as a layout transfer string before running
    #[arg(long)]
    export_layout: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn configuration(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.arena_width = width;
        }
        if let Some(height) = self.height {
            config.arena_height = height;
        }
        Ok(config)
    }
}

/// Running totals reported at the end of a run.
#[derive(Debug, Default)]
struct Summary {
    ticks: u64,
    kills: u32,
    fire_kills: u32,
    obstacles_destroyed: u32,
    drops: usize,
    hits_taken: u32,
}

impl Observer for Summary {
    fn on_kill(&mut self, _npc: NpcId, _position: Vec2, variant: NpcVariant) {
        self.kills += 1;
        if variant == NpcVariant::Fire {
            self.fire_kills += 1;
        }
    }

    fn on_obstacle_destroyed(&mut self, obstacle: ObstacleId, material: Material, _center: Vec2) {
        log::debug!("obstacle {} ({material:?}) destroyed", obstacle.get());
        self.obstacles_destroyed += 1;
    }

    fn on_player_hit(&mut self, remaining: Health) {
        log::debug!("player hit, {} health left", remaining.get());
        self.hits_taken += 1;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = args.configuration()?;
    let mut simulation = match &args.layout {
        Some(encoded) => {
            let layout = ArenaLayout::decode(encoded).context("invalid --layout string")?;
            let bounds = layout.bounds();
            config.arena_width = bounds.width();
            config.arena_height = bounds.height();
            Simulation::from_layout(&config, layout.obstacles)
        }
        None => Simulation::new(&config),
    };

    if args.export_layout {
        let encoded = ArenaLayout::capture(simulation.world())
            .encode()
            .context("failed to export the arena layout")?;
        println!("{encoded}");
    }

    let summary = run(&mut simulation, args.ticks);
    let health = query::player(simulation.world()).map_or(0, |player| player.health.get());
    log::info!(
        "ran {} ticks: {} kills ({} fire), {} obstacles destroyed, {} drops, {} hits taken, player health {}",
        summary.ticks,
        summary.kills,
        summary.fire_kills,
        summary.obstacles_destroyed,
        summary.drops,
        summary.hits_taken,
        health
    );
    if simulation.is_over() {
        log::info!("the player was overrun");
    }

    Ok(())
}

fn run(simulation: &mut Simulation, ticks: u64) -> Summary {
    let mut summary = Summary::default();
    while summary.ticks < ticks && !simulation.is_over() {
        let input = autopilot::input(simulation.world());
        let _ = simulation.step_with(&input, &mut summary);
        summary.drops += simulation.drops().len();
        summary.ticks += 1;
    }
    summary
}
