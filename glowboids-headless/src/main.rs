use anyhow::{Context, Result};
use clap::Parser;
use glowboids_core::{Vector2D, MAX_AGENTS};
use glowboids_headless::{load_settings, parse_attractor, run, RunConfig, Seed};
use glowboids_shared::FlockSettings;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the glowboids flock without a display", long_about = None)]
struct Args {
    /// World width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// World height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Seconds per frame (values above 0.05 are clamped by the engine)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Fixed attractor position as X,Y in pixels
    #[arg(short, long, value_parser = parse_attractor)]
    attractor: Option<Vector2D>,

    /// Number of agents
    #[arg(short = 'n', long, default_value_t = MAX_AGENTS)]
    agents: usize,

    /// Seed for the random generator (defaults to one derived from the world size)
    #[arg(long, conflicts_with = "random_seed")]
    seed: Option<u32>,

    /// Seed the random generator from the OS
    #[arg(long)]
    random_seed: bool,

    /// JSON file with flock settings; missing fields keep their defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Print every n-th frame's positions as a JSON line
    #[arg(short, long)]
    emit_frames: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = match &args.settings {
        Some(path) => {
            log::info!("Loading settings from {}", path.display());
            load_settings(path)?
        }
        None => FlockSettings::default(),
    };

    let seed = match (args.seed, args.random_seed) {
        (Some(seed), _) => Seed::Fixed(seed),
        (None, true) => Seed::Entropy,
        (None, false) => Seed::World,
    };

    let config = RunConfig {
        width: args.width,
        height: args.height,
        frames: args.frames,
        dt: args.dt,
        attractor: args.attractor,
        agents: args.agents,
        seed,
        settings,
        emit_every: args.emit_frames,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run(&config, &mut out).context("Simulation failed")?;

    serde_json::to_writer(&mut out, &summary).context("Failed to write summary")?;
    writeln!(out)?;

    Ok(())
}
