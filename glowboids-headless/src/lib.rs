//! Runs the flock without a display and reports what it did.

use anyhow::{bail, Context, Result};
use glowboids_core::{DefaultFlock, Lcg, Vector2D, World, MAX_AGENTS};
use glowboids_shared::FlockSettings;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Where the flock's random generator gets its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// Derived from the world size, as the browser demo does.
    World,
    Fixed(u32),
    Entropy,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub dt: f32,
    pub attractor: Option<Vector2D>,
    pub agents: usize,
    pub seed: Seed,
    pub settings: FlockSettings,
    /// Write every n-th frame as a JSON line; `None` writes nothing per frame.
    pub emit_every: Option<u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frames: 600,
            dt: 1.0 / 60.0,
            attractor: None,
            agents: MAX_AGENTS,
            seed: Seed::World,
            settings: FlockSettings::default(),
            emit_every: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("world must be at least 1x1, got {}x{}", self.width, self.height);
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            bail!("dt must be a positive number of seconds, got {}", self.dt);
        }
        if self.agents == 0 || self.agents > MAX_AGENTS {
            bail!(
                "agent count must be between 1 and {}, got {}",
                MAX_AGENTS,
                self.agents
            );
        }
        if self.emit_every == Some(0) {
            bail!("frame emission interval must be at least 1");
        }
        self.settings
            .validate()
            .context("invalid flock settings")?;
        Ok(())
    }

    fn rng(&self) -> Lcg {
        match self.seed {
            Seed::World => Lcg::for_world(self.width, self.height),
            Seed::Fixed(seed) => Lcg::new(seed),
            Seed::Entropy => Lcg::from_entropy(),
        }
    }
}

/// One emitted frame: clip-space positions after `frame` updates.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FrameRecord {
    pub frame: u32,
    pub positions: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub agents: usize,
    /// Seed the generator started from.
    pub seed: u32,
    /// Mean agent speed after the last frame.
    pub mean_speed: f32,
    /// Highest agent speed seen on any frame.
    pub max_speed: f32,
    /// Highest clamped steering magnitude seen on any frame.
    pub max_acceleration: f32,
}

/// Parses `X,Y` screen coordinates.
pub fn parse_attractor(value: &str) -> Result<Vector2D> {
    let (x, y) = value
        .split_once(',')
        .with_context(|| format!("attractor must look like X,Y, got '{}'", value))?;
    let x: f32 = x.trim().parse().context("attractor X is not a number")?;
    let y: f32 = y.trim().parse().context("attractor Y is not a number")?;
    Ok(Vector2D::new(x, y))
}

pub fn load_settings(path: &Path) -> Result<FlockSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    FlockSettings::from_json(&json)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))
}

/// Runs `config.frames` updates, writing emitted frames to `out` as JSON lines.
pub fn run<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunSummary> {
    config.validate()?;

    let rng = config.rng();
    let seed = rng.state();
    let mut flock = DefaultFlock::with_rng(
        World::new(config.width, config.height),
        config.agents,
        config.settings.into(),
        rng,
    );

    log::info!(
        "Running {} agents on {}x{} for {} frames (dt {}, seed {:#010x})",
        flock.len(),
        config.width,
        config.height,
        config.frames,
        config.dt,
        seed
    );
    if let Some(attractor) = config.attractor {
        log::info!("Attractor fixed at ({}, {})", attractor.x, attractor.y);
    }

    let mut max_speed = 0.0f32;
    let mut max_acceleration = 0.0f32;

    for frame in 1..=config.frames {
        flock.update(config.dt, config.attractor);

        for agent in flock.agents.iter() {
            max_speed = max_speed.max(agent.velocity.magnitude());
            max_acceleration = max_acceleration.max(agent.acceleration.magnitude());
        }

        if let Some(every) = config.emit_every {
            if frame % every == 0 {
                let record = FrameRecord {
                    frame,
                    positions: flock.positions_for_render().to_vec(),
                };
                serde_json::to_writer(&mut *out, &record).context("Failed to write frame")?;
                writeln!(out).context("Failed to write frame")?;
                log::debug!("Emitted frame {}", frame);
            }
        }
    }

    let mean_speed = if flock.is_empty() {
        0.0
    } else {
        flock
            .agents
            .iter()
            .map(|agent| agent.velocity.magnitude())
            .sum::<f32>()
            / flock.len() as f32
    };

    let summary = RunSummary {
        frames: config.frames,
        agents: flock.len(),
        seed,
        mean_speed,
        max_speed,
        max_acceleration,
    };
    log::info!(
        "Finished: mean speed {:.1}, max speed {:.1}, max steering {:.1}",
        summary.mean_speed,
        summary.max_speed,
        summary.max_acceleration
    );

    Ok(summary)
}
