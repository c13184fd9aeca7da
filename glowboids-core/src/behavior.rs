//! Steering forces acting on a single agent.
//!
//! Every function here is pure: it reads the pre-update state handed to it
//! and returns a force, leaving integration to [`crate::Flock::update`].

use crate::{sqrtf, Agent, FlockConfig, Vector2D, World};

/// Speeds at or below this are treated as zero.
pub const MIN_SPEED: f32 = 1e-4;

/// Squared distances at or below this produce no separation.
pub const SEPARATION_EPSILON: f32 = 1e-4;

/// Alignment, cohesion and separation from one scan over `others`.
///
/// `others` must not contain `agent` itself. Neighbours are found across the
/// wrap edges of `world`. Returns zero when nobody is within
/// `neighbor_radius`.
pub fn flocking<'a, I>(agent: &Agent, others: I, world: &World, config: &FlockConfig) -> Vector2D
where
    I: Iterator<Item = &'a Agent>,
{
    let neighbor_sq = config.neighbor_radius * config.neighbor_radius;
    let separation_sq = config.separation_radius * config.separation_radius;

    let mut velocity_sum = Vector2D::zero();
    let mut position_sum = Vector2D::zero();
    let mut separation = Vector2D::zero();
    let mut count = 0u32;

    for other in others {
        let offset = world.displacement(agent.position, other.position);
        let dist_sq = offset.length_squared();
        if dist_sq < neighbor_sq {
            velocity_sum += other.velocity;
            position_sum += agent.position + offset;
            // separation only ever sees agents already counted as neighbours
            if dist_sq < separation_sq && dist_sq > SEPARATION_EPSILON {
                separation -= offset / dist_sq;
            }
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let inv = 1.0 / count as f32;
    let alignment = (velocity_sum * inv - agent.velocity) * config.alignment_weight;
    let cohesion = (position_sum * inv - agent.position) * config.cohesion_weight;
    alignment + cohesion + separation * config.separation_weight
}

/// Constant-magnitude pull from `screen` toward the attractor, if there is one.
pub fn attraction(screen: Vector2D, attractor: Option<Vector2D>, config: &FlockConfig) -> Vector2D {
    let Some(target) = attractor else {
        return Vector2D::zero();
    };
    let offset = target - screen;
    let dist_sq = offset.length_squared();
    if dist_sq > config.attractor_dead_zone * config.attractor_dead_zone {
        offset * (1.0 / sqrtf(dist_sq)) * config.attractor_force
    } else {
        Vector2D::zero()
    }
}

/// Push away from any screen edge closer than `edge_threshold`.
///
/// Each of the four edges contributes independently, growing linearly from
/// zero at the threshold to `edge_force` at the edge. A zero-sized axis
/// contributes nothing.
pub fn edge_avoidance(screen: Vector2D, world: &World, config: &FlockConfig) -> Vector2D {
    let extent = world.extent();
    Vector2D::new(
        edge_axis(screen.x, world.width > 0, extent.x, config),
        edge_axis(screen.y, world.height > 0, extent.y, config),
    )
}

fn edge_axis(coord: f32, enabled: bool, extent: f32, config: &FlockConfig) -> f32 {
    if !enabled {
        return 0.0;
    }
    let threshold = config.edge_threshold;
    let mut force = 0.0;

    let low = coord;
    if low < threshold {
        force += config.edge_force * ((threshold - low) * (1.0 / threshold));
    }
    let high = extent - coord;
    if high < threshold {
        force -= config.edge_force * ((threshold - high) * (1.0 / threshold));
    }
    force
}

/// Small push along the current heading so cancelling forces cannot stall an agent.
pub fn forward_bias(velocity: Vector2D, config: &FlockConfig) -> Vector2D {
    let speed = velocity.magnitude();
    if speed > MIN_SPEED {
        velocity * (1.0 / speed) * config.forward_bias
    } else {
        Vector2D::zero()
    }
}

/// Total steering acceleration for `agent`, clamped to `max_force`.
pub fn steering<'a, I>(
    agent: &Agent,
    others: I,
    world: &World,
    attractor: Option<Vector2D>,
    config: &FlockConfig,
) -> Vector2D
where
    I: Iterator<Item = &'a Agent>,
{
    let screen = world.screen_position(agent.position);

    let mut acceleration = flocking(agent, others, world, config);
    acceleration += attraction(screen, attractor, config);
    acceleration += edge_avoidance(screen, world, config);
    acceleration += forward_bias(agent.velocity, config);

    acceleration.limit(config.max_force)
}
