use crate::behavior::{self, MIN_SPEED};
use crate::{FlockConfig, Lcg, Vector2D, World};

/// A single flocking agent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Agent {
    /// Unbounded world position; wrapped only when read.
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Steering applied during the most recent update, after clamping.
    pub acceleration: Vector2D,
}

impl Agent {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
        }
    }

    /// Fresh agent anywhere on screen with a random heading.
    ///
    /// Draws x, y, heading and speed from `rng`, in that order.
    pub fn spawn(rng: &mut Lcg, world: &World, config: &FlockConfig) -> Self {
        let extent = world.extent();
        let position = Vector2D::new(rng.next_f32() * extent.x, rng.next_f32() * extent.y);
        let heading = rng.heading();
        let speed = config.spawn_speed_min + rng.next_f32() * config.spawn_speed_range;
        Self::new(position, Vector2D::from_angle(heading) * speed)
    }

    /// Applies `acceleration` for `dt` seconds: speed cap, damping, idle
    /// cruise floor, then the position step.
    fn integrate(
        &mut self,
        acceleration: Vector2D,
        dt: f32,
        attracted: bool,
        config: &FlockConfig,
        rng: &mut Lcg,
    ) {
        self.acceleration = acceleration;

        let mut velocity = (self.velocity + acceleration * dt).limit(config.max_speed);
        velocity *= if attracted {
            config.damp_active
        } else {
            config.damp_idle
        };

        if !attracted {
            let cruise = config.cruise_speed.min(config.max_speed);
            let speed = velocity.magnitude();
            if speed < cruise {
                if speed > MIN_SPEED {
                    velocity *= cruise / speed;
                } else {
                    velocity = Vector2D::from_angle(rng.heading()) * cruise;
                }
            }
        }

        self.position += velocity * dt;
        self.velocity = velocity;
    }
}

/// Fixed-capacity flock on a wrapping world.
///
/// Holds at most `N` agents inline, so it needs no allocator. The agent count
/// is fixed at construction; [`Flock::reset`] re-rolls every agent in place.
#[derive(Debug, Clone)]
pub struct Flock<const N: usize> {
    pub agents: heapless::Vec<Agent, N>,
    pub config: FlockConfig,
    world: World,
    rng: Lcg,
}

impl<const N: usize> Flock<N> {
    /// Full flock of `N` agents seeded from the surface size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_count(width, height, N)
    }

    /// Flock of `count` agents, saturating at `N`.
    pub fn with_count(width: u32, height: u32, count: usize) -> Self {
        Self::with_rng(
            World::new(width, height),
            count,
            FlockConfig::default(),
            Lcg::for_world(width, height),
        )
    }

    pub fn with_seed(width: u32, height: u32, count: usize, seed: u32) -> Self {
        Self::with_rng(
            World::new(width, height),
            count,
            FlockConfig::default(),
            Lcg::new(seed),
        )
    }

    pub fn with_rng(world: World, count: usize, config: FlockConfig, rng: Lcg) -> Self {
        let mut flock = Self {
            agents: heapless::Vec::new(),
            config,
            world,
            rng,
        };
        for _ in 0..count.min(N) {
            let agent = Agent::spawn(&mut flock.rng, &flock.world, &flock.config);
            // count is capped at N above
            let _ = flock.agents.push(agent);
        }
        flock
    }

    /// Flock made of hand-placed agents; anything past `N` is dropped.
    ///
    /// The generator is still seeded from the surface size, so idle
    /// re-injection stays reproducible.
    pub fn from_agents<I>(width: u32, height: u32, agents: I) -> Self
    where
        I: IntoIterator<Item = Agent>,
    {
        Self {
            agents: agents.into_iter().take(N).collect(),
            config: FlockConfig::default(),
            world: World::new(width, height),
            rng: Lcg::for_world(width, height),
        }
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn rng(&self) -> &Lcg {
        &self.rng
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Re-rolls every agent's position and velocity; the agent count is kept.
    pub fn reset(&mut self) {
        for agent in self.agents.iter_mut() {
            *agent = Agent::spawn(&mut self.rng, &self.world, &self.config);
        }
    }

    /// Stores new bounds. Existing positions are not rescaled.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.world = World::new(width, height);
    }

    /// Advances every agent by one frame.
    ///
    /// `dt` is clamped to `config.max_dt`. All steering is computed against a
    /// snapshot taken before any agent moves, so results do not depend on
    /// agent order. `attractor` is in screen space.
    pub fn update(&mut self, dt: f32, attractor: Option<Vector2D>) {
        let dt = self.config.clamp_dt(dt);
        let snapshot = self.agents.clone();

        for (i, agent) in self.agents.iter_mut().enumerate() {
            let others = snapshot
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| other);
            let acceleration =
                behavior::steering(&snapshot[i], others, &self.world, attractor, &self.config);
            agent.integrate(
                acceleration,
                dt,
                attractor.is_some(),
                &self.config,
                &mut self.rng,
            );
        }
    }

    /// Screen-space positions wrapped into the world rectangle.
    pub fn screen_positions(&self) -> impl Iterator<Item = Vector2D> + '_ {
        self.agents
            .iter()
            .map(move |agent| self.world.screen_position(agent.position))
    }

    /// Clip-space `[x, y]` per agent, in `[-1, 1]²` with Y up.
    pub fn positions_for_render(&self) -> heapless::Vec<[f32; 2], N> {
        self.agents
            .iter()
            .map(|agent| self.world.clip_position(agent.position))
            .collect()
    }

    /// Writes interleaved clip-space `x, y` pairs into `out`.
    ///
    /// Returns how many agents were written, which is less than `len()` when
    /// `out` is too short.
    pub fn write_clip_positions(&self, out: &mut [f32]) -> usize {
        let mut written = 0;
        for (slot, agent) in out.chunks_exact_mut(2).zip(self.agents.iter()) {
            let [x, y] = self.world.clip_position(agent.position);
            slot[0] = x;
            slot[1] = y;
            written += 1;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_creation() {
        let agent = Agent::new(Vector2D::new(10.0, 20.0), Vector2D::new(1.0, 1.0));

        assert_eq!(agent.position.x, 10.0);
        assert_eq!(agent.position.y, 20.0);
        assert_eq!(agent.velocity.x, 1.0);
        assert_eq!(agent.velocity.y, 1.0);
        assert_eq!(agent.acceleration, Vector2D::zero());
    }

    #[test]
    fn test_spawn_within_bounds() {
        let world = World::new(800, 600);
        let config = FlockConfig::default();
        let mut rng = Lcg::new(7);
        for _ in 0..500 {
            let agent = Agent::spawn(&mut rng, &world, &config);
            assert!((0.0..800.0).contains(&agent.position.x));
            assert!((0.0..600.0).contains(&agent.position.y));
            let speed = agent.velocity.magnitude();
            assert!((60.0 - 1e-3..100.0 + 1e-3).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn test_flock_creation() {
        let flock = Flock::<160>::new(800, 600);
        assert_eq!(flock.len(), 160);
        assert_eq!(flock.world(), World::new(800, 600));
    }

    #[test]
    fn test_with_count_saturates() {
        let flock = Flock::<8>::with_count(800, 600, 50);
        assert_eq!(flock.len(), 8);
        let flock = Flock::<8>::with_count(800, 600, 3);
        assert_eq!(flock.len(), 3);
    }

    #[test]
    fn test_flock_update_moves_agents() {
        let mut flock = Flock::<10>::new(800, 600);
        let initial: heapless::Vec<Vector2D, 10> =
            flock.agents.iter().map(|a| a.position).collect();

        flock.update(0.016, None);

        let changed = flock
            .agents
            .iter()
            .zip(initial.iter())
            .any(|(a, &before)| a.position != before);
        assert!(changed);
    }

    #[test]
    fn test_zero_dt_keeps_positions() {
        let mut flock = Flock::<10>::new(800, 600);
        let before = flock.agents.clone();
        flock.update(0.0, None);
        for (a, b) in flock.agents.iter().zip(before.iter()) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_reset_keeps_count_and_rerolls() {
        let mut flock = Flock::<32>::with_count(800, 600, 20);
        for _ in 0..10 {
            flock.update(0.02, Some(Vector2D::new(400.0, 300.0)));
        }
        let before = flock.agents.clone();
        flock.reset();
        assert_eq!(flock.len(), 20);
        assert_ne!(flock.agents, before);
        assert!(flock
            .agents
            .iter()
            .all(|a| a.acceleration == Vector2D::zero()));
    }

    #[test]
    fn test_resize_does_not_move_agents() {
        let mut flock = Flock::<16>::new(800, 600);
        let before = flock.agents.clone();
        flock.resize(1024, 768);
        assert_eq!(flock.agents, before);
        assert_eq!(flock.world(), World::new(1024, 768));
    }

    #[test]
    fn test_stored_positions_are_not_wrapped() {
        let agent = Agent::new(Vector2D::new(799.0, 300.0), Vector2D::new(500.0, 0.0));
        let mut flock = Flock::<1>::from_agents(800, 600, [agent]);
        flock.update(0.05, None);
        assert!(flock.agents[0].position.x > 800.0);
        let screen: heapless::Vec<Vector2D, 1> = flock.screen_positions().collect();
        assert!(screen[0].x < 800.0);
    }

    #[test]
    fn test_write_clip_positions_short_buffer() {
        let flock = Flock::<4>::new(800, 600);
        let mut out = [0.0f32; 5];
        assert_eq!(flock.write_clip_positions(&mut out), 2);

        let mut full = [0.0f32; 8];
        assert_eq!(flock.write_clip_positions(&mut full), 4);
        let render = flock.positions_for_render();
        for (i, [x, y]) in render.iter().enumerate() {
            assert_eq!(full[i * 2], *x);
            assert_eq!(full[i * 2 + 1], *y);
        }
    }

    fn lone_agent(velocity: Vector2D) -> Flock<1> {
        Flock::from_agents(800, 600, [Agent::new(Vector2D::new(400.0, 300.0), velocity)])
    }

    /// Speed before damping, rebuilt from the steering the update applied.
    fn undamped_speed(start: Vector2D, agent: &Agent, dt: f32) -> f32 {
        (start + agent.acceleration * dt)
            .limit(FlockConfig::default().max_speed)
            .magnitude()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= expected * 1e-5,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_attracted_agent_uses_active_damping() {
        let start = Vector2D::new(200.0, 0.0);
        let mut flock = lone_agent(start);

        flock.update(0.02, Some(Vector2D::new(400.0, 200.0)));

        let agent = flock.agents[0];
        assert_ne!(agent.acceleration, Vector2D::zero());
        let expected = undamped_speed(start, &agent, 0.02) * 0.985;
        assert_close(agent.velocity.magnitude(), expected);
    }

    #[test]
    fn test_attracted_agent_is_not_raised_to_cruise() {
        let start = Vector2D::new(10.0, 0.0);
        let mut flock = lone_agent(start);

        flock.update(0.02, Some(Vector2D::new(400.0, 200.0)));

        let agent = flock.agents[0];
        let speed = agent.velocity.magnitude();
        assert!(speed < 20.0, "speed {speed}");
        assert_close(speed, undamped_speed(start, &agent, 0.02) * 0.985);
    }

    #[test]
    fn test_idle_agent_uses_idle_damping() {
        let start = Vector2D::new(200.0, 0.0);
        let mut flock = lone_agent(start);

        flock.update(0.02, None);

        let agent = flock.agents[0];
        // forward bias only: no neighbours and far from every edge
        assert_close(agent.acceleration.x, 6.0);
        let expected = undamped_speed(start, &agent, 0.02) * 0.9995;
        assert_close(agent.velocity.magnitude(), expected);
    }

    #[test]
    fn test_slow_idle_agent_is_raised_to_cruise() {
        let mut flock = lone_agent(Vector2D::new(10.0, 0.0));
        let rng_before = flock.rng().clone();

        flock.update(0.02, None);

        assert_close(flock.agents[0].velocity.magnitude(), 80.0);
        assert!(flock.agents[0].velocity.x > 0.0);
        // heading kept, so no random draw
        assert_eq!(flock.rng(), &rng_before);
    }

    #[test]
    fn test_degenerate_world_does_not_panic() {
        let mut flock = Flock::<8>::new(0, 0);
        for _ in 0..20 {
            flock.update(0.016, Some(Vector2D::new(10.0, 10.0)));
        }
        assert!(flock
            .agents
            .iter()
            .all(|a| a.position.x.is_finite() && a.position.y.is_finite()));
    }
}
