#![cfg_attr(not(feature = "std"), no_std)]

pub mod behavior;
pub mod driver;
pub mod flock;
pub mod rng;
pub mod torus;

pub use driver::{Demo, Key};
pub use flock::{Agent, Flock};
pub use rng::Lcg;
pub use torus::{wrap_distance, wrap_mod, World};

/// Number of agents in the reference flock.
pub const MAX_AGENTS: usize = 160;

/// The flock the browser demo runs.
pub type DefaultFlock = Flock<MAX_AGENTS>;

pub(crate) fn sqrtf(x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        x.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(x)
    }
}

pub(crate) fn sin_cos(angle: f32) -> (f32, f32) {
    #[cfg(feature = "std")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sinf(angle), libm::cosf(angle))
    }
}

/// A 2D vector used for position, velocity and acceleration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector at `angle` radians.
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = sin_cos(angle);
        Self { x: cos, y: sin }
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn magnitude(&self) -> f32 {
        sqrtf(self.length_squared())
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Rescales the vector uniformly so its magnitude does not exceed `max`.
    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            *self * (max / mag)
        } else {
            *self
        }
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl core::ops::MulAssign<f32> for Vector2D {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

/// Tuning constants for the flocking model.
///
/// `Default` carries the values the browser demo ships with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    pub neighbor_radius: f32,
    pub separation_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub damp_active: f32,
    pub damp_idle: f32,
    pub edge_threshold: f32,
    pub edge_force: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub attractor_force: f32,
    /// Radius around the attractor inside which it exerts no pull.
    pub attractor_dead_zone: f32,
    pub forward_bias: f32,
    /// Minimum idle speed; slower agents are pushed back up to it.
    pub cruise_speed: f32,
    pub spawn_speed_min: f32,
    pub spawn_speed_range: f32,
    /// Longest time step a single update will integrate.
    pub max_dt: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            neighbor_radius: 80.0,
            separation_radius: 90.0,
            max_speed: 600.0,
            max_force: 180.0,
            damp_active: 0.985,
            damp_idle: 0.9995,
            edge_threshold: 60.0,
            edge_force: 320.0,
            alignment_weight: 0.1,
            cohesion_weight: 0.08,
            separation_weight: 0.35,
            attractor_force: 160.0,
            attractor_dead_zone: 5.0,
            forward_bias: 6.0,
            cruise_speed: 80.0,
            spawn_speed_min: 60.0,
            spawn_speed_range: 40.0,
            max_dt: 0.05,
        }
    }
}

impl FlockConfig {
    /// Clamps a raw frame delta into `[0, max_dt]`; negative or non-finite deltas become zero.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            0.0
        } else if dt > self.max_dt {
            self.max_dt
        } else {
            dt
        }
    }
}
