#![cfg_attr(not(feature = "std"), no_std)]

use glowboids_core::{FlockConfig, Vector2D};
use serde::{Deserialize, Serialize};

/// Pointer state as a host reports it, in screen pixels.
///
/// `position: None` means the pointer left the surface and the flock goes
/// back to idle cruising.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AttractorUpdate {
    pub position: Option<[f32; 2]>,
}

impl AttractorUpdate {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Some([x, y]),
        }
    }

    pub fn cleared() -> Self {
        Self { position: None }
    }

    /// Attractor to hand to the engine; non-finite coordinates count as no
    /// pointer.
    pub fn attractor(&self) -> Option<Vector2D> {
        self.position
            .filter(|[x, y]| x.is_finite() && y.is_finite())
            .map(|[x, y]| Vector2D::new(x, y))
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Option<Vector2D>> for AttractorUpdate {
    fn from(attractor: Option<Vector2D>) -> Self {
        Self {
            position: attractor.map(|v| [v.x, v.y]),
        }
    }
}

/// Flock tuning as hosts load and send it.
///
/// Missing fields fall back to the shipped defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
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
    pub attractor_dead_zone: f32,
    pub forward_bias: f32,
    pub cruise_speed: f32,
    pub spawn_speed_min: f32,
    pub spawn_speed_range: f32,
    pub max_dt: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        FlockConfig::default().into()
    }
}

impl From<FlockConfig> for FlockSettings {
    fn from(c: FlockConfig) -> Self {
        Self {
            neighbor_radius: c.neighbor_radius,
            separation_radius: c.separation_radius,
            max_speed: c.max_speed,
            max_force: c.max_force,
            damp_active: c.damp_active,
            damp_idle: c.damp_idle,
            edge_threshold: c.edge_threshold,
            edge_force: c.edge_force,
            alignment_weight: c.alignment_weight,
            cohesion_weight: c.cohesion_weight,
            separation_weight: c.separation_weight,
            attractor_force: c.attractor_force,
            attractor_dead_zone: c.attractor_dead_zone,
            forward_bias: c.forward_bias,
            cruise_speed: c.cruise_speed,
            spawn_speed_min: c.spawn_speed_min,
            spawn_speed_range: c.spawn_speed_range,
            max_dt: c.max_dt,
        }
    }
}

impl From<FlockSettings> for FlockConfig {
    fn from(s: FlockSettings) -> Self {
        Self {
            neighbor_radius: s.neighbor_radius,
            separation_radius: s.separation_radius,
            max_speed: s.max_speed,
            max_force: s.max_force,
            damp_active: s.damp_active,
            damp_idle: s.damp_idle,
            edge_threshold: s.edge_threshold,
            edge_force: s.edge_force,
            alignment_weight: s.alignment_weight,
            cohesion_weight: s.cohesion_weight,
            separation_weight: s.separation_weight,
            attractor_force: s.attractor_force,
            attractor_dead_zone: s.attractor_dead_zone,
            forward_bias: s.forward_bias,
            cruise_speed: s.cruise_speed,
            spawn_speed_min: s.spawn_speed_min,
            spawn_speed_range: s.spawn_speed_range,
            max_dt: s.max_dt,
        }
    }
}

/// Why a [`FlockSettings`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// A field is NaN or infinite.
    NotFinite(&'static str),
    /// A field that must be strictly positive is not.
    NotPositive(&'static str),
    /// A damping factor is outside `(0, 1]`.
    DampingOutOfRange(&'static str),
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::NotFinite(field) => write!(f, "{field} must be a finite number"),
            SettingsError::NotPositive(field) => write!(f, "{field} must be greater than zero"),
            SettingsError::DampingOutOfRange(field) => {
                write!(f, "{field} must be in the range (0, 1]")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}

impl FlockSettings {
    fn fields(&self) -> [(&'static str, f32); 18] {
        [
            ("neighbor_radius", self.neighbor_radius),
            ("separation_radius", self.separation_radius),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("damp_active", self.damp_active),
            ("damp_idle", self.damp_idle),
            ("edge_threshold", self.edge_threshold),
            ("edge_force", self.edge_force),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("attractor_force", self.attractor_force),
            ("attractor_dead_zone", self.attractor_dead_zone),
            ("forward_bias", self.forward_bias),
            ("cruise_speed", self.cruise_speed),
            ("spawn_speed_min", self.spawn_speed_min),
            ("spawn_speed_range", self.spawn_speed_range),
            ("max_dt", self.max_dt),
        ]
    }

    /// Rejects values the engine cannot run with.
    ///
    /// Weights may be zero or negative; radii, limits and the edge threshold
    /// must be positive because the engine divides by them.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in self.fields() {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite(name));
            }
        }

        let positive = [
            ("neighbor_radius", self.neighbor_radius),
            ("separation_radius", self.separation_radius),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("edge_threshold", self.edge_threshold),
            ("max_dt", self.max_dt),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(SettingsError::NotPositive(name));
            }
        }

        for (name, value) in [("damp_active", self.damp_active), ("damp_idle", self.damp_idle)] {
            if value <= 0.0 || value > 1.0 {
                return Err(SettingsError::DampingOutOfRange(name));
            }
        }

        Ok(())
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot of a running demo reported back to the host page or CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockStatus {
    pub agent_count: usize,
    pub frame: u64,
    pub active: bool,
    pub attractor_active: bool,
}
