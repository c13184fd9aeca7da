use crate::Vector2D;

/// Shortest signed displacement along one axis of a torus of size `extent`.
///
/// The result lies in `(-extent/2, extent/2]`. A non-positive extent means the
/// axis does not wrap and `delta` is returned as is.
pub fn wrap_distance(delta: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return delta;
    }
    let half = extent * 0.5;
    let mut wrapped = delta % extent;
    if wrapped > half {
        wrapped -= extent;
    } else if wrapped <= -half {
        wrapped += extent;
    }
    wrapped
}

/// Maps a coordinate into `[0, extent)`. A non-positive extent returns `value` as is.
pub fn wrap_mod(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return value;
    }
    let wrapped = value % extent;
    if wrapped < 0.0 {
        let shifted = wrapped + extent;
        // tiny negatives round up to `extent` itself
        if shifted >= extent {
            0.0
        } else {
            shifted
        }
    } else {
        wrapped
    }
}

/// Visible surface the flock lives on.
///
/// Neighbour distances treat it as a torus, while the edge force in
/// [`crate::behavior::edge_avoidance`] treats its borders as soft walls. Both
/// apply at the same time; the demo has always behaved this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct World {
    pub width: u32,
    pub height: u32,
}

impl World {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn extent(&self) -> Vector2D {
        Vector2D::new(self.width as f32, self.height as f32)
    }

    /// Position wrapped into `[0, width) × [0, height)`.
    pub fn screen_position(&self, position: Vector2D) -> Vector2D {
        Vector2D::new(
            wrap_mod(position.x, self.width as f32),
            wrap_mod(position.y, self.height as f32),
        )
    }

    /// Shortest displacement from `from` to `to` across the wrap edges.
    pub fn displacement(&self, from: Vector2D, to: Vector2D) -> Vector2D {
        Vector2D::new(
            wrap_distance(to.x - from.x, self.width as f32),
            wrap_distance(to.y - from.y, self.height as f32),
        )
    }

    /// Normalised device coordinates in `[-1, 1]²` with Y pointing up.
    pub fn clip_position(&self, position: Vector2D) -> [f32; 2] {
        let screen = self.screen_position(position);
        let inv_w = if self.width > 0 {
            1.0 / self.width as f32
        } else {
            0.0
        };
        let inv_h = if self.height > 0 {
            1.0 / self.height as f32
        } else {
            0.0
        };
        [
            screen.x * inv_w * 2.0 - 1.0,
            1.0 - screen.y * inv_h * 2.0,
        ]
    }
}
