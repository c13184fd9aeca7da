//! Host-facing wrapper that turns raw frame, pointer and key events into
//! flock updates.

use crate::{DefaultFlock, Vector2D, MAX_AGENTS};

/// Keys the demo listens to, named after their DOM `KeyboardEvent.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Resets the flock.
    Z,
    X,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "KeyZ" => Some(Key::Z),
            "KeyX" => Some(Key::X),
            _ => None,
        }
    }
}

/// The boids demo as a host sees it.
///
/// Starts paused; frames are ignored until [`Demo::set_active`] turns it on.
#[derive(Debug, Clone)]
pub struct Demo {
    flock: DefaultFlock,
    active: bool,
    attractor: Option<Vector2D>,
    reset_held: bool,
    last_tick: Option<f64>,
    frames: u64,
}

impl Demo {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_flock(DefaultFlock::new(width, height))
    }

    pub fn from_flock(flock: DefaultFlock) -> Self {
        Self {
            flock,
            active: false,
            attractor: None,
            reset_held: false,
            last_tick: None,
            frames: 0,
        }
    }

    pub fn flock(&self) -> &DefaultFlock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut DefaultFlock {
        &mut self.flock
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn attractor(&self) -> Option<Vector2D> {
        self.attractor
    }

    /// Number of frames that actually advanced the flock.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.reset_held = false;
        }
    }

    /// Latest pointer state in screen space; kept until overwritten.
    pub fn set_attractor(&mut self, x: f32, y: f32, present: bool) {
        self.attractor = present.then(|| Vector2D::new(x, y));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.flock.resize(width, height);
    }

    /// Advances one frame with an explicit delta. Returns whether the flock moved.
    pub fn frame_tick(&mut self, _time: f64, dt: f64) -> bool {
        if !self.active {
            return false;
        }
        self.flock.update(dt as f32, self.attractor);
        self.frames += 1;
        true
    }

    /// Advances one frame from a wall-clock timestamp in seconds.
    ///
    /// The delta is measured from the previous call, whether or not the demo
    /// was active then; the very first call yields zero.
    pub fn tick(&mut self, now: f64) -> bool {
        let dt = match self.last_tick {
            Some(previous) => now - previous,
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.frame_tick(now, dt)
    }

    /// Feeds a key transition. Returns `false` when the demo ignores it.
    ///
    /// `Z` resets once per press; auto-repeated key-downs are swallowed until
    /// the key is released.
    pub fn handle_key(&mut self, key: Key, pressed: bool) -> bool {
        if !self.active {
            return false;
        }
        if key == Key::Z {
            if pressed && !self.reset_held {
                self.flock.reset();
            }
            self.reset_held = pressed;
        }
        true
    }

    pub fn reset(&mut self) {
        self.flock.reset();
    }

    pub fn positions_for_render(&self) -> heapless::Vec<[f32; 2], MAX_AGENTS> {
        self.flock.positions_for_render()
    }

    pub fn write_clip_positions(&self, out: &mut [f32]) -> usize {
        self.flock.write_clip_positions(out)
    }
}
