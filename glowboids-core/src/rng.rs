/// Linear congruential generator driving spawn placement and idle re-injection.
///
/// Fully deterministic for a given seed so runs can be replayed bit for bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

/// One full turn, as the spawn and re-injection headings use it.
pub const TURN: f32 = 6.283_185_3;

impl Lcg {
    // LCG parameters from Numerical Recipes
    const A: u32 = 1_664_525;
    const C: u32 = 1_013_904_223;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed derived from the surface size the flock is created for.
    pub fn for_world(width: u32, height: u32) -> Self {
        Self::new(0x1234_ABCD ^ width.wrapping_mul(131).wrapping_add(height))
    }

    /// Seed drawn from the OS entropy source.
    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Generate next u32 value
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(Self::A).wrapping_add(Self::C);
        self.state
    }

    /// Float in `[0.0, 1.0)` built from bits 8..32 of the new state.
    pub fn next_f32(&mut self) -> f32 {
        let bits = (self.next_u32() >> 8) & 0x00FF_FFFF;
        bits as f32 / 16_777_216.0
    }

    /// Heading angle in radians, `[0, TURN)`.
    pub fn heading(&mut self) -> f32 {
        self.next_f32() * TURN
    }
}
