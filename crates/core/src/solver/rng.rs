//! Counter-based per-cell random rolls
//!
//! A tick draws one seed from the session's engine RNG. Every stochastic rule then
//! derives its draws from `(tick seed, cell index, rule salt)` with splitmix64, so a
//! cell's rolls do not depend on which thread or in which order it is visited.

/// Salt for thunderstorm lightning strikes
pub const LIGHTNING: u64 = 0x6c69_6768_746e_696e;
/// Salt for fire contagion rolls
pub const CONTAGION: u64 = 0x636f_6e74_6167_696f;
/// Salt for stage advancement rolls
pub const GROWTH: u64 = 0x6772_6f77_7468_0000;

/// One step of the splitmix64 generator
#[inline(always)]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Deterministic stream of unit draws for one cell and one rule
#[derive(Debug, Clone)]
pub struct CellRoller {
    state: u64,
}

impl CellRoller {
    #[inline]
    pub fn new(tick_seed: u64, index: usize, salt: u64) -> Self {
        Self {
            state: splitmix64(tick_seed ^ salt) ^ splitmix64(index as u64),
        }
    }

    /// Next draw in `[0, 1)`
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        // Top 24 bits fill the f32 mantissa exactly
        (splitmix64(self.state) >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Bernoulli trial with probability `chance`
    #[inline]
    pub fn chance(&mut self, chance: f32) -> bool {
        self.next_f32() < chance
    }
}
