//! Deterministic PRNG shared by the coin-flip tie-break and map generation.

/// xorshift64 generator.
#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a generator. A zero seed is replaced by a fixed constant.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform-ish value in `[0, max)`; 0 when `max` is 0.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u32(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(max)) as u32
    }

    /// Fair coin.
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}
