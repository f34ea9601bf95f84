// Seeded pseudo-random source for the block planner.
//
// xoshiro256++ (Blackman & Vigna, 2019) expanded from a single `u64` seed via
// SplitMix64. The planner draws on it for exactly two things: the 128 random
// bits behind every freshly minted block id, and the small integer jitter
// applied when a block leaves stock and lands near the foundation center.
//
// Everything else in the engine is a pure function of the block store, so
// owning the generator in one place (the session) keeps the whole editing
// history reproducible from `(seed, commands)`. The state derives serde so a
// saved session can resume the same stream.
//
// Integer-only core: no floating point feeds the generator state.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ state. One instance per planner session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerRng {
    s: [u64; 4],
}

impl PlannerRng {
    /// Seed a new generator. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// 16 random bytes, little-endian halves of two draws. Feeds UUID v4 ids.
    pub fn next_128_bits(&mut self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.next_u64().to_le_bytes());
        out[8..].copy_from_slice(&self.next_u64().to_le_bytes());
        out
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // (2^64 - span) % span
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform integer in `[-radius, radius]`. Radius 0 always yields 0 and
    /// does not advance the stream.
    pub fn symmetric_jitter(&mut self, radius: u32) -> i64 {
        if radius == 0 {
            return 0;
        }
        let span = 2 * u64::from(radius) + 1;
        self.range_u64(0, span) as i64 - i64::from(radius)
    }
}

/// SplitMix64 step, used only to expand the seed.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
