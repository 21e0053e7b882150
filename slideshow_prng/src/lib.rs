// Seedable pseudo-random number generator for the slideshow optimizers.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Every randomized decision in `slideshow_engine` (which slide to relocate,
// where a re-routed window starts, the optional initial shuffle) draws from
// a `ShowRng` passed in explicitly by the caller. There is no global or
// thread-local generator anywhere in the workspace.
//
// Each dataset in a run owns a private stream created with
// `ShowRng::with_stream(seed, dataset_index)`, so parallel workers never
// share state and a run is reproducible from its seed alone regardless of
// how rayon schedules the workers.
//
// **Constraint: reproducibility.** Given the same seed, every method must
// yield the same sequence on every platform. Integer arithmetic only in the
// core generator; no OS entropy, no clock.

use serde::{Deserialize, Serialize};

/// Odd constant used to spread stream numbers across the seed space before
/// SplitMix64 expansion (the 64-bit golden ratio).
const STREAM_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// Xoshiro256++ generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRng {
    s: [u64; 4],
}

impl ShowRng {
    /// Create a generator seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
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

    /// Create the generator for one independent stream of a run.
    ///
    /// Streams with the same `seed` but different `stream` numbers produce
    /// unrelated sequences; the same pair always produces the same sequence.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut mixed = stream.wrapping_mul(STREAM_SPREAD);
        Self::new(seed ^ splitmix64(&mut mixed))
    }

    /// Generate the next `u64` in the sequence.
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

    /// Uniform integer in `[low, high)`, without modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        // (2^64 - range) % range
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform `usize` in `[low, high]`. Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "range_usize_inclusive: low must be <= high");
        self.range_u64(low as u64, high as u64 + 1) as usize
    }

    /// Shuffle a slice in place (Fisher-Yates, back to front).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range_usize_inclusive(0, i);
            items.swap(i, j);
        }
    }
}

/// SplitMix64 step, used only to expand seeds.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
