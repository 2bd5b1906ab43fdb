//! Deterministic seeded random provider
//!
//! Every seeder builds one [`SeedRng`] from the shared master seed plus its own
//! additive offset and threads it (`&mut`) through all generation calls. The
//! same seed and the same call order reproduce the same demo dataset
//! bit-for-bit, which keeps review databases stable across re-runs.
//!
//! There is deliberately no global RNG state anywhere in this crate; the handle
//! is always an explicit parameter.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Per-subsystem seed offsets. Each seeder draws from its own stream so that
/// adding draws to one seeder does not shift the output of another.
pub mod offsets {
    pub const ACTIVITY: u64 = 5000;
    pub const MANAGER_HOTSPOTS: u64 = 5100;
    pub const RETALIATION: u64 = 5200;
    pub const REPEAT_SUBJECTS: u64 = 5300;
    pub const KNOWLEDGE_BASE: u64 = 5400;
    pub const POLICIES: u64 = 5500;
    pub const ORG: u64 = 5600;
    pub const DISCLOSURES: u64 = 5700;
}

/// Deterministic random source for demo-data generation.
///
/// Thin wrapper around `StdRng` so seeders depend on a small, swappable
/// surface instead of the `rand` API directly.
#[derive(Debug)]
pub struct SeedRng {
    rng: StdRng,
}

impl SeedRng {
    /// Create a generator from an absolute seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator for one subsystem: master seed plus additive offset.
    pub fn with_offset(master_seed: u64, offset: u64) -> Self {
        Self::new(master_seed.wrapping_add(offset))
    }

    /// Inclusive integer in `[min, max]`. `min > max` is treated as the
    /// degenerate single-value range `min`.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Float in `[min, max)`.
    pub fn random_float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform choice from a non-empty slice. Returns `None` on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// True with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Sample up to `n` distinct elements without replacement.
    pub fn sample_distinct<T: Clone>(&mut self, items: &[T], n: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.rng, n.min(items.len()))
            .cloned()
            .collect()
    }

    /// Deterministic UUID derived from the stream. Demo entities need ids that
    /// are stable across re-runs with the same seed, so `Uuid::new_v4()` is not
    /// used for generated records.
    pub fn uuid(&mut self) -> Uuid {
        Uuid::from_u128(self.rng.gen())
    }

    /// Raw uniform draw in `[0, 1)`, used by roulette selection.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
