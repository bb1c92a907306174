//! Seeded randomness for world generation and test traffic.
//!
//! The engine itself draws no random numbers.  `SimRng` is for hosts, tools
//! and randomized tests that need the same layout and destinations on every
//! run of a given seed.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::Cell;

/// Golden-ratio multiplier shared by seed mixing and hash-interval phases.
pub(crate) const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed.wrapping_mul(MIXING_CONSTANT)))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// `None` for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// A uniform cell in the inclusive box spanned by `a` and `b`.
    pub fn cell_between(&mut self, a: Cell, b: Cell) -> Cell {
        Cell::new(
            self.0.gen_range(a.x.min(b.x)..=a.x.max(b.x)),
            self.0.gen_range(a.z.min(b.z)..=a.z.max(b.z)),
        )
    }
}
