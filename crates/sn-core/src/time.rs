//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter advanced once per host
//! simulation step.  Everything the engine schedules (portal wait windows,
//! periodic plan re-validation) is expressed in whole ticks.

use std::fmt;

use crate::rng::MIXING_CONSTANT;

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `true` on one tick out of every `interval`, phase-shifted by `key`.
    ///
    /// Spreads periodic per-agent work across ticks: two agents with
    /// different keys rarely fire on the same tick, but each fires exactly
    /// once in any window of `interval` consecutive ticks.  `interval == 0`
    /// never fires.
    #[inline]
    pub fn is_hash_interval(self, key: u64, interval: u64) -> bool {
        if interval == 0 {
            return false;
        }
        let phase = key.wrapping_mul(MIXING_CONSTANT) >> 32;
        self.0.wrapping_add(phase) % interval == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
