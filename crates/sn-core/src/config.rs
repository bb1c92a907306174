//! Engine configuration.
//!
//! A `SkipNetConfig` value is handed to the orchestrator at construction and
//! copied into the planner; nothing reads settings from global state.
//! Typically loaded from JSON by the application (`serde` feature).

use crate::{CoreError, CoreResult};

/// Which agents may request portal plans at all.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessMode {
    /// Every agent, hostile or not.
    #[default]
    Everyone,
    /// Any agent that is not hostile to the colony.
    FactionOnly,
    /// Colony members only.
    ColonistsOnly,
}

/// How a shortcut whose region cost equals the direct-travel estimate is
/// judged.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// Equal region cost is not better: reject (`shortcut < direct`).
    #[default]
    Reject,
    /// Equal region cost is settled by straight-line distance: the shortcut
    /// wins only if `agent → entry` plus `exit → target` is shorter than
    /// `agent → target`.
    Heuristic,
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkipNetConfig {
    /// Agent affiliation filter.  Default: `Everyone`.
    pub access_mode: AccessMode,

    /// When `false`, animals are refused unless they are being led.
    pub animals_can_use: bool,

    /// Ticks between per-plan portal accessibility checks.  Default: 60.
    pub accessibility_interval: u64,

    /// Ticks between per-plan entry→exit→target pathability checks.
    /// Default: 180.
    pub pathability_interval: u64,

    /// Minimum registered portals before any search is attempted.  Default: 2.
    pub min_portals: usize,

    /// Equal-cost shortcut policy.  Default: `Reject`.
    pub tie_break: TieBreak,

    /// Emit `Effect` directives around each teleport.  Default: `true`.
    pub teleport_flash: bool,
}

impl Default for SkipNetConfig {
    fn default() -> Self {
        Self {
            access_mode:            AccessMode::Everyone,
            animals_can_use:        true,
            accessibility_interval: 60,
            pathability_interval:   180,
            min_portals:            2,
            tie_break:              TieBreak::Reject,
            teleport_flash:         true,
        }
    }
}

impl SkipNetConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.accessibility_interval == 0 {
            return Err(CoreError::Config("accessibility_interval must be > 0".into()));
        }
        if self.pathability_interval == 0 {
            return Err(CoreError::Config("pathability_interval must be > 0".into()));
        }
        // A plan needs two distinct endpoints.
        if self.min_portals < 2 {
            return Err(CoreError::Config(format!(
                "min_portals must be at least 2, got {}",
                self.min_portals
            )));
        }
        Ok(())
    }
}
