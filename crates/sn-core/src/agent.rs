//! Per-agent facts the engine reads from the host world.
//!
//! `AgentInfo` is a plain value snapshot.  The host builds one on demand
//! (see `sn_planner::World::agent`); the engine never stores it across ticks.

use crate::{AgentId, Cell};

/// How an agent may move through door-like regions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraverseMode {
    /// Ordinary movement: the agent opens doors it is allowed to use.
    #[default]
    ByAgent,
    /// May pass any door, closed or not.
    PassDoors,
    /// Closed doors are walls (they may still be a destination).
    NoPassClosedDoors,
}

/// Parameters the region graph and reachability oracle use to decide whether
/// a specific agent may pass through a region.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraverseParams {
    pub agent: AgentId,
    pub mode:  TraverseMode,
}

impl TraverseParams {
    #[inline]
    pub fn for_agent(agent: AgentId) -> Self {
        Self { agent, mode: TraverseMode::ByAgent }
    }
}

/// Snapshot of one agent's state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentInfo {
    pub id:   AgentId,
    pub cell: Cell,

    // ── Presence ──────────────────────────────────────────────────────────
    /// On the managed map and simulated.
    pub spawned:   bool,
    /// Has a movement controller; agents without one cannot be given paths.
    pub has_mover: bool,

    // ── Affiliation ───────────────────────────────────────────────────────
    /// Belongs to the player's colony.
    pub colony_member: bool,
    /// Hostile to the player's colony.
    pub hostile:       bool,

    // ── Body ──────────────────────────────────────────────────────────────
    pub animal:    bool,
    /// Being led on a rope by another agent.
    pub led:       bool,
    pub downed:    bool,
    pub can_crawl: bool,

    pub traverse: TraverseMode,
}

impl AgentInfo {
    /// A spawned, non-hostile colony member standing on `cell`.
    pub fn colonist(id: AgentId, cell: Cell) -> Self {
        Self {
            id,
            cell,
            spawned:       true,
            has_mover:     true,
            colony_member: true,
            hostile:       false,
            animal:        false,
            led:           false,
            downed:        false,
            can_crawl:     false,
            traverse:      TraverseMode::ByAgent,
        }
    }

    #[inline]
    pub fn traverse_params(&self) -> TraverseParams {
        TraverseParams { agent: self.id, mode: self.traverse }
    }

    /// `false` when the agent's body forbids any travel at all.
    #[inline]
    pub fn can_travel(&self) -> bool {
        !self.downed || self.can_crawl
    }
}
