//! The host world as the planner and plans see it.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use sn_core::{AgentId, AgentInfo, Cell, Target, ThingId};
use sn_region::{Reachability, RegionGraph, RegionMap};

/// Read-only access to the host world.
///
/// Implemented by the host's map/simulation object.  Every call reflects the
/// world *now*; the engine re-queries rather than caching between ticks.
pub trait World {
    type Graph: RegionGraph + Reachability;

    fn graph(&self) -> &Self::Graph;

    /// Snapshot of `agent`, or `None` if it no longer exists on this map.
    fn agent(&self, agent: AgentId) -> Option<AgentInfo>;

    /// Current position of a spawned thing on this map.
    fn thing_cell(&self, thing: ThingId) -> Option<Cell>;

    /// Cell a travel target currently points at, or `None` if the target is
    /// gone (destroyed, despawned, on another map) or off the map.
    fn resolve_target(&self, target: Target) -> Option<Cell> {
        let cell = match target {
            Target::Cell(c)  => c,
            Target::Thing(t) => self.thing_cell(t)?,
        };
        self.graph().in_bounds(cell).then_some(cell)
    }
}

// ── SimpleWorld ───────────────────────────────────────────────────────────────

/// A self-contained [`World`] over a [`RegionMap`]: agents and things in
/// plain maps.  Used by the demo and tests; real hosts implement `World` on
/// their own map type.
pub struct SimpleWorld {
    graph:  RegionMap,
    agents: BTreeMap<AgentId, AgentInfo>,
    things: FxHashMap<ThingId, Cell>,
}

impl SimpleWorld {
    pub fn new(graph: RegionMap) -> Self {
        Self { graph, agents: BTreeMap::new(), things: FxHashMap::default() }
    }

    pub fn graph_mut(&mut self) -> &mut RegionMap {
        &mut self.graph
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Insert or replace an agent.
    pub fn put_agent(&mut self, info: AgentInfo) {
        self.agents.insert(info.id, info);
    }

    pub fn agent_mut(&mut self, agent: AgentId) -> Option<&mut AgentInfo> {
        self.agents.get_mut(&agent)
    }

    pub fn remove_agent(&mut self, agent: AgentId) -> Option<AgentInfo> {
        self.agents.remove(&agent)
    }

    /// Move an agent.  Returns `false` if it does not exist.
    pub fn set_agent_cell(&mut self, agent: AgentId, cell: Cell) -> bool {
        match self.agents.get_mut(&agent) {
            Some(a) => {
                a.cell = cell;
                true
            }
            None => false,
        }
    }

    /// All agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentInfo> + '_ {
        self.agents.values()
    }

    // ── Things ────────────────────────────────────────────────────────────

    pub fn put_thing(&mut self, thing: ThingId, cell: Cell) {
        self.things.insert(thing, cell);
    }

    pub fn remove_thing(&mut self, thing: ThingId) -> Option<Cell> {
        self.things.remove(&thing)
    }
}

impl World for SimpleWorld {
    type Graph = RegionMap;

    fn graph(&self) -> &RegionMap {
        &self.graph
    }

    fn agent(&self, agent: AgentId) -> Option<AgentInfo> {
        self.agents.get(&agent).cloned()
    }

    fn thing_cell(&self, thing: ThingId) -> Option<Cell> {
        self.things.get(&thing).copied()
    }
}
