//! A cell-by-cell walker standing in for the host's movement system.
//!
//! Paths are breadth-first over orthogonal steps through regions the agent
//! may pass.  Agents advance one cell per tick.

use std::collections::{BTreeMap, VecDeque};

use rustc_hash::FxHashMap;

use sn_core::{AgentId, Cell, PathEndMode, Tick, TravelRequest, TraverseParams};
use sn_planner::{SimpleWorld, World};
use sn_region::{RegionGraph, RegionMap};

/// What happened to an agent on one call to [`Mover::step`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Step {
    /// No path.
    Idle,
    /// Held in place by a cooldown.
    Holding,
    Walking,
    /// Completed the path this tick.
    Arrived,
    /// The next cell became impassable; the request is handed back for a
    /// repath.
    Blocked(TravelRequest),
}

struct Walk {
    request: TravelRequest,
    path:    VecDeque<Cell>,
}

#[derive(Default)]
pub struct Mover {
    walks:      BTreeMap<AgentId, Walk>,
    held_until: BTreeMap<AgentId, Tick>,
}

impl Mover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute and store a path for `request`.  `false` when no path exists
    /// (the agent keeps no walk in that case).
    pub fn start(&mut self, world: &SimpleWorld, agent: AgentId, request: TravelRequest) -> bool {
        self.walks.remove(&agent);
        let (Some(info), Some(goal)) = (world.agent(agent), world.resolve_target(request.target)) else {
            return false;
        };
        match find_path(world.graph(), &info.traverse_params(), info.cell, goal, request.end_mode) {
            Some(path) => {
                self.walks.insert(agent, Walk { request, path });
                true
            }
            None => false,
        }
    }

    pub fn stop(&mut self, agent: AgentId) {
        self.walks.remove(&agent);
    }

    pub fn hold(&mut self, agent: AgentId, until: Tick) {
        self.held_until.insert(agent, until);
    }

    pub fn release(&mut self, agent: AgentId) {
        self.held_until.remove(&agent);
    }

    /// The request the agent is walking toward.
    pub fn current(&self, agent: AgentId) -> Option<TravelRequest> {
        self.walks.get(&agent).map(|w| w.request)
    }

    pub fn step(&mut self, world: &mut SimpleWorld, agent: AgentId, now: Tick) -> Step {
        if self.held_until.get(&agent).is_some_and(|&until| now < until) {
            return Step::Holding;
        }
        let Some(walk) = self.walks.get_mut(&agent) else {
            return Step::Idle;
        };
        let Some(next) = walk.path.pop_front() else {
            self.walks.remove(&agent);
            return Step::Arrived;
        };

        let passable = world
            .agent(agent)
            .is_some_and(|info| walkable(world.graph(), &info.traverse_params(), next, true));
        if !passable {
            let request = walk.request;
            self.walks.remove(&agent);
            return Step::Blocked(request);
        }

        world.set_agent_cell(agent, next);
        if walk.path.is_empty() {
            self.walks.remove(&agent);
            Step::Arrived
        } else {
            Step::Walking
        }
    }
}

fn walkable(graph: &RegionMap, traverse: &TraverseParams, cell: Cell, as_destination: bool) -> bool {
    graph
        .region_at(cell)
        .is_some_and(|r| graph.allows(r, traverse, as_destination))
}

/// Cells to visit after `from`, ending where `end_mode` is satisfied.
/// Empty when already there; `None` when unreachable.
pub fn find_path(
    graph:    &RegionMap,
    traverse: &TraverseParams,
    from:     Cell,
    goal:     Cell,
    end_mode: PathEndMode,
) -> Option<VecDeque<Cell>> {
    if end_mode == PathEndMode::None {
        return None;
    }
    if end_mode.reached(from, goal) {
        return Some(VecDeque::new());
    }

    let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
    let mut queue = VecDeque::from([from]);
    came_from.insert(from, from);

    while let Some(cell) = queue.pop_front() {
        for next in cell.neighbors_8().take(4) {
            if came_from.contains_key(&next) {
                continue;
            }
            let done = end_mode.reached(next, goal);
            if !walkable(graph, traverse, next, done) {
                continue;
            }
            came_from.insert(next, cell);
            if done {
                return Some(unwind(&came_from, from, next));
            }
            queue.push_back(next);
        }
    }
    None
}

fn unwind(came_from: &FxHashMap<Cell, Cell>, from: Cell, end: Cell) -> VecDeque<Cell> {
    let mut path = VecDeque::new();
    let mut at = end;
    while at != from {
        path.push_front(at);
        match came_from.get(&at) {
            Some(&prev) => at = prev,
            None => break,
        }
    }
    path
}
