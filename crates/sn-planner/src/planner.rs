//! `RoutePlanner` — bidirectional 0/1 BFS over regions.
//!
//! # Cost model
//!
//! Region cost counts region boundaries crossed: entering a doorway region
//! is free, entering any other region costs 1.  Both frontiers settle
//! regions in non-decreasing cost order (see [`WeightedDeque`]).
//!
//! # Candidate ranges
//!
//! Once a side accepts its first portal at cost `g`, it only scans regions
//! with cost `<= max(g + 1, 2)` for better ones.  Region expansion is only
//! cut at that bound after the frontiers have met; a side without a
//! candidate keeps expanding however far the direct route reaches.
//!
//! # Acceptance
//!
//! The frontiers must have met with direct estimate `d`; otherwise the
//! target cannot be walked to and the search is [`PlanRejection::Unreachable`].
//! A candidate pair `(entry, exit)` then becomes a [`PlanDraft`] only if:
//!
//! 1. `entry != exit`;
//! 2. `entry_cost + exit_cost < d`, or, under [`TieBreak::Heuristic`],
//!    `entry_cost + exit_cost == d` and
//!    `octile(agent, target) > octile(agent, entry) + octile(exit, target)`.

use rustc_hash::FxHashMap;
use tracing::debug;

use sn_core::{
    AgentId, AgentInfo, Cell, PathEndMode, PortalId, RegionId, SkipNetConfig, TieBreak,
    TraverseParams, TravelRequest,
};
use sn_portal::{PortalRole, PortalSet};
use sn_region::{Reachability, RegionGraph};

use crate::{AccessPolicy, PlanRejection, PortalIndex, WeightedDeque, World};

// ── Public result types ───────────────────────────────────────────────────────

/// An accepted portal pair, ready to become a plan.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PlanDraft {
    pub entry: PortalId,
    pub exit:  PortalId,
    /// Region cost from the agent to the entry portal's region.
    pub entry_cost: u32,
    /// Region cost from the exit portal's region to the destination.
    pub exit_cost:  u32,
    /// Region-cost estimate of walking directly.
    pub direct_cost: u32,
    pub entry_heuristic:  u32,
    pub exit_heuristic:   u32,
    pub direct_heuristic: u32,
}

impl PlanDraft {
    #[inline]
    pub fn shortcut_cost(&self) -> u32 {
        self.entry_cost + self.exit_cost
    }
}

/// Which frontier a region was settled by.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    Agent,
    Destination,
}

impl Side {
    fn role(self) -> PortalRole {
        match self {
            Side::Agent       => PortalRole::Entry,
            Side::Destination => PortalRole::Exit,
        }
    }
}

/// One settled region, in settle order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Settle {
    pub side:   Side,
    pub region: RegionId,
    pub cost:   u32,
}

// ── Frontier ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct Candidate {
    portal:    PortalId,
    cost:      u32,
    heuristic: u32,
}

struct Frontier {
    side:      Side,
    open:      WeightedDeque<(RegionId, u32)>,
    /// Best cost pushed so far per region.
    tentative: FxHashMap<RegionId, u32>,
    /// Final cost per settled region.
    closed:    FxHashMap<RegionId, u32>,
    /// Candidate scan bound, set by the first accepted candidate.
    range:     Option<u32>,
    best:      Option<Candidate>,
}

impl Frontier {
    fn seeded(side: Side, seeds: &[RegionId]) -> Self {
        let mut f = Frontier {
            side,
            open: WeightedDeque::with_capacity(64),
            tentative: FxHashMap::default(),
            closed: FxHashMap::default(),
            range: None,
            best: None,
        };
        for &r in seeds {
            if f.tentative.insert(r, 0).is_none() {
                f.open.push_back((r, 0));
            }
        }
        f
    }

    fn exhausted(&self) -> bool {
        self.open.is_empty()
    }

    /// Pop past stale entries to the next region to settle.
    fn settle_next(&mut self) -> Option<(RegionId, u32)> {
        while let Some((region, g)) = self.open.pop_next() {
            if self.closed.contains_key(&region) {
                continue;
            }
            if self.tentative.get(&region).is_some_and(|&best| g > best) {
                continue;
            }
            self.closed.insert(region, g);
            return Some((region, g));
        }
        None
    }
}

#[inline]
fn range_after(cost: u32) -> u32 {
    (cost + 1).max(2)
}

/// Everything a search step reads.
struct SearchInputs<'a, G> {
    graph:    &'a G,
    portals:  &'a PortalSet,
    index:    &'a PortalIndex,
    agent:    &'a AgentInfo,
    traverse: TraverseParams,
    target:   Cell,
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Stateless search engine; cheap to clone.
#[derive(Clone, Debug)]
pub struct RoutePlanner {
    min_portals: usize,
    tie_break:   TieBreak,
    policy:      AccessPolicy,
}

impl RoutePlanner {
    pub fn new(config: &SkipNetConfig) -> Self {
        Self {
            min_portals: config.min_portals,
            tie_break:   config.tie_break,
            policy:      AccessPolicy::from_config(config),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Search for a portal pair that beats walking from `agent`'s position
    /// to `request`.
    ///
    /// `index` must be current for `portals` and the world's graph.
    pub fn find<W: World>(
        &self,
        world:   &W,
        portals: &PortalSet,
        index:   &PortalIndex,
        agent:   AgentId,
        request: TravelRequest,
    ) -> Result<PlanDraft, PlanRejection> {
        self.search(world, portals, index, agent, request, None)
    }

    /// [`find`](Self::find), also returning every region settled in order.
    pub fn find_traced<W: World>(
        &self,
        world:   &W,
        portals: &PortalSet,
        index:   &PortalIndex,
        agent:   AgentId,
        request: TravelRequest,
    ) -> (Result<PlanDraft, PlanRejection>, Vec<Settle>) {
        let mut trace = Vec::new();
        let result = self.search(world, portals, index, agent, request, Some(&mut trace));
        (result, trace)
    }

    fn search<W: World>(
        &self,
        world:     &W,
        portals:   &PortalSet,
        index:     &PortalIndex,
        agent:     AgentId,
        request:   TravelRequest,
        mut trace: Option<&mut Vec<Settle>>,
    ) -> Result<PlanDraft, PlanRejection> {
        // ── Early rejects, cheapest first ─────────────────────────────────
        if portals.len() < self.min_portals {
            return Err(PlanRejection::TooFewPortals {
                registered: portals.len(),
                required:   self.min_portals,
            });
        }
        let info = world.agent(agent).ok_or(PlanRejection::UnknownAgent(agent))?;
        if !info.spawned {
            return Err(PlanRejection::AgentNotSpawned(agent));
        }
        if !self.policy.permits(&info) {
            return Err(PlanRejection::AccessDenied(agent));
        }
        if request.end_mode == PathEndMode::None {
            return Err(PlanRejection::NoEndMode);
        }
        if !info.can_travel() {
            return Err(PlanRejection::Incapacitated(agent));
        }

        let graph = world.graph();
        let start = graph
            .region_at(info.cell)
            .filter(|&r| graph.is_valid(r))
            .ok_or(PlanRejection::AgentOffGraph(agent))?;
        let target = world
            .resolve_target(request.target)
            .ok_or(PlanRejection::TargetUnresolved)?;

        let traverse = info.traverse_params();
        let dest_regions = graph.destination_regions(target, request.end_mode, &traverse);
        if dest_regions.is_empty() {
            return Err(PlanRejection::NoDestinationRegion);
        }
        if !graph.can_reach(info.cell, target, request.end_mode, &traverse) {
            return Err(PlanRejection::Unreachable);
        }

        // ── Bidirectional 0/1 BFS ─────────────────────────────────────────
        let inputs = SearchInputs { graph, portals, index, agent: &info, traverse, target };
        let mut from_agent = Frontier::seeded(Side::Agent, &[start]);
        let mut from_dest  = Frontier::seeded(Side::Destination, &dest_regions);
        let mut met = dest_regions.contains(&start).then_some(0);

        while !(from_agent.exhausted() && from_dest.exhausted()) {
            step(&mut from_agent, &from_dest, &mut met, &inputs, &mut trace);
            step(&mut from_dest, &from_agent, &mut met, &inputs, &mut trace);
        }

        self.decide(&info, target, from_agent.best, from_dest.best, met, portals)
    }

    fn decide(
        &self,
        info:    &AgentInfo,
        target:  Cell,
        entry:   Option<Candidate>,
        exit:    Option<Candidate>,
        direct:  Option<u32>,
        portals: &PortalSet,
    ) -> Result<PlanDraft, PlanRejection> {
        let entry = entry.ok_or(PlanRejection::NoEntryCandidate)?;
        let exit = exit.ok_or(PlanRejection::NoExitCandidate)?;
        if entry.portal == exit.portal {
            return Err(PlanRejection::SamePortal(entry.portal));
        }

        let Some(direct) = direct else {
            debug!(agent = %info.id, "frontiers never met");
            return Err(PlanRejection::Unreachable);
        };

        let shortcut = entry.cost + exit.cost;
        let direct_h = info.cell.octile_distance(target);
        if shortcut > direct || (shortcut == direct && self.tie_break == TieBreak::Reject) {
            debug!(agent = %info.id, shortcut, direct, "shortcut not cheaper in regions");
            return Err(PlanRejection::NotShorter { shortcut, direct });
        }
        if shortcut == direct {
            let shortcut_h = entry.heuristic + exit.heuristic;
            if direct_h <= shortcut_h {
                debug!(agent = %info.id, shortcut_h, direct_h, "tie lost on straight-line distance");
                return Err(PlanRejection::HeuristicNotShorter { shortcut: shortcut_h, direct: direct_h });
            }
        }

        debug!(
            agent = %info.id,
            entry = %entry.portal,
            exit = %exit.portal,
            shortcut,
            direct,
            entry_cell = %portals.get(entry.portal).map(|p| p.cell).unwrap_or_default(),
            "portal pair accepted"
        );
        Ok(PlanDraft {
            entry:            entry.portal,
            exit:             exit.portal,
            entry_cost:       entry.cost,
            exit_cost:        exit.cost,
            direct_cost:      direct,
            entry_heuristic:  entry.heuristic,
            exit_heuristic:   exit.heuristic,
            direct_heuristic: direct_h,
        })
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Settle one region on `this` side: scan it, check for a meeting, expand.
fn step<G: RegionGraph + Reachability>(
    this:   &mut Frontier,
    other:  &Frontier,
    met:    &mut Option<u32>,
    inputs: &SearchInputs<'_, G>,
    trace:  &mut Option<&mut Vec<Settle>>,
) {
    let Some((region, g)) = this.settle_next() else {
        return;
    };
    if let Some(t) = trace.as_mut() {
        t.push(Settle { side: this.side, region, cost: g });
    }

    if this.range.is_none_or(|r| g <= r) {
        scan_portals(this, region, g, inputs);
    }

    if met.is_none() {
        if let Some(&other_g) = other.closed.get(&region) {
            *met = Some(g + other_g);
        }
    }
    if met.is_some() && this.range.is_some_and(|r| g > r) {
        return;
    }

    let graph = inputs.graph;
    for next in graph.neighbors(region) {
        if !graph.is_valid(next)
            || this.closed.contains_key(&next)
            || !graph.allows(next, &inputs.traverse, false)
        {
            continue;
        }
        let weight = if graph.is_doorway(next) { 0 } else { 1 };
        let cost = g + weight;
        if this.tentative.get(&next).is_some_and(|&c| c <= cost) {
            continue;
        }
        this.tentative.insert(next, cost);
        this.open.push((next, cost), weight);
    }
}

/// Consider every portal in `region` as this side's candidate.
fn scan_portals<G: RegionGraph + Reachability>(
    this:   &mut Frontier,
    region: RegionId,
    g:      u32,
    inputs: &SearchInputs<'_, G>,
) {
    let role = this.side.role();
    for &id in inputs.index.portals_in(region) {
        let Some(portal) = inputs.portals.get(id) else {
            continue;
        };
        if !portal.allows(inputs.agent, role) {
            continue;
        }
        let heuristic = match this.side {
            Side::Agent       => inputs.agent.cell.octile_distance(portal.cell),
            Side::Destination => portal.cell.octile_distance(inputs.target),
        };
        if this.best.is_some_and(|b| heuristic >= b.heuristic) {
            continue;
        }
        let from = match this.side {
            Side::Agent => inputs.agent.cell,
            Side::Destination => match inputs.graph.any_cell(region) {
                Some(c) => c,
                None => continue,
            },
        };
        if !inputs.graph.can_reach(from, portal.cell, PathEndMode::OnCell, &inputs.traverse) {
            continue;
        }
        this.best = Some(Candidate { portal: id, cost: g, heuristic });
        if this.range.is_none() {
            this.range = Some(range_after(g));
        }
    }
}
