//! Unit tests for sn-planner.
//!
//! Most planner tests use the corridor layout from `helpers::corridor`:
//!
//! ```text
//!   z 10..19   [ A' P1 ]                         [ D' P2 ]
//!   z  0..9    [ A  @  ][ R1 ] ... [ Rn ][ D   T ]
//! ```
//!
//! `@` is the agent, `T` the target.  Walking costs `n + 1` regions; the
//! shortcut costs 2 (one step up on each side).

#[cfg(test)]
mod helpers {
    use std::any::Any;

    use sn_core::{
        AgentId, AgentInfo, Cell, PortalId, RegionId, SkipNetConfig, ThingId, Tick, TieBreak,
        TravelRequest,
    };
    use sn_portal::{Portal, PortalModule, PortalSet};
    use sn_region::{Rect, RegionKind, RegionMapBuilder};

    use crate::{PlanDraft, PlanRejection, PortalIndex, RoutePlanner, SimpleWorld, World};

    pub const AGENT: AgentId = AgentId(1);
    pub const P1: PortalId = PortalId(1);
    pub const P2: PortalId = PortalId(2);

    pub struct Corridor {
        pub world:   SimpleWorld,
        pub portals: PortalSet,
        pub index:   PortalIndex,
        pub target:  Cell,
        /// Region ids along the bottom row, start first.
        pub row:     Vec<RegionId>,
    }

    impl Corridor {
        pub fn request(&self) -> TravelRequest {
            TravelRequest::on_cell(self.target)
        }

        pub fn find(&self, planner: &RoutePlanner) -> Result<PlanDraft, PlanRejection> {
            planner.find(&self.world, &self.portals, &self.index, AGENT, self.request())
        }

        pub fn reindex(&mut self) {
            self.index.rebuild(&self.portals, self.world.graph(), Tick::ZERO);
        }
    }

    /// Corridor with `rooms` regions between start and destination.
    pub fn corridor(rooms: i32) -> Corridor {
        let blocks = rooms + 2;
        let last_x = 10 * (blocks - 1);
        let mut b = RegionMapBuilder::new(10 * blocks, 20);
        let row: Vec<RegionId> = (0..blocks)
            .map(|k| b.add_region(Rect::sized(10 * k, 0, 10, 10), RegionKind::Open))
            .collect();
        b.add_region(Rect::sized(0, 10, 10, 10), RegionKind::Open);
        b.add_region(Rect::sized(last_x, 10, 10, 10), RegionKind::Open);
        b.link_touching();

        let mut world = SimpleWorld::new(b.build().unwrap());
        world.put_agent(AgentInfo::colonist(AGENT, Cell::new(5, 9)));

        let mut portals = PortalSet::new();
        portals.insert(Portal::new(P1, Cell::new(6, 11), ThingId(101))).unwrap();
        portals.insert(Portal::new(P2, Cell::new(last_x + 4, 11), ThingId(102))).unwrap();

        let mut c = Corridor {
            world,
            portals,
            index: PortalIndex::new(),
            target: Cell::new(last_x + 5, 9),
            row,
        };
        c.reindex();
        c
    }

    pub fn planner() -> RoutePlanner {
        RoutePlanner::new(&SkipNetConfig::default())
    }

    pub fn planner_with(tie_break: TieBreak) -> RoutePlanner {
        RoutePlanner::new(&SkipNetConfig { tie_break, ..SkipNetConfig::default() })
    }

    /// Usable as an entry, never as an exit.
    #[derive(Debug)]
    pub struct EntryOnly;

    impl PortalModule for EntryOnly {
        fn name(&self) -> &'static str {
            "entry-only"
        }

        fn can_exit(&self, _agent: &AgentInfo) -> bool {
            false
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }
}

// ── WeightedDeque ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod deque {
    use crate::WeightedDeque;

    #[test]
    fn zero_weight_jumps_the_queue() {
        let mut q = WeightedDeque::new();
        q.push('a', 1);
        q.push('b', 1);
        q.push('c', 0);
        assert_eq!(q.len(), 3);
        assert_eq!(q.peek(), Some(&'c'));
        assert_eq!(q.pop_next(), Some('c'));
        assert_eq!(q.pop_next(), Some('a'));
        assert_eq!(q.pop_back(), Some('b'));
        assert!(q.is_empty());
    }

    #[test]
    fn clear_empties() {
        let mut q = WeightedDeque::with_capacity(4);
        q.push_back(1);
        q.push_front(0);
        q.clear();
        assert_eq!(q.pop_next(), None);
    }
}

// ── PortalIndex ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use sn_core::Tick;
    use crate::{PortalIndex, World};
    use super::helpers::*;

    #[test]
    fn portals_land_in_their_regions() {
        let c = corridor(1);
        let graph = c.world.graph();
        let upper_start = sn_region::RegionGraph::region_at(graph, sn_core::Cell::new(6, 11)).unwrap();
        assert_eq!(c.index.portals_in(upper_start), &[P1]);
        assert!(c.index.portals_in(c.row[0]).is_empty());
        assert_eq!(c.index.len(), 2);
        assert_eq!(c.index.built_at(), Some(Tick::ZERO));
    }

    #[test]
    fn unspawned_portals_are_skipped() {
        let mut c = corridor(1);
        c.portals.get_mut(P1).unwrap().spawned = false;
        c.reindex();
        assert_eq!(c.index.len(), 1);
    }

    #[test]
    fn refresh_follows_topology_and_dirty_flag() {
        let mut c = corridor(1);
        let mut index = PortalIndex::new();
        assert!(index.refresh(&c.portals, c.world.graph(), Tick(1)));
        assert!(!index.refresh(&c.portals, c.world.graph(), Tick(2)));

        index.mark_dirty();
        assert!(index.is_dirty());
        assert!(index.refresh(&c.portals, c.world.graph(), Tick(3)));
        assert_eq!(index.built_at(), Some(Tick(3)));

        let r1 = c.row[1];
        c.world.graph_mut().set_valid(r1, false).unwrap();
        assert!(index.refresh(&c.portals, c.world.graph(), Tick(4)));
        assert!(!index.is_dirty());
    }
}

// ── AccessPolicy ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod access {
    use sn_core::{AccessMode, AgentId, AgentInfo, Cell};
    use crate::AccessPolicy;

    fn colonist() -> AgentInfo {
        AgentInfo::colonist(AgentId(7), Cell::new(0, 0))
    }

    #[test]
    fn everyone_admits_hostiles() {
        let policy = AccessPolicy { mode: AccessMode::Everyone, animals_can_use: true };
        assert!(policy.permits(&AgentInfo { hostile: true, colony_member: false, ..colonist() }));
    }

    #[test]
    fn faction_only_rejects_hostiles_but_not_visitors() {
        let policy = AccessPolicy { mode: AccessMode::FactionOnly, animals_can_use: true };
        assert!(!policy.permits(&AgentInfo { hostile: true, colony_member: false, ..colonist() }));
        assert!(policy.permits(&AgentInfo { colony_member: false, ..colonist() }));
    }

    #[test]
    fn colonists_only() {
        let policy = AccessPolicy { mode: AccessMode::ColonistsOnly, animals_can_use: true };
        assert!(policy.permits(&colonist()));
        assert!(!policy.permits(&AgentInfo { colony_member: false, ..colonist() }));
    }

    #[test]
    fn animals_need_a_lead_when_barred() {
        let policy = AccessPolicy { mode: AccessMode::Everyone, animals_can_use: false };
        let animal = AgentInfo { animal: true, ..colonist() };
        assert!(!policy.permits(&animal));
        assert!(policy.permits(&AgentInfo { led: true, ..animal }));
    }
}

// ── SimpleWorld ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod world {
    use sn_core::{Cell, Target, ThingId};
    use crate::World;
    use super::helpers::*;

    #[test]
    fn targets_resolve_through_things_and_bounds() {
        let mut c = corridor(0);
        assert_eq!(c.world.resolve_target(Target::Cell(Cell::new(3, 3))), Some(Cell::new(3, 3)));
        assert_eq!(c.world.resolve_target(Target::Cell(Cell::new(-1, 3))), None);

        let thing = ThingId(5);
        assert_eq!(c.world.resolve_target(Target::Thing(thing)), None);
        c.world.put_thing(thing, Cell::new(12, 2));
        assert_eq!(c.world.resolve_target(Target::Thing(thing)), Some(Cell::new(12, 2)));
        c.world.remove_thing(thing);
        assert_eq!(c.world.resolve_target(Target::Thing(thing)), None);
    }

    #[test]
    fn agents_move_and_vanish() {
        let mut c = corridor(0);
        assert!(c.world.set_agent_cell(AGENT, Cell::new(1, 1)));
        assert_eq!(c.world.agent(AGENT).map(|a| a.cell), Some(Cell::new(1, 1)));
        assert!(c.world.remove_agent(AGENT).is_some());
        assert!(!c.world.set_agent_cell(AGENT, Cell::new(1, 1)));
    }
}

// ── Early rejection ───────────────────────────────────────────────────────────

#[cfg(test)]
mod rejection {
    use sn_core::{
        AccessMode, AgentId, PathEndMode, SkipNetConfig, Target, ThingId, TravelRequest,
    };
    use crate::{PlanRejection, RejectionKind, RoutePlanner, World};
    use super::helpers::*;

    #[test]
    fn too_few_portals() {
        let mut c = corridor(4);
        c.portals.remove(P2);
        c.reindex();
        assert_eq!(
            c.find(&planner()),
            Err(PlanRejection::TooFewPortals { registered: 1, required: 2 }),
        );
    }

    #[test]
    fn unknown_and_unspawned_agents_are_malformed() {
        let mut c = corridor(4);
        let p = planner();
        let err = p.find(&c.world, &c.portals, &c.index, AgentId(99), c.request()).unwrap_err();
        assert_eq!(err, PlanRejection::UnknownAgent(AgentId(99)));
        assert_eq!(err.kind(), RejectionKind::Malformed);

        c.world.agent_mut(AGENT).unwrap().spawned = false;
        assert_eq!(c.find(&p), Err(PlanRejection::AgentNotSpawned(AGENT)));
    }

    #[test]
    fn access_policy_applies_before_search() {
        let mut c = corridor(4);
        c.world.agent_mut(AGENT).unwrap().hostile = true;
        let strict = RoutePlanner::new(&SkipNetConfig {
            access_mode: AccessMode::FactionOnly,
            ..SkipNetConfig::default()
        });
        assert_eq!(c.find(&strict), Err(PlanRejection::AccessDenied(AGENT)));
        assert!(c.find(&planner()).is_ok());
    }

    #[test]
    fn request_without_end_mode() {
        let c = corridor(4);
        let req = TravelRequest::new(Target::Cell(c.target), PathEndMode::None);
        let err = planner().find(&c.world, &c.portals, &c.index, AGENT, req).unwrap_err();
        assert_eq!(err, PlanRejection::NoEndMode);
        assert!(err.is_malformed());
    }

    #[test]
    fn downed_agents_need_to_crawl() {
        let mut c = corridor(4);
        c.world.agent_mut(AGENT).unwrap().downed = true;
        assert_eq!(c.find(&planner()), Err(PlanRejection::Incapacitated(AGENT)));
        c.world.agent_mut(AGENT).unwrap().can_crawl = true;
        assert!(c.find(&planner()).is_ok());
    }

    #[test]
    fn vanished_thing_target() {
        let c = corridor(4);
        let req = TravelRequest::touch(ThingId(404));
        let err = planner().find(&c.world, &c.portals, &c.index, AGENT, req).unwrap_err();
        assert_eq!(err, PlanRejection::TargetUnresolved);
    }

    #[test]
    fn invalid_destination_region() {
        let mut c = corridor(4);
        let dest = *c.row.last().unwrap();
        c.world.graph_mut().set_valid(dest, false).unwrap();
        c.reindex();
        assert_eq!(c.find(&planner()), Err(PlanRejection::NoDestinationRegion));
    }

    #[test]
    fn blocked_corridor_is_unreachable() {
        let mut c = corridor(4);
        let r1 = c.row[1];
        c.world.graph_mut().set_blocked(r1, AGENT, true).unwrap();
        assert_eq!(c.find(&planner()), Err(PlanRejection::Unreachable));
        assert_eq!(c.find(&planner()).unwrap_err().kind(), RejectionKind::NotFound);
    }
}

// ── Search & acceptance ───────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use rstest::rstest;
    use rustc_hash::FxHashSet;

    use sn_core::{
        AgentId, AgentInfo, Cell, PortalId, SimRng, SkipNetConfig, ThingId, Tick, TieBreak,
        TravelRequest,
    };
    use sn_portal::{AccessFlags, Portal, PortalSet};
    use sn_region::{Rect, RegionKind, RegionMapBuilder};

    use crate::{PlanRejection, PortalIndex, RoutePlanner, Side, SimpleWorld, World};
    use super::helpers::*;

    #[test]
    fn long_corridor_takes_the_shortcut() {
        let c = corridor(4);
        let draft = c.find(&planner()).unwrap();
        assert_eq!((draft.entry, draft.exit), (P1, P2));
        assert_eq!((draft.entry_cost, draft.exit_cost), (1, 1));
        assert_eq!(draft.shortcut_cost(), 2);
        assert_eq!(draft.direct_cost, 5);
        assert_eq!(draft.entry_heuristic, 14);
        assert_eq!(draft.exit_heuristic, 14);
        assert_eq!(draft.direct_heuristic, 200);
    }

    /// `rooms` intermediate regions; walking costs `rooms + 1`.
    #[rstest]
    #[case::clearly_shorter(4, TieBreak::Reject, Ok(()))]
    #[case::tie_rejected(1, TieBreak::Reject, Err(PlanRejection::NotShorter { shortcut: 2, direct: 2 }))]
    #[case::tie_accepted(1, TieBreak::Heuristic, Ok(()))]
    #[case::adjacent_rooms(0, TieBreak::Reject, Err(PlanRejection::NotShorter { shortcut: 2, direct: 1 }))]
    #[case::adjacent_rooms_lenient(0, TieBreak::Heuristic, Err(PlanRejection::NotShorter { shortcut: 2, direct: 1 }))]
    fn region_cost_boundary(
        #[case] rooms: i32,
        #[case] tie_break: TieBreak,
        #[case] expected: Result<(), PlanRejection>,
    ) {
        let c = corridor(rooms);
        assert_eq!(c.find(&planner_with(tie_break)).map(|_| ()), expected);
    }

    #[test]
    fn touch_target_seeds_every_adjacent_region() {
        let mut c = corridor(4);
        let thing = ThingId(9);
        c.world.put_thing(thing, c.target);
        let req = TravelRequest::touch(thing);
        let draft = planner().find(&c.world, &c.portals, &c.index, AGENT, req).unwrap();
        // The target sits on the boundary with D', so P2 is free to reach.
        assert_eq!(draft.exit, P2);
        assert_eq!(draft.exit_cost, 0);
        assert_eq!(draft.entry_cost, 1);
    }

    #[test]
    fn broken_entry_means_no_entry_candidate() {
        let mut c = corridor(4);
        for id in [P1, P2] {
            c.portals.get_mut(id).unwrap().attach(AccessFlags { forbidden: false, broken_down: true });
        }
        assert_eq!(c.find(&planner()), Err(PlanRejection::NoEntryCandidate));
    }

    #[test]
    fn entry_only_portals_never_exit() {
        let mut c = corridor(4);
        c.portals.get_mut(P1).unwrap().attach(EntryOnly);
        c.portals.get_mut(P2).unwrap().attach(AccessFlags { forbidden: false, broken_down: true });
        assert_eq!(c.find(&planner()), Err(PlanRejection::NoExitCandidate));
    }

    #[test]
    fn forbidden_portals_still_serve_outsiders() {
        let mut c = corridor(4);
        c.portals.get_mut(P1).unwrap().attach(AccessFlags { forbidden: true, broken_down: false });
        assert!(c.find(&planner()).is_err());

        c.world.agent_mut(AGENT).unwrap().colony_member = false;
        assert_eq!(c.find(&planner()).map(|d| d.entry), Ok(P1));
    }

    #[test]
    fn single_reachable_portal_never_pairs_with_itself() {
        // [ A @ ][ mid P ][ D T ]   [closet Q]
        let mut b = RegionMapBuilder::new(40, 10);
        b.add_region(Rect::sized(0, 0, 10, 10), RegionKind::Open);
        b.add_region(Rect::sized(10, 0, 10, 10), RegionKind::Open);
        b.add_region(Rect::sized(20, 0, 10, 10), RegionKind::Open);
        b.add_region(Rect::sized(31, 0, 9, 10), RegionKind::Open);
        b.link_touching();
        let mut world = SimpleWorld::new(b.build().unwrap());
        world.put_agent(AgentInfo::colonist(AGENT, Cell::new(1, 5)));

        let mut portals = PortalSet::new();
        portals.insert(Portal::new(PortalId(1), Cell::new(15, 5), ThingId(1))).unwrap();
        portals.insert(Portal::new(PortalId(2), Cell::new(35, 5), ThingId(2))).unwrap();
        let mut index = PortalIndex::new();
        index.rebuild(&portals, world.graph(), Tick::ZERO);

        let req = TravelRequest::on_cell(Cell::new(28, 5));
        let err = planner().find(&world, &portals, &index, AGENT, req).unwrap_err();
        assert_eq!(err, PlanRejection::SamePortal(PortalId(1)));
    }

    #[test]
    fn region_cost_tie_is_settled_by_straight_line_distance() {
        // Region costs tie, so straight-line distance decides: the entry
        // sits in the far corner of A' and the agent stands near the target.
        let mut c = corridor(1);
        c.portals.remove(P1);
        c.portals.insert(Portal::new(P1, Cell::new(0, 19), ThingId(101))).unwrap();
        c.reindex();
        c.world.set_agent_cell(AGENT, Cell::new(9, 0));
        assert_eq!(
            c.find(&planner_with(TieBreak::Heuristic)),
            Err(PlanRejection::HeuristicNotShorter { shortcut: 144, direct: 118 }),
        );
    }

    #[test]
    fn wall_between_agent_and_target_still_takes_the_shortcut() {
        //   [ C1 ][ C2 ][ C3 ]
        //   [ A  ] rock [ D  ]
        // The agent and target face each other across the rock; both portals
        // are further away in a straight line than the target itself.
        let mut b = RegionMapBuilder::new(30, 20);
        b.add_region(Rect::sized(0, 0, 10, 10), RegionKind::Open);
        b.add_region(Rect::sized(20, 0, 10, 10), RegionKind::Open);
        for k in 0..3 {
            b.add_region(Rect::sized(10 * k, 10, 10, 10), RegionKind::Open);
        }
        b.link_touching();
        let mut world = SimpleWorld::new(b.build().unwrap());
        world.put_agent(AgentInfo::colonist(AGENT, Cell::new(9, 5)));

        let mut portals = PortalSet::new();
        portals.insert(Portal::new(P1, Cell::new(0, 0), ThingId(101))).unwrap();
        portals.insert(Portal::new(P2, Cell::new(29, 0), ThingId(102))).unwrap();
        let mut index = PortalIndex::new();
        index.rebuild(&portals, world.graph(), Tick::ZERO);

        let req = TravelRequest::on_cell(Cell::new(20, 5));
        for tie_break in [TieBreak::Reject, TieBreak::Heuristic] {
            let draft = planner_with(tie_break).find(&world, &portals, &index, AGENT, req).unwrap();
            assert_eq!((draft.entry, draft.exit), (P1, P2));
            assert_eq!(draft.shortcut_cost(), 0);
            assert_eq!(draft.direct_cost, 4);
            assert_eq!(draft.entry_heuristic + draft.exit_heuristic, 132);
            assert_eq!(draft.direct_heuristic, 44);
        }
    }

    #[test]
    fn exit_beyond_the_meeting_point_is_found() {
        //   [ B8 P2 ]
        //      ...
        //   [ B1 ]
        //   [ A P1 ][ R1 ] ... [ R10 ][ D T ]
        let mut b = RegionMapBuilder::new(120, 90);
        for k in 0..12 {
            b.add_region(Rect::sized(10 * k, 0, 10, 10), RegionKind::Open);
        }
        for k in 1..9 {
            b.add_region(Rect::sized(110, 10 * k, 10, 10), RegionKind::Open);
        }
        b.link_touching();
        let mut world = SimpleWorld::new(b.build().unwrap());
        world.put_agent(AgentInfo::colonist(AGENT, Cell::new(5, 5)));

        let mut portals = PortalSet::new();
        portals.insert(Portal::new(P1, Cell::new(6, 5), ThingId(101))).unwrap();
        portals.insert(Portal::new(P2, Cell::new(114, 85), ThingId(102))).unwrap();
        let mut index = PortalIndex::new();
        index.rebuild(&portals, world.graph(), Tick::ZERO);

        let req = TravelRequest::on_cell(Cell::new(115, 5));
        let (result, trace) = planner().find_traced(&world, &portals, &index, AGENT, req);
        let draft = result.unwrap();
        assert_eq!((draft.entry, draft.exit), (P1, P2));
        assert_eq!((draft.entry_cost, draft.exit_cost), (0, 8));
        assert_eq!(draft.direct_cost, 11);
        // The destination side had to search past the meeting cost to reach B8.
        assert!(trace.iter().any(|s| s.side == Side::Destination && s.cost == 8));
    }

    #[test]
    fn closer_exit_replaces_first_candidate() {
        let mut c = corridor(4);
        // A second exit in D' nearer the target than P2.
        let better = PortalId(3);
        let cell = c.target.offset(0, 1);
        c.portals.insert(Portal::new(better, cell, ThingId(103))).unwrap();
        c.reindex();
        assert_eq!(c.find(&planner()).map(|d| d.exit), Ok(better));
    }

    #[test]
    fn settle_trace_is_monotone_per_side() {
        for seed in 0..16u64 {
            let mut rng = SimRng::new(seed);
            let side = 8;
            let mut b = RegionMapBuilder::new(side * 4, side * 4);
            for gz in 0..side {
                for gx in 0..side {
                    let kind = if rng.gen_bool(0.3) { RegionKind::Doorway } else { RegionKind::Open };
                    b.add_region(Rect::sized(gx * 4, gz * 4, 4, 4), kind);
                }
            }
            b.link_touching();
            let mut world = SimpleWorld::new(b.build().unwrap());
            world.put_agent(AgentInfo::colonist(AgentId(1), Cell::new(0, 0)));

            let mut portals = PortalSet::new();
            for id in 0..4u32 {
                let cell = Cell::new(rng.gen_range(0..side * 4), rng.gen_range(0..side * 4));
                portals.insert(Portal::new(PortalId(id), cell, ThingId(id))).unwrap();
            }
            let mut index = PortalIndex::new();
            index.rebuild(&portals, world.graph(), Tick::ZERO);

            let planner = RoutePlanner::new(&SkipNetConfig::default());
            let req = TravelRequest::on_cell(Cell::new(side * 4 - 1, side * 4 - 1));
            let (_, trace) = planner.find_traced(&world, &portals, &index, AgentId(1), req);

            assert!(!trace.is_empty(), "seed {seed}");
            let mut seen = FxHashSet::default();
            let mut last = [0u32; 2];
            for s in &trace {
                let i = match s.side {
                    Side::Agent       => 0,
                    Side::Destination => 1,
                };
                assert!(s.cost >= last[i], "seed {seed}: {s:?} after cost {}", last[i]);
                last[i] = s.cost;
                assert!(seen.insert((s.side, s.region)), "seed {seed}: {s:?} settled twice");
            }
        }
    }

    #[test]
    fn trace_alternates_from_both_ends() {
        let c = corridor(4);
        let (result, trace) =
            planner().find_traced(&c.world, &c.portals, &c.index, AGENT, c.request());
        assert!(result.is_ok());
        assert_eq!(trace[0].side, Side::Agent);
        assert_eq!(trace[0].region, c.row[0]);
        assert_eq!(trace[1].side, Side::Destination);
        assert_eq!(trace[1].region, *c.row.last().unwrap());
        assert!(trace.iter().all(|s| s.cost <= 3));
    }
}
