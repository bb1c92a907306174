//! Unit tests for sn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, PortalId, RegionId};

    #[test]
    fn index_matches_inner() {
        assert_eq!(RegionId(42).index(), 42);
        assert!(AgentId(3) < AgentId(10));
    }

    #[test]
    fn display() {
        assert_eq!(PortalId(7).to_string(), "#7");
    }
}

#[cfg(test)]
mod geo {
    use crate::Cell;

    #[test]
    fn octile_straight_and_diagonal() {
        let o = Cell::new(0, 0);
        assert_eq!(o.octile_distance(o), 0);
        // Pure straight: |dx-dz| * 4.
        assert_eq!(o.octile_distance(Cell::new(10, 0)), 40);
        // Pure diagonal: min * 10.
        assert_eq!(o.octile_distance(Cell::new(3, 3)), 30);
        // Mixed: 1*10 + 1*4.
        assert_eq!(o.octile_distance(Cell::new(1, 2)), 14);
    }

    #[test]
    fn octile_is_symmetric() {
        let a = Cell::new(-4, 7);
        let b = Cell::new(12, -3);
        assert_eq!(a.octile_distance(b), b.octile_distance(a));
    }

    #[test]
    fn neighbors_are_adjacent() {
        let c = Cell::new(5, 5);
        let n: Vec<_> = c.neighbors_8().collect();
        assert_eq!(n.len(), 8);
        assert!(n.iter().all(|&m| c.is_adjacent(m)));
        assert!(!c.is_adjacent(c));
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn hash_interval_fires_once_per_window() {
        for key in [0u64, 1, 17, 9_999] {
            for start in [0u64, 37, 1_000] {
                let hits = (start..start + 60)
                    .filter(|&t| Tick(t).is_hash_interval(key, 60))
                    .count();
                assert_eq!(hits, 1, "key {key} window at {start}");
            }
        }
    }

    #[test]
    fn hash_interval_spreads_keys() {
        let first_hit = |key: u64| (0..60).find(|&t| Tick(t).is_hash_interval(key, 60));
        let phases: std::collections::BTreeSet<_> = (0..32).filter_map(first_hit).collect();
        assert!(phases.len() > 8, "phases should not cluster: {phases:?}");
    }

    #[test]
    fn zero_interval_never_fires() {
        assert!(!Tick(0).is_hash_interval(1, 0));
    }
}

#[cfg(test)]
mod path {
    use crate::{Cell, PathEndMode, Target, ThingId, TravelRequest};

    #[test]
    fn reached_by_end_mode() {
        let t = Cell::new(4, 4);
        assert!(PathEndMode::OnCell.reached(t, t));
        assert!(!PathEndMode::OnCell.reached(Cell::new(5, 4), t));
        assert!(PathEndMode::Touch.reached(Cell::new(5, 5), t));
        assert!(!PathEndMode::Touch.reached(Cell::new(6, 4), t));
        assert!(!PathEndMode::None.reached(t, t));
    }

    #[test]
    fn request_constructors() {
        let r = TravelRequest::touch(ThingId(3));
        assert_eq!(r.target, Target::Thing(ThingId(3)));
        assert_eq!(r.end_mode, PathEndMode::Touch);
        assert_eq!(TravelRequest::on_cell(Cell::new(1, 2)).to_string(), "(1, 2) [on-cell]");
    }
}

#[cfg(test)]
mod agent {
    use crate::{AgentId, AgentInfo, Cell};

    #[test]
    fn downed_agents_travel_only_if_crawling() {
        let mut a = AgentInfo::colonist(AgentId(0), Cell::new(0, 0));
        assert!(a.can_travel());
        a.downed = true;
        assert!(!a.can_travel());
        a.can_crawl = true;
        assert!(a.can_travel());
    }
}

#[cfg(test)]
mod config {
    use crate::{AccessMode, SkipNetConfig, TieBreak};

    #[test]
    fn defaults() {
        let c = SkipNetConfig::default();
        assert_eq!(c.access_mode, AccessMode::Everyone);
        assert_eq!(c.accessibility_interval, 60);
        assert_eq!(c.pathability_interval, 180);
        assert_eq!(c.min_portals, 2);
        assert_eq!(c.tie_break, TieBreak::Reject);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero = SkipNetConfig { accessibility_interval: 0, ..Default::default() };
        assert!(zero.validate().is_err());
        let one_portal = SkipNetConfig { min_portals: 1, ..Default::default() };
        assert!(one_portal.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{Cell, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.gen_range(0..1_000u32), r2.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }

    #[test]
    fn cell_between_stays_inside_either_corner_order() {
        let mut rng = SimRng::new(7);
        for _ in 0..200 {
            let c = rng.cell_between(Cell::new(5, -2), Cell::new(1, 3));
            assert!((1..=5).contains(&c.x), "{c}");
            assert!((-2..=3).contains(&c.z), "{c}");
        }
        assert_eq!(rng.cell_between(Cell::new(4, 4), Cell::new(4, 4)), Cell::new(4, 4));
    }
}
