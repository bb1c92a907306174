//! Flood-fill reachability over a [`RegionMap`].
//!
//! Region-level only: an agent that can reach a destination region is
//! assumed to be able to walk to any cell inside it.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use sn_core::{Cell, PathEndMode, TraverseParams};

use crate::{Reachability, RegionGraph, RegionMap};

impl Reachability for RegionMap {
    fn can_reach(
        &self,
        from:     Cell,
        to:       Cell,
        end_mode: PathEndMode,
        traverse: &TraverseParams,
    ) -> bool {
        let Some(start) = self.region_at(from) else {
            return false;
        };
        let goals = self.destination_regions(to, end_mode, traverse);
        if goals.is_empty() {
            return false;
        }
        if goals.contains(&start) {
            return true;
        }

        let mut seen: FxHashSet<_> = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(region) = queue.pop_front() {
            for next in self.neighbors(region) {
                if !seen.insert(next) {
                    continue;
                }
                if goals.contains(&next) {
                    return true;
                }
                if self.allows(next, traverse, false) {
                    queue.push_back(next);
                }
            }
        }
        false
    }
}
