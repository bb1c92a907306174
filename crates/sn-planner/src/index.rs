//! `PortalIndex` — which portals sit in which region.
//!
//! The index is a pure function of the current [`PortalSet`] and the current
//! region topology; it holds no plan state.  Rebuild it whenever either side
//! changes.  [`refresh`](PortalIndex::refresh) does that bookkeeping and is
//! cheap to call redundantly.

use rustc_hash::FxHashMap;
use tracing::debug;

use sn_core::{PortalId, RegionId, Tick};
use sn_portal::PortalSet;
use sn_region::RegionGraph;

#[derive(Debug, Default)]
pub struct PortalIndex {
    by_region: FxHashMap<RegionId, Vec<PortalId>>,
    /// Tick of the last rebuild; `None` until the first one.
    built_at: Option<Tick>,
    /// Graph topology version the index was built against.
    topology: u64,
    dirty: bool,
}

impl PortalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and re-index every spawned portal whose cell resolves to a
    /// valid region.  Idempotent.
    pub fn rebuild<G: RegionGraph>(&mut self, portals: &PortalSet, graph: &G, now: Tick) {
        self.by_region.clear();
        let mut indexed = 0usize;
        for portal in portals.iter() {
            if !portal.spawned || !graph.in_bounds(portal.cell) {
                continue;
            }
            let Some(region) = graph.region_at(portal.cell) else {
                continue;
            };
            if !graph.is_valid(region) {
                continue;
            }
            self.by_region.entry(region).or_default().push(portal.id);
            indexed += 1;
        }
        self.built_at = Some(now);
        self.topology = graph.topology_version();
        self.dirty = false;
        debug!(%now, indexed, registered = portals.len(), "portal index rebuilt");
    }

    /// Rebuild if marked dirty, never built, or the graph topology moved on.
    /// Returns `true` if a rebuild happened.
    pub fn refresh<G: RegionGraph>(&mut self, portals: &PortalSet, graph: &G, now: Tick) -> bool {
        let stale = self.dirty
            || self.built_at.is_none()
            || self.topology != graph.topology_version();
        if stale {
            self.rebuild(portals, graph, now);
        }
        stale
    }

    /// Force the next [`refresh`](Self::refresh) to rebuild.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn built_at(&self) -> Option<Tick> {
        self.built_at
    }

    /// Portals located in `region` (empty if none).
    pub fn portals_in(&self, region: RegionId) -> &[PortalId] {
        self.by_region.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total indexed portals.
    pub fn len(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}
