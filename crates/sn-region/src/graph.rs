//! Region graph service contract.
//!
//! # Ownership
//!
//! Regions and their links belong to the host.  They may be split, merged,
//! or invalidated between any two ticks; the host signals this by bumping
//! [`RegionGraph::topology_version`].  Callers must therefore re-resolve
//! `RegionId`s every tick rather than caching them across ticks.

use sn_core::{Cell, PathEndMode, RegionId, TraverseParams};

/// Read-only view of the host's region graph.
pub trait RegionGraph {
    /// The valid region containing `cell`, or `None` for walls, out-of-bounds
    /// cells, and invalidated regions.
    fn region_at(&self, cell: Cell) -> Option<RegionId>;

    /// Regions linked to `region`.  May include invalid regions; callers
    /// filter with [`is_valid`](Self::is_valid).
    fn neighbors(&self, region: RegionId) -> impl Iterator<Item = RegionId> + '_;

    fn is_valid(&self, region: RegionId) -> bool;

    /// `true` for zero-cost traversal regions (doorways).
    fn is_doorway(&self, region: RegionId) -> bool;

    /// May an agent with `traverse` enter `region`, either passing through
    /// (`as_destination == false`) or stopping there?
    fn allows(&self, region: RegionId, traverse: &TraverseParams, as_destination: bool) -> bool;

    /// Some cell inside `region`.
    fn any_cell(&self, region: RegionId) -> Option<Cell>;

    /// `true` if `cell` lies on the managed map.
    fn in_bounds(&self, cell: Cell) -> bool;

    /// Bumped by the host on every structural change.
    fn topology_version(&self) -> u64;

    /// Regions in which a path to `cell` with `end_mode` can end.
    ///
    /// - `OnCell`: the region at `cell`, if it allows the agent as a
    ///   destination.
    /// - `Touch`: every such region among `cell` and its eight neighbours.
    /// - `None`: empty.
    fn destination_regions(
        &self,
        cell:     Cell,
        end_mode: PathEndMode,
        traverse: &TraverseParams,
    ) -> Vec<RegionId> {
        let mut out = Vec::new();
        let mut consider = |c: Cell| {
            if let Some(r) = self.region_at(c) {
                if self.is_valid(r) && self.allows(r, traverse, true) && !out.contains(&r) {
                    out.push(r);
                }
            }
        };
        match end_mode {
            PathEndMode::None => {}
            PathEndMode::OnCell => consider(cell),
            PathEndMode::Touch => {
                consider(cell);
                cell.neighbors_8().for_each(consider);
            }
        }
        out
    }
}

/// Coarse reachability oracle.
pub trait Reachability {
    /// Can an agent with `traverse` standing on `from` complete a path to
    /// `to` with `end_mode`?
    fn can_reach(
        &self,
        from:     Cell,
        to:       Cell,
        end_mode: PathEndMode,
        traverse: &TraverseParams,
    ) -> bool;
}
