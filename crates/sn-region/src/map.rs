//! Reference region map and builder.
//!
//! # Data layout
//!
//! Regions are axis-aligned cell rectangles that must not overlap.  Links
//! are undirected and stored in **Compressed Sparse Row (CSR)** form: the
//! neighbours of `RegionId r` occupy
//!
//! ```text
//! link_to[ link_start[r] .. link_start[r+1] ]
//! ```
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over region rectangles answers `region_at(cell)`
//! without a per-cell lookup table.
//!
//! # Mutation
//!
//! The link structure is fixed at build time.  Door state, per-agent blocks,
//! and region validity can change afterwards; every such change bumps the
//! topology version so dependants (the portal index) rebuild.

use rstar::{AABB, Envelope, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashSet;

use sn_core::{AgentId, Cell, RegionId, TraverseMode, TraverseParams};

use crate::{RegionError, RegionGraph, RegionResult};

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Inclusive cell rectangle `min..=max` on both axes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Cell,
    pub max: Cell,
}

impl Rect {
    /// Rectangle spanning both corners, in any order.
    pub fn new(a: Cell, b: Cell) -> Self {
        Self {
            min: Cell::new(a.x.min(b.x), a.z.min(b.z)),
            max: Cell::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// `w × h` rectangle with its minimum corner at `(x, z)`.
    pub fn sized(x: i32, z: i32, w: i32, h: i32) -> Self {
        Self::new(Cell::new(x, z), Cell::new(x + w - 1, z + h - 1))
    }

    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        (self.min.x..=self.max.x).contains(&c.x) && (self.min.z..=self.max.z).contains(&c.z)
    }

    pub fn area(&self) -> u64 {
        (self.max.x - self.min.x + 1) as u64 * (self.max.z - self.min.z + 1) as u64
    }

    /// `true` when the rectangles share an edge segment (corner contact does
    /// not count).
    pub fn touches(&self, other: &Rect) -> bool {
        let x_overlap = self.min.x <= other.max.x && other.min.x <= self.max.x;
        let z_overlap = self.min.z <= other.max.z && other.min.z <= self.max.z;
        let x_abut = self.max.x + 1 == other.min.x || other.max.x + 1 == self.min.x;
        let z_abut = self.max.z + 1 == other.min.z || other.max.z + 1 == self.min.z;
        (x_abut && z_overlap) || (z_abut && x_overlap)
    }

    fn aabb(&self) -> AABB<[i32; 2]> {
        AABB::from_corners([self.min.x, self.min.z], [self.max.x, self.max.z])
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct RegionEntry {
    rect: Rect,
    id:   RegionId,
}

impl RTreeObject for RegionEntry {
    type Envelope = AABB<[i32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.rect.aabb()
    }
}

impl PointDistance for RegionEntry {
    /// Squared distance from `point` to the rectangle; zero inside.
    fn distance_2(&self, point: &[i32; 2]) -> i32 {
        self.envelope().distance_2(point)
    }
}

// ── Region data ───────────────────────────────────────────────────────────────

/// What kind of walkable area a region is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionKind {
    #[default]
    Open,
    /// Zero-cost traversal (a door cell).
    Doorway,
}

#[derive(Clone, Debug)]
struct RegionData {
    rect:        Rect,
    kind:        RegionKind,
    valid:       bool,
    door_closed: bool,
    /// Agents this region refuses (locked to them, forbidden area, …).
    blocked:     FxHashSet<AgentId>,
}

// ── RegionMap ─────────────────────────────────────────────────────────────────

/// Rectangle regions on a bounded grid, linked in CSR form.
///
/// Do not construct directly; use [`RegionMapBuilder`].
pub struct RegionMap {
    width:  i32,
    height: i32,

    regions: Vec<RegionData>,

    // ── CSR links ─────────────────────────────────────────────────────────
    /// Length = `region_count + 1`.
    link_start: Vec<u32>,
    link_to:    Vec<RegionId>,

    spatial_idx: RTree<RegionEntry>,
    version:     u64,
}

impl RegionMap {
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of undirected links.
    pub fn link_count(&self) -> usize {
        self.link_to.len() / 2
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rect(&self, region: RegionId) -> Option<Rect> {
        self.regions.get(region.index()).map(|r| r.rect)
    }

    pub fn kind(&self, region: RegionId) -> Option<RegionKind> {
        self.regions.get(region.index()).map(|r| r.kind)
    }

    /// Region containing `cell`, valid or not.
    pub fn region_containing(&self, cell: Cell) -> Option<RegionId> {
        self.spatial_idx
            .locate_at_point(&[cell.x, cell.z])
            .map(|e| e.id)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    fn data_mut(&mut self, region: RegionId) -> RegionResult<&mut RegionData> {
        self.regions
            .get_mut(region.index())
            .ok_or(RegionError::UnknownRegion(region))
    }

    /// Open or close a doorway.  Closed doors refuse agents whose traverse
    /// mode is [`TraverseMode::NoPassClosedDoors`].
    pub fn set_door_closed(&mut self, region: RegionId, closed: bool) -> RegionResult<()> {
        let data = self.data_mut(region)?;
        if data.kind != RegionKind::Doorway {
            return Err(RegionError::NotADoorway(region));
        }
        data.door_closed = closed;
        self.version += 1;
        Ok(())
    }

    /// Mark a region invalid (as if the host destroyed it mid-rebuild).
    pub fn set_valid(&mut self, region: RegionId, valid: bool) -> RegionResult<()> {
        self.data_mut(region)?.valid = valid;
        self.version += 1;
        Ok(())
    }

    /// Refuse (or stop refusing) `agent` in `region`.
    pub fn set_blocked(&mut self, region: RegionId, agent: AgentId, blocked: bool) -> RegionResult<()> {
        let data = self.data_mut(region)?;
        if blocked {
            data.blocked.insert(agent);
        } else {
            data.blocked.remove(&agent);
        }
        self.version += 1;
        Ok(())
    }
}

impl RegionGraph for RegionMap {
    fn region_at(&self, cell: Cell) -> Option<RegionId> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.region_containing(cell).filter(|&r| self.is_valid(r))
    }

    fn neighbors(&self, region: RegionId) -> impl Iterator<Item = RegionId> + '_ {
        let (start, end) = if region.index() < self.regions.len() {
            (
                self.link_start[region.index()] as usize,
                self.link_start[region.index() + 1] as usize,
            )
        } else {
            (0, 0)
        };
        self.link_to[start..end].iter().copied()
    }

    #[inline]
    fn is_valid(&self, region: RegionId) -> bool {
        self.regions.get(region.index()).is_some_and(|r| r.valid)
    }

    #[inline]
    fn is_doorway(&self, region: RegionId) -> bool {
        self.kind(region) == Some(RegionKind::Doorway)
    }

    fn allows(&self, region: RegionId, traverse: &TraverseParams, as_destination: bool) -> bool {
        let Some(data) = self.regions.get(region.index()) else {
            return false;
        };
        if !data.valid || data.blocked.contains(&traverse.agent) {
            return false;
        }
        if data.door_closed && !as_destination {
            return traverse.mode != TraverseMode::NoPassClosedDoors;
        }
        true
    }

    fn any_cell(&self, region: RegionId) -> Option<Cell> {
        self.regions.get(region.index()).map(|r| r.rect.min)
    }

    #[inline]
    fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.z)
    }

    fn topology_version(&self) -> u64 {
        self.version
    }
}

// ── RegionMapBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RegionMap`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sn_core::Cell;
/// use sn_region::{Rect, RegionGraph, RegionKind, RegionMapBuilder};
///
/// let mut b = RegionMapBuilder::new(20, 10);
/// let room = b.add_region(Rect::sized(0, 0, 9, 10), RegionKind::Open);
/// let door = b.add_region(Rect::sized(9, 4, 1, 1), RegionKind::Doorway);
/// let hall = b.add_region(Rect::sized(10, 0, 10, 10), RegionKind::Open);
/// b.link(room, door);
/// b.link(door, hall);
/// let map = b.build().unwrap();
/// assert_eq!(map.region_at(Cell::new(12, 3)), Some(hall));
/// assert!(map.is_doorway(door));
/// ```
pub struct RegionMapBuilder {
    width:   i32,
    height:  i32,
    regions: Vec<(Rect, RegionKind)>,
    links:   Vec<(RegionId, RegionId)>,
}

impl RegionMapBuilder {
    /// Start a map covering cells `(0..width, 0..height)`.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height, regions: Vec::new(), links: Vec::new() }
    }

    /// Add a region and return its `RegionId` (sequential from 0).
    pub fn add_region(&mut self, rect: Rect, kind: RegionKind) -> RegionId {
        let id = RegionId(self.regions.len() as u32);
        self.regions.push((rect, kind));
        id
    }

    /// Add an undirected link.  Duplicate links are collapsed at build time.
    pub fn link(&mut self, a: RegionId, b: RegionId) {
        self.links.push((a, b));
    }

    /// Link every pair of regions whose rectangles share an edge.
    pub fn link_touching(&mut self) {
        for i in 0..self.regions.len() {
            for j in (i + 1)..self.regions.len() {
                if self.regions[i].0.touches(&self.regions[j].0) {
                    self.links.push((RegionId(i as u32), RegionId(j as u32)));
                }
            }
        }
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Validate and produce a [`RegionMap`].
    ///
    /// Fails on rectangles outside the bounds, overlapping rectangles, links
    /// to unknown regions, and self-links.
    pub fn build(self) -> RegionResult<RegionMap> {
        let n = self.regions.len();

        for (i, (rect, _)) in self.regions.iter().enumerate() {
            if rect.min.x < 0 || rect.min.z < 0 || rect.max.x >= self.width || rect.max.z >= self.height {
                return Err(RegionError::OutOfBounds(RegionId(i as u32)));
            }
        }

        let entries: Vec<RegionEntry> = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, &(rect, _))| RegionEntry { rect, id: RegionId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        // Any envelope hit other than the region itself is an overlap.
        for (i, (rect, _)) in self.regions.iter().enumerate() {
            let id = RegionId(i as u32);
            if let Some(other) = spatial_idx
                .locate_in_envelope_intersecting(&rect.aabb())
                .find(|e| e.id != id)
            {
                return Err(RegionError::Overlap { a: id, b: other.id });
            }
        }

        let mut directed: Vec<(RegionId, RegionId)> = Vec::with_capacity(self.links.len() * 2);
        for &(a, b) in &self.links {
            if a.index() >= n {
                return Err(RegionError::UnknownRegion(a));
            }
            if b.index() >= n {
                return Err(RegionError::UnknownRegion(b));
            }
            if a == b {
                return Err(RegionError::SelfLink(a));
            }
            directed.push((a, b));
            directed.push((b, a));
        }
        directed.sort_unstable();
        directed.dedup();

        let mut link_start = vec![0u32; n + 1];
        for &(from, _) in &directed {
            link_start[from.index() + 1] += 1;
        }
        for i in 1..=n {
            link_start[i] += link_start[i - 1];
        }
        let link_to = directed.into_iter().map(|(_, to)| to).collect();

        let regions = self
            .regions
            .into_iter()
            .map(|(rect, kind)| RegionData {
                rect,
                kind,
                valid: true,
                door_closed: false,
                blocked: FxHashSet::default(),
            })
            .collect();

        Ok(RegionMap {
            width: self.width,
            height: self.height,
            regions,
            link_start,
            link_to,
            spatial_idx,
            version: 0,
        })
    }
}
