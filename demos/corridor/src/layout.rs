//! The U-shaped floor plan and its portals.
//!
//! ```text
//!  z=29 ┌────────┐                                               ┌────────┐
//!       │ L2  P0 │                                               │ P1  R2 │
//!       ├────────┤                 (solid rock)                  ├────────┤
//!       │   L1   │                                               │   R1   │
//!       ├────────┤                                               ├────────┤
//!       │   L0   ▫  B0   ▫  B1   ▫  B2 P2 ▫  B3   ▫  B4   │   R0   │
//!  z=0  └────────┴───────┴───────┴─────────┴───────┴───────┴────────┘
//!       x=0                                                          x=69
//! ```
//!
//! `▫` are one-cell doorways.  Walking from L2 to R2 crosses every region on
//! the bottom row; the P0/P1 pair skips all of it.

use anyhow::Result;

use sn_core::{Cell, PortalId, RegionId, SimRng, ThingId};
use sn_portal::{AccessFlags, DelayedOpen, Portal, PowerGate};
use sn_region::{Rect, RegionKind, RegionMap, RegionMapBuilder};

// ── Dimensions ────────────────────────────────────────────────────────────────

const WIDTH:        i32 = 70;
const HEIGHT:       i32 = 30;
const ARM_WIDTH:    i32 = 10;
const ROOM_SIZE:    i32 = 10;
const DOOR_Z:       i32 = 4;
const BOTTOM_ROOMS: i32 = 5;

/// The exit of the main pair; its power is cut mid-run.
pub const RIGHT_PORTAL: PortalId = PortalId(1);

/// Which arm of the U a cell belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left  => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub struct Layout {
    /// Upper two rooms of each arm; agents live and work here.
    left_arm:  Vec<Rect>,
    right_arm: Vec<Rect>,
    /// The bottom-row room that collapses mid-run.
    pub collapse_room: RegionId,
}

impl Layout {
    pub fn side_of(&self, cell: Cell) -> Side {
        if cell.x < WIDTH / 2 { Side::Left } else { Side::Right }
    }

    /// A uniformly chosen room on `side`, then a cell inside it.
    pub fn random_cell(&self, side: Side, rng: &mut SimRng) -> Option<Cell> {
        let rooms = match side {
            Side::Left  => &self.left_arm,
            Side::Right => &self.right_arm,
        };
        let room = rng.choose(rooms)?;
        Some(rng.cell_between(room.min, room.max))
    }
}

/// Build the region map and describe its arms.
pub fn build_layout() -> Result<(RegionMap, Layout)> {
    let mut b = RegionMapBuilder::new(WIDTH, HEIGHT);

    add_arm(&mut b, 0);

    // Bottom row: doorway, 9-wide room, repeated.  The last room abuts R0.
    let mut bottom = Vec::new();
    for i in 0..BOTTOM_ROOMS {
        let x = ARM_WIDTH + i * ROOM_SIZE;
        b.add_region(Rect::sized(x, DOOR_Z, 1, 1), RegionKind::Doorway);
        bottom.push(b.add_region(Rect::sized(x + 1, 0, ROOM_SIZE - 1, ROOM_SIZE), RegionKind::Open));
    }
    add_arm(&mut b, WIDTH - ARM_WIDTH);
    b.link_touching();
    let map = b.build()?;

    let upper = |x: i32| -> Vec<Rect> {
        (1..3).map(|i| Rect::sized(x, i * ROOM_SIZE, ARM_WIDTH, ROOM_SIZE)).collect()
    };
    let layout = Layout {
        left_arm:      upper(0),
        right_arm:     upper(WIDTH - ARM_WIDTH),
        collapse_room: bottom[bottom.len() / 2],
    };
    Ok((map, layout))
}

fn add_arm(b: &mut RegionMapBuilder, x: i32) {
    for i in 0..3 {
        b.add_region(Rect::sized(x, i * ROOM_SIZE, ARM_WIDTH, ROOM_SIZE), RegionKind::Open);
    }
}

/// Three portals: a delayed pair across the top of the U, and a forbidden
/// one in the middle of the bottom row that only visitors may use.
pub fn build_portals() -> Vec<Portal> {
    vec![
        Portal::new(PortalId(0), Cell::new(5, 25), ThingId(100))
            .with_module(AccessFlags::default())
            .with_module(DelayedOpen::new(30, 240)),
        Portal::new(RIGHT_PORTAL, Cell::new(WIDTH - 5, 25), ThingId(101))
            .with_module(PowerGate::new(true, DelayedOpen::new(45, 240))),
        Portal::new(PortalId(2), Cell::new(35, 5), ThingId(102))
            .with_module(AccessFlags { forbidden: true, broken_down: false }),
    ]
}
