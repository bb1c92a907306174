//! Travel requests as handed to the host movement system.

use std::fmt;

use crate::{Cell, ThingId};

/// How close an agent must get to its target for a path to be complete.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEndMode {
    /// No travel requested.
    #[default]
    None,
    /// Stand on the target cell.
    OnCell,
    /// Stand on the target cell or any of the eight cells around it.
    Touch,
}

impl PathEndMode {
    /// `true` when an agent standing on `at` has completed a path to `target`.
    #[inline]
    pub fn reached(self, at: Cell, target: Cell) -> bool {
        match self {
            PathEndMode::None   => false,
            PathEndMode::OnCell => at == target,
            PathEndMode::Touch  => at.chebyshev_distance(target) <= 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PathEndMode::None   => "none",
            PathEndMode::OnCell => "on-cell",
            PathEndMode::Touch  => "touch",
        }
    }
}

impl fmt::Display for PathEndMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an agent is going: a fixed cell or a host object that may move or
/// disappear while the agent is on its way.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Cell(Cell),
    Thing(ThingId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Cell(c)  => write!(f, "{c}"),
            Target::Thing(t) => write!(f, "{t}"),
        }
    }
}

/// A destination plus end mode, exactly as the movement system received it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TravelRequest {
    pub target:   Target,
    pub end_mode: PathEndMode,
}

impl TravelRequest {
    #[inline]
    pub fn new(target: Target, end_mode: PathEndMode) -> Self {
        Self { target, end_mode }
    }

    /// Request to stand exactly on `cell`.
    #[inline]
    pub fn on_cell(cell: Cell) -> Self {
        Self { target: Target::Cell(cell), end_mode: PathEndMode::OnCell }
    }

    /// Request to stand next to (or on) `thing`.
    #[inline]
    pub fn touch(thing: ThingId) -> Self {
        Self { target: Target::Thing(thing), end_mode: PathEndMode::Touch }
    }
}

impl fmt::Display for TravelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.target, self.end_mode)
    }
}
