//! `sn-region` — the region graph the planner searches over.
//!
//! The engine never owns the spatial graph.  It talks to it through two
//! traits the host implements: [`RegionGraph`] (lookup, links, passability)
//! and [`Reachability`] (the coarse "can this agent get there at all" oracle).
//! [`RegionMap`] is a reference implementation over axis-aligned rectangles,
//! used by tools, the demo, and tests.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                    |
//! |-----------|-------------------------------------------------------------|
//! | [`graph`] | `RegionGraph`, `Reachability` traits                        |
//! | [`map`]   | `RegionMap` (CSR links + R-tree), `RegionMapBuilder`, `Rect`|
//! | [`reach`] | Flood-fill `Reachability` for `RegionMap`                   |
//! | [`error`] | `RegionError`, `RegionResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Rect` and `RegionKind`. |

pub mod error;
pub mod graph;
pub mod map;
pub mod reach;


pub use error::{RegionError, RegionResult};
pub use graph::{Reachability, RegionGraph};
pub use map::{Rect, RegionKind, RegionMap, RegionMapBuilder};
