//! `sn-core` — foundational types for the `skipnet` portal-routing engine.
//!
//! This crate is a dependency of every other `sn-*` crate.  It has no `sn-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `RegionId`, `PortalId`, `ThingId`               |
//! | [`geo`]     | `Cell`, octile and Chebyshev distance                      |
//! | [`time`]    | `Tick`, per-key hash-interval jitter                       |
//! | [`path`]    | `PathEndMode`, `Target`, `TravelRequest`                   |
//! | [`agent`]   | `AgentInfo`, `TraverseParams`, `TraverseMode`              |
//! | [`config`]  | `SkipNetConfig`, `AccessMode`, `TieBreak`                  |
//! | [`rng`]     | `SimRng` (seeded, deterministic)                           |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod agent;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod path;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{AgentInfo, TraverseMode, TraverseParams};
pub use config::{AccessMode, SkipNetConfig, TieBreak};
pub use error::{CoreError, CoreResult};
pub use geo::Cell;
pub use ids::{AgentId, PortalId, RegionId, ThingId};
pub use path::{PathEndMode, Target, TravelRequest};
pub use rng::SimRng;
pub use time::Tick;
