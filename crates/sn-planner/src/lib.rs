//! `sn-planner` — find the portal pair that beats walking.
//!
//! # Search in one paragraph
//!
//! Two 0/1-weighted BFS frontiers grow in lock-step over the region graph,
//! one from the agent's region and one from every region the destination
//! resolves to.  Doorway regions cost 0 to enter, everything else costs 1.
//! Each settled region is scanned for usable portals (entry side: portals
//! the agent may enter; destination side: portals it may exit) and the
//! nearest by octile heuristic is kept.  The first region settled by both
//! frontiers yields a direct-travel estimate.  The pair is accepted if it
//! beats that estimate on region cost; straight-line distance only settles
//! an exact tie.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`deque`]   | `WeightedDeque` (0 → front, 1 → back)                     |
//! | [`index`]   | `PortalIndex` (region → portals)                          |
//! | [`access`]  | `AccessPolicy` (affiliation / species filter)             |
//! | [`world`]   | `World` host contract, `SimpleWorld` reference host       |
//! | [`planner`] | `RoutePlanner`, `PlanDraft`, search trace types           |
//! | [`error`]   | `PlanRejection`, `RejectionKind`                          |

pub mod access;
pub mod deque;
pub mod error;
pub mod index;
pub mod planner;
pub mod world;

#[cfg(test)]
mod tests;

pub use access::AccessPolicy;
pub use deque::WeightedDeque;
pub use error::{PlanRejection, RejectionKind};
pub use index::PortalIndex;
pub use planner::{PlanDraft, RoutePlanner, Settle, Side};
pub use world::{SimpleWorld, World};
