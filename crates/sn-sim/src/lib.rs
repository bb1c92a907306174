//! `sn-sim` — plan lifecycle and per-tick orchestration.
//!
//! # Tick loop
//!
//! ```text
//! SkipNet::tick(world, now):
//!   ⓪ Portals   — advance module timers; refresh the portal index.
//!   ① Resolve   — every arrived, live plan re-checks its portals and
//!                 either waits (Cooldown) or teleports (Teleport + StartPath).
//!   ② Cleanup   — dispose placeholders and plans whose agent left; jittered
//!                 accessibility (60) and pathability (180) re-checks.
//!   ③ Collect   — drop disposed plans from the table.
//! ```
//!
//! # Host integration
//!
//! The engine never moves agents itself.  Every state change that needs the
//! host's movement system is returned as an ordered list of [`Directive`]s.
//! The host's mover calls back through [`SkipNet::before_start_path`],
//! [`SkipNet::on_arrived`], [`SkipNet::on_path_failed`] and
//! [`SkipNet::on_repath`].
//!
//! ```rust,ignore
//! let mut net = SkipNetBuilder::new(config).portal(a).portal(b).build()?;
//! match net.before_start_path(&world, agent, request, now) {
//!     PathOverride::Proceed         => mover.start(agent, request),
//!     PathOverride::Redirect(entry) => mover.start(agent, entry),
//! }
//! for d in net.tick(&world, now) {
//!     host.apply(d);
//! }
//! ```

pub mod directive;
pub mod error;
pub mod plan;
pub mod registry;
pub mod skipnet;


pub use directive::{Directive, EffectKind, Interception, PathOverride};
pub use error::{InvalidReason, PlanError, PlanResult, SkipNetError, SkipNetResult};
pub use plan::{PlanContext, PlanState, RoutePlan};
pub use registry::{Graveyard, PlanRegistry};
pub use skipnet::{SkipNet, SkipNetBuilder};
