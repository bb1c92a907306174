//! What the engine asks of the host's movement system.

use sn_core::{AgentId, Cell, TravelRequest};

/// Which side of a teleport a visual effect marks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Depart,
    Arrive,
}

/// One instruction for the host.  Apply in the order returned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Directive {
    /// Start (or restart) normal travel.
    StartPath { agent: AgentId, request: TravelRequest },
    /// Abandon the current path immediately.
    StopDead { agent: AgentId },
    /// Cancel any busy stance (waiting, aiming, ...).
    ResetStance { agent: AgentId },
    /// Hold the agent in place for `ticks`.
    Cooldown { agent: AgentId, ticks: u32 },
    /// Move the agent to `to` instantly.
    Teleport { agent: AgentId, to: Cell },
    /// Cosmetic flash at `at`.
    Effect { agent: AgentId, kind: EffectKind, at: Cell },
}

impl Directive {
    pub fn agent(&self) -> AgentId {
        match *self {
            Directive::StartPath { agent, .. }
            | Directive::StopDead { agent }
            | Directive::ResetStance { agent }
            | Directive::Cooldown { agent, .. }
            | Directive::Teleport { agent, .. }
            | Directive::Effect { agent, .. } => agent,
        }
    }
}

/// Answer to "the mover is about to start a path".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathOverride {
    /// Travel as requested.
    Proceed,
    /// Travel here instead.
    Redirect(TravelRequest),
}

/// Answer to an arrival or path-failure notification.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Interception {
    /// Skip the mover's own handling of the event.
    pub suppress_default: bool,
    pub directives: Vec<Directive>,
}

impl Interception {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn suppress(directives: Vec<Directive>) -> Self {
        Self { suppress_default: true, directives }
    }
}
