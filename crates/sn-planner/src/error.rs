//! Why no plan was produced.
//!
//! A rejection is a negative answer, not a failure: the caller lets the
//! agent walk normally.  [`RejectionKind`] separates "no shortcut exists"
//! from "the request itself made no sense".

use thiserror::Error;

use sn_core::{AgentId, PortalId};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RejectionKind {
    /// The request was fine; a shortcut just isn't worth it (or possible).
    NotFound,
    /// The agent or target was invalid; nothing was attempted.
    Malformed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanRejection {
    // ── Malformed requests ────────────────────────────────────────────────
    #[error("agent {0} does not exist on this map")]
    UnknownAgent(AgentId),

    #[error("agent {0} is not spawned")]
    AgentNotSpawned(AgentId),

    #[error("agent {0} is not on the region graph")]
    AgentOffGraph(AgentId),

    #[error("travel request has no end mode")]
    NoEndMode,

    #[error("travel target no longer resolves to a cell")]
    TargetUnresolved,

    // ── No viable shortcut ────────────────────────────────────────────────
    #[error("only {registered} portal(s) registered, need {required}")]
    TooFewPortals { registered: usize, required: usize },

    #[error("access policy refuses agent {0}")]
    AccessDenied(AgentId),

    #[error("agent {0} cannot travel at all")]
    Incapacitated(AgentId),

    #[error("target is unreachable without portals")]
    Unreachable,

    #[error("target has no region an agent could stop in")]
    NoDestinationRegion,

    #[error("no usable entry portal near the agent")]
    NoEntryCandidate,

    #[error("no usable exit portal near the target")]
    NoExitCandidate,

    #[error("entry and exit would both be portal {0}")]
    SamePortal(PortalId),

    #[error("shortcut region cost {shortcut} does not beat direct cost {direct}")]
    NotShorter { shortcut: u32, direct: u32 },

    #[error("shortcut distance {shortcut} does not beat straight-line distance {direct}")]
    HeuristicNotShorter { shortcut: u32, direct: u32 },
}

impl PlanRejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            PlanRejection::UnknownAgent(_)
            | PlanRejection::AgentNotSpawned(_)
            | PlanRejection::AgentOffGraph(_)
            | PlanRejection::NoEndMode
            | PlanRejection::TargetUnresolved => RejectionKind::Malformed,
            _ => RejectionKind::NotFound,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.kind() == RejectionKind::Malformed
    }
}
