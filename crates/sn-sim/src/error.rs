use std::fmt;

use thiserror::Error;

use sn_core::{AgentId, CoreError, PortalId};
use sn_portal::PortalError;

/// Why a live plan stopped being usable.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum InvalidReason {
    /// The agent may no longer enter the entry or exit the exit.
    Inaccessible,
    /// Entry → exit or exit → target can no longer be walked.
    Unpathable,
    /// One of the plan's portals was unregistered.
    PortalRemoved(PortalId),
    /// The mover could not produce a path.
    PathFailed,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Inaccessible      => f.write_str("portal no longer accessible"),
            InvalidReason::Unpathable        => f.write_str("route no longer pathable"),
            InvalidReason::PortalRemoved(id) => write!(f, "portal {id} removed"),
            InvalidReason::PathFailed        => f.write_str("path generation failed"),
        }
    }
}

/// Failure inside the plan state machine.
///
/// Never escapes [`SkipNet`](crate::SkipNet): every variant is logged once at
/// the orchestrator and the plan ends up disposed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan for agent {agent} invalidated: {reason}")]
    Invalidated { agent: AgentId, reason: InvalidReason },

    #[error("agent {agent} has no body or mover to restore")]
    UnexpectedNullState { agent: AgentId },

    #[error("portal {0} is not registered")]
    UnknownPortal(PortalId),

    #[error("agent {agent}: {detail}")]
    InvariantViolation { agent: AgentId, detail: &'static str },
}

pub type PlanResult<T> = Result<T, PlanError>;

/// Construction and registration errors.
#[derive(Debug, Error)]
pub enum SkipNetError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Portal(#[from] PortalError),
}

pub type SkipNetResult<T> = Result<T, SkipNetError>;
