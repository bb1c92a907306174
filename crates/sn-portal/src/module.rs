//! The portal capability contract.

use std::any::Any;
use std::fmt;

use sn_core::{AgentId, AgentInfo, PortalId, Tick};

/// Which end of a plan a portal is serving.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PortalRole {
    Entry,
    Exit,
}

impl fmt::Display for PortalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortalRole::Entry => "entry",
            PortalRole::Exit  => "exit",
        })
    }
}

/// The plan a notification belongs to, as seen by a portal.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanTicket {
    pub agent:   AgentId,
    pub entry:   PortalId,
    pub exit:    PortalId,
    pub created: Tick,
}

/// One independent concern of a portal's behaviour.
///
/// Every method has a permissive default so a module only overrides what it
/// restricts.  "May use" (`can_enter` / `can_exit`) is distinct from "ready
/// now" (`ticks_until_*`): a portal mid-charge still allows the agent, it
/// just reports a non-zero wait.
pub trait PortalModule: fmt::Debug {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    fn can_enter(&self, _agent: &AgentInfo) -> bool {
        true
    }

    fn can_exit(&self, _agent: &AgentInfo) -> bool {
        true
    }

    fn ticks_until_enterable(&self, _agent: &AgentInfo) -> u32 {
        0
    }

    fn ticks_until_exitable(&self, _agent: &AgentInfo) -> u32 {
        0
    }

    /// The agent reached the entry portal of `ticket`.
    fn notify_arrived(&mut self, _agent: &AgentInfo, _ticket: &PlanTicket, _role: PortalRole) {}

    /// The agent was moved from entry to exit.
    fn notify_teleported(&mut self, _agent: &AgentInfo, _ticket: &PlanTicket, _role: PortalRole) {}

    /// Advance internal timers by one tick.
    fn tick(&mut self, _now: Tick) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
