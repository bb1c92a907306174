//! Built-in portal modules.
//!
//! | Module        | Restricts                                              |
//! |---------------|--------------------------------------------------------|
//! | `AccessFlags` | forbidden (colony members only) and broken-down state  |
//! | `DelayedOpen` | charge-up delay after an agent arrives, then stays open|
//! | `PowerGate`   | instant while powered, falls back to a delay otherwise |

use std::any::Any;

use tracing::trace;

use sn_core::{AgentInfo, Tick};

use crate::{PlanTicket, PortalModule, PortalRole};

// ── AccessFlags ───────────────────────────────────────────────────────────────

/// Owner-controlled on/off switches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessFlags {
    /// Colony members may not use the portal.  Outsiders ignore this flag.
    pub forbidden:   bool,
    /// Nobody may use the portal.
    pub broken_down: bool,
}

impl AccessFlags {
    fn permits(&self, agent: &AgentInfo) -> bool {
        !self.broken_down && !(self.forbidden && agent.colony_member)
    }
}

impl PortalModule for AccessFlags {
    fn name(&self) -> &'static str {
        "access-flags"
    }

    fn can_enter(&self, agent: &AgentInfo) -> bool {
        self.permits(agent)
    }

    fn can_exit(&self, agent: &AgentInfo) -> bool {
        self.permits(agent)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── DelayedOpen ───────────────────────────────────────────────────────────────

/// Where a [`DelayedOpen`] portal is in its open/close cycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorPhase {
    #[default]
    Closed,
    /// Charging; open once `elapsed` reaches the delay.
    Opening { elapsed: u32 },
    /// Open; closes once `elapsed` reaches the remain-open window.
    Open { elapsed: u32 },
}

/// A portal that has to charge up before it can be used.
///
/// An arriving agent starts the charge.  While charging, the restricted
/// directions report the remaining delay as their wait.  Once open, the
/// portal stays open for `remain_open_ticks`, refreshed by every arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayedOpen {
    pub delay_ticks:       u32,
    pub remain_open_ticks: u32,
    /// Does the delay apply when this portal is the entry?
    pub restrict_entry:    bool,
    /// Does the delay apply when this portal is the exit?
    pub restrict_exit:     bool,
    phase: DoorPhase,
}

impl Default for DelayedOpen {
    fn default() -> Self {
        Self::new(60, 180)
    }
}

impl DelayedOpen {
    pub fn new(delay_ticks: u32, remain_open_ticks: u32) -> Self {
        Self {
            delay_ticks,
            remain_open_ticks,
            restrict_entry: true,
            restrict_exit:  true,
            phase:          DoorPhase::Closed,
        }
    }

    /// Choose which roles the delay applies to (both by default).
    pub fn restricting(mut self, entry: bool, exit: bool) -> Self {
        self.restrict_entry = entry;
        self.restrict_exit = exit;
        self
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, DoorPhase::Open { .. })
    }

    fn remaining(&self, restricted: bool) -> u32 {
        match self.phase {
            DoorPhase::Opening { elapsed } if restricted => self.delay_ticks.saturating_sub(elapsed),
            _ => 0,
        }
    }
}

impl PortalModule for DelayedOpen {
    fn name(&self) -> &'static str {
        "delayed-open"
    }

    fn ticks_until_enterable(&self, _agent: &AgentInfo) -> u32 {
        self.remaining(self.restrict_entry)
    }

    fn ticks_until_exitable(&self, _agent: &AgentInfo) -> u32 {
        self.remaining(self.restrict_exit)
    }

    fn notify_arrived(&mut self, _agent: &AgentInfo, _ticket: &PlanTicket, role: PortalRole) {
        match self.phase {
            DoorPhase::Open { .. } => self.phase = DoorPhase::Open { elapsed: 0 },
            DoorPhase::Closed => {
                let restricted = match role {
                    PortalRole::Entry => self.restrict_entry,
                    PortalRole::Exit  => self.restrict_exit,
                };
                if restricted {
                    self.phase = DoorPhase::Opening { elapsed: 0 };
                }
            }
            DoorPhase::Opening { .. } => {}
        }
    }

    fn tick(&mut self, now: Tick) {
        self.phase = match self.phase {
            DoorPhase::Closed => DoorPhase::Closed,
            DoorPhase::Opening { elapsed } if elapsed + 1 >= self.delay_ticks => {
                trace!(%now, "portal charged open");
                DoorPhase::Open { elapsed: 0 }
            }
            DoorPhase::Opening { elapsed } => DoorPhase::Opening { elapsed: elapsed + 1 },
            DoorPhase::Open { elapsed } if elapsed + 1 >= self.remain_open_ticks => {
                trace!(%now, "portal closed");
                DoorPhase::Closed
            }
            DoorPhase::Open { elapsed } => DoorPhase::Open { elapsed: elapsed + 1 },
        };
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── PowerGate ─────────────────────────────────────────────────────────────────

/// Instant while powered; behaves like its fallback [`DelayedOpen`] when the
/// power is off.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerGate {
    pub powered: bool,
    pub fallback: DelayedOpen,
}

impl PowerGate {
    pub fn new(powered: bool, fallback: DelayedOpen) -> Self {
        Self { powered, fallback }
    }

    pub fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }
}

impl PortalModule for PowerGate {
    fn name(&self) -> &'static str {
        "power-gate"
    }

    fn ticks_until_enterable(&self, agent: &AgentInfo) -> u32 {
        if self.powered { 0 } else { self.fallback.ticks_until_enterable(agent) }
    }

    fn ticks_until_exitable(&self, agent: &AgentInfo) -> u32 {
        if self.powered { 0 } else { self.fallback.ticks_until_exitable(agent) }
    }

    fn notify_arrived(&mut self, agent: &AgentInfo, ticket: &PlanTicket, role: PortalRole) {
        self.fallback.notify_arrived(agent, ticket, role);
    }

    fn tick(&mut self, now: Tick) {
        self.fallback.tick(now);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
