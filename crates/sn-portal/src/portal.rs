//! The portal aggregate.

use sn_core::{AgentInfo, Cell, PortalId, ThingId, Tick};

use crate::{PlanTicket, PortalModule, PortalRole};

/// A registered portal endpoint and its attached modules.
///
/// A portal with no modules allows everyone and never makes them wait.
#[derive(Debug)]
pub struct Portal {
    pub id:      PortalId,
    pub cell:    Cell,
    /// The structure this portal belongs to.
    pub owner:   ThingId,
    /// Despawned portals stay registered until their owner unregisters them
    /// but are never indexed or used.
    pub spawned: bool,
    modules: Vec<Box<dyn PortalModule>>,
}

impl Portal {
    pub fn new(id: PortalId, cell: Cell, owner: ThingId) -> Self {
        Self { id, cell, owner, spawned: true, modules: Vec::new() }
    }

    /// Attach a module (builder style).
    pub fn with_module<M: PortalModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn attach<M: PortalModule + 'static>(&mut self, module: M) {
        self.modules.push(Box::new(module));
    }

    pub fn module_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|m| m.name())
    }

    /// First attached module of type `M`.
    pub fn module<M: PortalModule + 'static>(&self) -> Option<&M> {
        self.modules.iter().find_map(|m| m.as_any().downcast_ref::<M>())
    }

    /// First attached module of type `M`, mutably.
    pub fn module_mut<M: PortalModule + 'static>(&mut self) -> Option<&mut M> {
        self.modules.iter_mut().find_map(|m| m.as_any_mut().downcast_mut::<M>())
    }

    // ── Capability (AND of modules) ───────────────────────────────────────

    pub fn can_enter(&self, agent: &AgentInfo) -> bool {
        self.spawned && self.modules.iter().all(|m| m.can_enter(agent))
    }

    pub fn can_exit(&self, agent: &AgentInfo) -> bool {
        self.spawned && self.modules.iter().all(|m| m.can_exit(agent))
    }

    /// May `agent` use this portal in `role`?
    pub fn allows(&self, agent: &AgentInfo, role: PortalRole) -> bool {
        match role {
            PortalRole::Entry => self.can_enter(agent),
            PortalRole::Exit  => self.can_exit(agent),
        }
    }

    // ── Readiness (MAX of modules) ────────────────────────────────────────

    pub fn ticks_until_enterable(&self, agent: &AgentInfo) -> u32 {
        self.modules.iter().map(|m| m.ticks_until_enterable(agent)).max().unwrap_or(0)
    }

    pub fn ticks_until_exitable(&self, agent: &AgentInfo) -> u32 {
        self.modules.iter().map(|m| m.ticks_until_exitable(agent)).max().unwrap_or(0)
    }

    pub fn ticks_until_ready(&self, agent: &AgentInfo, role: PortalRole) -> u32 {
        match role {
            PortalRole::Entry => self.ticks_until_enterable(agent),
            PortalRole::Exit  => self.ticks_until_exitable(agent),
        }
    }

    // ── Notifications (fan-out) ───────────────────────────────────────────

    pub fn notify_arrived(&mut self, agent: &AgentInfo, ticket: &PlanTicket, role: PortalRole) {
        for m in &mut self.modules {
            m.notify_arrived(agent, ticket, role);
        }
    }

    pub fn notify_teleported(&mut self, agent: &AgentInfo, ticket: &PlanTicket, role: PortalRole) {
        for m in &mut self.modules {
            m.notify_teleported(agent, ticket, role);
        }
    }

    pub fn tick(&mut self, now: Tick) {
        for m in &mut self.modules {
            m.tick(now);
        }
    }
}
