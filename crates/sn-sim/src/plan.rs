//! `RoutePlan` — one agent's trip through a portal pair.
//!
//! ```text
//!            new()                 arrived + ready          teleported
//!   ┌──────────────────┐  ┌─────────────────────────┐  ┌──────────────┐
//!   │  ExecutingEntry  │─▶│      ExecutingExit      │─▶│   Disposed   │
//!   └──────────────────┘  └─────────────────────────┘  └──────────────┘
//!            │ fail / cancel                                  ▲
//!            └────────────────────────────────────────────────┘
//!
//!   placeholder() → None ──(next cleanup)──▶ Disposed
//! ```
//!
//! The original travel request is captured once and never modified; every
//! exit path (teleport or failure) hands exactly that request back to the
//! host.

use tracing::debug;

use sn_core::{AgentId, AgentInfo, PathEndMode, PortalId, Tick, TravelRequest};
use sn_planner::World;
use sn_portal::{PlanTicket, Portal, PortalRole, PortalSet};
use sn_region::Reachability;

use crate::{Directive, EffectKind, Graveyard, InvalidReason, PlanError, PlanResult};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanState {
    /// Attempted and rejected; blocks retries until the next cleanup.
    None,
    /// Walking to the entry portal (or waiting at it).
    ExecutingEntry,
    /// Teleported; disposes within the same call.
    ExecutingExit,
    Disposed,
}

/// Everything a plan transition touches besides the plan itself.
pub struct PlanContext<'a, W: World> {
    pub now:            Tick,
    pub world:          &'a W,
    pub portals:        &'a mut PortalSet,
    pub graveyard:      &'a mut Graveyard,
    pub out:            &'a mut Vec<Directive>,
    pub teleport_flash: bool,
}

#[derive(Clone, Debug)]
pub struct RoutePlan {
    agent:    AgentId,
    entry:    Option<PortalId>,
    exit:     Option<PortalId>,
    original: TravelRequest,
    created:  Tick,
    state:    PlanState,
    arrived:  bool,
    resolve_not_before: Tick,
}

impl RoutePlan {
    /// A rejected attempt.  Never promoted.
    pub fn placeholder(agent: AgentId, original: TravelRequest, now: Tick) -> Self {
        Self {
            agent,
            entry: None,
            exit: None,
            original,
            created: now,
            state: PlanState::None,
            arrived: false,
            resolve_not_before: now,
        }
    }

    pub fn new(
        agent:    AgentId,
        original: TravelRequest,
        entry:    PortalId,
        exit:     PortalId,
        now:      Tick,
    ) -> Self {
        Self {
            entry: Some(entry),
            exit: Some(exit),
            state: PlanState::ExecutingEntry,
            ..Self::placeholder(agent, original, now)
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn entry(&self) -> Option<PortalId> {
        self.entry
    }

    pub fn exit(&self) -> Option<PortalId> {
        self.exit
    }

    /// The request the agent had before the plan substituted its path.
    pub fn original(&self) -> TravelRequest {
        self.original
    }

    pub fn created(&self) -> Tick {
        self.created
    }

    pub fn state(&self) -> PlanState {
        self.state
    }

    pub fn arrived(&self) -> bool {
        self.arrived
    }

    pub fn resolve_not_before(&self) -> Tick {
        self.resolve_not_before
    }

    pub fn is_placeholder(&self) -> bool {
        self.state == PlanState::None
    }

    pub fn is_disposed(&self) -> bool {
        self.state == PlanState::Disposed
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, PlanState::ExecutingEntry | PlanState::ExecutingExit)
    }

    pub fn uses(&self, portal: PortalId) -> bool {
        self.entry == Some(portal) || self.exit == Some(portal)
    }

    pub fn ticket(&self) -> Option<PlanTicket> {
        Some(PlanTicket {
            agent:   self.agent,
            entry:   self.entry?,
            exit:    self.exit?,
            created: self.created,
        })
    }

    /// Redirect that sends the agent to the entry portal.
    pub fn entry_request(&self, portals: &PortalSet) -> Option<TravelRequest> {
        portals.get(self.entry?).map(|p| TravelRequest::on_cell(p.cell))
    }

    // ── Re-validation ─────────────────────────────────────────────────────

    fn endpoints<'p>(&self, portals: &'p PortalSet) -> Option<(&'p Portal, &'p Portal)> {
        Some((portals.get(self.entry?)?, portals.get(self.exit?)?))
    }

    /// Can `agent` still enter the entry and exit the exit?
    pub fn still_accessible(&self, agent: &AgentInfo, portals: &PortalSet) -> bool {
        self.endpoints(portals)
            .is_some_and(|(entry, exit)| entry.can_enter(agent) && exit.can_exit(agent))
    }

    /// Are entry → exit and exit → original target still walkable?
    ///
    /// The agent has to stand on the exit, so only the final leg uses the
    /// original end mode.
    pub fn still_pathable<W: World>(&self, world: &W, agent: &AgentInfo, portals: &PortalSet) -> bool {
        let Some((entry, exit)) = self.endpoints(portals) else {
            return false;
        };
        let Some(target) = world.resolve_target(self.original.target) else {
            return false;
        };
        let graph = world.graph();
        let traverse = agent.traverse_params();
        graph.can_reach(entry.cell, exit.cell, PathEndMode::OnCell, &traverse)
            && graph.can_reach(exit.cell, target, self.original.end_mode, &traverse)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// The agent is standing on the entry portal.
    pub fn notify_entry_reached<W: World>(&mut self, ctx: &mut PlanContext<'_, W>) -> PlanResult<()> {
        if self.state != PlanState::ExecutingEntry {
            return Err(PlanError::InvariantViolation {
                agent:  self.agent,
                detail: "entry reached outside ExecutingEntry",
            });
        }
        self.arrived = true;

        let Some(agent) = ctx.world.agent(self.agent) else {
            return self.notify_failed(ctx);
        };
        let (Some(ticket), Some(entry), Some(exit)) = (self.ticket(), self.entry, self.exit) else {
            return self.fail(ctx, InvalidReason::Inaccessible);
        };
        let notified = match ctx.portals.pair_mut(entry, exit) {
            Ok((e, x)) => {
                e.notify_arrived(&agent, &ticket, PortalRole::Entry);
                x.notify_arrived(&agent, &ticket, PortalRole::Exit);
                true
            }
            Err(_) => false,
        };
        if !notified {
            let missing = if ctx.portals.contains(entry) { exit } else { entry };
            return self.fail(ctx, InvalidReason::PortalRemoved(missing));
        }
        self.resolve(ctx)
    }

    /// Teleport if both portals are ready, wait if not, fail if the route
    /// broke.  No-op before arrival and inside a wait window.
    pub fn resolve<W: World>(&mut self, ctx: &mut PlanContext<'_, W>) -> PlanResult<()> {
        if !self.arrived || self.state != PlanState::ExecutingEntry || ctx.now < self.resolve_not_before {
            return Ok(());
        }
        let Some(agent) = ctx.world.agent(self.agent).filter(|a| a.spawned) else {
            return self.notify_failed(ctx);
        };
        if !self.still_accessible(&agent, ctx.portals) {
            return self.fail(ctx, InvalidReason::Inaccessible);
        }
        if !self.still_pathable(ctx.world, &agent, ctx.portals) {
            return self.fail(ctx, InvalidReason::Unpathable);
        }
        let Some((entry, exit)) = self.endpoints(ctx.portals) else {
            return self.fail(ctx, InvalidReason::Inaccessible);
        };

        let wait = entry
            .ticks_until_enterable(&agent)
            .max(exit.ticks_until_exitable(&agent));
        if wait > 0 {
            self.resolve_not_before = ctx.now + u64::from(wait);
            ctx.out.push(Directive::Cooldown { agent: self.agent, ticks: wait });
            debug!(agent = %self.agent, wait, "waiting for portals");
            return Ok(());
        }

        let (from, to) = (entry.cell, exit.cell);
        let id = self.agent;
        self.state = PlanState::ExecutingExit;
        if ctx.teleport_flash {
            ctx.out.push(Directive::Effect { agent: id, kind: EffectKind::Depart, at: from });
        }
        ctx.out.push(Directive::Teleport { agent: id, to });
        if ctx.teleport_flash {
            ctx.out.push(Directive::Effect { agent: id, kind: EffectKind::Arrive, at: to });
        }
        reset_movement(id, ctx.out);

        if let (Some(ticket), Some(e), Some(x)) = (self.ticket(), self.entry, self.exit) {
            if let Ok((entry, exit)) = ctx.portals.pair_mut(e, x) {
                entry.notify_teleported(&agent, &ticket, PortalRole::Entry);
                exit.notify_teleported(&agent, &ticket, PortalRole::Exit);
            }
        }
        self.dispose(ctx.graveyard);
        ctx.out.push(Directive::StartPath { agent: id, request: self.original });
        debug!(agent = %id, %from, %to, "teleported");
        Ok(())
    }

    /// Abandon the plan and hand the agent back its original request.
    ///
    /// Disposes in every case.  Returns `UnexpectedNullState` when the agent
    /// has nothing left to restore (gone, unspawned, or without a mover).
    pub fn notify_failed<W: World>(&mut self, ctx: &mut PlanContext<'_, W>) -> PlanResult<()> {
        let result = match ctx.world.agent(self.agent) {
            Some(a) if a.spawned && a.has_mover => {
                reset_movement(self.agent, ctx.out);
                let resumable = self.original.end_mode != PathEndMode::None
                    && ctx.world.resolve_target(self.original.target).is_some();
                if resumable {
                    ctx.out.push(Directive::StartPath { agent: self.agent, request: self.original });
                }
                Ok(())
            }
            _ => Err(PlanError::UnexpectedNullState { agent: self.agent }),
        };
        self.dispose(ctx.graveyard);
        result
    }

    /// [`notify_failed`](Self::notify_failed), then report `reason`.
    pub fn fail<W: World>(&mut self, ctx: &mut PlanContext<'_, W>, reason: InvalidReason) -> PlanResult<()> {
        self.notify_failed(ctx)?;
        Err(PlanError::Invalidated { agent: self.agent, reason })
    }

    /// Idempotent.  Removal from the table happens at the next collection.
    pub fn dispose(&mut self, graveyard: &mut Graveyard) {
        self.state = PlanState::Disposed;
        graveyard.bury(self.agent);
    }
}

fn reset_movement(agent: AgentId, out: &mut Vec<Directive>) {
    out.push(Directive::StopDead { agent });
    out.push(Directive::ResetStance { agent });
}
