//! The `SkipNet` orchestrator and its builder.

use tracing::{debug, error, instrument, warn};

use sn_core::{AgentId, PathEndMode, PortalId, SkipNetConfig, Tick, TravelRequest};
use sn_planner::{PlanDraft, PlanRejection, PortalIndex, RoutePlanner, World};
use sn_portal::{Portal, PortalSet};

use crate::{
    Directive, Interception, InvalidReason, PathOverride, PlanContext, PlanError, PlanRegistry,
    PlanResult, PlanState, RoutePlan, SkipNetResult,
};

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`SkipNet`].
///
/// ```rust,ignore
/// let net = SkipNetBuilder::new(config)
///     .portal(Portal::new(PortalId(0), a, ThingId(10)))
///     .portal(Portal::new(PortalId(1), b, ThingId(11)))
///     .build()?;
/// ```
pub struct SkipNetBuilder {
    config:  SkipNetConfig,
    portals: Vec<Portal>,
}

impl SkipNetBuilder {
    pub fn new(config: SkipNetConfig) -> Self {
        Self { config, portals: Vec::new() }
    }

    pub fn portal(mut self, portal: Portal) -> Self {
        self.portals.push(portal);
        self
    }

    pub fn portals(mut self, portals: impl IntoIterator<Item = Portal>) -> Self {
        self.portals.extend(portals);
        self
    }

    /// Validate the config and register every portal.  Fails on an invalid
    /// config or a duplicate portal id.
    pub fn build(self) -> SkipNetResult<SkipNet> {
        self.config.validate()?;
        let mut set = PortalSet::new();
        for portal in self.portals {
            set.insert(portal)?;
        }
        Ok(SkipNet {
            planner:  RoutePlanner::new(&self.config),
            config:   self.config,
            portals:  set,
            index:    PortalIndex::new(),
            registry: PlanRegistry::new(),
        })
    }
}

// ── SkipNet ───────────────────────────────────────────────────────────────────

/// Portal shortcut routing for one map.
///
/// Owns the portal set, the portal index and the plan table.  The host
/// drives it with [`tick`](Self::tick) once per simulation step and routes
/// its mover's notifications through the interception methods.
pub struct SkipNet {
    config:   SkipNetConfig,
    planner:  RoutePlanner,
    portals:  PortalSet,
    index:    PortalIndex,
    registry: PlanRegistry,
}

impl SkipNet {
    pub fn new(config: SkipNetConfig) -> SkipNetResult<Self> {
        SkipNetBuilder::new(config).build()
    }

    pub fn config(&self) -> &SkipNetConfig {
        &self.config
    }

    pub fn portals(&self) -> &PortalSet {
        &self.portals
    }

    /// Mutable portal access for toggling module state.  Marks the index
    /// dirty since a portal's cell or spawn state may change.
    pub fn portals_mut(&mut self) -> &mut PortalSet {
        self.index.mark_dirty();
        &mut self.portals
    }

    pub fn index(&self) -> &PortalIndex {
        &self.index
    }

    pub fn registry(&self) -> &PlanRegistry {
        &self.registry
    }

    // ── Portal lifecycle ──────────────────────────────────────────────────

    /// Add a portal.  Duplicate ids are refused (and logged).
    pub fn register_portal(&mut self, portal: Portal) -> SkipNetResult<()> {
        self.portals.insert(portal)?;
        self.index.mark_dirty();
        Ok(())
    }

    /// Remove a portal and fail every live plan that uses it.
    pub fn unregister_portal<W: World>(&mut self, world: &W, id: PortalId, now: Tick) -> Vec<Directive> {
        let mut out = Vec::new();
        if self.portals.remove(id).is_none() {
            report(&PlanError::UnknownPortal(id));
            return out;
        }
        self.index.mark_dirty();

        for agent in self.registry.snapshot() {
            let affected = self
                .registry
                .get(agent)
                .is_some_and(|p| p.is_live() && p.uses(id));
            if affected {
                self.drive(world, agent, now, &mut out, |plan, ctx| {
                    plan.fail(ctx, InvalidReason::PortalRemoved(id))
                });
            }
        }
        out
    }

    /// The region graph changed shape; re-index before the next search.
    pub fn notify_topology_changed(&mut self) {
        self.index.mark_dirty();
    }

    // ── Plans ─────────────────────────────────────────────────────────────

    /// Search for a shortcut for `agent` and record the outcome.
    ///
    /// On success an `ExecutingEntry` plan replaces whatever the agent had.
    /// A "no shortcut" rejection leaves a placeholder so the attempt is not
    /// repeated this tick; a malformed request leaves no trace.
    #[instrument(skip_all, fields(agent = %agent, request = %request))]
    pub fn find_plan<W: World>(
        &mut self,
        world:   &W,
        agent:   AgentId,
        request: TravelRequest,
        now:     Tick,
    ) -> Result<PlanDraft, PlanRejection> {
        self.index.refresh(&self.portals, world.graph(), now);
        match self.planner.find(world, &self.portals, &self.index, agent, request) {
            Ok(draft) => {
                debug!(entry = %draft.entry, exit = %draft.exit, "plan registered");
                self.registry.insert(RoutePlan::new(agent, request, draft.entry, draft.exit, now));
                Ok(draft)
            }
            Err(rejection) => {
                debug!(%rejection, "no plan");
                if !rejection.is_malformed() {
                    self.registry.insert(RoutePlan::placeholder(agent, request, now));
                }
                Err(rejection)
            }
        }
    }

    /// The agent's plan unless disposed.  Placeholders count.
    pub fn try_get_active_plan(&self, agent: AgentId) -> Option<&RoutePlan> {
        self.registry.active(agent)
    }

    /// `true` if a search for `agent` was rejected since the last cleanup.
    pub fn attempted_this_tick(&self, agent: AgentId) -> bool {
        self.registry.get(agent).is_some_and(RoutePlan::is_placeholder)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance one simulation step.  Returns directives in the order the
    /// host must apply them.
    #[instrument(skip_all, fields(now = %now))]
    pub fn tick<W: World>(&mut self, world: &W, now: Tick) -> Vec<Directive> {
        let mut out = Vec::new();

        self.portals.tick(now);
        self.index.refresh(&self.portals, world.graph(), now);

        for agent in self.registry.snapshot() {
            let due = self.registry.get(agent).is_some_and(|p| p.is_live() && p.arrived());
            if due {
                self.drive(world, agent, now, &mut out, |plan, ctx| plan.resolve(ctx));
            }
        }

        self.cleanup(world, now, &mut out);

        let collected = self.registry.collect_garbage();
        if collected > 0 {
            debug!(collected, remaining = self.registry.len(), "plans collected");
        }
        out
    }

    fn cleanup<W: World>(&mut self, world: &W, now: Tick, out: &mut Vec<Directive>) {
        let access_every = self.config.accessibility_interval;
        let path_every = self.config.pathability_interval;

        for agent in self.registry.snapshot() {
            let Some(plan) = self.registry.get(agent) else {
                continue;
            };
            if plan.is_disposed() {
                continue;
            }
            if plan.is_placeholder() {
                self.registry.dispose(agent);
                continue;
            }
            let Some(info) = world.agent(agent).filter(|a| a.spawned) else {
                debug!(%agent, "agent left; dropping plan");
                self.registry.dispose(agent);
                continue;
            };

            let key = u64::from(agent.0);
            if now.is_hash_interval(key, access_every) && !plan.still_accessible(&info, &self.portals) {
                self.drive(world, agent, now, out, |plan, ctx| {
                    plan.fail(ctx, InvalidReason::Inaccessible)
                });
                continue;
            }
            if now.is_hash_interval(key, path_every) && !plan.still_pathable(world, &info, &self.portals) {
                self.drive(world, agent, now, out, |plan, ctx| {
                    plan.fail(ctx, InvalidReason::Unpathable)
                });
            }
        }
    }

    // ── Movement interception ─────────────────────────────────────────────

    /// The mover is about to start travelling to `request`.
    pub fn before_start_path<W: World>(
        &mut self,
        world:   &W,
        agent:   AgentId,
        request: TravelRequest,
        now:     Tick,
    ) -> PathOverride {
        if request.end_mode == PathEndMode::None || world.resolve_target(request.target).is_none() {
            return PathOverride::Proceed;
        }

        if let Some(plan) = self.registry.active(agent) {
            match plan.state() {
                PlanState::ExecutingEntry if plan.original() == request => {
                    return match plan.entry_request(&self.portals) {
                        Some(entry) => PathOverride::Redirect(entry),
                        None => PathOverride::Proceed,
                    };
                }
                PlanState::ExecutingEntry => {
                    debug!(%agent, "new destination; replacing plan");
                    self.registry.dispose(agent);
                }
                PlanState::None => return PathOverride::Proceed,
                PlanState::ExecutingExit | PlanState::Disposed => {
                    report(&PlanError::InvariantViolation {
                        agent,
                        detail: "path started while plan was executing its exit",
                    });
                    self.registry.dispose(agent);
                    return PathOverride::Proceed;
                }
            }
        }

        self.redirect_for(world, agent, request, now)
            .unwrap_or(PathOverride::Proceed)
    }

    /// The mover reached the end of its current path.
    pub fn on_arrived<W: World>(&mut self, world: &W, agent: AgentId, now: Tick) -> Interception {
        let Some(plan) = self.registry.active(agent).filter(|p| p.is_live()) else {
            return Interception::pass();
        };
        let Some(info) = world.agent(agent) else {
            return Interception::pass();
        };

        let at_entry = plan
            .entry()
            .and_then(|id| self.portals.get(id))
            .is_some_and(|p| p.cell == info.cell);
        let at_target = world
            .resolve_target(plan.original().target)
            .is_some_and(|t| plan.original().end_mode.reached(info.cell, t));
        let state = plan.state();

        if state == PlanState::ExecutingEntry && at_entry {
            let mut out = Vec::new();
            self.drive(world, agent, now, &mut out, |plan, ctx| plan.notify_entry_reached(ctx));
            return Interception::suppress(out);
        }
        if at_target {
            debug!(%agent, "reached original target");
            self.registry.dispose(agent);
        } else if state == PlanState::ExecutingExit {
            report(&PlanError::InvariantViolation { agent, detail: "arrived while executing exit" });
            self.registry.dispose(agent);
        }
        Interception::pass()
    }

    /// The mover failed to produce a path.  A live plan is abandoned in
    /// favour of the original request, and the failure is swallowed.
    pub fn on_path_failed<W: World>(&mut self, world: &W, agent: AgentId, now: Tick) -> Interception {
        let Some(original) = self
            .registry
            .active(agent)
            .filter(|p| p.is_live())
            .map(RoutePlan::original)
        else {
            return Interception::pass();
        };
        let mut out = Vec::new();
        self.drive(world, agent, now, &mut out, |plan, ctx| {
            plan.fail(ctx, InvalidReason::PathFailed)
        });
        // The StartPath just issued must not be hijacked again this tick.
        self.registry.insert(RoutePlan::placeholder(agent, original, now));
        Interception::suppress(out)
    }

    /// The mover is about to recompute its path toward `current`.
    pub fn on_repath<W: World>(
        &mut self,
        world:   &W,
        agent:   AgentId,
        current: TravelRequest,
        now:     Tick,
    ) -> PathOverride {
        match self.registry.active(agent).map(|p| (p.state(), p.original())) {
            Some((PlanState::ExecutingEntry, original)) => {
                let still_good = match (world.agent(agent), self.registry.active(agent)) {
                    (Some(info), Some(plan)) => {
                        plan.still_accessible(&info, &self.portals)
                            && plan.still_pathable(world, &info, &self.portals)
                    }
                    _ => false,
                };
                if still_good {
                    let entry = self
                        .registry
                        .active(agent)
                        .and_then(|p| p.entry_request(&self.portals));
                    if let Some(entry) = entry {
                        return PathOverride::Redirect(entry);
                    }
                }
                debug!(%agent, "plan stale at repath; replanning");
                self.registry.dispose(agent);
                let replanned = self.redirect_for(world, agent, original, now);
                replanned.unwrap_or(PathOverride::Redirect(original))
            }
            Some(_) => PathOverride::Proceed,
            None if current.end_mode != PathEndMode::None => {
                self.redirect_for(world, agent, current, now)
                    .unwrap_or(PathOverride::Proceed)
            }
            None => PathOverride::Proceed,
        }
    }

    /// The request a host should persist for `agent`: the original while a
    /// plan has substituted the path, otherwise `current`.
    pub fn save_view(&self, agent: AgentId, current: TravelRequest) -> TravelRequest {
        self.registry
            .active(agent)
            .filter(|p| p.is_live())
            .map_or(current, RoutePlan::original)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Plan afresh; `Some(Redirect)` to the new entry on success.
    fn redirect_for<W: World>(
        &mut self,
        world:   &W,
        agent:   AgentId,
        request: TravelRequest,
        now:     Tick,
    ) -> Option<PathOverride> {
        self.find_plan(world, agent, request, now).ok()?;
        self.registry
            .active(agent)
            .and_then(|p| p.entry_request(&self.portals))
            .map(PathOverride::Redirect)
    }

    /// Run one plan transition and log its error, if any.
    fn drive<W: World>(
        &mut self,
        world: &W,
        agent: AgentId,
        now:   Tick,
        out:   &mut Vec<Directive>,
        step:  impl FnOnce(&mut RoutePlan, &mut PlanContext<'_, W>) -> PlanResult<()>,
    ) {
        let Some((plan, graveyard)) = self.registry.split_mut(agent) else {
            return;
        };
        let mut ctx = PlanContext {
            now,
            world,
            portals: &mut self.portals,
            graveyard,
            out,
            teleport_flash: self.config.teleport_flash,
        };
        if let Err(err) = step(plan, &mut ctx) {
            report(&err);
        }
    }
}

fn report(err: &PlanError) {
    match err {
        PlanError::Invalidated { .. } => debug!(%err, "plan abandoned"),
        PlanError::UnexpectedNullState { .. } => error!(%err, "plan failed with nothing to restore"),
        PlanError::UnknownPortal(_) | PlanError::InvariantViolation { .. } => warn!(%err, "plan invariant"),
    }
}
