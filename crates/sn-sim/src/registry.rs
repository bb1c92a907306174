//! The one-plan-per-agent table.

use rustc_hash::FxHashMap;

use sn_core::AgentId;

use crate::RoutePlan;

/// Agents whose plans were disposed and await collection.  Distinct.
#[derive(Debug, Default)]
pub struct Graveyard {
    agents: Vec<AgentId>,
}

impl Graveyard {
    /// Returns `false` if `agent` was already buried.
    pub fn bury(&mut self, agent: AgentId) -> bool {
        if self.agents.contains(&agent) {
            return false;
        }
        self.agents.push(agent);
        true
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.agents.contains(&agent)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn take(&mut self) -> Vec<AgentId> {
        std::mem::take(&mut self.agents)
    }
}

/// At most one plan per agent.  Disposed plans linger until
/// [`collect_garbage`](Self::collect_garbage).
#[derive(Debug, Default)]
pub struct PlanRegistry {
    plans:     FxHashMap<AgentId, RoutePlan>,
    graveyard: Graveyard,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `plan`, replacing whatever the agent had.
    pub fn insert(&mut self, plan: RoutePlan) -> Option<RoutePlan> {
        self.plans.insert(plan.agent(), plan)
    }

    /// The agent's plan in any state, disposed included.
    pub fn get(&self, agent: AgentId) -> Option<&RoutePlan> {
        self.plans.get(&agent)
    }

    /// The agent's plan unless it is disposed.
    pub fn active(&self, agent: AgentId) -> Option<&RoutePlan> {
        self.plans.get(&agent).filter(|p| !p.is_disposed())
    }

    /// Mutable plan plus the graveyard, for driving a transition.
    pub fn split_mut(&mut self, agent: AgentId) -> Option<(&mut RoutePlan, &mut Graveyard)> {
        let plan = self.plans.get_mut(&agent)?;
        Some((plan, &mut self.graveyard))
    }

    pub fn dispose(&mut self, agent: AgentId) {
        if let Some((plan, graveyard)) = self.split_mut(agent) {
            plan.dispose(graveyard);
        }
    }

    /// Agent ids in ascending order; safe to iterate while mutating.
    pub fn snapshot(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.plans.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn graveyard(&self) -> &Graveyard {
        &self.graveyard
    }

    /// Remove buried agents whose plan is still disposed (a replacement
    /// plan inserted since burial survives).  Returns the count removed.
    pub fn collect_garbage(&mut self) -> usize {
        let mut removed = 0;
        for agent in self.graveyard.take() {
            if self.plans.get(&agent).is_some_and(RoutePlan::is_disposed) {
                self.plans.remove(&agent);
                removed += 1;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plans currently executing.
    pub fn live_count(&self) -> usize {
        self.plans.values().filter(|p| p.is_live()).count()
    }
}
