//! Agent filter applied before any graph work.

use sn_core::{AccessMode, AgentInfo, SkipNetConfig};

/// Which agents may request portal plans.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AccessPolicy {
    pub mode:            AccessMode,
    pub animals_can_use: bool,
}

impl AccessPolicy {
    pub fn from_config(config: &SkipNetConfig) -> Self {
        Self { mode: config.access_mode, animals_can_use: config.animals_can_use }
    }

    pub fn permits(&self, agent: &AgentInfo) -> bool {
        if self.mode == AccessMode::ColonistsOnly && !agent.colony_member {
            return false;
        }
        if self.mode != AccessMode::Everyone && agent.hostile {
            return false;
        }
        // Animals on a lead go where their handler goes.
        if !self.animals_can_use && agent.animal && !agent.led {
            return false;
        }
        true
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::from_config(&SkipNetConfig::default())
    }
}
