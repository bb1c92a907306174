//! corridor — a U-shaped floor plan with a portal pair across the gap.
//!
//! Agents shuttle between the two arms of the U.  On foot every trip goes
//! round the whole bottom row; with SkipNet most trips become a short walk,
//! a wait at a charging portal, and a teleport.  Partway through the run the
//! exit portal loses power and a bottom-row room collapses, so plans are
//! re-validated, abandoned and rebuilt while agents are on the move.
//!
//! ```text
//! cargo run -p corridor                                  # default config
//! cargo run -p corridor -- demos/corridor/skipnet.json   # config from JSON
//! RUST_LOG=sn_sim=debug cargo run -p corridor            # per-plan logs
//! ```

mod layout;
mod mover;

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sn_core::{AgentId, AgentInfo, SimRng, SkipNetConfig, Tick, TravelRequest};
use sn_planner::{SimpleWorld, World};
use sn_portal::PowerGate;
use sn_sim::{Directive, PathOverride, SkipNet, SkipNetBuilder};

use layout::{Layout, RIGHT_PORTAL, Side, build_layout, build_portals};
use mover::{Mover, Step};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:     u32 = 12;
const VISITOR_EVERY:   u32 = 4;     // every 4th agent is not a colony member
const SEED:            u64 = 42;
const SIM_TICKS:       u64 = 2_400;
const REPATH_INTERVAL: u64 = 120;
const POWER_CUT:       (u64, u64) = (600, 1_000);
const COLLAPSE:        (u64, u64) = (1_400, 1_800);

// ── Stats ─────────────────────────────────────────────────────────────────────

#[derive(Default, Debug)]
struct Stats {
    trips:          u32,
    redirects:      u32,
    teleports:      u32,
    flashes:        u32,
    cooldown_ticks: u64,
    path_failures:  u32,
    repaths:        u32,
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// The host side of the integration: owns the world and the mover, forwards
/// movement events to SkipNet and applies whatever it answers.
struct Host {
    world:  SimpleWorld,
    net:    SkipNet,
    mover:  Mover,
    layout: Layout,
    rng:    SimRng,
    /// Where each agent actually wants to go; unaffected by redirects.
    intents: BTreeMap<AgentId, TravelRequest>,
    stats:   Stats,
}

impl Host {
    fn run_tick(&mut self, now: Tick) -> Result<()> {
        self.scripted_events(now)?;
        self.step_agents(now);
        let directives = self.net.tick(&self.world, now);
        self.apply(directives, now);
        Ok(())
    }

    fn scripted_events(&mut self, now: Tick) -> Result<()> {
        let powered = match now.0 {
            t if t == POWER_CUT.0 => Some(false),
            t if t == POWER_CUT.1 => Some(true),
            _ => None,
        };
        if let Some(powered) = powered {
            let gate = self
                .net
                .portals_mut()
                .get_mut(RIGHT_PORTAL)
                .and_then(|p| p.module_mut::<PowerGate>());
            if let Some(gate) = gate {
                gate.set_powered(powered);
                info!(%now, powered, "exit portal power switched");
            }
        }

        let collapsed = match now.0 {
            t if t == COLLAPSE.0 => Some(true),
            t if t == COLLAPSE.1 => Some(false),
            _ => None,
        };
        if let Some(collapsed) = collapsed {
            let room = self.layout.collapse_room;
            self.world
                .graph_mut()
                .set_valid(room, !collapsed)
                .with_context(|| format!("toggling {room}"))?;
            self.net.notify_topology_changed();
            info!(%now, %room, collapsed, "bottom-row room changed");
        }
        Ok(())
    }

    fn step_agents(&mut self, now: Tick) {
        let agents: Vec<AgentId> = self.world.agents().map(|a| a.id).collect();
        for agent in agents {
            match self.mover.step(&mut self.world, agent, now) {
                Step::Arrived => self.arrive(agent, now),
                Step::Blocked(current) => self.repath(agent, current, now),
                Step::Walking if now.is_hash_interval(u64::from(agent.0), REPATH_INTERVAL) => {
                    if let Some(current) = self.mover.current(agent) {
                        self.repath(agent, current, now);
                    }
                }
                Step::Idle => self.idle(agent, now),
                Step::Walking | Step::Holding => {}
            }
        }
    }

    /// An agent with no path: waiting at a portal, resuming, or done.
    fn idle(&mut self, agent: AgentId, now: Tick) {
        if self.net.try_get_active_plan(agent).is_some_and(|p| p.is_live()) {
            return;
        }
        match self.intents.get(&agent).copied() {
            Some(intent) => self.start_path(agent, intent, now),
            None => self.pick_destination(agent, now),
        }
    }

    fn pick_destination(&mut self, agent: AgentId, now: Tick) {
        let Some(info) = self.world.agent(agent) else {
            return;
        };
        let side = self.layout.side_of(info.cell).opposite();
        let Some(goal) = self.layout.random_cell(side, &mut self.rng) else {
            return;
        };
        let intent = TravelRequest::on_cell(goal);
        self.intents.insert(agent, intent);
        self.start_path(agent, intent, now);
    }

    /// What a mover does before it computes a path: give SkipNet the chance
    /// to substitute the entry portal.
    fn start_path(&mut self, agent: AgentId, request: TravelRequest, now: Tick) {
        let request = match self.net.before_start_path(&self.world, agent, request, now) {
            PathOverride::Proceed => request,
            PathOverride::Redirect(entry) => {
                self.stats.redirects += 1;
                entry
            }
        };
        if !self.mover.start(&self.world, agent, request) {
            self.path_failed(agent, now);
        }
    }

    fn repath(&mut self, agent: AgentId, current: TravelRequest, now: Tick) {
        self.stats.repaths += 1;
        let request = match self.net.on_repath(&self.world, agent, current, now) {
            PathOverride::Proceed => current,
            PathOverride::Redirect(other) => other,
        };
        if !self.mover.start(&self.world, agent, request) {
            self.path_failed(agent, now);
        }
    }

    fn path_failed(&mut self, agent: AgentId, now: Tick) {
        self.stats.path_failures += 1;
        let interception = self.net.on_path_failed(&self.world, agent, now);
        let suppressed = interception.suppress_default;
        self.apply(interception.directives, now);
        if !suppressed {
            debug!(%agent, "no path; dropping destination");
            self.intents.remove(&agent);
        }
    }

    fn arrive(&mut self, agent: AgentId, now: Tick) {
        let interception = self.net.on_arrived(&self.world, agent, now);
        let suppressed = interception.suppress_default;
        self.apply(interception.directives, now);
        if suppressed {
            return;
        }
        let Some(intent) = self.intents.get(&agent).copied() else {
            return;
        };
        let done = match (self.world.agent(agent), self.world.resolve_target(intent.target)) {
            (Some(info), Some(goal)) => intent.end_mode.reached(info.cell, goal),
            _ => true,
        };
        if done {
            self.stats.trips += 1;
            self.intents.remove(&agent);
        } else {
            self.start_path(agent, intent, now);
        }
    }

    fn apply(&mut self, directives: Vec<Directive>, now: Tick) {
        for directive in directives {
            match directive {
                Directive::StartPath { agent, request } => self.start_path(agent, request, now),
                Directive::StopDead { agent } => self.mover.stop(agent),
                Directive::ResetStance { agent } => self.mover.release(agent),
                Directive::Cooldown { agent, ticks } => {
                    self.mover.hold(agent, now + u64::from(ticks));
                    self.stats.cooldown_ticks += u64::from(ticks);
                }
                Directive::Teleport { agent, to } => {
                    self.world.set_agent_cell(agent, to);
                    self.stats.teleports += 1;
                }
                Directive::Effect { agent, kind, at } => {
                    self.stats.flashes += 1;
                    debug!(%agent, ?kind, %at, "flash");
                }
            }
        }
    }

    /// Log what a save file would record for every walking agent.
    fn log_save_view(&self) -> Result<()> {
        for info in self.world.agents() {
            if let Some(current) = self.mover.current(info.id) {
                let saved = self.net.save_view(info.id, current);
                let json = serde_json::to_string(&saved)?;
                info!(agent = %info.id, saved = %json, "save view");
            }
        }
        Ok(())
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SkipNetConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(SkipNetConfig::default()),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("corridor=info,sn_sim=info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();

    let config = load_config()?;
    info!(?config, "configuration");

    let (map, layout) = build_layout()?;
    info!(regions = map.region_count(), links = map.link_count(), "layout built");

    let mut rng = SimRng::new(SEED);
    let mut world = SimpleWorld::new(map);
    for i in 1..=AGENT_COUNT {
        let side = if i % 2 == 0 { Side::Left } else { Side::Right };
        let cell = layout.random_cell(side, &mut rng).context("arm has no rooms")?;
        let mut agent = AgentInfo::colonist(AgentId(i), cell);
        agent.colony_member = i % VISITOR_EVERY != 0;
        world.put_agent(agent);
    }

    let net = SkipNetBuilder::new(config).portals(build_portals()).build()?;
    for portal in net.portals().iter() {
        let modules: Vec<&str> = portal.module_names().collect();
        info!(portal = %portal.id, cell = %portal.cell, ?modules, "portal registered");
    }

    let mut host = Host {
        world,
        net,
        mover: Mover::new(),
        layout,
        rng,
        intents: BTreeMap::new(),
        stats: Stats::default(),
    };

    let t0 = Instant::now();
    for t in 0..SIM_TICKS {
        host.run_tick(Tick(t))?;
        if t % 600 == 599 {
            info!(
                tick = t + 1,
                trips = host.stats.trips,
                teleports = host.stats.teleports,
                live_plans = host.net.registry().live_count(),
                "progress"
            );
        }
    }
    let elapsed = t0.elapsed();

    host.log_save_view()?;
    info!(
        ticks = SIM_TICKS,
        elapsed_ms = elapsed.as_millis() as u64,
        stats = ?host.stats,
        "run complete"
    );
    Ok(())
}
