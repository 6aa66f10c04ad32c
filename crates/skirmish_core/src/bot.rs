//! The per-tick driver.
//!
//! One logical pass through all components per simulation tick, in a
//! fixed order: snapshot, starvation gauge, deployment gate, economy,
//! combat, production. The order matters - combat reads collections the
//! gate mutated earlier in the same tick - and there is no other
//! intra-tick hazard: the pipeline is single-threaded and every engine
//! call returns immediately.

use crate::arena::{Arena, UnitId};
use crate::config::BotConfig;
use crate::policy::SpawnPolicy;
use crate::state::{BotState, Role};
use crate::{combat, economy, snapshot, spawner, squad};

/// What happened during one tick, for observability and match reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number this report describes.
    pub tick: u64,
    /// Stale unit references dropped by the snapshot.
    pub pruned: usize,
    /// Whether the starvation signal fired this tick.
    pub starved: bool,
    /// Units released from the staging squad this tick.
    pub deployed: usize,
    /// Unit produced this tick, if any.
    pub produced: Option<(UnitId, Role)>,
}

/// The combat bot: configuration, policy and state behind a single
/// per-tick entry point.
#[derive(Debug, Clone)]
pub struct Bot {
    config: BotConfig,
    policy: SpawnPolicy,
    state: BotState,
    tick: u64,
}

impl Bot {
    /// Create a bot with the given configuration and spawn policy.
    #[must_use]
    pub fn new(config: BotConfig, policy: SpawnPolicy) -> Self {
        Self {
            config,
            policy,
            state: BotState::new(),
            tick: 0,
        }
    }

    /// Bot state, for inspection by tests and match reports.
    #[must_use]
    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// The configuration this bot runs with.
    #[must_use]
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// The spawn policy this bot runs with.
    #[must_use]
    pub fn policy(&self) -> &SpawnPolicy {
        &self.policy
    }

    /// Number of ticks evaluated so far.
    #[must_use]
    pub const fn ticks_run(&self) -> u64 {
        self.tick
    }

    /// Evaluate one simulation tick.
    pub fn tick(&mut self, arena: &mut dyn Arena) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        // 1. Reconcile tracked state with what is actually alive.
        let (world, pruned) = snapshot::refresh(&mut self.state, arena);
        report.pruned = pruned;

        // 2 + 3. Starvation gauge feeds the deployment gate. Without a
        // facility there is no economy to starve and no gate to run.
        if let Some(facility) = &world.my_facility {
            let remaining = economy::stored_near(
                facility.position,
                &world.containers,
                self.config.starvation_radius_fixed(),
            );
            report.starved = remaining == 0;
            if report.starved {
                tracing::trace!(tick = self.tick, "local resource exhausted");
            }
            report.deployed =
                squad::evaluate_deployment(&mut self.state, self.config.squad_quota, report.starved);
        }

        // 4. Workers gather and deliver.
        economy::run_workers(&self.state, &world, arena);

        // 5. Active force fights.
        combat::run_combat(&self.state, &self.config, &world, arena);

        // 6. Production last, so a fresh unit acts no earlier than the
        // tick after it appears in the snapshot.
        report.produced = spawner::run_spawner(&mut self.state, &self.config, &self.policy, arena);

        self.tick += 1;
        report
    }
}

impl Default for Bot {
    fn default() -> Self {
        Self::new(BotConfig::default(), SpawnPolicy::default())
    }
}
