//! Headless match execution.
//!
//! Plays the bot against a sandbox scenario until a facility falls or
//! the tick budget runs out, collecting a serializable report along the
//! way. The loop is bounded: whatever the bot does, a match terminates.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skirmish_core::bot::Bot;
use skirmish_core::config::BotConfig;
use skirmish_core::policy::SpawnPolicy;
use skirmish_core::state::Role;
use skirmish_sandbox::determinism::match_hash;
use skirmish_sandbox::fixtures::skirmish_scenario;

/// Progress logging interval, in ticks.
const PROGRESS_LOG_INTERVAL: u64 = 500;

/// Configuration for a single headless match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Bot tuning parameters.
    pub bot_config: BotConfig,
    /// Production-and-role policy.
    pub policy: SpawnPolicy,
    /// Maximum ticks before the match is called a timeout.
    pub max_ticks: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            bot_config: BotConfig::default(),
            policy: SpawnPolicy::default(),
            max_ticks: 5_000,
        }
    }
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The enemy facility was razed.
    Victory,
    /// Our facility was razed.
    Defeat,
    /// The tick budget ran out first.
    Timeout,
}

/// Serializable result of a headless match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Policy the bot played.
    pub policy: String,
    /// Ticks actually played.
    pub duration_ticks: u64,
    /// How the match ended.
    pub outcome: MatchOutcome,
    /// Units produced, by role name.
    pub units_produced: Vec<(String, u32)>,
    /// Units lost to attrition.
    pub units_lost: usize,
    /// Squad deployments performed.
    pub deployments: u32,
    /// Deployments forced by starvation.
    pub forced_deployments: u32,
    /// Hostile units remaining at the end.
    pub hostiles_remaining: usize,
    /// Combined bot+arena hash (for determinism validation).
    pub final_state_hash: u64,
}

/// Play one match and collect the report.
pub fn run_match(config: MatchConfig) -> MatchReport {
    let mut bot = Bot::new(config.bot_config, config.policy);
    let mut arena = skirmish_scenario();

    info!(
        policy = %bot.policy().name,
        max_ticks = config.max_ticks,
        "starting match"
    );

    let mut produced: Vec<(String, u32)> = Vec::new();
    let mut units_lost = 0usize;
    let mut deployments = 0u32;
    let mut forced_deployments = 0u32;
    let mut outcome = MatchOutcome::Timeout;
    let mut duration = config.max_ticks;

    for tick in 0..config.max_ticks {
        let report = bot.tick(&mut arena);
        arena.step();

        units_lost += report.pruned;
        if report.deployed > 0 {
            deployments += 1;
            if report.starved {
                forced_deployments += 1;
            }
            debug!(tick, released = report.deployed, "squad deployed");
        }
        if let Some((_, role)) = report.produced {
            record_production(&mut produced, role);
        }
        if tick % PROGRESS_LOG_INTERVAL == 0 {
            debug!(
                tick,
                army = bot.state().army.len(),
                squad = bot.state().squad.len(),
                hostiles = arena.hostile_count(),
                "match progress"
            );
        }

        if !arena.enemy_facility_alive() {
            outcome = MatchOutcome::Victory;
            duration = tick + 1;
            break;
        }
        if !arena.my_facility_alive() {
            outcome = MatchOutcome::Defeat;
            duration = tick + 1;
            break;
        }
    }

    info!(?outcome, duration, "match finished");

    MatchReport {
        policy: bot.policy().name.clone(),
        duration_ticks: duration,
        outcome,
        units_produced: produced,
        units_lost,
        deployments,
        forced_deployments,
        hostiles_remaining: arena.hostile_count(),
        final_state_hash: match_hash(&bot, &arena),
    }
}

fn record_production(produced: &mut Vec<(String, u32)>, role: Role) {
    let name = format!("{role:?}");
    if let Some(entry) = produced.iter_mut().find(|(n, _)| *n == name) {
        entry.1 += 1;
    } else {
        produced.push((name, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_terminates_within_budget() {
        let report = run_match(MatchConfig {
            max_ticks: 200,
            ..Default::default()
        });
        assert!(report.duration_ticks <= 200);
    }

    #[test]
    fn test_match_produces_workers_first() {
        let report = run_match(MatchConfig {
            max_ticks: 50,
            ..Default::default()
        });
        let workers = report
            .units_produced
            .iter()
            .find(|(name, _)| name == "Worker")
            .map_or(0, |(_, n)| *n);
        assert_eq!(workers, 3);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = run_match(MatchConfig {
            max_ticks: 20,
            ..Default::default()
        });
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("duration_ticks"));
    }
}
