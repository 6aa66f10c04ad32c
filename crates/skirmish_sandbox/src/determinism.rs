//! Determinism testing utilities.
//!
//! The decision core must produce identical decisions from identical
//! battlefields. Sources of non-determinism this harness catches:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized,
//!   so anything derived from map iteration must sort first.
//! - **Floating-point math**: none is allowed in decision paths; all
//!   positional math is fixed-point.
//! - **Tie-breaking**: nearest-target selection must break distance
//!   ties on stable identity, never on iteration order.

use skirmish_core::bot::Bot;

use crate::arena::SandboxArena;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Assert that all runs matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic,
            "Runs diverged!\nRuns: {}\nTicks: {}\nHashes: {:?}",
            self.hashes.len(),
            self.ticks,
            self.hashes
        );
    }
}

/// Run a setup/step/hash cycle multiple times and compare final hashes.
///
/// # Arguments
///
/// * `runs` - Number of times to repeat the whole simulation
/// * `ticks` - Number of ticks per run
/// * `setup` - Builds the initial state
/// * `step` - Advances the state by one tick
/// * `hash` - Computes the final state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        for _ in 0..ticks {
            step(&mut state);
        }
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Combined hash of a bot and the battlefield it plays on.
#[must_use]
pub fn match_hash(bot: &Bot, arena: &SandboxArena) -> u64 {
    bot.state().state_hash() ^ arena.state_hash().rotate_left(1)
}

/// Verify that a whole bot-vs-sandbox match replays identically.
///
/// Runs the pairing `runs` times for `ticks` ticks each and compares the
/// combined bot+arena hash.
pub fn verify_match_determinism<F>(runs: usize, ticks: u64, setup: F) -> DeterminismResult
where
    F: Fn() -> (Bot, SandboxArena),
{
    verify_determinism(
        runs,
        ticks,
        setup,
        |(bot, arena)| {
            bot.tick(arena);
            arena.step();
        },
        |(bot, arena)| match_hash(bot, arena),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::skirmish_scenario;
    use skirmish_core::config::BotConfig;
    use skirmish_core::policy::SpawnPolicy;

    #[test]
    fn test_verify_determinism_counter() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);
        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_skirmish_match_is_deterministic() {
        let result = verify_match_determinism(3, 300, || {
            let bot = Bot::new(BotConfig::default(), SpawnPolicy::uniform_kiter());
            (bot, skirmish_scenario())
        });
        result.assert_deterministic();
    }

    #[test]
    fn test_assault_match_is_deterministic() {
        let result = verify_match_determinism(2, 300, || {
            let bot = Bot::new(BotConfig::default(), SpawnPolicy::assault_with_support());
            (bot, skirmish_scenario())
        });
        result.assert_deterministic();
    }
}
