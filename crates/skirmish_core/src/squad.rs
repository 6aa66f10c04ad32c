//! Staging squad and deployment gate.
//!
//! Newly produced combat units wait in the staging squad until either
//! the squad reaches quota or the economy starves. Deployment moves the
//! whole squad into the active force in one batch; the spawn-delay
//! cooldown throttles how soon after a production that can happen.

use crate::state::BotState;

/// Evaluate the deployment gate for this tick.
///
/// The spawn-delay counter ticks down exactly once per tick while
/// positive and blocks deployment until it reaches zero, whether or not
/// quota or starvation holds. Once clear, the squad deploys when it has
/// reached `quota` members or when `forced` is set. Deployment clears
/// every member's waiting flag and drains the squad into the active
/// force atomically; forcing an empty squad is a legal no-op.
///
/// Returns the number of units released.
pub fn evaluate_deployment(state: &mut BotState, quota: usize, forced: bool) -> usize {
    if state.spawn_delay > 0 {
        state.spawn_delay -= 1;
        return 0;
    }

    if state.squad.len() < quota && !forced {
        return 0;
    }

    for id in &state.squad {
        if let Some(meta) = state.meta.get_mut(id) {
            meta.waiting_for_squad = false;
        }
    }

    let released = state.squad.len();
    state.army.append(&mut state.squad);

    if released > 0 {
        tracing::debug!(released, forced, "deployed staging squad");
    }
    released
}
