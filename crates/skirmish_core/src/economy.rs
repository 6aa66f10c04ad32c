//! Resource economy: the proximity gauge and the worker loop.
//!
//! The gauge is the bot's starvation signal: when nothing is left to
//! withdraw near the facility, waiting for a full squad would stall the
//! match forever, so the gate upstream forces a partial deployment.
//!
//! Workers run a two-state gather/deliver machine. The state is not
//! stored anywhere; it is recomputed from the carry level every tick.

use crate::arena::{Arena, ContainerView, Target};
use crate::error::ActionError;
use crate::math::{Fixed, Vec2Fixed};
use crate::snapshot::WorldView;
use crate::state::BotState;

/// Total resource stored in containers within `radius` of `origin`.
///
/// Pure, O(containers). Zero means the local economy is exhausted.
#[must_use]
pub fn stored_near(origin: Vec2Fixed, containers: &[ContainerView], radius: Fixed) -> i32 {
    containers
        .iter()
        .filter(|c| origin.within_range(c.position, radius))
        .map(|c| c.stored)
        .sum()
}

/// What a worker should be doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerTask {
    /// Cargo space left: fetch from a container.
    Gather,
    /// Full: bring the load home.
    Deliver,
}

impl WorkerTask {
    /// Derive the task from the worker's current carry level.
    #[must_use]
    pub const fn for_carry(carry: i32, capacity: i32) -> Self {
        if carry < capacity {
            Self::Gather
        } else {
            Self::Deliver
        }
    }
}

/// Run the economy loop over every live worker.
///
/// Gathering workers withdraw from the nearest non-empty container;
/// delivering workers transfer to the owned facility. Out-of-range
/// actions become a move toward the same target. A missing container or
/// facility is an expected state and degrades to a no-op for that
/// worker this tick.
pub fn run_workers(state: &BotState, world: &WorldView, arena: &mut dyn Arena) {
    for &worker in &state.workers {
        let Some(view) = world.unit(worker) else {
            continue;
        };

        match WorkerTask::for_carry(view.carry, view.carry_capacity) {
            WorkerTask::Gather => {
                let candidates: Vec<Target> = world
                    .containers
                    .iter()
                    .filter(|c| !c.is_empty())
                    .map(|c| Target::Structure(c.id))
                    .collect();
                let Some(target) = arena.find_closest_by_path(worker, &candidates) else {
                    continue;
                };
                let Target::Structure(container) = target else {
                    continue;
                };
                if let Err(ActionError::NotInRange) = arena.withdraw(worker, container) {
                    arena.move_to(worker, target);
                }
            }
            WorkerTask::Deliver => {
                let Some(facility) = state.my_facility else {
                    continue;
                };
                if let Err(ActionError::NotInRange) = arena.transfer(worker, facility) {
                    arena.move_to(worker, Target::Structure(facility));
                }
            }
        }
    }
}
