//! Combat decision engine.
//!
//! Every active-force unit gets exactly one decision pass per tick,
//! dispatched on its role. Targeting is nearest-first under partial
//! information: straight-line range checks come from this tick's
//! snapshot, travel-distance search is delegated to the engine. An
//! out-of-range action turns into a move toward the same target; the
//! action is not retried within the tick.

use crate::arena::{Arena, Target, UnitId, UnitView};
use crate::config::BotConfig;
use crate::error::ActionError;
use crate::math::Fixed;
use crate::snapshot::WorldView;
use crate::state::{BotState, Role};

/// Build this tick's enemy target set.
///
/// All live non-owned units, plus the enemy facility appended once
/// located - the active force always has a terminal objective even
/// after every enemy unit is down.
#[must_use]
pub fn enemy_targets(world: &WorldView) -> Vec<Target> {
    let mut targets: Vec<Target> = world
        .hostile_units()
        .iter()
        .map(|u| Target::Unit(u.id))
        .collect();
    if let Some(facility) = &world.enemy_facility {
        targets.push(Target::Structure(facility.id));
    }
    targets
}

/// Run combat decisions for every unit in the active force.
pub fn run_combat(state: &BotState, config: &BotConfig, world: &WorldView, arena: &mut dyn Arena) {
    let enemies = enemy_targets(world);

    for &unit in &state.army {
        // Defensive guard: active-force members are never waiting by
        // invariant, but a staged unit must not fight.
        if state.is_waiting(unit) {
            continue;
        }
        let Some(view) = world.unit(unit) else {
            continue;
        };
        let Some(role) = state.role_of(unit) else {
            continue;
        };

        match role {
            Role::Kiter => kiter_turn(view, &enemies, config, world, arena),
            Role::Healer => healer_turn(view, state, world, arena),
            Role::Grunt => grunt_turn(view, &enemies, arena),
            // Workers are driven by the economy loop, never by combat.
            Role::Worker => {}
        }
    }
}

/// Enemies within the engagement radius, nearest first.
///
/// Ties break on target identity so the ordering is stable across runs.
fn targets_in_range(
    view: &UnitView,
    enemies: &[Target],
    world: &WorldView,
    radius: Fixed,
) -> Vec<Target> {
    let mut in_range: Vec<(Fixed, Target)> = enemies
        .iter()
        .filter_map(|&target| {
            let pos = world.target_position(target)?;
            view.position
                .within_range(pos, radius)
                .then(|| (view.position.distance_squared(pos), target))
        })
        .collect();
    in_range.sort_by_key(|&(dist, target)| (dist.to_bits(), target));
    in_range.into_iter().map(|(_, target)| target).collect()
}

/// Kiter: area attack at the threshold count in range, single ranged
/// attack below it, otherwise close toward the nearest enemy by travel
/// distance. Self-heals every tick regardless of the attack branch.
fn kiter_turn(
    view: &UnitView,
    enemies: &[Target],
    config: &BotConfig,
    world: &WorldView,
    arena: &mut dyn Arena,
) {
    let in_range = targets_in_range(view, enemies, world, config.engagement_radius_fixed());

    if in_range.len() >= config.area_attack_threshold {
        let _ = arena.ranged_mass_attack(view.id);
    } else if let Some(&nearest) = in_range.first() {
        let _ = arena.ranged_attack(view.id, nearest);
    } else if let Some(enemy) = arena.find_closest_by_path(view.id, enemies) {
        arena.move_to(view.id, enemy);
    }

    let _ = arena.heal(view.id, view.id);
}

/// Healer: heal the nearest damaged ally by travel distance, or shadow
/// the force when nobody needs healing. Healers never attack.
fn healer_turn(view: &UnitView, state: &BotState, world: &WorldView, arena: &mut dyn Arena) {
    let damaged: Vec<Target> = living_allies(view.id, state, world)
        .filter(|ally| ally.is_damaged())
        .map(|ally| Target::Unit(ally.id))
        .collect();

    if let Some(Target::Unit(patient)) = arena.find_closest_by_path(view.id, &damaged) {
        if let Err(ActionError::NotInRange) = arena.heal(view.id, patient) {
            arena.move_to(view.id, Target::Unit(patient));
        }
        return;
    }

    // Cohesion: stay with the force while everyone is healthy.
    let allies: Vec<Target> = living_allies(view.id, state, world)
        .map(|ally| Target::Unit(ally.id))
        .collect();
    if let Some(ally) = arena.find_closest_by_path(view.id, &allies) {
        arena.move_to(view.id, ally);
    }
}

/// Grunt: chase and melee the nearest enemy by travel distance.
fn grunt_turn(view: &UnitView, enemies: &[Target], arena: &mut dyn Arena) {
    let Some(enemy) = arena.find_closest_by_path(view.id, enemies) else {
        return;
    };
    if let Err(ActionError::NotInRange) = arena.attack(view.id, enemy) {
        arena.move_to(view.id, enemy);
    }
}

/// Live active-force members other than `this`.
fn living_allies<'a>(
    this: UnitId,
    state: &'a BotState,
    world: &'a WorldView,
) -> impl Iterator<Item = &'a UnitView> {
    state
        .army
        .iter()
        .filter(move |&&id| id != this)
        .filter_map(|&id| world.unit(id))
}
