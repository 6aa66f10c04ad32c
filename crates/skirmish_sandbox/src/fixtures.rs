//! Scenario fixtures and helpers.
//!
//! Pre-built battlefields and proptest strategies for consistent
//! testing across crates.

use skirmish_core::arena::BodyPart;
use skirmish_core::math::{Fixed, Vec2Fixed};

use crate::arena::SandboxArena;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// Create a fixed-point position from integer coordinates.
#[must_use]
pub fn pos(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(fixed(x), fixed(y))
}

/// The canonical skirmish battlefield.
///
/// Our facility in the west with two containers in gauge range, one
/// richer container mid-map, the enemy facility in the east behind a
/// small melee garrison. Enemy retaliation enabled.
#[must_use]
pub fn skirmish_scenario() -> SandboxArena {
    SandboxArena::new()
        .with_my_facility(pos(10, 30), 1000)
        .with_container(pos(12, 32), 400)
        .with_container(pos(7, 28), 300)
        .with_container(pos(50, 30), 800)
        .with_enemy_facility(pos(90, 30))
        .with_enemy_unit(pos(85, 28), vec![BodyPart::Move, BodyPart::Attack, BodyPart::Attack])
        .with_enemy_unit(pos(85, 32), vec![BodyPart::Move, BodyPart::Attack, BodyPart::Attack])
        .with_retaliation()
}

/// A battlefield with nothing left to withdraw near our facility.
///
/// The only stocked container sits far outside the gauge radius, so the
/// starvation signal fires from the first tick.
#[must_use]
pub fn starved_scenario() -> SandboxArena {
    SandboxArena::new()
        .with_my_facility(pos(10, 30), 1000)
        .with_container(pos(12, 32), 0)
        .with_container(pos(60, 30), 500)
        .with_enemy_facility(pos(90, 30))
}

/// Proptest strategies for sandbox scenarios.
pub mod strategies {
    use proptest::prelude::*;
    use skirmish_core::arena::BodyPart;
    use skirmish_core::math::Vec2Fixed;

    use super::{fixed, pos};

    /// Generate a position on the standard 100x60 battlefield.
    pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
        (0i32..100, 0i32..60).prop_map(|(x, y)| pos(x, y))
    }

    /// Generate a container stock level, empty included.
    pub fn arb_stock() -> impl Strategy<Value = i32> {
        prop_oneof![Just(0), 1i32..1000]
    }

    /// Generate a plausible combat body.
    pub fn arb_combat_body() -> impl Strategy<Value = Vec<BodyPart>> {
        use BodyPart::{Attack, Heal, Move, RangedAttack};
        prop_oneof![
            Just(vec![Move, Move, Attack, Attack]),
            Just(vec![Move, Move, Move, Heal, Heal]),
            Just(vec![Move, Move, Move, Heal, RangedAttack]),
        ]
    }

    /// Generate a gauge radius in a sensible band.
    pub fn arb_radius() -> impl Strategy<Value = skirmish_core::math::Fixed> {
        (1i32..20).prop_map(fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::arena::Arena;

    #[test]
    fn test_skirmish_scenario_shape() {
        let arena = skirmish_scenario();
        assert!(arena.my_facility_alive());
        assert!(arena.enemy_facility_alive());
        assert_eq!(arena.hostile_count(), 2);
        assert_eq!(arena.containers().len(), 3);
    }

    #[test]
    fn test_starved_scenario_has_no_local_stock() {
        use skirmish_core::economy::stored_near;

        let arena = starved_scenario();
        let total = stored_near(pos(10, 30), &arena.containers(), fixed(5));
        assert_eq!(total, 0);
    }
}
