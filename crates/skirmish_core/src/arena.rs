//! The engine collaborator boundary.
//!
//! The decision core never touches engine internals. Everything it knows
//! about the battlefield arrives through [`Arena`] queries as read-only
//! view structs, and everything it does goes back out as [`Arena`]
//! commands. Engine calls are synchronous and return immediately with a
//! result or a recoverable condition code; pathing and damage resolution
//! happen inside the engine over subsequent ticks.

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, SpawnError};
use crate::math::Vec2Fixed;

/// Unique identifier for units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u64);

/// Unique identifier for structures (facilities, containers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub u64);

/// Anything a unit can act on: another unit or a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Target {
    /// A unit target.
    Unit(UnitId),
    /// A structure target.
    Structure(StructureId),
}

/// Body part vocabulary for unit production.
///
/// A unit's body is an ordered list of parts; the part mix determines
/// what the unit can do and what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    /// Locomotion.
    Move,
    /// Resource cargo space.
    Carry,
    /// Melee attack.
    Attack,
    /// Ranged attack.
    RangedAttack,
    /// Healing.
    Heal,
}

/// Read-only snapshot of a live unit, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitView {
    /// Unit identity.
    pub id: UnitId,
    /// Whether this unit belongs to us.
    pub mine: bool,
    /// Current hit points.
    pub hits: i32,
    /// Maximum hit points.
    pub hits_max: i32,
    /// Resource currently carried.
    pub carry: i32,
    /// Carry capacity.
    pub carry_capacity: i32,
    /// World position this tick.
    pub position: Vec2Fixed,
}

impl UnitView {
    /// Check whether the unit has lost hit points.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }

    /// Remaining cargo space.
    #[must_use]
    pub const fn free_capacity(&self) -> i32 {
        self.carry_capacity - self.carry
    }
}

/// Read-only snapshot of a production facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityView {
    /// Structure identity.
    pub id: StructureId,
    /// Whether this facility belongs to us.
    pub mine: bool,
    /// World position.
    pub position: Vec2Fixed,
}

/// Read-only snapshot of a resource container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerView {
    /// Structure identity.
    pub id: StructureId,
    /// Resource currently stored.
    pub stored: i32,
    /// World position.
    pub position: Vec2Fixed,
}

impl ContainerView {
    /// Check whether the container still holds resource.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stored <= 0
    }
}

/// The arena engine, as seen by the decision core.
///
/// Query methods enumerate live objects only - anything destroyed before
/// this tick simply does not appear. Command methods are fire-and-forget
/// where the engine resolves the effect over time (`move_to`), or return
/// success / [`ActionError::NotInRange`] where the effect is immediate.
///
/// Object-safe by design; the core consumes it as `&mut dyn Arena`.
pub trait Arena {
    /// Enumerate all live units, owned and hostile.
    fn units(&self) -> Vec<UnitView>;

    /// Enumerate all live production facilities.
    fn facilities(&self) -> Vec<FacilityView>;

    /// Enumerate all resource containers.
    fn containers(&self) -> Vec<ContainerView>;

    /// Find the candidate nearest to `from` by travel distance.
    ///
    /// Travel distance accounts for terrain, so this is engine-resolved;
    /// straight-line proximity checks are done core-side from positions.
    /// Returns `None` when no candidate is reachable.
    fn find_closest_by_path(&self, from: UnitId, candidates: &[Target]) -> Option<Target>;

    /// Request production of a unit with the given body composition.
    fn spawn_unit(&mut self, body: &[BodyPart]) -> Result<UnitId, SpawnError>;

    /// Order a unit to move toward a target. Fire-and-forget.
    fn move_to(&mut self, unit: UnitId, target: Target);

    /// Melee-attack a target.
    fn attack(&mut self, unit: UnitId, target: Target) -> Result<(), ActionError>;

    /// Ranged-attack a target.
    fn ranged_attack(&mut self, unit: UnitId, target: Target) -> Result<(), ActionError>;

    /// Area attack hitting every hostile within the unit's ranged radius.
    fn ranged_mass_attack(&mut self, unit: UnitId) -> Result<(), ActionError>;

    /// Heal a friendly unit (possibly the healer itself).
    fn heal(&mut self, unit: UnitId, target: UnitId) -> Result<(), ActionError>;

    /// Withdraw resource from a container.
    fn withdraw(&mut self, unit: UnitId, container: StructureId) -> Result<(), ActionError>;

    /// Deposit carried resource into a structure.
    fn transfer(&mut self, unit: UnitId, structure: StructureId) -> Result<(), ActionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;

    #[test]
    fn test_unit_view_damage_and_capacity() {
        let view = UnitView {
            id: UnitId(1),
            mine: true,
            hits: 40,
            hits_max: 100,
            carry: 30,
            carry_capacity: 50,
            position: Vec2Fixed::ZERO,
        };
        assert!(view.is_damaged());
        assert_eq!(view.free_capacity(), 20);
    }

    #[test]
    fn test_container_empty() {
        let container = ContainerView {
            id: StructureId(9),
            stored: 0,
            position: Vec2Fixed::new(Fixed::from_num(1), Fixed::from_num(1)),
        };
        assert!(container.is_empty());
    }

    #[test]
    fn test_target_ordering_is_stable() {
        // Unit targets sort before structure targets; ids break ties.
        let mut targets = vec![
            Target::Structure(StructureId(1)),
            Target::Unit(UnitId(7)),
            Target::Unit(UnitId(2)),
        ];
        targets.sort();
        assert_eq!(
            targets,
            vec![
                Target::Unit(UnitId(2)),
                Target::Unit(UnitId(7)),
                Target::Structure(StructureId(1)),
            ]
        );
    }
}
