//! Deterministic stand-in arena engine.
//!
//! Implements the core's [`Arena`] trait with just enough battlefield
//! physics to play out a match: grid positions, one-cell-per-step
//! movement, immediate action resolution with chebyshev range checks,
//! per-part production costs drawn from facility energy, and optional
//! melee retaliation from hostile units. Everything iterates in
//! `BTreeMap` order, so identical command sequences always produce
//! identical battlefields.
//!
//! Every command the decision core issues is also recorded in an action
//! log, so tests can assert on exactly what was decided rather than on
//! downstream damage numbers.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use skirmish_core::arena::{
    Arena, BodyPart, ContainerView, FacilityView, StructureId, Target, UnitId, UnitView,
};
use skirmish_core::error::{ActionError, SpawnError};
use skirmish_core::math::{Fixed, Vec2Fixed};

/// Hit points granted per body part.
pub const HITS_PER_PART: i32 = 100;
/// Cargo space granted per `Carry` part.
pub const CAPACITY_PER_CARRY: i32 = 50;
/// Melee damage dealt per `Attack` part.
pub const DAMAGE_PER_ATTACK: i32 = 30;
/// Ranged damage dealt per `RangedAttack` part.
pub const DAMAGE_PER_RANGED: i32 = 10;
/// Area damage dealt per `RangedAttack` part to each target in radius.
pub const DAMAGE_PER_RANGED_MASS: i32 = 4;
/// Hit points restored per `Heal` part.
pub const HEAL_PER_PART: i32 = 12;
/// Range of melee attack, heal, withdraw and transfer.
pub const TOUCH_RANGE: i32 = 1;
/// Range of ranged and area attacks.
pub const RANGED_RANGE: i32 = 3;
/// Facility hit points.
pub const FACILITY_HITS: i32 = 3000;

/// Energy cost of one body part.
#[must_use]
pub const fn part_cost(part: BodyPart) -> i32 {
    match part {
        BodyPart::Move | BodyPart::Carry => 50,
        BodyPart::Attack => 80,
        BodyPart::RangedAttack => 150,
        BodyPart::Heal => 250,
    }
}

/// Energy cost of a whole body.
#[must_use]
pub fn body_cost(body: &[BodyPart]) -> i32 {
    body.iter().copied().map(part_cost).sum()
}

/// A command the decision core issued, as seen by the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuedAction {
    /// Production request that succeeded.
    Spawn {
        /// The produced unit.
        unit: UnitId,
        /// Number of body parts requested.
        parts: usize,
    },
    /// Move order.
    Move {
        /// Acting unit.
        unit: UnitId,
        /// Move destination.
        target: Target,
    },
    /// Melee attack.
    Attack {
        /// Acting unit.
        unit: UnitId,
        /// Attacked target.
        target: Target,
    },
    /// Ranged attack.
    RangedAttack {
        /// Acting unit.
        unit: UnitId,
        /// Attacked target.
        target: Target,
    },
    /// Area attack around the unit.
    RangedMassAttack {
        /// Acting unit.
        unit: UnitId,
    },
    /// Heal, including self-heal.
    Heal {
        /// Acting unit.
        unit: UnitId,
        /// Healed unit.
        target: UnitId,
    },
    /// Withdraw from a container.
    Withdraw {
        /// Acting unit.
        unit: UnitId,
        /// Source container.
        container: StructureId,
    },
    /// Deposit into a structure.
    Transfer {
        /// Acting unit.
        unit: UnitId,
        /// Destination structure.
        structure: StructureId,
    },
}

#[derive(Debug, Clone)]
struct SandboxUnit {
    mine: bool,
    hits: i32,
    hits_max: i32,
    carry: i32,
    carry_capacity: i32,
    position: Vec2Fixed,
    body: Vec<BodyPart>,
    /// Pending move for the next step. One-shot: the engine moves a
    /// unit only on ticks where a move order was issued.
    move_order: Option<Target>,
}

impl SandboxUnit {
    fn from_body(mine: bool, position: Vec2Fixed, body: Vec<BodyPart>) -> Self {
        let parts = body.len() as i32;
        let carries = body.iter().filter(|p| **p == BodyPart::Carry).count() as i32;
        Self {
            mine,
            hits: parts * HITS_PER_PART,
            hits_max: parts * HITS_PER_PART,
            carry: 0,
            carry_capacity: carries * CAPACITY_PER_CARRY,
            position,
            body,
            move_order: None,
        }
    }

    fn parts(&self, part: BodyPart) -> i32 {
        self.body.iter().filter(|p| **p == part).count() as i32
    }
}

#[derive(Debug, Clone)]
struct SandboxFacility {
    mine: bool,
    hits: i32,
    energy: i32,
    position: Vec2Fixed,
}

#[derive(Debug, Clone)]
struct SandboxContainer {
    stored: i32,
    position: Vec2Fixed,
}

/// The sandbox arena. See the module docs.
#[derive(Debug, Clone, Default)]
pub struct SandboxArena {
    next_id: u64,
    units: BTreeMap<u64, SandboxUnit>,
    facilities: BTreeMap<u64, SandboxFacility>,
    containers: BTreeMap<u64, SandboxContainer>,
    actions: Vec<IssuedAction>,
    retaliation: bool,
}

/// Chebyshev (grid) distance between two positions.
fn grid_distance(a: Vec2Fixed, b: Vec2Fixed) -> Fixed {
    let dx = if a.x > b.x { a.x - b.x } else { b.x - a.x };
    let dy = if a.y > b.y { a.y - b.y } else { b.y - a.y };
    if dx > dy {
        dx
    } else {
        dy
    }
}

fn step_toward(from: Vec2Fixed, to: Vec2Fixed) -> Vec2Fixed {
    let step = |a: Fixed, b: Fixed| -> Fixed {
        if b > a {
            a + Fixed::from_num(1)
        } else if b < a {
            a - Fixed::from_num(1)
        } else {
            a
        }
    };
    Vec2Fixed::new(step(from.x, to.x), step(from.y, to.y))
}

impl SandboxArena {
    /// Create an empty sandbox.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add our production facility with the given stored energy.
    #[must_use]
    pub fn with_my_facility(mut self, position: Vec2Fixed, energy: i32) -> Self {
        let id = self.alloc_id();
        self.facilities.insert(
            id,
            SandboxFacility {
                mine: true,
                hits: FACILITY_HITS,
                energy,
                position,
            },
        );
        self
    }

    /// Add the enemy production facility.
    #[must_use]
    pub fn with_enemy_facility(mut self, position: Vec2Fixed) -> Self {
        let id = self.alloc_id();
        self.facilities.insert(
            id,
            SandboxFacility {
                mine: false,
                hits: FACILITY_HITS,
                energy: 0,
                position,
            },
        );
        self
    }

    /// Add a resource container.
    #[must_use]
    pub fn with_container(mut self, position: Vec2Fixed, stored: i32) -> Self {
        let id = self.alloc_id();
        self.containers
            .insert(id, SandboxContainer { stored, position });
        self
    }

    /// Add a hostile unit with the given body.
    #[must_use]
    pub fn with_enemy_unit(mut self, position: Vec2Fixed, body: Vec<BodyPart>) -> Self {
        self.add_unit(false, position, body);
        self
    }

    /// Enable melee retaliation from hostile units during [`step`](Self::step).
    #[must_use]
    pub fn with_retaliation(mut self) -> Self {
        self.retaliation = true;
        self
    }

    /// Add a unit directly, bypassing production. Returns its id.
    pub fn add_unit(&mut self, mine: bool, position: Vec2Fixed, body: Vec<BodyPart>) -> UnitId {
        let id = self.alloc_id();
        self.units
            .insert(id, SandboxUnit::from_body(mine, position, body));
        UnitId(id)
    }

    /// Set a unit's current hit points (scenario setup).
    pub fn set_unit_hits(&mut self, unit: UnitId, hits: i32) {
        if let Some(u) = self.units.get_mut(&unit.0) {
            u.hits = hits.min(u.hits_max);
        }
    }

    /// Set a unit's carried resource (scenario setup).
    pub fn set_unit_carry(&mut self, unit: UnitId, carry: i32) {
        if let Some(u) = self.units.get_mut(&unit.0) {
            u.carry = carry.min(u.carry_capacity);
        }
    }

    /// Drain the recorded action log.
    pub fn take_actions(&mut self) -> Vec<IssuedAction> {
        std::mem::take(&mut self.actions)
    }

    /// The recorded action log since the last drain.
    #[must_use]
    pub fn actions(&self) -> &[IssuedAction] {
        &self.actions
    }

    /// Whether the enemy facility is still standing.
    #[must_use]
    pub fn enemy_facility_alive(&self) -> bool {
        self.facilities.values().any(|f| !f.mine)
    }

    /// Whether our facility is still standing.
    #[must_use]
    pub fn my_facility_alive(&self) -> bool {
        self.facilities.values().any(|f| f.mine)
    }

    /// Number of live hostile units.
    #[must_use]
    pub fn hostile_count(&self) -> usize {
        self.units.values().filter(|u| !u.mine).count()
    }

    /// Stored energy of our facility, if it stands.
    #[must_use]
    pub fn my_facility_energy(&self) -> Option<i32> {
        self.facilities.values().find(|f| f.mine).map(|f| f.energy)
    }

    /// A unit's current position, if alive.
    #[must_use]
    pub fn unit_position(&self, unit: UnitId) -> Option<Vec2Fixed> {
        self.units.get(&unit.0).map(|u| u.position)
    }

    /// A unit's current hit points, if alive.
    #[must_use]
    pub fn unit_hits(&self, unit: UnitId) -> Option<i32> {
        self.units.get(&unit.0).map(|u| u.hits)
    }

    /// Advance the battlefield by one tick: resolve movement, apply
    /// retaliation, drop the dead.
    pub fn step(&mut self) {
        self.resolve_movement();
        if self.retaliation {
            self.resolve_retaliation();
        }
        let before = self.units.len();
        self.units.retain(|_, u| u.hits > 0);
        let deaths = before - self.units.len();
        if deaths > 0 {
            tracing::trace!(deaths, "units destroyed");
        }
        self.facilities.retain(|_, f| f.hits > 0);
    }

    fn resolve_movement(&mut self) {
        let ids: Vec<u64> = self.units.keys().copied().collect();
        for id in ids {
            let Some(order) = self.units.get_mut(&id).and_then(|u| u.move_order.take()) else {
                continue;
            };
            let Some(dest) = self.target_position(order) else {
                continue;
            };
            if let Some(u) = self.units.get_mut(&id) {
                if u.position != dest {
                    u.position = step_toward(u.position, dest);
                }
            }
        }
    }

    fn resolve_retaliation(&mut self) {
        let touch = Fixed::from_num(TOUCH_RANGE);
        let attackers: Vec<u64> = self
            .units
            .iter()
            .filter(|(_, u)| !u.mine && u.parts(BodyPart::Attack) > 0)
            .map(|(id, _)| *id)
            .collect();

        for attacker in attackers {
            let Some((pos, damage)) = self
                .units
                .get(&attacker)
                .map(|u| (u.position, u.parts(BodyPart::Attack) * DAMAGE_PER_ATTACK))
            else {
                continue;
            };
            let victim = self
                .units
                .iter()
                .filter(|(_, u)| u.mine && u.hits > 0)
                .find(|(_, u)| grid_distance(pos, u.position) <= touch)
                .map(|(id, _)| *id);
            if let Some(victim) = victim {
                if let Some(u) = self.units.get_mut(&victim) {
                    u.hits -= damage;
                }
            }
        }
    }

    fn target_position(&self, target: Target) -> Option<Vec2Fixed> {
        match target {
            Target::Unit(UnitId(id)) => self.units.get(&id).map(|u| u.position),
            Target::Structure(StructureId(id)) => self
                .facilities
                .get(&id)
                .map(|f| f.position)
                .or_else(|| self.containers.get(&id).map(|c| c.position)),
        }
    }

    fn in_range(&self, unit: UnitId, target: Target, range: i32) -> Result<Vec2Fixed, ActionError> {
        let from = self
            .units
            .get(&unit.0)
            .map(|u| u.position)
            .ok_or(ActionError::Failed)?;
        let to = self.target_position(target).ok_or(ActionError::Failed)?;
        if grid_distance(from, to) <= Fixed::from_num(range) {
            Ok(to)
        } else {
            Err(ActionError::NotInRange)
        }
    }

    fn damage_target(&mut self, target: Target, damage: i32) {
        match target {
            Target::Unit(UnitId(id)) => {
                if let Some(u) = self.units.get_mut(&id) {
                    u.hits -= damage;
                }
            }
            Target::Structure(StructureId(id)) => {
                if let Some(f) = self.facilities.get_mut(&id) {
                    f.hits -= damage;
                }
            }
        }
    }

    /// Deterministic hash of the battlefield, for the determinism harness.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (id, u) in &self.units {
            id.hash(&mut hasher);
            u.mine.hash(&mut hasher);
            u.hits.hash(&mut hasher);
            u.carry.hash(&mut hasher);
            u.position.x.to_bits().hash(&mut hasher);
            u.position.y.to_bits().hash(&mut hasher);
        }
        for (id, f) in &self.facilities {
            id.hash(&mut hasher);
            f.mine.hash(&mut hasher);
            f.hits.hash(&mut hasher);
            f.energy.hash(&mut hasher);
        }
        for (id, c) in &self.containers {
            id.hash(&mut hasher);
            c.stored.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl Arena for SandboxArena {
    fn units(&self) -> Vec<UnitView> {
        self.units
            .iter()
            .map(|(id, u)| UnitView {
                id: UnitId(*id),
                mine: u.mine,
                hits: u.hits,
                hits_max: u.hits_max,
                carry: u.carry,
                carry_capacity: u.carry_capacity,
                position: u.position,
            })
            .collect()
    }

    fn facilities(&self) -> Vec<FacilityView> {
        self.facilities
            .iter()
            .map(|(id, f)| FacilityView {
                id: StructureId(*id),
                mine: f.mine,
                position: f.position,
            })
            .collect()
    }

    fn containers(&self) -> Vec<ContainerView> {
        self.containers
            .iter()
            .map(|(id, c)| ContainerView {
                id: StructureId(*id),
                stored: c.stored,
                position: c.position,
            })
            .collect()
    }

    fn find_closest_by_path(&self, from: UnitId, candidates: &[Target]) -> Option<Target> {
        let origin = self.units.get(&from.0)?.position;
        candidates
            .iter()
            .filter_map(|&t| self.target_position(t).map(|pos| (t, pos)))
            .min_by_key(|&(t, pos)| (grid_distance(origin, pos).to_bits(), t))
            .map(|(t, _)| t)
    }

    fn spawn_unit(&mut self, body: &[BodyPart]) -> Result<UnitId, SpawnError> {
        if body.is_empty() {
            return Err(SpawnError::InvalidBody);
        }
        let Some((_, facility)) = self.facilities.iter_mut().find(|(_, f)| f.mine) else {
            return Err(SpawnError::Busy);
        };
        let cost = body_cost(body);
        if facility.energy < cost {
            return Err(SpawnError::InsufficientResources);
        }
        facility.energy -= cost;
        // New units appear on the cell east of the facility.
        let position = Vec2Fixed::new(
            facility.position.x + Fixed::from_num(1),
            facility.position.y,
        );
        let unit = self.add_unit(true, position, body.to_vec());
        self.actions.push(IssuedAction::Spawn {
            unit,
            parts: body.len(),
        });
        Ok(unit)
    }

    fn move_to(&mut self, unit: UnitId, target: Target) {
        if let Some(u) = self.units.get_mut(&unit.0) {
            u.move_order = Some(target);
        }
        self.actions.push(IssuedAction::Move { unit, target });
    }

    fn attack(&mut self, unit: UnitId, target: Target) -> Result<(), ActionError> {
        self.in_range(unit, target, TOUCH_RANGE)?;
        let damage = self
            .units
            .get(&unit.0)
            .map(|u| u.parts(BodyPart::Attack) * DAMAGE_PER_ATTACK)
            .ok_or(ActionError::Failed)?;
        self.damage_target(target, damage);
        self.actions.push(IssuedAction::Attack { unit, target });
        Ok(())
    }

    fn ranged_attack(&mut self, unit: UnitId, target: Target) -> Result<(), ActionError> {
        self.in_range(unit, target, RANGED_RANGE)?;
        let damage = self
            .units
            .get(&unit.0)
            .map(|u| u.parts(BodyPart::RangedAttack) * DAMAGE_PER_RANGED)
            .ok_or(ActionError::Failed)?;
        self.damage_target(target, damage);
        self.actions.push(IssuedAction::RangedAttack { unit, target });
        Ok(())
    }

    fn ranged_mass_attack(&mut self, unit: UnitId) -> Result<(), ActionError> {
        let (origin, damage) = self
            .units
            .get(&unit.0)
            .map(|u| {
                (
                    u.position,
                    u.parts(BodyPart::RangedAttack) * DAMAGE_PER_RANGED_MASS,
                )
            })
            .ok_or(ActionError::Failed)?;

        let range = Fixed::from_num(RANGED_RANGE);
        let victims: Vec<u64> = self
            .units
            .iter()
            .filter(|(_, u)| !u.mine && grid_distance(origin, u.position) <= range)
            .map(|(id, _)| *id)
            .collect();
        for id in victims {
            if let Some(u) = self.units.get_mut(&id) {
                u.hits -= damage;
            }
        }
        let facilities: Vec<u64> = self
            .facilities
            .iter()
            .filter(|(_, f)| !f.mine && grid_distance(origin, f.position) <= range)
            .map(|(id, _)| *id)
            .collect();
        for id in facilities {
            if let Some(f) = self.facilities.get_mut(&id) {
                f.hits -= damage;
            }
        }
        self.actions.push(IssuedAction::RangedMassAttack { unit });
        Ok(())
    }

    fn heal(&mut self, unit: UnitId, target: UnitId) -> Result<(), ActionError> {
        self.in_range(unit, Target::Unit(target), TOUCH_RANGE)?;
        let amount = self
            .units
            .get(&unit.0)
            .map(|u| u.parts(BodyPart::Heal) * HEAL_PER_PART)
            .ok_or(ActionError::Failed)?;
        if let Some(u) = self.units.get_mut(&target.0) {
            u.hits = (u.hits + amount).min(u.hits_max);
        }
        self.actions.push(IssuedAction::Heal { unit, target });
        Ok(())
    }

    fn withdraw(&mut self, unit: UnitId, container: StructureId) -> Result<(), ActionError> {
        self.in_range(unit, Target::Structure(container), TOUCH_RANGE)?;
        let free = self
            .units
            .get(&unit.0)
            .map(|u| u.carry_capacity - u.carry)
            .ok_or(ActionError::Failed)?;
        let Some(c) = self.containers.get_mut(&container.0) else {
            return Err(ActionError::Failed);
        };
        let moved = free.min(c.stored);
        if moved <= 0 {
            return Err(ActionError::Failed);
        }
        c.stored -= moved;
        if let Some(u) = self.units.get_mut(&unit.0) {
            u.carry += moved;
        }
        self.actions.push(IssuedAction::Withdraw { unit, container });
        Ok(())
    }

    fn transfer(&mut self, unit: UnitId, structure: StructureId) -> Result<(), ActionError> {
        self.in_range(unit, Target::Structure(structure), TOUCH_RANGE)?;
        let carried = self
            .units
            .get(&unit.0)
            .map(|u| u.carry)
            .ok_or(ActionError::Failed)?;
        let Some(f) = self.facilities.get_mut(&structure.0) else {
            return Err(ActionError::Failed);
        };
        f.energy += carried;
        if let Some(u) = self.units.get_mut(&unit.0) {
            u.carry = 0;
        }
        self.actions.push(IssuedAction::Transfer { unit, structure });
        Ok(())
    }
}
