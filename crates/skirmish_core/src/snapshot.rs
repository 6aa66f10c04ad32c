//! Per-tick world snapshot.
//!
//! Before any decision runs, the tracked collections are reconciled with
//! what the engine says is actually alive, and the facility references
//! are re-resolved. Downstream components read the battlefield through
//! the returned [`WorldView`] instead of re-querying the engine.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::arena::{Arena, ContainerView, FacilityView, StructureId, Target, UnitId, UnitView};
use crate::math::Vec2Fixed;
use crate::state::BotState;

/// One tick's view of the battlefield.
#[derive(Debug, Clone, Default)]
pub struct WorldView {
    /// All live units, keyed by id.
    units: HashMap<UnitId, UnitView>,
    /// All resource containers.
    pub containers: Vec<ContainerView>,
    /// Our production facility, if standing.
    pub my_facility: Option<FacilityView>,
    /// The enemy production facility, if standing.
    pub enemy_facility: Option<FacilityView>,
}

impl WorldView {
    /// Build a view directly from unit snapshots. Handy in tests; the
    /// tick driver always goes through [`refresh`].
    #[must_use]
    pub fn from_units(units: Vec<UnitView>) -> Self {
        Self {
            units: units.into_iter().map(|u| (u.id, u)).collect(),
            ..Self::default()
        }
    }

    /// Look up a live unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.get(&id)
    }

    /// All live units not owned by us, in stable id order.
    #[must_use]
    pub fn hostile_units(&self) -> Vec<UnitView> {
        let mut hostiles: Vec<_> = self.units.values().filter(|u| !u.mine).copied().collect();
        hostiles.sort_by_key(|u| u.id);
        hostiles
    }

    /// Resolve a target's position, if the target is still alive.
    #[must_use]
    pub fn target_position(&self, target: Target) -> Option<Vec2Fixed> {
        match target {
            Target::Unit(id) => self.units.get(&id).map(|u| u.position),
            Target::Structure(id) => self.structure_position(id),
        }
    }

    fn structure_position(&self, id: StructureId) -> Option<Vec2Fixed> {
        if let Some(f) = &self.my_facility {
            if f.id == id {
                return Some(f.position);
            }
        }
        if let Some(f) = &self.enemy_facility {
            if f.id == id {
                return Some(f.position);
            }
        }
        self.containers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.position)
    }
}

/// Refresh tracked state against the engine and build this tick's view.
///
/// Prunes dead ids from the worker set, staging squad, active force and
/// the metadata map, then re-resolves both facilities. Returns the view
/// and the number of stale references dropped.
pub fn refresh(state: &mut BotState, arena: &dyn Arena) -> (WorldView, usize) {
    let units: HashMap<UnitId, UnitView> = arena.units().into_iter().map(|u| (u.id, u)).collect();
    let live: HashSet<UnitId> = units.keys().copied().collect();

    let before = state.workers.len() + state.squad.len() + state.army.len();
    state.workers.retain(|id| live.contains(id));
    state.squad.retain(|id| live.contains(id));
    state.army.retain(|id| live.contains(id));
    state.meta.retain(|id, _| live.contains(id));
    let pruned = before - (state.workers.len() + state.squad.len() + state.army.len());

    if pruned > 0 {
        tracing::debug!(pruned, "dropped stale unit references");
    }

    let facilities = arena.facilities();
    let my_facility = facilities.iter().find(|f| f.mine).copied();
    let enemy_facility = facilities.iter().find(|f| !f.mine).copied();
    state.my_facility = my_facility.map(|f| f.id);
    state.enemy_facility = enemy_facility.map(|f| f.id);

    let view = WorldView {
        units,
        containers: arena.containers(),
        my_facility,
        enemy_facility,
    };
    (view, pruned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ActionError, SpawnError};
    use crate::math::Fixed;
    use crate::state::UnitMeta;

    /// Bare-bones arena stub for snapshot tests.
    struct StubArena {
        units: Vec<UnitView>,
        facilities: Vec<FacilityView>,
        containers: Vec<ContainerView>,
    }

    impl Arena for StubArena {
        fn units(&self) -> Vec<UnitView> {
            self.units.clone()
        }
        fn facilities(&self) -> Vec<FacilityView> {
            self.facilities.clone()
        }
        fn containers(&self) -> Vec<ContainerView> {
            self.containers.clone()
        }
        fn find_closest_by_path(&self, _from: UnitId, _candidates: &[Target]) -> Option<Target> {
            None
        }
        fn spawn_unit(&mut self, _body: &[crate::arena::BodyPart]) -> Result<UnitId, SpawnError> {
            Err(SpawnError::Busy)
        }
        fn move_to(&mut self, _unit: UnitId, _target: Target) {}
        fn attack(&mut self, _unit: UnitId, _target: Target) -> Result<(), ActionError> {
            Ok(())
        }
        fn ranged_attack(&mut self, _unit: UnitId, _target: Target) -> Result<(), ActionError> {
            Ok(())
        }
        fn ranged_mass_attack(&mut self, _unit: UnitId) -> Result<(), ActionError> {
            Ok(())
        }
        fn heal(&mut self, _unit: UnitId, _target: UnitId) -> Result<(), ActionError> {
            Ok(())
        }
        fn withdraw(&mut self, _unit: UnitId, _container: StructureId) -> Result<(), ActionError> {
            Ok(())
        }
        fn transfer(&mut self, _unit: UnitId, _structure: StructureId) -> Result<(), ActionError> {
            Ok(())
        }
    }

    fn unit(id: u64, mine: bool) -> UnitView {
        UnitView {
            id: UnitId(id),
            mine,
            hits: 100,
            hits_max: 100,
            carry: 0,
            carry_capacity: 0,
            position: Vec2Fixed::ZERO,
        }
    }

    #[test]
    fn test_refresh_prunes_dead_units() {
        let mut state = BotState::new();
        state.workers = vec![UnitId(1), UnitId(2)];
        state.army = vec![UnitId(3)];
        state.squad = vec![UnitId(4)];
        for id in 1..=4 {
            state.meta.insert(UnitId(id), UnitMeta::worker());
        }

        // Only units 1 and 3 survived.
        let arena = StubArena {
            units: vec![unit(1, true), unit(3, true)],
            facilities: vec![],
            containers: vec![],
        };

        let (_, pruned) = refresh(&mut state, &arena);
        assert_eq!(pruned, 2);
        assert_eq!(state.workers, vec![UnitId(1)]);
        assert_eq!(state.army, vec![UnitId(3)]);
        assert!(state.squad.is_empty());
        assert_eq!(state.meta.len(), 2);
    }

    #[test]
    fn test_refresh_resolves_facilities_by_ownership() {
        let mut state = BotState::new();
        let arena = StubArena {
            units: vec![],
            facilities: vec![
                FacilityView {
                    id: StructureId(10),
                    mine: false,
                    position: Vec2Fixed::new(Fixed::from_num(50), Fixed::ZERO),
                },
                FacilityView {
                    id: StructureId(11),
                    mine: true,
                    position: Vec2Fixed::ZERO,
                },
            ],
            containers: vec![],
        };

        let (view, _) = refresh(&mut state, &arena);
        assert_eq!(state.my_facility, Some(StructureId(11)));
        assert_eq!(state.enemy_facility, Some(StructureId(10)));
        assert_eq!(
            view.target_position(Target::Structure(StructureId(10))),
            Some(Vec2Fixed::new(Fixed::from_num(50), Fixed::ZERO))
        );
    }

    #[test]
    fn test_hostiles_sorted_by_id() {
        let mut state = BotState::new();
        let arena = StubArena {
            units: vec![unit(9, false), unit(2, false), unit(5, true)],
            facilities: vec![],
            containers: vec![],
        };
        let (view, _) = refresh(&mut state, &arena);
        let hostiles = view.hostile_units();
        assert_eq!(hostiles.len(), 2);
        assert_eq!(hostiles[0].id, UnitId(2));
        assert_eq!(hostiles[1].id, UnitId(9));
    }
}
