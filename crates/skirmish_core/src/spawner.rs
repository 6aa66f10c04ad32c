//! Spawn scheduler.
//!
//! At most one production request per tick. Workers first, until the
//! worker target is met; combat units after that, with role and body
//! chosen by the configured [`SpawnPolicy`](crate::policy::SpawnPolicy).
//! A denied request is backpressure from the economy, not an error: the
//! same branch is re-evaluated next tick.

use crate::arena::{Arena, UnitId};
use crate::config::BotConfig;
use crate::policy::SpawnPolicy;
use crate::state::{BotState, Role, UnitMeta};

/// Run the spawn scheduler for this tick.
///
/// On a successful combat production the unit is staged (waiting flag
/// set), appended to the staging squad, and the spawn-delay counter is
/// set to `part count x spawn_delay_factor` - production cost throttles
/// deployment frequency.
///
/// Returns the produced unit and its role, if production succeeded.
pub fn run_spawner(
    state: &mut BotState,
    config: &BotConfig,
    policy: &SpawnPolicy,
    arena: &mut dyn Arena,
) -> Option<(UnitId, Role)> {
    state.my_facility?;

    if state.workers.len() < config.worker_target {
        match arena.spawn_unit(&policy.worker_body) {
            Ok(id) => {
                state.workers.push(id);
                state.meta.insert(id, UnitMeta::worker());
                tracing::debug!(unit = id.0, "produced worker");
                Some((id, Role::Worker))
            }
            Err(err) => {
                tracing::trace!(%err, "worker production denied");
                None
            }
        }
    } else {
        let order = policy.combat_order(state.squad.len(), config.squad_quota);
        match arena.spawn_unit(&order.body) {
            Ok(id) => {
                state.meta.insert(id, UnitMeta::staged(order.role));
                state.squad.push(id);
                state.spawn_delay = order.part_count() as u32 * config.spawn_delay_factor;
                tracing::debug!(unit = id.0, role = ?order.role, "produced combat unit");
                Some((id, order.role))
            }
            Err(err) => {
                tracing::trace!(%err, "combat production denied");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{
        BodyPart, ContainerView, FacilityView, StructureId, Target, UnitView,
    };
    use crate::error::{ActionError, SpawnError};

    /// Arena stub whose facility either produces sequential ids or
    /// denies everything.
    struct StubFacility {
        next_id: u64,
        deny: Option<SpawnError>,
        bodies: Vec<Vec<BodyPart>>,
    }

    impl StubFacility {
        fn accepting() -> Self {
            Self {
                next_id: 1,
                deny: None,
                bodies: Vec::new(),
            }
        }

        fn denying(err: SpawnError) -> Self {
            Self {
                next_id: 1,
                deny: Some(err),
                bodies: Vec::new(),
            }
        }
    }

    impl Arena for StubFacility {
        fn units(&self) -> Vec<UnitView> {
            Vec::new()
        }
        fn facilities(&self) -> Vec<FacilityView> {
            Vec::new()
        }
        fn containers(&self) -> Vec<ContainerView> {
            Vec::new()
        }
        fn find_closest_by_path(&self, _from: UnitId, _candidates: &[Target]) -> Option<Target> {
            None
        }
        fn spawn_unit(&mut self, body: &[BodyPart]) -> Result<UnitId, SpawnError> {
            if let Some(err) = self.deny {
                return Err(err);
            }
            self.bodies.push(body.to_vec());
            let id = UnitId(self.next_id);
            self.next_id += 1;
            Ok(id)
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

    fn state_with_facility() -> BotState {
        let mut state = BotState::new();
        state.my_facility = Some(StructureId(1));
        state
    }

    #[test]
    fn test_no_facility_no_production() {
        let mut state = BotState::new();
        let mut arena = StubFacility::accepting();

        let produced = run_spawner(
            &mut state,
            &BotConfig::default(),
            &SpawnPolicy::uniform_kiter(),
            &mut arena,
        );
        assert!(produced.is_none());
        assert!(arena.bodies.is_empty());
    }

    #[test]
    fn test_workers_fill_deficit_before_combat() {
        let mut state = state_with_facility();
        let config = BotConfig::default();
        let policy = SpawnPolicy::uniform_kiter();
        let mut arena = StubFacility::accepting();

        for _ in 0..3 {
            let (_, role) = run_spawner(&mut state, &config, &policy, &mut arena).unwrap();
            assert_eq!(role, Role::Worker);
        }
        assert_eq!(state.workers.len(), 3);
        assert!(state.squad.is_empty());

        let (_, role) = run_spawner(&mut state, &config, &policy, &mut arena).unwrap();
        assert_eq!(role, Role::Kiter);
        assert_eq!(state.squad.len(), 1);
    }

    #[test]
    fn test_combat_production_stages_and_sets_delay() {
        let mut state = state_with_facility();
        state.workers = vec![UnitId(101), UnitId(102), UnitId(103)];
        let config = BotConfig::default();
        let policy = SpawnPolicy::uniform_kiter();
        let mut arena = StubFacility::accepting();

        let (id, role) = run_spawner(&mut state, &config, &policy, &mut arena).unwrap();

        assert_eq!(role, Role::Kiter);
        assert!(state.is_waiting(id));
        assert_eq!(state.squad, vec![id]);
        // Kiter body has 9 parts, factor 3.
        assert_eq!(state.spawn_delay, 27);
    }

    #[test]
    fn test_denied_production_mutates_nothing() {
        let mut state = state_with_facility();
        state.workers = vec![UnitId(101), UnitId(102), UnitId(103)];
        let hash = state.state_hash();
        let mut arena = StubFacility::denying(SpawnError::InsufficientResources);

        let produced = run_spawner(
            &mut state,
            &BotConfig::default(),
            &SpawnPolicy::uniform_kiter(),
            &mut arena,
        );

        assert!(produced.is_none());
        assert_eq!(state.state_hash(), hash);
    }

    #[test]
    fn test_policy_support_slot_reaches_facility() {
        let mut state = state_with_facility();
        state.workers = vec![UnitId(101), UnitId(102), UnitId(103)];
        state.squad = vec![UnitId(1), UnitId(2), UnitId(3)];
        for id in &state.squad {
            state.meta.insert(*id, UnitMeta::staged(Role::Grunt));
        }
        let mut arena = StubFacility::accepting();

        let (_, role) = run_spawner(
            &mut state,
            &BotConfig::default(),
            &SpawnPolicy::assault_with_support(),
            &mut arena,
        )
        .unwrap();

        assert_eq!(role, Role::Healer);
        assert_eq!(arena.bodies[0].len(), 5);
        // Healer body has 5 parts, factor 3.
        assert_eq!(state.spawn_delay, 15);
    }
}
