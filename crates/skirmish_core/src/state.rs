//! Bot-owned simulation state.
//!
//! The engine owns the units; the bot owns what it *thinks* about them.
//! All of that lives in one explicit [`BotState`] value threaded through
//! the per-tick driver - there is no process-global state. Metadata the
//! engine has no notion of (role, staging flag) is kept in a side map
//! keyed by unit identity, so core state lifetime is decoupled from
//! engine object lifetime.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::arena::{StructureId, UnitId};

/// Role assigned to a unit at production time. Immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Resource gatherer; never joins a squad.
    Worker,
    /// Melee line unit.
    Grunt,
    /// Dedicated support unit.
    Healer,
    /// Ranged self-healing skirmisher.
    Kiter,
}

/// Core-owned metadata for a produced unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitMeta {
    /// Combat role, fixed at production.
    pub role: Role,
    /// True while the unit is held in the staging squad.
    pub waiting_for_squad: bool,
}

impl UnitMeta {
    /// Metadata for a freshly produced worker.
    #[must_use]
    pub const fn worker() -> Self {
        Self {
            role: Role::Worker,
            waiting_for_squad: false,
        }
    }

    /// Metadata for a freshly produced combat unit, staged for deployment.
    #[must_use]
    pub const fn staged(role: Role) -> Self {
        Self {
            role,
            waiting_for_squad: true,
        }
    }
}

/// All mutable bot state, owned by the tick driver.
///
/// Invariants, maintained by the components that mutate each field:
/// - a unit id appears in at most one of `workers`, `squad`, `army`;
/// - every member of `squad` has `waiting_for_squad == true`;
/// - dead ids are pruned from every collection before decisions run.
#[derive(Debug, Clone, Default)]
pub struct BotState {
    /// Live worker units.
    pub workers: Vec<UnitId>,
    /// Staging squad: combat units produced but not yet released.
    pub squad: Vec<UnitId>,
    /// Active force: combat units authorized to fight.
    pub army: Vec<UnitId>,
    /// Role and staging metadata per produced unit.
    pub meta: HashMap<UnitId, UnitMeta>,
    /// Deployment cooldown; decremented once per tick while positive.
    pub spawn_delay: u32,
    /// Our production facility, if still standing.
    pub my_facility: Option<StructureId>,
    /// The enemy production facility, once located.
    pub enemy_facility: Option<StructureId>,
}

impl BotState {
    /// Create empty state for the start of a match.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a unit's role, if the unit is one of ours.
    #[must_use]
    pub fn role_of(&self, id: UnitId) -> Option<Role> {
        self.meta.get(&id).map(|m| m.role)
    }

    /// Check a unit's staging flag. Unknown units are not waiting.
    #[must_use]
    pub fn is_waiting(&self, id: UnitId) -> bool {
        self.meta.get(&id).is_some_and(|m| m.waiting_for_squad)
    }

    /// Deterministic hash of the full state.
    ///
    /// Map entries are folded in sorted id order so two identical states
    /// always hash the same; used by the determinism harness.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.workers.hash(&mut hasher);
        self.squad.hash(&mut hasher);
        self.army.hash(&mut hasher);
        self.spawn_delay.hash(&mut hasher);
        self.my_facility.hash(&mut hasher);
        self.enemy_facility.hash(&mut hasher);

        let mut ids: Vec<_> = self.meta.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            id.hash(&mut hasher);
            self.meta[&id].hash(&mut hasher);
        }

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_constructors() {
        let worker = UnitMeta::worker();
        assert_eq!(worker.role, Role::Worker);
        assert!(!worker.waiting_for_squad);

        let staged = UnitMeta::staged(Role::Kiter);
        assert_eq!(staged.role, Role::Kiter);
        assert!(staged.waiting_for_squad);
    }

    #[test]
    fn test_role_lookup() {
        let mut state = BotState::new();
        state.meta.insert(UnitId(3), UnitMeta::staged(Role::Grunt));

        assert_eq!(state.role_of(UnitId(3)), Some(Role::Grunt));
        assert_eq!(state.role_of(UnitId(4)), None);
        assert!(state.is_waiting(UnitId(3)));
        assert!(!state.is_waiting(UnitId(4)));
    }

    #[test]
    fn test_state_hash_ignores_meta_insertion_order() {
        let mut a = BotState::new();
        a.meta.insert(UnitId(1), UnitMeta::worker());
        a.meta.insert(UnitId(2), UnitMeta::staged(Role::Healer));

        let mut b = BotState::new();
        b.meta.insert(UnitId(2), UnitMeta::staged(Role::Healer));
        b.meta.insert(UnitId(1), UnitMeta::worker());

        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_state_hash_reflects_changes() {
        let mut state = BotState::new();
        let before = state.state_hash();
        state.spawn_delay = 9;
        assert_ne!(before, state.state_hash());
    }
}
