//! Production-and-role policy.
//!
//! The one place the observed bot lineages genuinely disagree is what to
//! produce for each squad slot: a uniform ranged/self-healing line, or a
//! melee line with a dedicated healer in the last slot. Rather than
//! hardcode either branch, the policy is data: a body-and-role order for
//! ordinary slots, an optional support order for the reserved trailing
//! slots, selected at initialization and loadable from RON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::BodyPart;
use crate::state::Role;

/// Error type for policy and configuration loading.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// File not found.
    #[error("policy file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("failed to read policy file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("failed to parse policy: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// A production order: what role to stamp and what body to request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnOrder {
    /// Role assigned to the produced unit.
    pub role: Role,
    /// Body composition requested from the facility.
    pub body: Vec<BodyPart>,
}

impl SpawnOrder {
    /// Number of body parts; drives the production-cost cooldown.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.body.len()
    }
}

/// A complete production-and-role policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    /// Policy name, for logs and reports.
    pub name: String,
    /// Body for resource-gathering workers.
    pub worker_body: Vec<BodyPart>,
    /// Order for ordinary squad slots.
    pub line: SpawnOrder,
    /// Order for the reserved trailing slots, if any.
    pub support: Option<SpawnOrder>,
    /// How many trailing squad slots the support order claims.
    pub support_slots: usize,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::uniform_kiter()
    }
}

impl SpawnPolicy {
    /// Reference policy: every squad slot is a ranged self-healing kiter.
    #[must_use]
    pub fn uniform_kiter() -> Self {
        use BodyPart::{Carry, Heal, Move, RangedAttack};
        Self {
            name: "UniformKiter".to_string(),
            worker_body: vec![Move, Carry, Move],
            line: SpawnOrder {
                role: Role::Kiter,
                body: vec![Move, Move, Move, Move, Move, Move, Move, Heal, RangedAttack],
            },
            support: None,
            support_slots: 0,
        }
    }

    /// Alternate policy: melee line with one healer reserved for the
    /// final squad slot.
    #[must_use]
    pub fn assault_with_support() -> Self {
        use BodyPart::{Attack, Carry, Heal, Move};
        Self {
            name: "AssaultWithSupport".to_string(),
            worker_body: vec![Move, Carry, Move],
            line: SpawnOrder {
                role: Role::Grunt,
                body: vec![Move, Move, Move, Move, Attack, Attack, Attack, Attack],
            },
            support: Some(SpawnOrder {
                role: Role::Healer,
                body: vec![Move, Move, Move, Heal, Heal],
            }),
            support_slots: 1,
        }
    }

    /// Look up a preset policy by name.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "kiter" | "uniform_kiter" => Some(Self::uniform_kiter()),
            "assault" | "assault_with_support" => Some(Self::assault_with_support()),
            _ => None,
        }
    }

    /// Load a policy from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PolicyError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let policy: Self = ron::from_str(&contents)?;
        Ok(policy)
    }

    /// Choose the order for the next combat production, given the
    /// staging squad's current size and the deployment quota.
    ///
    /// Ordinary slots take the line order; the final `support_slots`
    /// slots take the support order when one is configured.
    #[must_use]
    pub fn combat_order(&self, squad_len: usize, quota: usize) -> &SpawnOrder {
        match &self.support {
            Some(support) if squad_len + self.support_slots >= quota => support,
            _ => &self.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_kiter_fills_every_slot() {
        let policy = SpawnPolicy::uniform_kiter();
        for squad_len in 0..4 {
            let order = policy.combat_order(squad_len, 4);
            assert_eq!(order.role, Role::Kiter);
        }
        assert_eq!(policy.line.part_count(), 9);
    }

    #[test]
    fn test_assault_reserves_last_slot_for_healer() {
        let policy = SpawnPolicy::assault_with_support();
        assert_eq!(policy.combat_order(0, 4).role, Role::Grunt);
        assert_eq!(policy.combat_order(1, 4).role, Role::Grunt);
        assert_eq!(policy.combat_order(2, 4).role, Role::Grunt);
        assert_eq!(policy.combat_order(3, 4).role, Role::Healer);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(
            SpawnPolicy::preset("kiter").map(|p| p.name),
            Some("UniformKiter".to_string())
        );
        assert_eq!(
            SpawnPolicy::preset("assault").map(|p| p.name),
            Some("AssaultWithSupport".to_string())
        );
        assert!(SpawnPolicy::preset("nonesuch").is_none());
    }

    #[test]
    fn test_ron_roundtrip() {
        let policy = SpawnPolicy::assault_with_support();
        let encoded = ron::to_string(&policy).unwrap();
        let decoded: SpawnPolicy = ron::from_str(&encoded).unwrap();
        assert_eq!(policy, decoded);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = SpawnPolicy::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, PolicyError::FileNotFound(_)));
    }
}
