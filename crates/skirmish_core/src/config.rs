//! Bot tuning parameters.
//!
//! Defaults match the reference configuration; everything is
//! data-driven and RON-loadable so playtesting can tune values without
//! recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::math::Fixed;
use crate::policy::PolicyError;

/// Tunable parameters for the decision core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Keep producing workers until this many are alive.
    pub worker_target: usize,
    /// Staging squad size that triggers deployment.
    pub squad_quota: usize,
    /// Radius around the facility scanned for remaining resource.
    pub starvation_radius: i32,
    /// Radius within which a kiter engages instead of closing in.
    pub engagement_radius: i32,
    /// Number of in-range enemies at which a kiter switches to area attack.
    pub area_attack_threshold: usize,
    /// Spawn delay per body part of the produced unit.
    pub spawn_delay_factor: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            worker_target: 3,
            squad_quota: 4,
            starvation_radius: 5,
            engagement_radius: 3,
            area_attack_threshold: 3,
            spawn_delay_factor: 3,
        }
    }
}

impl BotConfig {
    /// Starvation radius as a fixed-point distance.
    #[must_use]
    pub fn starvation_radius_fixed(&self) -> Fixed {
        Fixed::from_num(self.starvation_radius)
    }

    /// Engagement radius as a fixed-point distance.
    #[must_use]
    pub fn engagement_radius_fixed(&self) -> Fixed {
        Fixed::from_num(self.engagement_radius)
    }

    /// Load a configuration from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PolicyError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = ron::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_policy() {
        let config = BotConfig::default();
        assert_eq!(config.worker_target, 3);
        assert_eq!(config.squad_quota, 4);
        assert_eq!(config.starvation_radius, 5);
        assert_eq!(config.engagement_radius, 3);
        assert_eq!(config.area_attack_threshold, 3);
        assert_eq!(config.spawn_delay_factor, 3);
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = BotConfig {
            squad_quota: 6,
            ..Default::default()
        };
        let encoded = ron::to_string(&config).unwrap();
        let decoded: BotConfig = ron::from_str(&encoded).unwrap();
        assert_eq!(config, decoded);
    }
}
