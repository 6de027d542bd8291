//! LP objective weights.

use crate::error::ConfigError;

/// Objective weights and the extraction threshold.
///
/// Each kilogram on `(item i, recipient j, vehicle k)` costs
///
/// ```text
/// d(vehicle, donor) + d(donor, recipient)
///     + perishability_weight / perishability_hours - quantity_reward
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpConfig {
    pub perishability_weight: f64,

    /// Reward per assigned kilogram.
    pub quantity_reward: f64,

    /// Solution values at or below this are treated as solver noise.
    pub min_assignment_kg: f64,
}

impl Default for LpConfig {
    fn default() -> Self {
        Self {
            perishability_weight: 100.0,
            quantity_reward: 5.0,
            min_assignment_kg: 0.01,
        }
    }
}

impl LpConfig {
    pub fn with_quantity_reward(mut self, reward: f64) -> Self {
        self.quantity_reward = reward;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("perishability_weight", self.perishability_weight),
            ("quantity_reward", self.quantity_reward),
            ("min_assignment_kg", self.min_assignment_kg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}
