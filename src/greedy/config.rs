//! Greedy allocator configuration.

use crate::error::ConfigError;
use crate::models::{PriorityTier, RecipientKind};

/// Base priority score per (recipient kind, priority tier).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorityTable {
    /// Rows: FoodBank, Shelter, CommunityCenter. Columns: High, Medium, Low.
    pub weights: [[f64; 3]; 3],
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            weights: [[4.0, 2.5, 1.5], [3.5, 2.0, 1.0], [3.0, 1.5, 1.0]],
        }
    }
}

impl PriorityTable {
    /// Looks up the base score.
    pub fn score(&self, kind: RecipientKind, tier: PriorityTier) -> f64 {
        let row = match kind {
            RecipientKind::FoodBank => 0,
            RecipientKind::Shelter => 1,
            RecipientKind::CommunityCenter => 2,
        };
        let col = match tier {
            PriorityTier::High => 0,
            PriorityTier::Medium => 1,
            PriorityTier::Low => 2,
        };
        self.weights[row][col]
    }
}

/// Configuration for [`GreedyAllocator`](super::GreedyAllocator).
///
/// # Examples
///
/// ```
/// use u_foodnet::greedy::GreedyConfig;
///
/// let config = GreedyConfig::default().with_floor_fraction(0.5);
/// assert!(config.validate().is_ok());
/// assert!(GreedyConfig::default().with_floor_fraction(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreedyConfig {
    pub priorities: PriorityTable,

    /// Fraction of current demand guaranteed to High-priority recipients.
    pub floor_fraction: f64,

    /// Cap on the demand-share bonus: the demand factor is
    /// `1 + min(fairness_cap, demand / total_demand)`.
    pub fairness_cap: f64,

    /// Score multiplier when an item matches the recipient's preference.
    pub preference_bonus: f64,

    /// Score multiplier for items close to expiry.
    pub urgency_boost: f64,

    /// Items with fewer hours left than this get the urgency boost.
    pub urgency_window_hours: f64,

    /// Items with fewer hours left than this count as waste risk.
    pub waste_risk_hours: f64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            priorities: PriorityTable::default(),
            floor_fraction: 0.3,
            fairness_cap: 0.5,
            preference_bonus: 2.0,
            urgency_boost: 1.5,
            urgency_window_hours: 12.0,
            waste_risk_hours: 6.0,
        }
    }
}

impl GreedyConfig {
    /// Sets the priority floor fraction.
    pub fn with_floor_fraction(mut self, fraction: f64) -> Self {
        self.floor_fraction = fraction;
        self
    }

    /// Sets the demand-share cap.
    pub fn with_fairness_cap(mut self, cap: f64) -> Self {
        self.fairness_cap = cap;
        self
    }

    /// Sets the base priority table.
    pub fn with_priorities(mut self, priorities: PriorityTable) -> Self {
        self.priorities = priorities;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.floor_fraction) {
            return Err(ConfigError::OutOfRange {
                name: "floor_fraction",
                lo: 0.0,
                hi: 1.0,
                value: self.floor_fraction,
            });
        }
        let non_negative = [
            ("fairness_cap", self.fairness_cap),
            ("preference_bonus", self.preference_bonus),
            ("urgency_boost", self.urgency_boost),
            ("urgency_window_hours", self.urgency_window_hours),
            ("waste_risk_hours", self.waste_risk_hours),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        for value in self.priorities.weights.iter().flatten() {
            if !value.is_finite() || *value < 0.0 {
                return Err(ConfigError::Negative {
                    name: "priorities",
                    value: *value,
                });
            }
        }
        Ok(())
    }
}
